//! Iconbox - measure and sanitize SVG icons for palette generation.
//!
//! Every icon is parsed, stripped of filter effects, and given a bounded
//! pixel size. Sizing tries a real scene-graph build first and falls back to
//! the root element's sizing attributes, so a hostile or broken document
//! costs at most one render timeout and never an error.
//!
//! # Modules
//!
//! - [`svg`]: document tree, parsing, sanitizing, writing
//! - [`bounds`]: render / attribute bounds and pixel scaling
//! - [`icon`]: the [`Icon`] facade
//! - [`batch`]: parallel loading and measuring
//! - [`config`]: `[icon]` settings
//! - [`logger`]: `log!` / `debug!` macros

pub mod logger;

pub mod batch;
pub mod bounds;
pub mod config;
pub mod icon;
pub mod svg;

pub use bounds::{BoundsResolver, Dimension, Rectangle, SceneBuilder, UsvgScene, scale};
pub use config::{ConfigError, IconConfig, MAX_ICON_SIZE};
pub use icon::{Icon, IconError};
