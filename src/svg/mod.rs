//! SVG document handling.
//!
//! # Modules
//!
//! - [`decode`]: file bytes → text (BOM, XML declaration, encoding_rs)
//! - [`document`]: element/attribute/text tree
//! - [`parse`]: XML text → document (quick-xml reader)
//! - [`sanitize`]: filter effect stripping
//! - [`write`]: document → XML fragment (quick-xml writer)
//!
//! # Flow
//!
//! ```text
//! SVG source
//!     │
//!     ▼
//! ┌───────┐     ┌──────────┐     ┌───────┐
//! │ parse │ ──► │ sanitize │ ──► │ write │ ──► fragment / scene builder input
//! └───────┘     └──────────┘     └───────┘
//! ```

mod decode;
mod document;
mod parse;
mod sanitize;
mod write;

pub use decode::decode_source;
pub use document::{Document, Element, Node};
pub use parse::parse_document;
pub use sanitize::sanitize;
pub use write::write_fragment;

use thiserror::Error;

/// SVG namespace, required by the scene builder on the root element.
pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Errors from reading or writing SVG text.
#[derive(Debug, Error)]
pub enum SvgError {
    #[error("malformed XML at byte {position}: {message}")]
    Malformed { position: u64, message: String },

    #[error("cannot decode SVG text: {0}")]
    Encoding(String),

    #[error("document has no root element")]
    NoRoot,

    #[error("document has more than one root element")]
    MultipleRoots,

    #[error("root element is <{0}>, expected <svg>")]
    NotSvg(String),

    #[error("failed to write SVG: {0}")]
    Write(String),
}
