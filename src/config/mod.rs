//! `[icon]` section configuration.
//!
//! Sizing and rendering settings for icon measurement.
//!
//! # Example
//!
//! ```toml
//! [icon]
//! max_size = 60             # Largest pixel edge of a measured icon
//! canvas_size = 60.0        # Canvas used by the scene builder
//! render_timeout_ms = 2000  # Give up on the scene builder after this long
//! dpi = 96.0                # DPI for unit conversion while rendering
//! render = true             # false = skip rendering, attributes only
//! ```

mod error;

pub use error::ConfigError;

use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Default maximum icon edge, in pixels.
pub const MAX_ICON_SIZE: u32 = 60;

/// Icon measurement settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct IconConfig {
    /// Maximum width/height of a scaled icon.
    pub max_size: u32,

    /// Edge length of the square canvas handed to the scene builder.
    pub canvas_size: f32,

    /// How long to wait for the scene builder before falling back.
    pub render_timeout_ms: u64,

    /// DPI for rendering calculations.
    pub dpi: f32,

    /// Try the render-based strategy before reading attributes.
    pub render: bool,
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            max_size: MAX_ICON_SIZE,
            canvas_size: MAX_ICON_SIZE as f32,
            render_timeout_ms: 2000,
            dpi: 96.0,
            render: true,
        }
    }
}

/// Top-level file layout: settings live under `[icon]`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    icon: IconConfig,
}

impl IconConfig {
    /// Parse configuration from a TOML string containing an `[icon]` table.
    ///
    /// A missing table yields the defaults.
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(content)?;
        file.icon.validate()?;
        Ok(file.icon)
    }

    /// Load configuration from a file path.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Render wait as a [`Duration`].
    pub fn render_timeout(&self) -> Duration {
        Duration::from_millis(self.render_timeout_ms)
    }

    /// Validate value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_size == 0 {
            return Err(ConfigError::Validation(
                "`icon.max_size` must be greater than 0".into(),
            ));
        }
        if !(self.canvas_size.is_finite() && self.canvas_size > 0.0) {
            return Err(ConfigError::Validation(format!(
                "`icon.canvas_size` must be a positive number, got {}",
                self.canvas_size
            )));
        }
        if !(self.dpi.is_finite() && self.dpi > 0.0) {
            return Err(ConfigError::Validation(format!(
                "`icon.dpi` must be a positive number, got {}",
                self.dpi
            )));
        }
        if self.render && self.render_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "`icon.render_timeout_ms` must be greater than 0 when rendering is enabled".into(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// tests
// ============================================================================
