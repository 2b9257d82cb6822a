//! Icon loading and serialization errors.

use std::path::PathBuf;
use thiserror::Error;

use crate::svg::SvgError;

/// Errors surfaced by [`Icon`](super::Icon).
#[derive(Debug, Error)]
pub enum IconError {
    #[error("failed to read `{}`", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse `{}`", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: SvgError,
    },

    #[error("failed to serialize `{name}`")]
    Write {
        name: String,
        #[source]
        source: SvgError,
    },
}

impl IconError {
    /// Whether the icon could not be loaded at all (unreadable file,
    /// undecodable bytes, malformed XML, or a root that is not `<svg>`).
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::Read { .. } | Self::Parse { .. })
    }
}
