//! Icon facade.
//!
//! An [`Icon`] owns one sanitized SVG document together with its file name
//! and display name. Bounds are resolved lazily on the first size query and
//! cached for the icon's lifetime.
//!
//! ```ignore
//! let icon = Icon::load("icons/brand-logo_light-bg.svg")?;
//! assert_eq!(icon.name(), "brand logo");
//! let (w, h) = (icon.width(), icon.height());
//! let fragment = icon.to_text()?;
//! ```

mod error;
mod name;


pub use error::IconError;
pub use name::readable_name;

use std::fs;
use std::path::Path;
use std::sync::{LazyLock, OnceLock};

use crate::bounds::{BoundsResolver, Dimension, Rectangle, scale};
use crate::config::MAX_ICON_SIZE;
use crate::svg::{Document, SvgError, decode_source, parse_document, sanitize, write_fragment};

/// Resolver used by the argument-less size accessors.
static DEFAULT_RESOLVER: LazyLock<BoundsResolver> = LazyLock::new(BoundsResolver::default);

/// A loaded, sanitized icon.
#[derive(Debug)]
pub struct Icon {
    document: Document,
    real_name: String,
    name: String,
    bounds: OnceLock<Rectangle>,
}

impl Icon {
    /// Read, parse and sanitize an SVG file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, IconError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| IconError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let real_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self::from_bytes(real_name, &bytes).map_err(|source| IconError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Decode, parse and sanitize raw file contents. The encoding comes
    /// from the byte order mark or the XML declaration, UTF-8 otherwise.
    pub fn from_bytes(real_name: impl Into<String>, bytes: &[u8]) -> Result<Self, SvgError> {
        Self::from_source(real_name, &decode_source(bytes)?)
    }

    /// Parse and sanitize SVG text already in memory.
    ///
    /// `real_name` is the file name the icon is known by, extension included.
    pub fn from_source(real_name: impl Into<String>, source: &str) -> Result<Self, SvgError> {
        let source = source.strip_prefix('\u{feff}').unwrap_or(source);
        let mut document = parse_document(source)?;
        sanitize(&mut document);

        let real_name = real_name.into();
        let name = readable_name(&real_name);

        Ok(Self {
            document,
            real_name,
            name,
            bounds: OnceLock::new(),
        })
    }

    /// File name, extension included.
    pub fn real_name(&self) -> &str {
        &self.real_name
    }

    /// Human-readable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The sanitized document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Bounds, resolved on first use with the default resolver.
    pub fn bounds(&self) -> Rectangle {
        self.bounds_with(&DEFAULT_RESOLVER)
    }

    /// Bounds, resolved on first use with `resolver`.
    ///
    /// Once cached, later calls return the cached value whatever resolver
    /// they pass.
    pub fn bounds_with(&self, resolver: &BoundsResolver) -> Rectangle {
        *self
            .bounds
            .get_or_init(|| resolver.resolve_document(&self.document, &self.real_name))
    }

    /// Pixel size fitted into a `max_size` square.
    pub fn dimension(&self, max_size: u32) -> Dimension {
        scale(&self.bounds(), max_size)
    }

    pub fn dimension_with(&self, resolver: &BoundsResolver, max_size: u32) -> Dimension {
        scale(&self.bounds_with(resolver), max_size)
    }

    /// Pixel size fitted into the resolver's configured square, so the
    /// attribute-less default and the scaling bound agree.
    pub fn fitted(&self, resolver: &BoundsResolver) -> Dimension {
        self.dimension_with(resolver, resolver.max_size())
    }

    /// Pixel width within [`MAX_ICON_SIZE`]. Always the built-in default,
    /// whatever `max_size` a configured resolver uses; see [`Icon::fitted`].
    pub fn width(&self) -> u32 {
        self.dimension(MAX_ICON_SIZE).width
    }

    /// Pixel height within [`MAX_ICON_SIZE`]; see [`Icon::width`].
    pub fn height(&self) -> u32 {
        self.dimension(MAX_ICON_SIZE).height
    }

    /// Serialize the sanitized document as a bare SVG fragment.
    pub fn to_text(&self) -> Result<String, IconError> {
        write_fragment(self.document.root()).map_err(|source| IconError::Write {
            name: self.real_name.clone(),
            source,
        })
    }
}
