//! Icon bounds resolution.
//!
//! # Modules
//!
//! - [`render`]: scene-graph bounds via usvg, on a worker thread with a timeout
//! - [`fallback`]: bounds from root `viewBox` / `width` / `height`
//! - [`scale`]: bounds → pixel dimensions
//!
//! # Strategy
//!
//! ```text
//!   document
//!      │
//!      ▼
//! ┌──────────┐  completed   ┌───────────┐
//! │  render  │ ───────────► │ Rectangle │
//! └────┬─────┘              └───────────┘
//!      │ failed / cancelled / timeout     ▲
//!      ▼                                  │
//! ┌──────────┐  viewBox, width/height,    │
//! │ fallback │ ───── default square ──────┘
//! └──────────┘
//! ```
//!
//! Resolution never fails; the worst case is the default square.

mod fallback;
mod render;
mod scale;

pub use fallback::attribute_bounds;
pub use render::{RenderError, SceneBuilder, UsvgScene};
pub use scale::{Dimension, scale};

use std::sync::Arc;
use std::time::Duration;

use crate::config::IconConfig;
use crate::icon::Icon;
use crate::svg::Document;

/// Axis-aligned rectangle. Width and height are never negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle {
    pub x0: f32,
    pub y0: f32,
    pub width: f32,
    pub height: f32,
}

impl Rectangle {
    /// Negative or NaN extents are clamped to 0.
    pub fn new(x0: f32, y0: f32, width: f32, height: f32) -> Self {
        Self {
            x0,
            y0,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Rectangle at the origin.
    pub fn from_size(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    pub fn square(side: f32) -> Self {
        Self::from_size(side, side)
    }
}

impl From<usvg::Rect> for Rectangle {
    fn from(rect: usvg::Rect) -> Self {
        Self::new(rect.x(), rect.y(), rect.width(), rect.height())
    }
}

// ============================================================================
// Resolver
// ============================================================================

/// Two-tier bounds resolver: scene builder first, attributes second.
///
/// Cheap to share across threads; each call is independent.
#[derive(Clone)]
pub struct BoundsResolver {
    /// `None` skips straight to the attribute fallback.
    builder: Option<Arc<dyn SceneBuilder>>,
    canvas_size: f32,
    timeout: Duration,
    default_side: f32,
    max_size: u32,
}

impl BoundsResolver {
    pub fn new(config: &IconConfig) -> Self {
        let builder = config.render.then(|| {
            Arc::new(UsvgScene { dpi: config.dpi }) as Arc<dyn SceneBuilder>
        });

        Self {
            builder,
            canvas_size: config.canvas_size,
            timeout: config.render_timeout(),
            default_side: config.max_size as f32,
            max_size: config.max_size,
        }
    }

    /// Replace the scene builder.
    pub fn with_builder(mut self, builder: Arc<dyn SceneBuilder>) -> Self {
        self.builder = Some(builder);
        self
    }

    /// Disable the render strategy.
    pub fn attributes_only(mut self) -> Self {
        self.builder = None;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Side of the square icons are fitted into, from [`IconConfig::max_size`].
    pub fn max_size(&self) -> u32 {
        self.max_size
    }

    /// Resolve (uncached) bounds for an icon.
    pub fn resolve(&self, icon: &Icon) -> Rectangle {
        self.resolve_document(icon.document(), icon.real_name())
    }

    /// Resolve bounds for a document. `label` names it in log output.
    pub fn resolve_document(&self, document: &Document, label: &str) -> Rectangle {
        if let Some(bounds) = self.render(document, label) {
            return bounds;
        }

        let bounds = attribute_bounds(document.root(), self.default_side);
        crate::debug!(
            "bounds";
            "{}: {}x{} from attributes",
            label,
            bounds.width,
            bounds.height
        );
        bounds
    }

    fn render(&self, document: &Document, label: &str) -> Option<Rectangle> {
        let builder = self.builder.as_ref()?;

        if let Err(err) = builder.check(document) {
            crate::log!("render"; "{} for {}, falling back to attributes", err, label);
            return None;
        }

        let source = match render::scene_source(document) {
            Ok(source) => source,
            Err(err) => {
                crate::log!("render"; "cannot prepare {}: {}", label, err);
                return None;
            }
        };

        match render::render_bounds(Arc::clone(builder), source, self.canvas_size, self.timeout) {
            Ok(bounds) => {
                crate::debug!("render"; "build completed for {}", label);
                Some(bounds)
            }
            Err(err) => {
                crate::log!("render"; "{} for {}, falling back to attributes", err, label);
                None
            }
        }
    }
}

impl Default for BoundsResolver {
    fn default() -> Self {
        Self::new(&IconConfig::default())
    }
}

impl std::fmt::Debug for BoundsResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundsResolver")
            .field("render", &self.builder.is_some())
            .field("canvas_size", &self.canvas_size)
            .field("timeout", &self.timeout)
            .field("default_side", &self.default_side)
            .field("max_size", &self.max_size)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::svg::parse_document;

    struct Failing;

    impl SceneBuilder for Failing {
        fn build(&self, _: &str, _: f32) -> Result<Rectangle, RenderError> {
            Err(RenderError::Failed("unsupported".into()))
        }
    }

    struct Hanging;

    impl SceneBuilder for Hanging {
        fn build(&self, _: &str, _: f32) -> Result<Rectangle, RenderError> {
            std::thread::sleep(Duration::from_secs(5));
            Ok(Rectangle::square(1.0))
        }
    }

    fn quick_config() -> IconConfig {
        IconConfig {
            render_timeout_ms: 50,
            ..IconConfig::default()
        }
    }

    #[test]
    fn test_rectangle_clamps_negative() {
        let rect = Rectangle::new(1.0, 1.0, -3.0, f32::NAN);
        assert_eq!(rect.width, 0.0);
        assert_eq!(rect.height, 0.0);
    }

    #[test]
    fn test_render_result_preferred() {
        let doc = parse_document(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">
                <rect x="10" y="10" width="20" height="50"/>
            </svg>"#,
        )
        .unwrap();
        let bounds = BoundsResolver::default().resolve_document(&doc, "rect.svg");
        assert!((bounds.width - 20.0).abs() < 0.01);
        assert!((bounds.height - 50.0).abs() < 0.01);
    }

    #[test]
    fn test_failure_falls_back() {
        let doc = parse_document(r#"<svg viewBox="0 0 24 12"/>"#).unwrap();
        let resolver = BoundsResolver::new(&quick_config()).with_builder(Arc::new(Failing));
        assert_eq!(
            resolver.resolve_document(&doc, "failing.svg"),
            Rectangle::from_size(24.0, 12.0)
        );
    }

    #[test]
    fn test_timeout_falls_back() {
        let doc = parse_document(r#"<svg width="30px" height="15px"/>"#).unwrap();
        let resolver = BoundsResolver::new(&quick_config()).with_builder(Arc::new(Hanging));

        let start = std::time::Instant::now();
        let bounds = resolver.resolve_document(&doc, "hanging.svg");
        assert!(start.elapsed() < Duration::from_secs(2));
        assert_eq!(bounds, Rectangle::from_size(30.0, 15.0));
    }

    #[test]
    fn test_empty_scene_falls_back_to_default() {
        let doc = parse_document(r#"<svg xmlns="http://www.w3.org/2000/svg"></svg>"#).unwrap();
        let bounds = BoundsResolver::default().resolve_document(&doc, "empty.svg");
        assert_eq!(bounds, Rectangle::square(60.0));
    }

    #[test]
    fn test_text_icon_uses_attributes() {
        let doc = parse_document(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 200 50">
                <rect width="10" height="10"/>
                <text x="20" y="40" font-size="40">Brand</text>
            </svg>"#,
        )
        .unwrap();
        let bounds = BoundsResolver::default().resolve_document(&doc, "brand.svg");
        assert_eq!(bounds, Rectangle::from_size(200.0, 50.0));
        assert_eq!(scale(&bounds, 60), Dimension { width: 60, height: 15 });
    }

    #[test]
    fn test_attributes_only() {
        let doc = parse_document(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">
                <rect x="10" y="10" width="20" height="50"/>
            </svg>"#,
        )
        .unwrap();
        let resolver = BoundsResolver::default().attributes_only();
        assert_eq!(
            resolver.resolve_document(&doc, "rect.svg"),
            Rectangle::from_size(100.0, 100.0)
        );
    }

    #[test]
    fn test_default_side_follows_config() {
        let config = IconConfig {
            max_size: 32,
            render: false,
            ..IconConfig::default()
        };
        let doc = parse_document("<svg/>").unwrap();
        let resolver = BoundsResolver::new(&config);
        assert_eq!(resolver.max_size(), 32);
        assert_eq!(resolver.resolve_document(&doc, "bare.svg"), Rectangle::square(32.0));
    }
}
