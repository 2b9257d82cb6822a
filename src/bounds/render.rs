//! Render-based bounds.
//!
//! Builds a usvg scene graph for the icon and takes the stroke-inclusive
//! union of every rendered node. The build runs on its own thread; the
//! caller waits on a single-slot channel for at most the configured timeout.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use crossbeam::channel::{self, Receiver, RecvTimeoutError};
use thiserror::Error;
use usvg::{Node, Rect, Tree};

use super::Rectangle;
use crate::svg::{Document, SVG_NAMESPACE, SvgError, write_fragment};

/// Why a render attempt produced no bounds.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("build failed: {0}")]
    Failed(String),

    #[error("build cancelled")]
    Cancelled,

    #[error("build timed out after {0:?}")]
    Timeout(Duration),

    #[error("scene builder exited without reporting")]
    Disconnected,

    #[error("scene has no visible geometry")]
    EmptyScene,
}

/// Builds a scene graph from SVG text and reports its tight bounds.
///
/// Implementations run on a worker thread and may take arbitrarily long;
/// the caller stops waiting after its timeout.
pub trait SceneBuilder: Send + Sync {
    fn build(&self, source: &str, canvas: f32) -> Result<Rectangle, RenderError>;

    /// Reject documents whose geometry the builder cannot fully realize.
    /// A rejected document goes straight to the attribute fallback.
    fn check(&self, _document: &Document) -> Result<(), RenderError> {
        Ok(())
    }
}

/// Elements usvg drops when built without text shaping.
const TEXT_ELEMENTS: [&str; 3] = ["text", "tspan", "textPath"];

/// Scene builder backed by usvg.
#[derive(Debug, Clone)]
pub struct UsvgScene {
    /// DPI for unit conversion.
    pub dpi: f32,
}

impl Default for UsvgScene {
    fn default() -> Self {
        Self { dpi: 96.0 }
    }
}

impl SceneBuilder for UsvgScene {
    fn build(&self, source: &str, canvas: f32) -> Result<Rectangle, RenderError> {
        let default_size = usvg::Size::from_wh(canvas, canvas)
            .ok_or_else(|| RenderError::Failed(format!("invalid canvas size {canvas}")))?;
        let options = usvg::Options {
            dpi: self.dpi,
            default_size,
            ..Default::default()
        };

        let tree =
            Tree::from_str(source, &options).map_err(|err| RenderError::Failed(err.to_string()))?;

        calculate_stroke_bounds(&tree)
            .map(Rectangle::from)
            .ok_or(RenderError::EmptyScene)
    }

    /// Text is not shaped (no font database), so its glyphs would be missing
    /// from the scene bounds.
    fn check(&self, document: &Document) -> Result<(), RenderError> {
        if document
            .root()
            .any(&|el| TEXT_ELEMENTS.iter().any(|name| *name == el.local_name()))
        {
            return Err(RenderError::Failed("text elements are not rendered".into()));
        }
        Ok(())
    }
}

// ============================================================================
// Render job
// ============================================================================

/// Terminal notification of one build attempt. Exactly one is sent.
enum RenderOutcome {
    Completed(Rectangle),
    Failed(String),
    Cancelled,
}

/// An in-flight build. Dropping the job cancels it: a build that finishes
/// afterwards reports `Cancelled` into a closed channel.
struct RenderJob {
    outcome: Receiver<RenderOutcome>,
    cancelled: Arc<AtomicBool>,
}

impl RenderJob {
    fn spawn(
        builder: Arc<dyn SceneBuilder>,
        source: String,
        canvas: f32,
    ) -> Result<Self, RenderError> {
        let (tx, rx) = channel::bounded(1);
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);

        thread::Builder::new()
            .name("iconbox-render".into())
            .spawn(move || {
                let outcome = if flag.load(Ordering::Acquire) {
                    RenderOutcome::Cancelled
                } else {
                    match builder.build(&source, canvas) {
                        _ if flag.load(Ordering::Acquire) => RenderOutcome::Cancelled,
                        Ok(bounds) => RenderOutcome::Completed(bounds),
                        Err(RenderError::Cancelled) => RenderOutcome::Cancelled,
                        Err(err) => RenderOutcome::Failed(err.to_string()),
                    }
                };
                // Receiver is gone once the caller timed out.
                let _ = tx.send(outcome);
            })
            .map_err(|err| RenderError::Failed(format!("cannot start scene builder: {err}")))?;

        Ok(Self {
            outcome: rx,
            cancelled,
        })
    }

    fn wait(&self, timeout: Duration) -> Result<Rectangle, RenderError> {
        match self.outcome.recv_timeout(timeout) {
            Ok(RenderOutcome::Completed(bounds)) => Ok(bounds),
            Ok(RenderOutcome::Failed(message)) => Err(RenderError::Failed(message)),
            Ok(RenderOutcome::Cancelled) => Err(RenderError::Cancelled),
            Err(RecvTimeoutError::Timeout) => Err(RenderError::Timeout(timeout)),
            Err(RecvTimeoutError::Disconnected) => Err(RenderError::Disconnected),
        }
    }
}

impl Drop for RenderJob {
    fn drop(&mut self) {
        self.cancelled.store(true, Ordering::Release);
    }
}

/// Run `builder` on a worker thread and wait up to `timeout` for its bounds.
pub(crate) fn render_bounds(
    builder: Arc<dyn SceneBuilder>,
    source: String,
    canvas: f32,
    timeout: Duration,
) -> Result<Rectangle, RenderError> {
    let job = RenderJob::spawn(builder, source, canvas)?;
    job.wait(timeout)
}

/// Serialize a document for the scene builder.
///
/// Icons exported without namespace declarations are common; the builder
/// only accepts elements in the SVG namespace, so the missing declarations
/// are added to a copy of the root.
pub(crate) fn scene_source(document: &Document) -> Result<String, SvgError> {
    let root = document.root();
    let needs_ns = root.name == "svg" && !root.has_attr("xmlns");
    let needs_xlink = !root.has_attr("xmlns:xlink")
        && root.any(&|el| el.attributes.iter().any(|(key, _)| key.starts_with("xlink:")));

    if !needs_ns && !needs_xlink {
        return write_fragment(root);
    }

    let mut root = root.clone();
    if needs_ns {
        root.set_attr("xmlns", SVG_NAMESPACE);
    }
    if needs_xlink {
        root.set_attr("xmlns:xlink", "http://www.w3.org/1999/xlink");
    }
    write_fragment(&root)
}

// ============================================================================
// Scene bounds
// ============================================================================

/// Calculate the stroke-inclusive bounding box of all elements in the tree
///
/// # Returns
/// - `Some(Rect)` - The combined bounding box of all visible elements
/// - `None` - If the tree has no visible elements
fn calculate_stroke_bounds(tree: &Tree) -> Option<Rect> {
    let mut bounds: Option<Rect> = None;
    traverse_group(tree.root(), &mut bounds);
    bounds
}

/// Accumulate canvas-space bounds of every leaf below `group`
fn traverse_group(group: &usvg::Group, bounds: &mut Option<Rect>) {
    for node in group.children() {
        match node {
            Node::Group(nested) => traverse_group(nested, bounds),
            _ => *bounds = merge_bounds(*bounds, node.abs_stroke_bounding_box()),
        }
    }
}

/// Merge two optional bounding boxes into one
fn merge_bounds(a: Option<Rect>, b: Rect) -> Option<Rect> {
    match a {
        Some(existing) => {
            let min_x = existing.x().min(b.x());
            let min_y = existing.y().min(b.y());
            let max_x = existing.right().max(b.right());
            let max_y = existing.bottom().max(b.bottom());

            Rect::from_xywh(min_x, min_y, max_x - min_x, max_y - min_y)
        }
        None => Some(b),
    }
}
