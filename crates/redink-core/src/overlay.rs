//! Host-facing text editing overlay.
//!
//! The engine never draws or measures real glyphs. When a text node enters
//! edit mode the host positions its own input widget from a
//! [`TextEditSession`], and the node is hidden until the session commits.

use crate::nodes::{NodeId, Text};
use crate::view::ViewTransform;
use kurbo::{Point, Size};

/// Text measurement hook supplied by the host.
///
/// Implementations wrap whatever font machinery the embedding has; the
/// default approximation keeps the engine usable without one.
pub trait TextMetrics {
    /// Measure the rendered extent of `content` at the given font size.
    fn measure(&self, content: &str, font_size: f64) -> Size;
}

/// Glyph-free fallback metrics.
///
/// Width is a per-character estimate of the widest line, height a 1.2x
/// line-height multiple. Good enough to place an edit box; hosts with real
/// font access should supply their own implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproxTextMetrics;

impl TextMetrics for ApproxTextMetrics {
    fn measure(&self, content: &str, font_size: f64) -> Size {
        let max_line_len = content.lines().map(|l| l.chars().count()).max().unwrap_or(0);
        let line_count = content.lines().count().max(1);
        Size::new(
            (max_line_len as f64 * font_size * 0.55).max(font_size),
            line_count as f64 * font_size * 1.2,
        )
    }
}

/// Everything the host needs to overlay an input widget on a text node.
#[derive(Debug, Clone, PartialEq)]
pub struct TextEditSession {
    /// The node being edited.
    pub node_id: NodeId,
    /// Top-left of the edit box in device coordinates.
    pub screen_position: Point,
    /// Suggested widget size in device units.
    pub size: Size,
    /// Font size in device units (local size times the view scale).
    pub font_size: f64,
    /// Seed text for the widget; empty when the node held its placeholder.
    pub text: String,
}

impl TextEditSession {
    /// Build a session for `text`, projecting its geometry through the view.
    pub fn for_node(text: &Text, view: &ViewTransform, metrics: &dyn TextMetrics) -> Self {
        let scale = view.scale();
        let local_size = metrics.measure(&text.content, text.font_size);
        Self {
            node_id: text.id,
            screen_position: view.to_device(text.position),
            size: Size::new(local_size.width * scale, local_size.height * scale),
            font_size: text.font_size * scale,
            text: if text.is_placeholder() {
                String::new()
            } else {
                text.content.clone()
            },
        }
    }
}
