//! Text annotation node.

use super::{InkStyle, NodeId};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A text annotation.
///
/// The node is counter-rotated against the composition rotation at creation
/// so it reads upright no matter how the board is turned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Text {
    pub(crate) id: NodeId,
    /// Top-left corner in root-local coordinates.
    pub position: Point,
    /// The text content.
    pub content: String,
    /// Font size in local units.
    pub font_size: f64,
    /// Rotation in degrees, normally the negation of the group rotation.
    pub rotation: f64,
    /// Whether pointer drags may move this node.
    pub draggable: bool,
    /// Hidden while an edit overlay stands in for the node.
    pub visible: bool,
    /// Ink attributes captured at placement (color is the text fill).
    pub style: InkStyle,
}

impl Text {
    /// Default font size.
    pub const DEFAULT_FONT_SIZE: f64 = 20.0;

    /// Content a freshly placed node carries until the first edit.
    pub const PLACEHOLDER: &'static str = "Double-click to edit";

    /// Create a placeholder text node at the given local point.
    pub fn new(position: Point, group_rotation: f64, style: InkStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            content: Self::PLACEHOLDER.to_string(),
            font_size: Self::DEFAULT_FONT_SIZE,
            rotation: -group_rotation,
            draggable: true,
            visible: true,
            style,
        }
    }

    /// True while the node still shows its placeholder.
    pub fn is_placeholder(&self) -> bool {
        self.content == Self::PLACEHOLDER
    }

    pub fn set_content(&mut self, content: String) {
        self.content = content;
    }

    /// Approximate width from the widest line; actual width depends on the
    /// host font, which the engine deliberately knows nothing about.
    fn approximate_width(&self) -> f64 {
        let max_line_len = self.content.lines().map(|l| l.chars().count()).max().unwrap_or(0);
        (max_line_len as f64 * self.font_size * 0.55).max(self.font_size)
    }

    fn approximate_height(&self) -> f64 {
        let line_count = self.content.lines().count().max(1);
        line_count as f64 * self.font_size * 1.2
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + self.approximate_width(),
            self.position.y + self.approximate_height(),
        )
    }

    /// Hit test against the approximate bounds.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.bounds().inflate(tolerance, tolerance).contains(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_text_is_placeholder() {
        let text = Text::new(Point::new(10.0, 10.0), 0.0, InkStyle::default());
        assert!(text.is_placeholder());
        assert!(text.draggable);
        assert!(text.visible);
    }

    #[test]
    fn test_counter_rotation() {
        let text = Text::new(Point::ZERO, 90.0, InkStyle::default());
        assert!((text.rotation + 90.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hit_test_inside_bounds() {
        let text = Text::new(Point::new(100.0, 100.0), 0.0, InkStyle::default());
        let center = text.bounds().center();
        assert!(text.hit_test(center, 0.0));
        assert!(!text.hit_test(Point::new(0.0, 0.0), 0.0));
    }

    #[test]
    fn test_multiline_bounds_grow() {
        let mut text = Text::new(Point::ZERO, 0.0, InkStyle::default());
        let single = text.bounds().height();
        text.set_content("one\ntwo\nthree".to_string());
        assert!(text.bounds().height() > single);
    }
}
