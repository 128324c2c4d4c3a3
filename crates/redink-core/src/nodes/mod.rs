//! Scene node definitions for the annotation board.

mod fill;
mod guide;
mod image;
mod mark;
mod stroke;
mod text;

pub use fill::Fill;
pub use guide::{Guide, GuideAxis};
pub use image::{Image, ImageFormat};
pub use mark::{Mark, MarkKind};
pub use stroke::Stroke;
pub use text::Text;

use kurbo::Rect;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for scene nodes.
pub type NodeId = Uuid;

/// RGBA color (8 bits per channel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    /// Parse a `#rgb`, `#rrggbb` or `#rrggbbaa` hex string.
    /// Returns None for anything else.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#')?.trim();
        match hex.len() {
            3 => {
                let r = u8::from_str_radix(&hex[0..1], 16).ok()? * 17;
                let g = u8::from_str_radix(&hex[1..2], 16).ok()? * 17;
                let b = u8::from_str_radix(&hex[2..3], 16).ok()? * 17;
                Some(Self::new(r, g, b, 255))
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Self::new(r, g, b, 255))
            }
            8 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                let a = u8::from_str_radix(&hex[6..8], 16).ok()?;
                Some(Self::new(r, g, b, a))
            }
            _ => None,
        }
    }
}

/// Ink attributes frozen into a node at creation time.
///
/// This is a value copy of the live pen configuration, so later pen
/// changes never restyle nodes that are already on the board.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InkStyle {
    /// Stroke color.
    pub color: Rgba,
    /// Stroke width in local units.
    pub width: f64,
    /// Soft shadow radius; 0 disables the shadow pass.
    pub shadow_blur: f64,
}

impl Default for InkStyle {
    fn default() -> Self {
        Self {
            color: Rgba::from_hex("#f32f15").unwrap_or_else(Rgba::black),
            width: 2.0,
            shadow_blur: 2.0,
        }
    }
}

/// Enum wrapper over every node variant the root group can own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Node {
    /// Full-canvas background fill.
    Fill(Fill),
    /// Background image.
    Image(Image),
    /// Freehand polyline.
    Stroke(Stroke),
    /// Fixed-geometry correction mark.
    Mark(Mark),
    /// Inline text annotation.
    Text(Text),
    /// Axis guide line.
    Guide(Guide),
}

impl Node {
    pub fn id(&self) -> NodeId {
        match self {
            Node::Fill(n) => n.id,
            Node::Image(n) => n.id,
            Node::Stroke(n) => n.id,
            Node::Mark(n) => n.id,
            Node::Text(n) => n.id,
            Node::Guide(n) => n.id,
        }
    }

    /// Bounding box in root-local coordinates.
    pub fn bounds(&self) -> Rect {
        match self {
            Node::Fill(n) => n.bounds(),
            Node::Image(n) => n.bounds(),
            Node::Stroke(n) => n.bounds(),
            Node::Mark(n) => n.bounds(),
            Node::Text(n) => n.bounds(),
            Node::Guide(n) => n.bounds(),
        }
    }

    pub fn is_guide(&self) -> bool {
        matches!(self, Node::Guide(_))
    }

    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Node::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut Text> {
        match self {
            Node::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_stroke_mut(&mut self) -> Option<&mut Stroke> {
        match self {
            Node::Stroke(s) => Some(s),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        assert_eq!(Rgba::from_hex("#f32f15"), Some(Rgba::new(243, 47, 21, 255)));
        assert_eq!(Rgba::from_hex("#fff"), Some(Rgba::white()));
        assert_eq!(
            Rgba::from_hex("#00000080"),
            Some(Rgba::new(0, 0, 0, 128))
        );
        assert_eq!(Rgba::from_hex("red"), None);
        assert_eq!(Rgba::from_hex("#12345"), None);
    }

    #[test]
    fn test_default_ink_is_red_pen() {
        let ink = InkStyle::default();
        assert_eq!(ink.color, Rgba::new(243, 47, 21, 255));
        assert!((ink.width - 2.0).abs() < f64::EPSILON);
    }
}
