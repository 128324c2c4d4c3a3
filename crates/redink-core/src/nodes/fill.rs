//! Background fill node.

use super::{NodeId, Rgba};
use kurbo::Rect;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A solid rectangle covering the whole canvas behind everything else.
///
/// The root group sits at the canvas center, so the fill spans
/// `(-w/2, -h/2)..(w/2, h/2)` in local coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fill {
    pub(crate) id: NodeId,
    pub width: f64,
    pub height: f64,
    pub color: Rgba,
}

impl Fill {
    pub fn new(width: f64, height: f64, color: Rgba) -> Self {
        Self {
            id: Uuid::new_v4(),
            width,
            height,
            color,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(
            -self.width / 2.0,
            -self.height / 2.0,
            self.width / 2.0,
            self.height / 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_is_centered_on_origin() {
        let fill = Fill::new(400.0, 300.0, Rgba::white());
        let bounds = fill.bounds();
        assert!((bounds.x0 + 200.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 150.0).abs() < f64::EPSILON);
        assert!((bounds.width() - 400.0).abs() < f64::EPSILON);
    }
}
