//! Freehand stroke node.

use super::{InkStyle, NodeId};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A freehand polyline in root-local coordinates.
///
/// Points are appended exactly as the pointer reports them; there is no
/// resampling or smoothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stroke {
    pub(crate) id: NodeId,
    /// Polyline points in order of drawing.
    pub points: Vec<Point>,
    /// Ink attributes captured at pointer-down.
    pub style: InkStyle,
}

impl Stroke {
    /// Create a stroke anchored at its first point.
    pub fn new(anchor: Point, style: InkStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            points: vec![anchor],
            style,
        }
    }

    /// Append a point to the polyline.
    pub fn add_point(&mut self, point: Point) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn bounds(&self) -> Rect {
        bounds_of(&self.points)
    }
}

/// Axis-aligned bounding box of a point list.
pub(crate) fn bounds_of(points: &[Point]) -> Rect {
    if points.is_empty() {
        return Rect::ZERO;
    }

    let mut min_x = f64::MAX;
    let mut min_y = f64::MAX;
    let mut max_x = f64::MIN;
    let mut max_y = f64::MIN;

    for point in points {
        min_x = min_x.min(point.x);
        min_y = min_y.min(point.y);
        max_x = max_x.max(point.x);
        max_y = max_y.max(point.y);
    }

    Rect::new(min_x, min_y, max_x, max_y)
}
