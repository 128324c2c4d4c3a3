//! Axis guide nodes.

use super::NodeId;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GuideAxis {
    X,
    Y,
}

/// A measurement guide through the local origin.
///
/// The line spans `-extent..extent` along its axis, which covers the canvas
/// when `extent` is the matching half-dimension.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Guide {
    pub(crate) id: NodeId,
    pub axis: GuideAxis,
    /// Half-length of the guide line.
    pub extent: f64,
    /// Measurement label, e.g. "x 200px".
    pub label: String,
    /// Label anchor in root-local coordinates.
    pub label_position: Point,
}

impl Guide {
    pub fn new(axis: GuideAxis, extent: f64) -> Self {
        let (label, label_position) = match axis {
            GuideAxis::X => (format!("x {extent}px"), Point::new(extent / 2.0 + 10.0, 5.0)),
            GuideAxis::Y => (format!("y {extent}px"), Point::new(5.0, extent / 2.0 + 10.0)),
        };
        Self {
            id: Uuid::new_v4(),
            axis,
            extent,
            label,
            label_position,
        }
    }

    /// Line endpoints in root-local coordinates.
    pub fn endpoints(&self) -> (Point, Point) {
        match self.axis {
            GuideAxis::X => (Point::new(-self.extent, 0.0), Point::new(self.extent, 0.0)),
            GuideAxis::Y => (Point::new(0.0, -self.extent), Point::new(0.0, self.extent)),
        }
    }

    pub fn bounds(&self) -> Rect {
        let (a, b) = self.endpoints();
        Rect::new(a.x.min(b.x), a.y.min(b.y), a.x.max(b.x), a.y.max(b.y))
    }
}
