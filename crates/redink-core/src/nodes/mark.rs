//! Correction mark nodes (tick, cross, slash).

use super::stroke::bounds_of;
use super::{InkStyle, NodeId};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The three fixed correction-mark geometries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkKind {
    Tick,
    Cross,
    Slash,
}

/// A correction mark stamped at a pointer-down point.
///
/// Tick and slash templates are keyed by the composition rotation bucket
/// (0°, 90°, 180°, anything else reads as 270°) so the glyph stays legible
/// after whole-board rotation. The cross is one fixed zig-zag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mark {
    pub(crate) id: NodeId,
    pub kind: MarkKind,
    /// Placement point in root-local coordinates.
    pub origin: Point,
    /// Expanded template polyline, origin included.
    pub points: Vec<Point>,
    /// Ink attributes captured at placement.
    pub style: InkStyle,
}

impl Mark {
    /// Stamp a mark at `origin` using the template for the given rotation.
    pub fn new(kind: MarkKind, origin: Point, rotation_degrees: f64, style: InkStyle) -> Self {
        let points = template_offsets(kind, rotation_degrees)
            .iter()
            .map(|&offset| origin + offset)
            .collect();
        Self {
            id: Uuid::new_v4(),
            kind,
            origin,
            points,
            style,
        }
    }

    pub fn bounds(&self) -> Rect {
        bounds_of(&self.points)
    }
}

/// Template offsets relative to the placement point.
///
/// These are the literal stamp geometries; the first entry is always
/// `(0, 0)` so the polyline starts at the pointer position.
fn template_offsets(kind: MarkKind, rotation_degrees: f64) -> &'static [Vec2] {
    const ORIGIN: Vec2 = Vec2::new(0.0, 0.0);

    const TICK_0: [Vec2; 3] = [ORIGIN, Vec2::new(20.0, 15.0), Vec2::new(35.0, -15.0)];
    const TICK_90: [Vec2; 3] = [ORIGIN, Vec2::new(15.0, -20.0), Vec2::new(-15.0, -35.0)];
    const TICK_180: [Vec2; 3] = [ORIGIN, Vec2::new(-15.0, -20.0), Vec2::new(-35.0, 15.0)];
    const TICK_270: [Vec2; 3] = [ORIGIN, Vec2::new(-20.0, 15.0), Vec2::new(15.0, 35.0)];

    const SLASH_0: [Vec2; 2] = [ORIGIN, Vec2::new(30.0, 45.0)];
    const SLASH_90: [Vec2; 2] = [ORIGIN, Vec2::new(45.0, -30.0)];
    const SLASH_180: [Vec2; 2] = [ORIGIN, Vec2::new(-30.0, -45.0)];
    const SLASH_270: [Vec2; 2] = [ORIGIN, Vec2::new(-45.0, 30.0)];

    // Rotation-independent 5-point zig-zag.
    const CROSS: [Vec2; 5] = [
        ORIGIN,
        Vec2::new(30.0, 30.0),
        Vec2::new(15.0, 15.0),
        Vec2::new(30.0, 0.0),
        Vec2::new(0.0, 30.0),
    ];

    match kind {
        MarkKind::Tick => {
            if rotation_degrees == 0.0 {
                &TICK_0
            } else if rotation_degrees == 90.0 {
                &TICK_90
            } else if rotation_degrees == 180.0 {
                &TICK_180
            } else {
                &TICK_270
            }
        }
        MarkKind::Slash => {
            if rotation_degrees == 0.0 {
                &SLASH_0
            } else if rotation_degrees == 90.0 {
                &SLASH_90
            } else if rotation_degrees == 180.0 {
                &SLASH_180
            } else {
                &SLASH_270
            }
        }
        MarkKind::Cross => &CROSS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_template_at_zero_rotation() {
        let mark = Mark::new(
            MarkKind::Tick,
            Point::new(100.0, 100.0),
            0.0,
            InkStyle::default(),
        );
        assert_eq!(
            mark.points,
            vec![
                Point::new(100.0, 100.0),
                Point::new(120.0, 115.0),
                Point::new(135.0, 85.0),
            ]
        );
    }

    #[test]
    fn test_tick_template_at_90_rotation() {
        // Literal 90-degree bucket offsets: +15,-20 then -15,-35.
        let mark = Mark::new(
            MarkKind::Tick,
            Point::new(50.0, 60.0),
            90.0,
            InkStyle::default(),
        );
        assert_eq!(
            mark.points,
            vec![
                Point::new(50.0, 60.0),
                Point::new(65.0, 40.0),
                Point::new(35.0, 25.0),
            ]
        );
    }

    #[test]
    fn test_unbucketed_rotation_falls_back_to_270_template() {
        let at_270 = Mark::new(MarkKind::Slash, Point::ZERO, 270.0, InkStyle::default());
        let at_45 = Mark::new(MarkKind::Slash, Point::ZERO, 45.0, InkStyle::default());
        assert_eq!(at_270.points, at_45.points);
        assert_eq!(at_270.points[1], Point::new(-45.0, 30.0));
    }

    #[test]
    fn test_cross_ignores_rotation() {
        let a = Mark::new(MarkKind::Cross, Point::ZERO, 0.0, InkStyle::default());
        let b = Mark::new(MarkKind::Cross, Point::ZERO, 90.0, InkStyle::default());
        assert_eq!(a.points, b.points);
        assert_eq!(a.points.len(), 5);
    }
}
