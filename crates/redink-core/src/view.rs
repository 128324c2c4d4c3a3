//! View transform for the root group: pan, discrete zoom, rotation.

use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

/// Smallest allowed scale step (0.2x).
pub const MIN_SCALE_STEP: i32 = 2;
/// Largest allowed scale step (2.0x).
pub const MAX_SCALE_STEP: i32 = 20;
/// Scale step at 1.0x.
pub const DEFAULT_SCALE_STEP: i32 = 10;

/// Default rotation increment in degrees.
pub const DEFAULT_ROTATE_ANGLE: f64 = 45.0;

/// Composition-level transform carried by the root group.
///
/// Zoom is a discrete integer step; the effective scale is `step / 10`.
/// Rotation is degrees normalized to `[0, 360)`. Children are authored in
/// local space, so changing this transform never touches node geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    /// Pan offset: where the local origin lands in device space.
    pub position: Point,
    /// Discrete zoom step in `[MIN_SCALE_STEP, MAX_SCALE_STEP]`.
    pub scale_step: i32,
    /// Rotation in degrees, always in `[0, 360)`.
    pub rotation_degrees: f64,
}

impl ViewTransform {
    /// Create a transform panned to `position` at 1.0x, unrotated.
    pub fn new(position: Point) -> Self {
        Self {
            position,
            scale_step: DEFAULT_SCALE_STEP,
            rotation_degrees: 0.0,
        }
    }

    /// Effective uniform scale factor.
    pub fn scale(&self) -> f64 {
        self.scale_step as f64 / 10.0
    }

    /// Forward affine: local coordinates to device coordinates.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.position.to_vec2())
            * Affine::rotate(self.rotation_degrees.to_radians())
            * Affine::scale(self.scale())
    }

    /// Map a device-space point into local space by inverting the
    /// composed pan/rotation/scale matrix.
    pub fn to_local(&self, device_point: Point) -> Point {
        self.transform().inverse() * device_point
    }

    /// Map a local-space point to device space.
    pub fn to_device(&self, local_point: Point) -> Point {
        self.transform() * local_point
    }

    /// Change the scale step while keeping `anchor` (a device point) over
    /// the same content: `x' = ax - (ax - x) * (new / old)`.
    ///
    /// Out-of-range steps are ignored; returns whether anything changed.
    pub fn zoom_step_at(&mut self, anchor: Point, new_step: i32) -> bool {
        if !(MIN_SCALE_STEP..=MAX_SCALE_STEP).contains(&new_step) || new_step == self.scale_step {
            return false;
        }
        let ratio = new_step as f64 / self.scale_step as f64;
        self.position = Point::new(
            anchor.x - (anchor.x - self.position.x) * ratio,
            anchor.y - (anchor.y - self.position.y) * ratio,
        );
        self.scale_step = new_step;
        true
    }

    /// Change the scale step without moving the pan offset.
    /// Out-of-range steps are ignored; returns whether anything changed.
    pub fn set_scale_step(&mut self, new_step: i32) -> bool {
        if !(MIN_SCALE_STEP..=MAX_SCALE_STEP).contains(&new_step) || new_step == self.scale_step {
            return false;
        }
        self.scale_step = new_step;
        true
    }

    /// Rotate by a signed angle, normalizing into `[0, 360)`.
    pub fn rotate_by(&mut self, angle_degrees: f64) {
        let rotated = self.rotation_degrees + angle_degrees;
        self.rotation_degrees = ((rotated % 360.0) + 360.0) % 360.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Point, b: Point) {
        assert!((a.x - b.x).abs() < 1e-9, "{a:?} vs {b:?}");
        assert!((a.y - b.y).abs() < 1e-9, "{a:?} vs {b:?}");
    }

    #[test]
    fn test_identity_mapping_at_origin() {
        let view = ViewTransform::new(Point::ZERO);
        assert_close(view.to_local(Point::new(10.0, 20.0)), Point::new(10.0, 20.0));
    }

    #[test]
    fn test_pan_maps_origin() {
        let view = ViewTransform::new(Point::new(200.0, 150.0));
        assert_close(view.to_local(Point::new(200.0, 150.0)), Point::ZERO);
    }

    #[test]
    fn test_roundtrip_under_pan_scale_rotation() {
        let mut view = ViewTransform::new(Point::new(120.0, -40.0));
        view.scale_step = 14;
        view.rotate_by(135.0);

        let device = Point::new(321.0, 87.5);
        let local = view.to_local(device);
        assert_close(view.to_device(local), device);
    }

    #[test]
    fn test_scale_step_range_is_enforced() {
        let mut view = ViewTransform::new(Point::ZERO);
        assert!(!view.set_scale_step(MAX_SCALE_STEP + 1));
        assert!(!view.set_scale_step(MIN_SCALE_STEP - 1));
        assert!(view.set_scale_step(MAX_SCALE_STEP));
        assert_eq!(view.scale_step, MAX_SCALE_STEP);
        assert!((view.scale() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_anchor_preserving_zoom_keeps_content_under_pointer() {
        let mut view = ViewTransform::new(Point::new(200.0, 150.0));
        let anchor = Point::new(250.0, 100.0);
        let before = view.to_local(anchor);

        assert!(view.zoom_step_at(anchor, 14));

        let after = view.to_local(anchor);
        assert_close(before, after);
    }

    #[test]
    fn test_rotation_normalization() {
        let mut view = ViewTransform::new(Point::ZERO);
        view.rotate_by(-45.0);
        assert!((view.rotation_degrees - 315.0).abs() < 1e-9);
        view.rotate_by(90.0);
        assert!((view.rotation_degrees - 45.0).abs() < 1e-9);
        for _ in 0..9 {
            view.rotate_by(45.0);
        }
        assert!(view.rotation_degrees >= 0.0 && view.rotation_degrees < 360.0);
    }
}
