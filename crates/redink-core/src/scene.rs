//! Scene container: the root group and its owned nodes.

use crate::nodes::{Fill, Node, NodeId, Rgba, Text};
use crate::view::ViewTransform;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// The single composition node owning every drawable.
///
/// The tree is exactly one level deep: the root group carries the
/// composition transform and draggability, children are authored in its
/// local space. History snapshots are deep clones of this struct.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootGroup {
    /// Composition-level pan/zoom/rotation.
    pub view: ViewTransform,
    /// Whether pointer drags pan the whole composition.
    pub draggable: bool,
    nodes: Vec<Node>,
}

impl RootGroup {
    pub fn new(center: Point) -> Self {
        Self {
            view: ViewTransform::new(center),
            draggable: true,
            nodes: Vec::new(),
        }
    }

    /// Append a node and return its id. Later nodes draw on top.
    pub fn add(&mut self, node: Node) -> NodeId {
        let id = node.id();
        self.nodes.push(node);
        id
    }

    /// Children in paint order (back to front).
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Drop all guide nodes (they are re-stamped on each request).
    pub fn remove_guides(&mut self) {
        self.nodes.retain(|n| !n.is_guide());
    }

    pub fn find_text(&self, id: NodeId) -> Option<&Text> {
        self.nodes.iter().find(|n| n.id() == id).and_then(Node::as_text)
    }

    pub fn find_stroke_mut(&mut self, id: NodeId) -> Option<&mut crate::nodes::Stroke> {
        self.nodes
            .iter_mut()
            .find(|n| n.id() == id)
            .and_then(Node::as_stroke_mut)
    }

    pub fn find_text_mut(&mut self, id: NodeId) -> Option<&mut Text> {
        self.nodes
            .iter_mut()
            .find(|n| n.id() == id)
            .and_then(Node::as_text_mut)
    }

    /// Frontmost visible text node hit by a local-space point.
    pub fn text_at_point(&self, local: Point, tolerance: f64) -> Option<&Text> {
        self.nodes
            .iter()
            .rev()
            .filter_map(Node::as_text)
            .find(|t| t.visible && t.hit_test(local, tolerance))
    }

    /// Union of child bounds in local space.
    pub fn bounds(&self) -> Option<Rect> {
        let mut result: Option<Rect> = None;
        for node in &self.nodes {
            let bounds = node.bounds();
            result = Some(match result {
                Some(r) => r.union(bounds),
                None => bounds,
            });
        }
        result
    }

    /// Union of child bounds mapped into device space through the current
    /// transform. Rotation is handled by mapping all four corners.
    pub fn device_bounds(&self) -> Option<Rect> {
        let local = self.bounds()?;
        let corners = [
            Point::new(local.x0, local.y0),
            Point::new(local.x1, local.y0),
            Point::new(local.x1, local.y1),
            Point::new(local.x0, local.y1),
        ];
        let mut mapped = corners.iter().map(|&c| self.view.to_device(c));
        let first = mapped.next()?;
        let mut rect = Rect::new(first.x, first.y, first.x, first.y);
        for p in mapped {
            rect = rect.union_pt(p);
        }
        Some(rect)
    }
}

/// The canvas surface: fixed dimensions plus the root group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub root: RootGroup,
}

impl Scene {
    /// Create a scene with the root group centered on the canvas and a
    /// full-canvas white fill as the bottom node.
    pub fn new(width: f64, height: f64) -> Self {
        let mut root = RootGroup::new(Point::new(width / 2.0, height / 2.0));
        root.add(Node::Fill(Fill::new(width, height, Rgba::white())));
        Self { width, height, root }
    }

    /// Canvas center in device coordinates.
    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::{InkStyle, Stroke};

    #[test]
    fn test_new_scene_has_background_fill() {
        let scene = Scene::new(400.0, 300.0);
        assert_eq!(scene.root.len(), 1);
        assert!(matches!(scene.root.nodes()[0], Node::Fill(_)));
        assert_eq!(scene.root.view.position, Point::new(200.0, 150.0));
    }

    #[test]
    fn test_bounds_union_over_children() {
        let mut scene = Scene::new(400.0, 300.0);
        let mut stroke = Stroke::new(Point::new(0.0, 0.0), InkStyle::default());
        stroke.add_point(Point::new(500.0, 0.0));
        scene.root.add(Node::Stroke(stroke));

        let bounds = scene.root.bounds().unwrap();
        // Fill spans -200..200, the stroke extends to 500.
        assert!((bounds.x0 + 200.0).abs() < f64::EPSILON);
        assert!((bounds.x1 - 500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_device_bounds_at_unit_scale_match_canvas() {
        let scene = Scene::new(400.0, 300.0);
        let device = scene.root.device_bounds().unwrap();
        assert!(device.x0.abs() < 1e-9);
        assert!(device.y0.abs() < 1e-9);
        assert!((device.x1 - 400.0).abs() < 1e-9);
        assert!((device.y1 - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_device_bounds_follow_rotation() {
        let mut scene = Scene::new(400.0, 300.0);
        scene.root.view.rotate_by(90.0);
        let device = scene.root.device_bounds().unwrap();
        // A 400x300 canvas rotated a quarter turn reads 300x400.
        assert!((device.width() - 300.0).abs() < 1e-9);
        assert!((device.height() - 400.0).abs() < 1e-9);
    }

    #[test]
    fn test_snapshot_serialization_roundtrip() {
        let mut scene = Scene::new(400.0, 300.0);
        let mut stroke = Stroke::new(Point::new(10.0, 20.0), InkStyle::default());
        stroke.add_point(Point::new(30.0, 40.0));
        scene.root.add(Node::Stroke(stroke));
        scene.root.view.rotate_by(45.0);

        let json = serde_json::to_string(&scene.root).unwrap();
        let restored: RootGroup = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.len(), scene.root.len());
        assert_eq!(restored.view, scene.root.view);
        assert_eq!(
            restored.nodes()[1].id(),
            scene.root.nodes()[1].id()
        );
    }

    #[test]
    fn test_remove_guides_keeps_other_nodes() {
        use crate::nodes::{Guide, GuideAxis};
        let mut scene = Scene::new(400.0, 300.0);
        scene.root.add(Node::Guide(Guide::new(GuideAxis::X, 200.0)));
        scene.root.add(Node::Guide(Guide::new(GuideAxis::Y, 150.0)));
        assert_eq!(scene.root.len(), 3);

        scene.root.remove_guides();
        assert_eq!(scene.root.len(), 1);
    }
}
