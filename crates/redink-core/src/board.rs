//! The board facade: one annotation surface and its full input surface.
//!
//! Every public operation here is synchronous; the only asynchronous edge
//! is background-image loading, which the host drives through the
//! [`LoadTicket`] handshake. Input arrives through a persistent dispatcher
//! (`pointer_down` / `pointer_move` / `pointer_up` / `wheel`) that consults
//! the current tool state, so arming a tool twice never stacks handlers.

use crate::history::History;
use crate::nodes::{
    Guide, GuideAxis, Image, ImageFormat, Mark, MarkKind, Node, NodeId, Stroke, Text,
};
use crate::overlay::{TextEditSession, TextMetrics};
use crate::scene::Scene;
use crate::tools::{PenConfig, PenUpdate, ToolController};
use crate::view::{DEFAULT_ROTATE_ANGLE, DEFAULT_SCALE_STEP, MAX_SCALE_STEP, MIN_SCALE_STEP};
use kurbo::{Point, Rect, Vec2};
use log::{debug, warn};
use thiserror::Error;

/// Hit tolerance for picking text nodes, in local units.
const TEXT_HIT_TOLERANCE: f64 = 2.0;

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("board surface must have positive dimensions, got {width}x{height}")]
    InvalidSurface { width: f64, height: f64 },
    #[error("unsupported image data (expected PNG or JPEG magic bytes)")]
    UnsupportedImage,
}

/// Notified with the new step count after every history change.
pub type StepCallback = Box<dyn FnMut(usize)>;
/// Notified when the text tool arms or disarms.
pub type TextActiveCallback = Box<dyn FnMut(bool)>;

/// Construction parameters for a [`Board`].
pub struct BoardConfig {
    pub width: f64,
    pub height: f64,
    /// When set, the board issues an [`ImageLoadRequest`] the host must
    /// resolve with [`Board::complete_image_load`].
    pub background_url: Option<String>,
    pub on_history_step: Option<StepCallback>,
    pub on_text_active: Option<TextActiveCallback>,
}

impl BoardConfig {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            background_url: None,
            on_history_step: None,
            on_text_active: None,
        }
    }
}

/// Opaque handle tying an asynchronous image load to one board generation.
///
/// Destroying or clearing the board bumps the generation, so a ticket that
/// outlives its board resolves to a guaranteed no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// A pending background-image fetch the host should perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageLoadRequest {
    pub url: String,
    pub ticket: LoadTicket,
}

/// What the pointer is currently doing.
#[derive(Debug, Clone, Copy, PartialEq)]
enum PointerDrag {
    Idle,
    /// Extending the freehand stroke with this id.
    Stroking(NodeId),
    /// Moving a text node; offset is pointer-to-position in local space.
    DraggingText { id: NodeId, grab: Vec2 },
    /// Panning the whole composition; offset is in device space.
    Panning { grab: Vec2 },
}

/// One annotation board: scene, history, tools and view in a single handle.
pub struct Board {
    scene: Scene,
    history: History,
    tools: ToolController,
    pen: PenConfig,
    drag: PointerDrag,
    /// Text node hidden behind an open edit overlay.
    editing: Option<NodeId>,
    pending_image_load: Option<ImageLoadRequest>,
    load_generation: u64,
    destroyed: bool,
    needs_redraw: bool,
    on_history_step: Option<StepCallback>,
    on_text_active: Option<TextActiveCallback>,
}

impl Board {
    /// Create a board with a white background fill and, if a URL was
    /// supplied, a pending background-image request.
    pub fn new(config: BoardConfig) -> Result<Self, BoardError> {
        if config.width <= 0.0 || config.height <= 0.0 {
            return Err(BoardError::InvalidSurface {
                width: config.width,
                height: config.height,
            });
        }
        let mut board = Self {
            scene: Scene::new(config.width, config.height),
            history: History::new(),
            tools: ToolController::new(),
            pen: PenConfig::default(),
            drag: PointerDrag::Idle,
            editing: None,
            pending_image_load: None,
            load_generation: 0,
            destroyed: false,
            needs_redraw: true,
            on_history_step: config.on_history_step,
            on_text_active: config.on_text_active,
        };
        if let Some(url) = config.background_url {
            board.pending_image_load = Some(ImageLoadRequest {
                url,
                ticket: LoadTicket(board.load_generation),
            });
        }
        Ok(board)
    }

    // ---- observable state ----

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn step(&self) -> usize {
        self.history.step()
    }

    pub fn is_draggable(&self) -> bool {
        self.scene.root.draggable
    }

    pub fn pen_config(&self) -> PenConfig {
        self.pen
    }

    pub fn can_paint(&self) -> bool {
        self.tools.can_paint()
    }

    pub fn armed_mark(&self) -> Option<MarkKind> {
        self.tools.armed_mark()
    }

    pub fn scale_step(&self) -> i32 {
        self.scene.root.view.scale_step
    }

    pub fn rotation_degrees(&self) -> f64 {
        self.scene.root.view.rotation_degrees
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// True once since the last call if anything changed visually.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }

    // ---- history ----

    /// Snapshot the live scene before a mutation.
    fn push_history(&mut self) {
        let step = self.history.push(self.scene.root.clone());
        if let Some(cb) = self.on_history_step.as_mut() {
            cb(step);
        }
    }

    fn notify_step(&mut self) {
        let step = self.history.step();
        if let Some(cb) = self.on_history_step.as_mut() {
            cb(step);
        }
    }

    fn notify_text_active(&mut self, active: bool) {
        if let Some(cb) = self.on_text_active.as_mut() {
            cb(active);
        }
    }

    /// Pop the latest snapshot and install it wholesale. Silent no-op when
    /// the step count is already zero.
    pub fn undo(&mut self) {
        if self.destroyed {
            return;
        }
        if let Some(snapshot) = self.history.undo() {
            self.scene.root = snapshot;
            self.editing = None;
            self.needs_redraw = true;
            self.notify_step();
        }
    }

    /// Rewind to the baseline snapshot. The stack never drops below one
    /// entry, so the very first recorded state always survives a clear.
    pub fn clear_all(&mut self) {
        if self.destroyed {
            return;
        }
        // A clear also orphans any in-flight background load.
        self.invalidate_pending_load();
        if let Some(baseline) = self.history.rewind_to_baseline() {
            self.scene.root = baseline;
            self.editing = None;
            self.needs_redraw = true;
            self.notify_step();
        }
    }

    // ---- tool selection ----

    /// Apply a partial pen update.
    ///
    /// Color and shadow changes take effect silently. A width change flips
    /// the paint capability when painting is off, or when the new width
    /// equals the current one (re-clicking the active width turns the brush
    /// off). The width itself is stored in every case.
    pub fn set_brush_config(&mut self, update: PenUpdate) {
        if self.destroyed {
            return;
        }
        if let Some(color) = update.line_color {
            self.pen.line_color = color;
        }
        if let Some(blur) = update.shadow_blur {
            self.pen.shadow_blur = blur;
        }
        if let Some(width) = update.line_width {
            if self.tools.width_toggles_paint(width, self.pen.line_width) {
                self.tools.toggle_paint();
            }
            self.pen.line_width = width;
            self.scene.root.draggable = !self.tools.can_paint();
        }
    }

    /// Arm a correction mark, or disarm it when the same kind is re-armed.
    pub fn arm_mark(&mut self, kind: MarkKind) {
        if self.destroyed {
            return;
        }
        let was_text = self.tools.text_armed();
        let armed = self.tools.arm_mark(kind);
        self.scene.root.draggable = armed.is_none();
        if was_text {
            self.notify_text_active(false);
        }
    }

    /// Arm the one-shot text placement. A snapshot is pushed immediately,
    /// before any node exists, so undo after placement removes the text.
    pub fn arm_text(&mut self) {
        if self.destroyed {
            return;
        }
        self.push_history();
        self.tools.arm_text();
        self.scene.root.draggable = false;
        self.notify_text_active(true);
    }

    // ---- view ----

    /// Rotate the composition by a fixed increment.
    pub fn rotate(&mut self, clockwise: bool, angle_degrees: f64) {
        if self.destroyed {
            return;
        }
        self.push_history();
        let was_text = self.tools.text_armed();
        self.tools.disable_paint();
        self.tools.disarm_text();
        let signed = if clockwise { angle_degrees } else { -angle_degrees };
        self.scene.root.view.rotate_by(signed);
        self.scene.root.draggable = true;
        self.needs_redraw = true;
        if was_text {
            self.notify_text_active(false);
        }
    }

    /// Rotate by the default 45 degree increment.
    pub fn rotate_default(&mut self, clockwise: bool) {
        self.rotate(clockwise, DEFAULT_ROTATE_ANGLE);
    }

    /// Button-driven zoom: recenter the pan, then step the scale.
    fn zoom_by(&mut self, delta: i32) {
        if self.destroyed {
            return;
        }
        let new_step = self.scene.root.view.scale_step + delta;
        if !(MIN_SCALE_STEP..=MAX_SCALE_STEP).contains(&new_step) {
            return;
        }
        self.push_history();
        self.tools.disarm_mark();
        self.scene.root.view.position = self.scene.center();
        self.scene.root.view.set_scale_step(new_step);
        self.scene.root.draggable = !self.tools.can_paint();
        self.needs_redraw = true;
    }

    pub fn zoom_in(&mut self) {
        self.zoom_by(1);
    }

    pub fn zoom_out(&mut self) {
        self.zoom_by(-1);
    }

    /// Wheel/pinch zoom anchored at the pointer: the content under the
    /// cursor stays put while the scale steps.
    pub fn wheel(&mut self, anchor: Point, delta_y: f64) {
        if self.destroyed {
            return;
        }
        let step = self.scene.root.view.scale_step;
        let new_step = if delta_y > 0.0 {
            step - 1
        } else if delta_y < 0.0 {
            step + 1
        } else {
            return;
        };
        if !(MIN_SCALE_STEP..=MAX_SCALE_STEP).contains(&new_step) {
            return;
        }
        self.push_history();
        self.tools.disable_paint();
        self.tools.disarm_mark();
        self.scene.root.draggable = true;
        self.scene.root.view.zoom_step_at(anchor, new_step);
        self.needs_redraw = true;
    }

    // ---- pointer dispatch ----

    /// Pointer pressed at a device-space position.
    pub fn pointer_down(&mut self, device: Point) {
        if self.destroyed {
            return;
        }
        let local = self.scene.root.view.to_local(device);

        if self.tools.can_paint() {
            self.push_history();
            let stroke = Stroke::new(local, self.pen.frozen());
            let id = self.scene.root.add(Node::Stroke(stroke));
            self.drag = PointerDrag::Stroking(id);
            self.needs_redraw = true;
            return;
        }

        if let Some(kind) = self.tools.armed_mark() {
            self.push_history();
            let rotation = self.scene.root.view.rotation_degrees;
            let mark = Mark::new(kind, local, rotation, self.pen.frozen());
            self.scene.root.add(Node::Mark(mark));
            // The kind stays armed; every pointer-down stamps another mark
            // until the tool is explicitly disarmed.
            self.needs_redraw = true;
            return;
        }

        if self.tools.text_armed() {
            // The snapshot was already pushed when the tool armed.
            let rotation = self.scene.root.view.rotation_degrees;
            let text = Text::new(local, rotation, self.pen.frozen());
            self.scene.root.add(Node::Text(text));
            self.tools.disarm_text();
            self.scene.root.draggable = true;
            self.needs_redraw = true;
            self.notify_text_active(false);
            return;
        }

        if !self.scene.root.draggable {
            return;
        }
        if let Some(text) = self.scene.root.text_at_point(local, TEXT_HIT_TOLERANCE) {
            let id = text.id;
            let grab = text.position - local;
            // Moving a text node is undoable; panning the root is not.
            self.push_history();
            self.drag = PointerDrag::DraggingText { id, grab };
        } else {
            self.drag = PointerDrag::Panning {
                grab: self.scene.root.view.position - device,
            };
        }
    }

    /// Pointer moved while pressed.
    pub fn pointer_move(&mut self, device: Point) {
        if self.destroyed {
            return;
        }
        match self.drag {
            PointerDrag::Idle => {}
            PointerDrag::Stroking(id) => {
                let local = self.scene.root.view.to_local(device);
                if let Some(stroke) = self.scene.root.find_stroke_mut(id) {
                    stroke.add_point(local);
                    self.needs_redraw = true;
                }
            }
            PointerDrag::DraggingText { id, grab } => {
                let local = self.scene.root.view.to_local(device);
                if let Some(text) = self.scene.root.find_text_mut(id) {
                    text.position = local + grab;
                    self.needs_redraw = true;
                }
            }
            PointerDrag::Panning { grab } => {
                self.scene.root.view.position = device + grab;
                self.needs_redraw = true;
            }
        }
    }

    /// Pointer released: the active gesture is final.
    pub fn pointer_up(&mut self) {
        if self.destroyed {
            return;
        }
        if self.drag != PointerDrag::Idle {
            self.drag = PointerDrag::Idle;
            self.needs_redraw = true;
        }
    }

    // ---- text editing ----

    /// Double-activation on a text node: hide it and hand the host an edit
    /// session describing where to place its input overlay.
    pub fn begin_text_edit(
        &mut self,
        device: Point,
        metrics: &dyn TextMetrics,
    ) -> Option<TextEditSession> {
        if self.destroyed {
            return None;
        }
        let local = self.scene.root.view.to_local(device);
        let id = self.scene.root.text_at_point(local, TEXT_HIT_TOLERANCE)?.id;
        let session = {
            let text = self.scene.root.find_text(id)?;
            TextEditSession::for_node(text, &self.scene.root.view, metrics)
        };
        if let Some(text) = self.scene.root.find_text_mut(id) {
            text.visible = false;
        }
        self.editing = Some(id);
        self.needs_redraw = true;
        self.notify_text_active(true);
        Some(session)
    }

    /// Commit the overlay's text back into the hidden node and reveal it.
    /// An all-whitespace commit restores the placeholder.
    pub fn end_text_edit(&mut self, content: &str) {
        if self.destroyed {
            return;
        }
        let Some(id) = self.editing.take() else {
            return;
        };
        if let Some(text) = self.scene.root.find_text_mut(id) {
            let trimmed = content.trim();
            if trimmed.is_empty() {
                text.set_content(Text::PLACEHOLDER.to_string());
            } else {
                text.set_content(content.to_string());
            }
            text.visible = true;
            self.needs_redraw = true;
        }
        self.notify_text_active(false);
    }

    // ---- axis guides ----

    /// Stamp fresh axis guides through the local origin, replacing any
    /// previous ones. Showing guides is not itself an undoable action.
    pub fn show_axis_guides(&mut self) {
        if self.destroyed {
            return;
        }
        self.scene.root.remove_guides();
        let x_extent = self.scene.width / 2.0;
        let y_extent = self.scene.height / 2.0;
        self.scene.root.add(Node::Guide(Guide::new(GuideAxis::X, x_extent)));
        self.scene.root.add(Node::Guide(Guide::new(GuideAxis::Y, y_extent)));
        self.needs_redraw = true;
    }

    pub fn hide_axis_guides(&mut self) {
        if self.destroyed {
            return;
        }
        self.scene.root.remove_guides();
        self.needs_redraw = true;
    }

    // ---- background image ----

    /// The image fetch the host still owes this board, if any. Taking the
    /// request transfers responsibility; the ticket stays valid until the
    /// board is cleared or destroyed.
    pub fn take_pending_image_load(&mut self) -> Option<ImageLoadRequest> {
        self.pending_image_load.take()
    }

    /// Resolve a background-image load.
    ///
    /// A stale ticket (board cleared or destroyed since issue) is a silent
    /// success: the late completion must never resurrect content.
    pub fn complete_image_load(
        &mut self,
        ticket: LoadTicket,
        data: &[u8],
        source_width: u32,
        source_height: u32,
    ) -> Result<(), BoardError> {
        if self.destroyed || ticket.0 != self.load_generation {
            debug!("dropping stale image load (ticket {:?})", ticket);
            return Ok(());
        }
        let format = ImageFormat::from_magic_bytes(data).ok_or(BoardError::UnsupportedImage)?;
        let image = Image::fitted(
            data,
            source_width,
            source_height,
            format,
            self.scene.width,
            self.scene.height,
        );
        self.scene.root.add(Node::Image(image));
        self.needs_redraw = true;
        Ok(())
    }

    /// Abandon any in-flight image load.
    pub fn abort_image_load(&mut self) {
        if self.pending_image_load.is_some() {
            warn!("aborting pending background image load");
        }
        self.invalidate_pending_load();
    }

    fn invalidate_pending_load(&mut self) {
        self.load_generation += 1;
        self.pending_image_load = None;
    }

    // ---- teardown ----

    /// Release the board. Every later operation is a silent no-op and any
    /// outstanding load ticket is permanently stale.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.invalidate_pending_load();
        self.scene.root.clear();
        self.drag = PointerDrag::Idle;
        self.editing = None;
        self.destroyed = true;
    }

    // ---- export support ----

    /// Normalize the view for export: pan back to canvas center at 1.0x,
    /// keeping the rotation and every content node untouched.
    pub fn reset_view_for_export(&mut self) {
        if self.destroyed {
            return;
        }
        self.scene.root.view.position = self.scene.center();
        self.scene.root.view.scale_step = DEFAULT_SCALE_STEP;
        self.scene.root.draggable = true;
        self.needs_redraw = true;
    }

    /// Tight device-space bounding box of all content under the current
    /// transform.
    pub fn content_device_bounds(&self) -> Option<Rect> {
        self.scene.root.device_bounds()
    }
}
