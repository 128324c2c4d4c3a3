//! Tool state machine and pen configuration.

use crate::nodes::{InkStyle, MarkKind, Rgba};
use serde::{Deserialize, Serialize};

/// Live pen configuration shared by every tool.
///
/// Nodes never hold a reference to this; each one receives a frozen
/// [`InkStyle`] copy at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PenConfig {
    pub line_width: f64,
    pub line_color: Rgba,
    pub shadow_blur: f64,
}

impl Default for PenConfig {
    fn default() -> Self {
        let ink = InkStyle::default();
        Self {
            line_width: ink.width,
            line_color: ink.color,
            shadow_blur: ink.shadow_blur,
        }
    }
}

impl PenConfig {
    /// Freeze the current configuration into node-local ink attributes.
    pub fn frozen(&self) -> InkStyle {
        InkStyle {
            color: self.line_color,
            width: self.line_width,
            shadow_blur: self.shadow_blur,
        }
    }
}

/// Partial pen update; absent fields leave the configuration untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct PenUpdate {
    pub line_width: Option<f64>,
    pub line_color: Option<Rgba>,
    pub shadow_blur: Option<f64>,
}

/// Mutually exclusive drawing capabilities.
///
/// At most one of painting, an armed mark, or armed text drives input;
/// root draggability is the negation of "a capability is active".
#[derive(Debug, Clone, Copy, Default)]
pub struct ToolController {
    can_paint: bool,
    armed_mark: Option<MarkKind>,
    text_armed: bool,
}

impl ToolController {
    /// Boards start with freehand painting enabled.
    pub fn new() -> Self {
        Self {
            can_paint: true,
            armed_mark: None,
            text_armed: false,
        }
    }

    pub fn can_paint(&self) -> bool {
        self.can_paint
    }

    pub fn armed_mark(&self) -> Option<MarkKind> {
        self.armed_mark
    }

    pub fn text_armed(&self) -> bool {
        self.text_armed
    }

    /// Decide whether a width change toggles the paint capability.
    ///
    /// The toggle fires when painting is disabled, or when painting is
    /// enabled and the new width equals the configured width (a same-value
    /// re-click flips the brush off). This rule is easy to misread; it is
    /// the intended behavior, not an accident of comparison.
    pub fn width_toggles_paint(&self, new_width: f64, current_width: f64) -> bool {
        !self.can_paint || (new_width - current_width).abs() < f64::EPSILON
    }

    /// Flip the paint capability, disarming any mark.
    pub fn toggle_paint(&mut self) {
        self.can_paint = !self.can_paint;
        self.armed_mark = None;
    }

    /// Disable painting without touching the armed mark.
    pub fn disable_paint(&mut self) {
        self.can_paint = false;
    }

    /// Arm a mark kind, or disarm it when it is already active.
    /// Painting is disabled either way. Returns the resulting armed kind.
    pub fn arm_mark(&mut self, kind: MarkKind) -> Option<MarkKind> {
        self.can_paint = false;
        self.text_armed = false;
        if self.armed_mark == Some(kind) {
            self.armed_mark = None;
        } else {
            self.armed_mark = Some(kind);
        }
        self.armed_mark
    }

    pub fn disarm_mark(&mut self) {
        self.armed_mark = None;
    }

    /// Arm the one-shot text placement.
    pub fn arm_text(&mut self) {
        self.can_paint = false;
        self.armed_mark = None;
        self.text_armed = true;
    }

    pub fn disarm_text(&mut self) {
        self.text_armed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_paints() {
        let tools = ToolController::new();
        assert!(tools.can_paint());
        assert!(tools.armed_mark().is_none());
        assert!(!tools.text_armed());
    }

    #[test]
    fn test_arm_same_mark_twice_disarms() {
        let mut tools = ToolController::new();
        assert_eq!(tools.arm_mark(MarkKind::Tick), Some(MarkKind::Tick));
        assert!(!tools.can_paint());
        assert_eq!(tools.arm_mark(MarkKind::Tick), None);
    }

    #[test]
    fn test_arming_a_different_mark_switches() {
        let mut tools = ToolController::new();
        tools.arm_mark(MarkKind::Tick);
        assert_eq!(tools.arm_mark(MarkKind::Cross), Some(MarkKind::Cross));
    }

    #[test]
    fn test_width_toggle_rule() {
        let mut tools = ToolController::new();
        // Painting enabled: only an equal width toggles.
        assert!(tools.width_toggles_paint(2.0, 2.0));
        assert!(!tools.width_toggles_paint(4.0, 2.0));
        // Painting disabled: any width toggles it back on.
        tools.toggle_paint();
        assert!(tools.width_toggles_paint(4.0, 2.0));
    }

    #[test]
    fn test_arm_text_clears_other_capabilities() {
        let mut tools = ToolController::new();
        tools.arm_mark(MarkKind::Slash);
        tools.arm_text();
        assert!(tools.text_armed());
        assert!(tools.armed_mark().is_none());
        assert!(!tools.can_paint());
    }
}
