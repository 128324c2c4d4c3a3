//! RedInk Core Library
//!
//! Platform-agnostic scene graph, tool state and history for the RedInk
//! annotation board. Rendering and export live in `redink-render`.

pub mod board;
pub mod history;
pub mod nodes;
pub mod overlay;
pub mod scene;
pub mod tools;
pub mod view;

pub use board::{
    Board, BoardConfig, BoardError, ImageLoadRequest, LoadTicket, StepCallback,
    TextActiveCallback,
};
pub use history::History;
pub use nodes::{
    Fill, Guide, GuideAxis, Image, ImageFormat, InkStyle, Mark, MarkKind, Node, NodeId, Rgba,
    Stroke, Text,
};
pub use overlay::{ApproxTextMetrics, TextEditSession, TextMetrics};
pub use scene::{RootGroup, Scene};
pub use tools::{PenConfig, PenUpdate, ToolController};
pub use view::{
    ViewTransform, DEFAULT_ROTATE_ANGLE, DEFAULT_SCALE_STEP, MAX_SCALE_STEP, MIN_SCALE_STEP,
};
