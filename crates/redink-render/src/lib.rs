//! RedInk Render Library
//!
//! CPU rasterization and JPEG export for RedInk annotation boards.

pub mod export;
pub mod raster;

pub use export::{export_image, ExportError};
pub use raster::{render_scene, GlyphPainter, NoopGlyphPainter, RenderError, TextPaintRequest};
