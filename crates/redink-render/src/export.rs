//! Export the board to a self-contained JPEG data URI.

use crate::raster::{render_scene, GlyphPainter, RenderError};
use base64::{engine::general_purpose::STANDARD, Engine};
use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use log::info;
use redink_core::board::Board;
use thiserror::Error;

/// JPEG quality used for every export (0-100 scale).
const EXPORT_JPEG_QUALITY: u8 = 50;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("board has no content to export")]
    EmptyScene,
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("jpeg encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// Rasterize the board's content into an inline `data:image/jpeg` URI.
///
/// The view is first normalized: pan back to canvas center at 1.0x scale,
/// rotation and content untouched. The output covers the tight bounding box
/// of all content, not the full canvas.
pub fn export_image(board: &mut Board, glyphs: &dyn GlyphPainter) -> Result<String, ExportError> {
    board.reset_view_for_export();
    let region = board.content_device_bounds().ok_or(ExportError::EmptyScene)?;
    let pixmap = render_scene(board.scene(), region, glyphs)?;

    // JPEG has no alpha channel; flatten the premultiplied pixels to RGB.
    let mut rgb = Vec::with_capacity(pixmap.pixels().len() * 3);
    for px in pixmap.pixels() {
        let c = px.demultiply();
        rgb.extend_from_slice(&[c.red(), c.green(), c.blue()]);
    }

    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, EXPORT_JPEG_QUALITY).encode(
        &rgb,
        pixmap.width(),
        pixmap.height(),
        ExtendedColorType::Rgb8,
    )?;
    info!(
        "exported {}x{} board region ({} bytes compressed)",
        pixmap.width(),
        pixmap.height(),
        jpeg.len()
    );
    Ok(format!("data:image/jpeg;base64,{}", STANDARD.encode(jpeg)))
}
