//! Background image node.

use super::NodeId;
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Encoded image format, detected from magic bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    Png,
    Jpeg,
}

impl ImageFormat {
    /// Detect format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(ImageFormat::Png);
        }
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageFormat::Jpeg);
        }
        None
    }
}

/// A raster image placed under the annotations.
///
/// The source bytes are kept encoded; decoding is the renderer's concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub(crate) id: NodeId,
    /// Top-left corner in root-local coordinates.
    pub position: Point,
    /// Display width after fit scaling.
    pub width: f64,
    /// Display height after fit scaling.
    pub height: f64,
    /// Natural width in pixels.
    pub source_width: u32,
    /// Natural height in pixels.
    pub source_height: u32,
    pub format: ImageFormat,
    /// Encoded source bytes, base64 so snapshots serialize cleanly.
    pub data_base64: String,
}

impl Image {
    /// Create an image node scaled to fit the canvas and centered at the
    /// local origin. An image that already fits is never upscaled.
    pub fn fitted(
        data: &[u8],
        source_width: u32,
        source_height: u32,
        format: ImageFormat,
        canvas_width: f64,
        canvas_height: f64,
    ) -> Self {
        use base64::{Engine, engine::general_purpose::STANDARD};

        let fitted = fit_within(
            source_width as f64,
            source_height as f64,
            canvas_width,
            canvas_height,
        );
        Self {
            id: Uuid::new_v4(),
            position: Point::new(-fitted.width / 2.0, -fitted.height / 2.0),
            width: fitted.width,
            height: fitted.height,
            source_width,
            source_height,
            format,
            data_base64: STANDARD.encode(data),
        }
    }

    /// Decode the stored base64 back to the encoded source bytes.
    pub fn data(&self) -> Option<Vec<u8>> {
        use base64::{Engine, engine::general_purpose::STANDARD};
        STANDARD.decode(&self.data_base64).ok()
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + self.width,
            self.position.y + self.height,
        )
    }
}

/// Shrink to fit inside the canvas, preserving aspect ratio.
fn fit_within(width: f64, height: f64, max_width: f64, max_height: f64) -> Size {
    if width <= max_width && height <= max_height {
        return Size::new(width, height);
    }
    let scale = (max_width / width).min(max_height / height);
    Size::new(width * scale, height * scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(
            ImageFormat::from_magic_bytes(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A]),
            Some(ImageFormat::Png)
        );
        assert_eq!(
            ImageFormat::from_magic_bytes(&[0xFF, 0xD8, 0xFF, 0xE0]),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(ImageFormat::from_magic_bytes(b"GIF8"), None);
    }

    #[test]
    fn test_oversized_image_shrinks_to_fit() {
        let img = Image::fitted(&[0u8; 4], 1000, 500, ImageFormat::Png, 400.0, 300.0);
        assert!((img.width - 400.0).abs() < 1e-9);
        assert!((img.height - 200.0).abs() < 1e-9);
        // Centered at local origin.
        assert!((img.position.x + 200.0).abs() < 1e-9);
        assert!((img.position.y + 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_small_image_is_not_upscaled() {
        let img = Image::fitted(&[0u8; 4], 100, 80, ImageFormat::Jpeg, 400.0, 300.0);
        assert!((img.width - 100.0).abs() < f64::EPSILON);
        assert!((img.height - 80.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_data_roundtrip() {
        let bytes = [1u8, 2, 3, 4, 5];
        let img = Image::fitted(&bytes, 10, 10, ImageFormat::Png, 400.0, 300.0);
        assert_eq!(img.data().as_deref(), Some(&bytes[..]));
    }
}
