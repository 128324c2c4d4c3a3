//! Scene rasterization using tiny-skia.
//!
//! Draws a [`Scene`] region into a `Pixmap`. Everything is vector work
//! except text: glyph shaping depends on host fonts, so text nodes and
//! guide labels are delegated to a [`GlyphPainter`] supplied by the host.

use kurbo::{Affine, Point, Rect};
use log::debug;
use redink_core::nodes::{Guide, Mark, Node, Rgba, Stroke as InkStroke, Text};
use redink_core::scene::Scene;
use thiserror::Error;
use tiny_skia::{
    LineCap, LineJoin, Paint, PathBuilder, Pixmap, PixmapPaint, Stroke, Transform,
};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("render region {width}x{height} is not a valid pixmap size")]
    InvalidRegion { width: f64, height: f64 },
    #[error("failed to decode background image: {0}")]
    ImageDecode(#[from] image::ImageError),
}

/// A text draw the host's glyph painter should perform.
#[derive(Debug, Clone, PartialEq)]
pub struct TextPaintRequest<'a> {
    pub content: &'a str,
    /// Top-left anchor in pixmap coordinates.
    pub device_position: Point,
    /// Font size in device units.
    pub font_size: f64,
    pub color: Rgba,
    /// Glyph rotation in degrees (node counter-rotation plus view rotation).
    pub rotation_degrees: f64,
}

/// Host hook for drawing text runs into the pixmap.
pub trait GlyphPainter {
    fn paint_text(&self, pixmap: &mut Pixmap, request: &TextPaintRequest<'_>);
}

/// Discards all text. Exports made with this painter carry strokes, marks
/// and images but no glyphs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopGlyphPainter;

impl GlyphPainter for NoopGlyphPainter {
    fn paint_text(&self, _pixmap: &mut Pixmap, request: &TextPaintRequest<'_>) {
        debug!("skipping text run {:?} (no glyph painter)", request.content);
    }
}

/// Rasterize the scene region into a fresh pixmap.
///
/// `region` is in device space; its top-left corner becomes pixel (0,0).
pub fn render_scene(
    scene: &Scene,
    region: Rect,
    glyphs: &dyn GlyphPainter,
) -> Result<Pixmap, RenderError> {
    // Rotated bounds land a few ulps under the integer size; nudge before
    // flooring so a quarter turn does not lose a pixel row.
    let width = (region.width() + 1e-6).floor().max(1.0);
    let height = (region.height() + 1e-6).floor().max(1.0);
    let mut pixmap = Pixmap::new(width as u32, height as u32)
        .ok_or(RenderError::InvalidRegion { width, height })?;

    // Local space -> device space -> region-relative pixels.
    let to_pixels =
        Affine::translate((-region.x0, -region.y0)) * scene.root.view.transform();
    let ts = to_skia_transform(to_pixels);

    for node in scene.root.nodes() {
        match node {
            Node::Fill(fill) => {
                let b = fill.bounds();
                if let Some(rect) =
                    tiny_skia::Rect::from_ltrb(b.x0 as f32, b.y0 as f32, b.x1 as f32, b.y1 as f32)
                {
                    let mut paint = Paint::default();
                    set_color(&mut paint, fill.color);
                    pixmap.fill_rect(rect, &paint, ts, None);
                }
            }
            Node::Image(img) => draw_image(&mut pixmap, img, to_pixels)?,
            Node::Stroke(stroke) => draw_polyline(&mut pixmap, stroke, ts),
            Node::Mark(mark) => draw_mark(&mut pixmap, mark, ts),
            Node::Text(text) => draw_text(&mut pixmap, text, scene, to_pixels, glyphs),
            Node::Guide(guide) => draw_guide(&mut pixmap, guide, scene, to_pixels, ts, glyphs),
        }
    }
    Ok(pixmap)
}

fn to_skia_transform(affine: Affine) -> Transform {
    let [a, b, c, d, e, f] = affine.as_coeffs();
    Transform::from_row(a as f32, b as f32, c as f32, d as f32, e as f32, f as f32)
}

fn set_color(paint: &mut Paint, color: Rgba) {
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;
}

fn build_polyline(points: &[Point]) -> Option<tiny_skia::Path> {
    let (first, rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(first.x as f32, first.y as f32);
    if rest.is_empty() {
        // A single tap still leaves a dot under a round cap.
        pb.line_to(first.x as f32, first.y as f32);
    }
    for p in rest {
        pb.line_to(p.x as f32, p.y as f32);
    }
    pb.finish()
}

/// Stroke a polyline with round caps, with a soft dark under-stroke when
/// the ink carries a shadow.
fn stroke_polyline(
    pixmap: &mut Pixmap,
    points: &[Point],
    style: redink_core::nodes::InkStyle,
    ts: Transform,
) {
    let Some(path) = build_polyline(points) else {
        return;
    };

    if style.shadow_blur > 0.0 {
        let mut shadow = Paint::default();
        shadow.set_color_rgba8(0, 0, 0, 90);
        shadow.anti_alias = true;
        let stroke = Stroke {
            width: (style.width + style.shadow_blur * 2.0) as f32,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };
        pixmap.stroke_path(&path, &shadow, &stroke, ts, None);
    }

    let mut paint = Paint::default();
    set_color(&mut paint, style.color);
    let stroke = Stroke {
        width: style.width as f32,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Stroke::default()
    };
    pixmap.stroke_path(&path, &paint, &stroke, ts, None);
}

fn draw_polyline(pixmap: &mut Pixmap, stroke: &InkStroke, ts: Transform) {
    stroke_polyline(pixmap, &stroke.points, stroke.style, ts);
}

fn draw_mark(pixmap: &mut Pixmap, mark: &Mark, ts: Transform) {
    stroke_polyline(pixmap, &mark.points, mark.style, ts);
}

fn draw_image(pixmap: &mut Pixmap, img: &redink_core::nodes::Image, to_pixels: Affine) -> Result<(), RenderError> {
    let Some(bytes) = img.data() else {
        debug!("image node carries undecodable base64, skipping");
        return Ok(());
    };
    let decoded = image::load_from_memory(&bytes)?.to_rgba8();
    let (w, h) = decoded.dimensions();
    let Some(size) = tiny_skia::IntSize::from_wh(w, h) else {
        return Ok(());
    };
    let Some(source) = Pixmap::from_vec(decoded.into_raw(), size) else {
        return Ok(());
    };

    // Position and fit-scale happen in local space, ahead of the view.
    let placed = to_pixels
        * Affine::translate((img.position.x, img.position.y))
        * Affine::scale_non_uniform(
            img.width / img.source_width as f64,
            img.height / img.source_height as f64,
        );
    pixmap.draw_pixmap(
        0,
        0,
        source.as_ref(),
        &PixmapPaint::default(),
        to_skia_transform(placed),
        None,
    );
    Ok(())
}

fn draw_text(
    pixmap: &mut Pixmap,
    text: &Text,
    scene: &Scene,
    to_pixels: Affine,
    glyphs: &dyn GlyphPainter,
) {
    if !text.visible {
        return;
    }
    let scale = scene.root.view.scale();
    glyphs.paint_text(
        pixmap,
        &TextPaintRequest {
            content: &text.content,
            device_position: to_pixels * text.position,
            font_size: text.font_size * scale,
            color: text.style.color,
            rotation_degrees: text.rotation + scene.root.view.rotation_degrees,
        },
    );
}

const GUIDE_COLOR: Rgba = Rgba { r: 120, g: 120, b: 120, a: 255 };
const GUIDE_WIDTH: f64 = 1.0;

fn draw_guide(
    pixmap: &mut Pixmap,
    guide: &Guide,
    scene: &Scene,
    to_pixels: Affine,
    ts: Transform,
    glyphs: &dyn GlyphPainter,
) {
    let (a, b) = guide.endpoints();
    let Some(path) = build_polyline(&[a, b]) else {
        return;
    };
    let mut paint = Paint::default();
    set_color(&mut paint, GUIDE_COLOR);
    let stroke = Stroke {
        width: GUIDE_WIDTH as f32,
        ..Stroke::default()
    };
    pixmap.stroke_path(&path, &paint, &stroke, ts, None);

    glyphs.paint_text(
        pixmap,
        &TextPaintRequest {
            content: &guide.label,
            device_position: to_pixels * guide.label_position,
            font_size: 12.0 * scene.root.view.scale(),
            color: GUIDE_COLOR,
            rotation_degrees: scene.root.view.rotation_degrees,
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;
    use redink_core::board::{Board, BoardConfig};
    use redink_core::nodes::InkStyle;

    fn board_400x300() -> Board {
        Board::new(BoardConfig::new(400.0, 300.0)).unwrap()
    }

    #[test]
    fn test_empty_board_renders_white() {
        let board = board_400x300();
        let region = board.content_device_bounds().unwrap();
        let pixmap = render_scene(board.scene(), region, &NoopGlyphPainter).unwrap();
        assert_eq!(pixmap.width(), 400);
        assert_eq!(pixmap.height(), 300);

        let px = pixmap.pixel(200, 150).unwrap();
        assert_eq!((px.red(), px.green(), px.blue()), (255, 255, 255));
    }

    #[test]
    fn test_stroke_leaves_ink_on_the_pixmap() {
        let mut board = board_400x300();
        board.pointer_down(Point::new(150.0, 150.0));
        board.pointer_move(Point::new(250.0, 150.0));
        board.pointer_up();

        let region = board.content_device_bounds().unwrap();
        let pixmap = render_scene(board.scene(), region, &NoopGlyphPainter).unwrap();

        // Default ink is red; the stroke runs through the canvas middle.
        let px = pixmap.pixel(200, 150).unwrap();
        assert!(px.red() > 180, "expected red ink, got {px:?}");
        assert!(px.green() < 120);
    }

    #[test]
    fn test_region_offset_crops_content() {
        let mut board = board_400x300();
        board.pointer_down(Point::new(150.0, 150.0));
        board.pointer_move(Point::new(250.0, 150.0));
        board.pointer_up();

        // Crop to the stroke's own surroundings.
        let region = kurbo::Rect::new(140.0, 140.0, 260.0, 160.0);
        let pixmap = render_scene(board.scene(), region, &NoopGlyphPainter).unwrap();
        assert_eq!(pixmap.width(), 120);
        assert_eq!(pixmap.height(), 20);

        // The stroke midpoint lands at the cropped center.
        let px = pixmap.pixel(60, 10).unwrap();
        assert!(px.red() > 180);
    }

    #[test]
    fn test_single_tap_renders_a_dot() {
        let style = InkStyle {
            width: 6.0,
            ..InkStyle::default()
        };
        let mut pixmap = Pixmap::new(20, 20).unwrap();
        stroke_polyline(
            &mut pixmap,
            &[Point::new(10.0, 10.0)],
            style,
            Transform::identity(),
        );
        let px = pixmap.pixel(10, 10).unwrap();
        assert!(px.alpha() > 0);
    }

    #[test]
    fn test_invisible_text_is_not_dispatched() {
        struct PanicPainter;
        impl GlyphPainter for PanicPainter {
            fn paint_text(&self, _pixmap: &mut Pixmap, request: &TextPaintRequest<'_>) {
                panic!("painted hidden text {:?}", request.content);
            }
        }

        let mut board = board_400x300();
        board.arm_text();
        board.pointer_down(Point::new(200.0, 150.0));
        board.pointer_up();
        board.begin_text_edit(
            Point::new(201.0, 151.0),
            &redink_core::overlay::ApproxTextMetrics,
        );

        let region = board.content_device_bounds().unwrap();
        render_scene(board.scene(), region, &PanicPainter).unwrap();
    }
}
