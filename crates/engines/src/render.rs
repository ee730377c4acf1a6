//! Scene rasterization.
//!
//! Logical coordinates in [0, 1]² map onto the canvas inset by a margin of
//! `margin · min(W, H)` pixels on every side. Points outside the unit square
//! are drawn where they land; nothing is clipped except by the canvas edge.
//! Items paint in scene order over the background.
//!
//! With `supersample = s > 1` the scene is drawn at `s·W × s·H`, every pixel
//! quantity scaled with it, then filtered down to `W × H`.

use genart_core::error::EngineError;
use genart_core::{Config, Item, Palette, Rgba, Scene, Vec2};
use image::imageops::{self, FilterType};
use image::RgbaImage;
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Transform};

use crate::pixel::{background_color, paint_color, pixmap_to_rgba};

/// Canvas description for one render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub width: i64,
    pub height: i64,
    pub background: Rgba,
    /// Fraction of `min(width, height)` left empty on every side.
    pub margin: f64,
    /// Values of 0 and 1 both render directly.
    pub supersample: u32,
    /// Carried for consumers; painting uses item colors only.
    pub palette: Option<Palette>,
}

impl RenderConfig {
    /// A `width × height` canvas on white, with no margin or supersampling.
    pub fn new(width: i64, height: i64) -> Self {
        Self {
            width,
            height,
            background: Rgba::WHITE,
            margin: 0.0,
            supersample: 1,
            palette: None,
        }
    }

    /// Canvas settings of a run configuration.
    pub fn from_config(config: &Config, palette: Option<Palette>) -> Self {
        Self {
            width: config.width,
            height: config.height,
            background: config.background,
            margin: config.render.margin,
            supersample: config.render.supersample,
            palette,
        }
    }

    /// Output size in pixels, rejecting non-positive or oversized values.
    pub fn dimensions(&self) -> Result<(u32, u32), EngineError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(EngineError::InvalidDimensions);
        }
        let w = u32::try_from(self.width).map_err(|_| EngineError::InvalidDimensions)?;
        let h = u32::try_from(self.height).map_err(|_| EngineError::InvalidDimensions)?;
        Ok((w, h))
    }
}

/// Logical-to-pixel mapping for one canvas.
#[derive(Debug, Clone, Copy)]
struct Viewport {
    margin: f64,
    inner_w: f64,
    inner_h: f64,
    min_side: f64,
}

impl Viewport {
    fn new(width: u32, height: u32, margin: f64) -> Self {
        let (w, h) = (f64::from(width), f64::from(height));
        let min_side = w.min(h);
        let m = margin * min_side;
        Self {
            margin: m,
            inner_w: w - 2.0 * m,
            inner_h: h - 2.0 * m,
            min_side,
        }
    }

    fn map(&self, p: Vec2) -> (f32, f32) {
        (
            (self.margin + p.x * self.inner_w) as f32,
            (self.margin + p.y * self.inner_h) as f32,
        )
    }

    fn line_width(&self, width: f64) -> f64 {
        width * self.min_side
    }
}

/// Builds a straight-segment path through `points`.
///
/// Returns `None` for paths tiny-skia cannot draw (fewer than two points or
/// non-finite coordinates).
fn build_path(view: &Viewport, points: &[Vec2], closed: bool) -> Option<tiny_skia::Path> {
    let mut mapped = points.iter().map(|&p| view.map(p));
    let (x, y) = mapped.next()?;
    let mut pb = PathBuilder::new();
    pb.move_to(x, y);
    for (x, y) in mapped {
        pb.line_to(x, y);
    }
    if closed {
        pb.close();
    }
    pb.finish()
}

fn paint(color: Rgba, alpha: f64) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(paint_color(color, alpha));
    paint.anti_alias = true;
    paint
}

fn draw_item(pixmap: &mut Pixmap, view: &Viewport, item: &Item) {
    match item {
        Item::Fill(fill) => {
            if let Some(path) = build_path(view, &fill.polygon.points, true) {
                pixmap.fill_path(
                    &path,
                    &paint(fill.color, fill.alpha),
                    FillRule::Winding,
                    Transform::identity(),
                    None,
                );
            }
        }
        Item::Stroke(stroke) => {
            let width = view.line_width(stroke.width);
            // Zero-width strokes paint nothing rather than a hairline.
            if !width.is_finite() || width <= 0.0 {
                return;
            }
            if let Some(path) = build_path(view, &stroke.path.points, stroke.path.closed) {
                let style = tiny_skia::Stroke {
                    width: width as f32,
                    ..tiny_skia::Stroke::default()
                };
                pixmap.stroke_path(
                    &path,
                    &paint(stroke.color, stroke.alpha),
                    &style,
                    Transform::identity(),
                    None,
                );
            }
        }
    }
}

/// Rasterizes `scene` onto a fresh canvas.
///
/// Returns `EngineError::InvalidDimensions` for non-positive sizes or a
/// canvas too large to allocate.
#[tracing::instrument(name = "render", skip_all, fields(width = cfg.width, height = cfg.height))]
pub fn render(scene: &Scene, cfg: &RenderConfig) -> Result<RgbaImage, EngineError> {
    let (w, h) = cfg.dimensions()?;
    let s = cfg.supersample.max(1);
    let sw = w.checked_mul(s).ok_or(EngineError::InvalidDimensions)?;
    let sh = h.checked_mul(s).ok_or(EngineError::InvalidDimensions)?;

    let mut pixmap = Pixmap::new(sw, sh).ok_or(EngineError::InvalidDimensions)?;
    pixmap.fill(background_color(cfg.background));

    let view = Viewport::new(sw, sh, cfg.margin);
    for item in scene.items() {
        draw_item(&mut pixmap, &view, item);
    }
    tracing::debug!(items = scene.len(), supersample = s, "scene rasterized");

    let img = RgbaImage::from_raw(sw, sh, pixmap_to_rgba(&pixmap))
        .ok_or_else(|| EngineError::Io("RGBA buffer size mismatch".into()))?;
    if s > 1 {
        Ok(imageops::resize(&img, w, h, FilterType::Triangle))
    } else {
        Ok(img)
    }
}
