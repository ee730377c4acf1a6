//! Pixel conversions between [`Rgba`], tiny-skia colors, and RGBA8 buffers.
//!
//! tiny-skia stores premultiplied pixels; everything leaving this module as
//! bytes is straight (demultiplied) RGBA so the `image` crate can encode it.

use genart_core::Rgba;
use tiny_skia::{Color, Pixmap};

/// Paint color for an item: the color's RGB with the item's opacity.
///
/// `color.a` is ignored. Channels are clamped to [0, 1]; NaN channels paint
/// nothing.
pub fn paint_color(color: Rgba, alpha: f64) -> Color {
    let c = |v: f64| v.clamp(0.0, 1.0) as f32;
    Color::from_rgba(c(color.r), c(color.g), c(color.b), c(alpha)).unwrap_or(Color::TRANSPARENT)
}

/// Background color, including its own alpha.
pub fn background_color(color: Rgba) -> Color {
    paint_color(color, color.a)
}

/// Demultiplies a pixmap into a straight RGBA8 buffer of
/// `width * height * 4` bytes.
pub fn pixmap_to_rgba(pixmap: &Pixmap) -> Vec<u8> {
    pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect()
}
