//! Fixed 256-color palette for animation frames.
//!
//! The palette is a 6×6×6 color cube plus 40 evenly spaced grays. Frames are
//! reduced to it with Floyd–Steinberg error diffusion through
//! [`image::imageops::dither`], so every frame of a GIF shares one palette.

use image::imageops::{dither, ColorMap};
use image::{Rgba, RgbaImage};

/// Channel levels of the color cube.
const CUBE_LEVELS: [u8; 6] = [0, 51, 102, 153, 204, 255];
const CUBE_SIZE: usize = 216;
const GRAY_COUNT: usize = 40;

/// Number of colors in the fixed palette.
pub const PALETTE_SIZE: usize = CUBE_SIZE + GRAY_COUNT;

/// The fixed frame palette. Index order: cube (red-major), then grays from
/// dark to light.
#[derive(Debug, Clone)]
pub struct FixedPalette {
    colors: Vec<[u8; 3]>,
}

impl Default for FixedPalette {
    fn default() -> Self {
        Self::new()
    }
}

fn sq_dist(a: [u8; 3], b: [u8; 3]) -> u32 {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| {
            let d = i32::from(x) - i32::from(y);
            (d * d) as u32
        })
        .sum()
}

/// Index of the cube level closest to `v`.
fn nearest_level(v: u8) -> usize {
    ((usize::from(v) + 25) / 51).min(CUBE_LEVELS.len() - 1)
}

impl FixedPalette {
    pub fn new() -> Self {
        let mut colors = Vec::with_capacity(PALETTE_SIZE);
        for &r in &CUBE_LEVELS {
            for &g in &CUBE_LEVELS {
                for &b in &CUBE_LEVELS {
                    colors.push([r, g, b]);
                }
            }
        }
        for i in 1..=GRAY_COUNT {
            let v = (i * 255 / (GRAY_COUNT + 1)) as u8;
            colors.push([v, v, v]);
        }
        Self { colors }
    }

    pub fn colors(&self) -> &[[u8; 3]] {
        &self.colors
    }

    /// Index of the palette color nearest to `rgb` (squared Euclidean).
    ///
    /// The cube is separable, so its best match is found per channel; only
    /// the grays are searched.
    pub fn nearest(&self, rgb: [u8; 3]) -> usize {
        let [r, g, b] = rgb.map(nearest_level);
        let mut best = r * 36 + g * 6 + b;
        let mut best_dist = sq_dist(rgb, self.colors[best]);
        for i in CUBE_SIZE..self.colors.len() {
            let d = sq_dist(rgb, self.colors[i]);
            if d < best_dist {
                best = i;
                best_dist = d;
            }
        }
        best
    }
}

impl ColorMap for FixedPalette {
    type Color = Rgba<u8>;

    fn index_of(&self, color: &Rgba<u8>) -> usize {
        let [r, g, b, _] = color.0;
        self.nearest([r, g, b])
    }

    fn map_color(&self, color: &mut Rgba<u8>) {
        let [r, g, b] = self.colors[self.index_of(color)];
        *color = Rgba([r, g, b, 255]);
    }
}

/// Reduces `img` in place to the fixed palette with error diffusion.
/// Output pixels are opaque.
pub fn quantize(img: &mut RgbaImage, palette: &FixedPalette) {
    if img.width() == 0 || img.height() == 0 {
        return;
    }
    dither(img, palette);
}
