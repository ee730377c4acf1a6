//! RGBA color type, its JSON boundary format, and HSL conversions.
//!
//! Components are `f64` in [0, 1] and never premultiplied. The alpha channel
//! stored in a color is *not* the opacity the renderer paints with; scene
//! items carry their own `alpha`. Colors are usually built with `a = 1`.
//!
//! JSON decoding is liberal (`[r,g,b]`, `[r,g,b,a]`, or `{"R":..,"G":..,
//! "B":..,"A":..}`) while encoding is canonical (always a 4-element array).

use crate::error::EngineError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A color with float components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Rgba = Rgba::rgb(1.0, 1.0, 1.0);

    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color (`a = 1`).
    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Builds a color from a 3- or 4-element slice. Missing alpha is 1.
    ///
    /// Returns `EngineError::InvalidColor` for any other length.
    pub fn from_slice(values: &[f64]) -> Result<Self, EngineError> {
        match *values {
            [r, g, b] => Ok(Self::rgb(r, g, b)),
            [r, g, b, a] => Ok(Self::new(r, g, b, a)),
            _ => Err(EngineError::InvalidColor(format!(
                "invalid RGBA array length: {}",
                values.len()
            ))),
        }
    }

    /// Component array in `[r, g, b, a]` order.
    pub fn to_array(self) -> [f64; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Per-channel linear interpolation (`t = 0` is `self`).
    pub fn lerp(self, other: Rgba, t: f64) -> Rgba {
        Rgba {
            r: lerp(self.r, other.r, t),
            g: lerp(self.g, other.g, t),
            b: lerp(self.b, other.b, t),
            a: lerp(self.a, other.a, t),
        }
    }
}

/// Scalar linear interpolation.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_array().serialize(serializer)
    }
}

/// Accepted input shapes for [`Rgba`].
#[derive(Deserialize)]
#[serde(untagged)]
enum RgbaRepr {
    Array(Vec<f64>),
    Object {
        #[serde(rename = "R", alias = "r", default)]
        r: f64,
        #[serde(rename = "G", alias = "g", default)]
        g: f64,
        #[serde(rename = "B", alias = "b", default)]
        b: f64,
        #[serde(rename = "A", alias = "a", default)]
        a: f64,
    },
}

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match RgbaRepr::deserialize(deserializer)? {
            RgbaRepr::Array(values) => Rgba::from_slice(&values).map_err(serde::de::Error::custom),
            RgbaRepr::Object { r, g, b, a } => Ok(Rgba { r, g, b, a }),
        }
    }
}

/// Converts RGB in [0, 1] to HSL, each component in [0, 1].
///
/// Achromatic inputs (max == min) yield hue and saturation 0.
pub fn rgb_to_hsl(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;
    if max == min {
        return (0.0, 0.0, l);
    }
    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };
    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };
    (h / 6.0, s, l)
}

/// Converts HSL (each in [0, 1]) to RGB in [0, 1]. Hue wraps.
pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (f64, f64, f64) {
    if s == 0.0 {
        return (l, l, l);
    }
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    (
        hue_to_channel(p, q, h + 1.0 / 3.0),
        hue_to_channel(p, q, h),
        hue_to_channel(p, q, h - 1.0 / 3.0),
    )
}

fn hue_to_channel(p: f64, q: f64, t: f64) -> f64 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}
