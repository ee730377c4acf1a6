//! Scalar noise fields and the derived gradient and curl operators.
//!
//! A scalar field maps continuous coordinates to a value conventionally in
//! [-1, 1]. Two noise families back the engines: gradient (Perlin) noise and
//! simplex (OpenSimplex) noise, each in 2D and 3D, all constructed from a
//! `(seed, scale)` pair. Coordinates are divided by `scale` before sampling,
//! so larger scales zoom in. A non-positive scale is a degenerate but valid
//! field that is 0 everywhere.
//!
//! [`gradient_2d`] and [`curl_2d`] work over any [`ScalarField2D`],
//! including plain closures.

use noise::{NoiseFn, OpenSimplex, Perlin};
use std::f64::consts::PI;

/// A scalar-valued 2D field. Output is conventionally in [-1, 1].
pub trait ScalarField2D {
    fn at(&self, x: f64, y: f64) -> f64;
}

/// A scalar-valued 3D field. Output is conventionally in [-1, 1].
pub trait ScalarField3D {
    fn at(&self, x: f64, y: f64, z: f64) -> f64;
}

impl<F: Fn(f64, f64) -> f64> ScalarField2D for F {
    fn at(&self, x: f64, y: f64) -> f64 {
        self(x, y)
    }
}

/// Folds a 64-bit sub-seed into the 32-bit seed the noise generators take.
fn noise_seed(seed: i64) -> u32 {
    let bits = seed as u64;
    (bits ^ (bits >> 32)) as u32
}

/// True when `scale` cannot be divided by (zero, negative, or NaN).
fn is_degenerate(scale: f64) -> bool {
    scale.is_nan() || scale <= 0.0
}

/// 2D gradient (Perlin) noise.
pub struct GradientField {
    noise: Perlin,
    scale: f64,
}

/// 3D gradient (Perlin) noise.
pub struct GradientField3D {
    noise: Perlin,
    scale: f64,
}

/// 2D simplex (OpenSimplex) noise.
pub struct SimplexField {
    noise: OpenSimplex,
    scale: f64,
}

/// 3D simplex (OpenSimplex) noise.
pub struct SimplexField3D {
    noise: OpenSimplex,
    scale: f64,
}

impl GradientField {
    pub fn new(seed: i64, scale: f64) -> Self {
        Self {
            noise: Perlin::new(noise_seed(seed)),
            scale,
        }
    }
}

impl GradientField3D {
    pub fn new(seed: i64, scale: f64) -> Self {
        Self {
            noise: Perlin::new(noise_seed(seed)),
            scale,
        }
    }
}

impl SimplexField {
    pub fn new(seed: i64, scale: f64) -> Self {
        Self {
            noise: OpenSimplex::new(noise_seed(seed)),
            scale,
        }
    }
}

impl SimplexField3D {
    pub fn new(seed: i64, scale: f64) -> Self {
        Self {
            noise: OpenSimplex::new(noise_seed(seed)),
            scale,
        }
    }
}

impl ScalarField2D for GradientField {
    fn at(&self, x: f64, y: f64) -> f64 {
        if is_degenerate(self.scale) {
            return 0.0;
        }
        self.noise.get([x / self.scale, y / self.scale])
    }
}

impl ScalarField3D for GradientField3D {
    fn at(&self, x: f64, y: f64, z: f64) -> f64 {
        if is_degenerate(self.scale) {
            return 0.0;
        }
        self.noise
            .get([x / self.scale, y / self.scale, z / self.scale])
    }
}

impl ScalarField2D for SimplexField {
    fn at(&self, x: f64, y: f64) -> f64 {
        if is_degenerate(self.scale) {
            return 0.0;
        }
        self.noise.get([x / self.scale, y / self.scale])
    }
}

impl ScalarField3D for SimplexField3D {
    fn at(&self, x: f64, y: f64, z: f64) -> f64 {
        if is_degenerate(self.scale) {
            return 0.0;
        }
        self.noise
            .get([x / self.scale, y / self.scale, z / self.scale])
    }
}

// ---------------------------------------------------------------------------
// Derived operators
// ---------------------------------------------------------------------------

/// Central-difference gradient `(df/dx, df/dy)` at `(x, y)`.
///
/// Returns `(0, 0)` for a non-positive `eps`.
pub fn gradient_2d<F: ScalarField2D + ?Sized>(field: &F, x: f64, y: f64, eps: f64) -> (f64, f64) {
    if is_degenerate(eps) {
        return (0.0, 0.0);
    }
    let dx = (field.at(x + eps, y) - field.at(x - eps, y)) / (2.0 * eps);
    let dy = (field.at(x, y + eps) - field.at(x, y - eps)) / (2.0 * eps);
    (dx, dy)
}

/// Curl of a scalar field: `(df/dy, -df/dx)`.
///
/// The result is perpendicular to the gradient and divergence-free, so
/// particles following it swirl without sources or sinks.
pub fn curl_2d<F: ScalarField2D + ?Sized>(field: &F, x: f64, y: f64, eps: f64) -> (f64, f64) {
    let (dx, dy) = gradient_2d(field, x, y, eps);
    (dy, -dx)
}

// ---------------------------------------------------------------------------
// Value remapping
// ---------------------------------------------------------------------------

/// Maps noise in [-1, 1] to [0, 1].
pub fn remap01(v: f64) -> f64 {
    0.5 * (v + 1.0)
}

/// Maps noise in [-1, 1] to [a, b].
pub fn remap_range(v: f64, a: f64, b: f64) -> f64 {
    a + remap01(v) * (b - a)
}

/// Maps noise in [-1, 1] to an angle in [0, 2π].
pub fn to_angle(v: f64) -> f64 {
    (v + 1.0) * PI
}
