//! Curl-noise particle advection shared by the flow-style engines.
//!
//! A [`Dot`] remembers its previous position so each advection step can be
//! emitted as a two-point stroke. Free dots wrap around the unit square;
//! confined dots live on a [`Circle`] and only leave a mark while both ends
//! of the step stay strictly inside it.

use crate::color::Rgba;
use crate::field::{curl_2d, ScalarField2D};
use crate::geom::Vec2;
use crate::palette::Palette;
use crate::prng::Xorshift64;
use crate::scene::Scene;

/// Central-difference step used when differentiating the noise field.
pub const CURL_EPSILON: f64 = 1e-3;

/// A particle with its previous position and its own step length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dot {
    pub pos: Vec2,
    pub prev: Vec2,
    pub step: f64,
}

impl Dot {
    pub fn at(pos: Vec2, step: f64) -> Self {
        Self {
            pos,
            prev: pos,
            step,
        }
    }

    /// Moves along `velocity` scaled by the dot's step, remembering the old
    /// position.
    pub fn advance(&mut self, velocity: Vec2) {
        self.prev = self.pos;
        self.pos += velocity * self.step;
    }

    /// Toroidal wrap: a coordinate that left [0, 1] jumps to the opposite
    /// edge, and the previous position on that axis follows so the next
    /// stroke does not streak across the canvas.
    pub fn wrap_unit(&mut self) {
        if self.pos.x < 0.0 {
            self.pos.x = 1.0;
            self.prev.x = self.pos.x;
        }
        if self.pos.x > 1.0 {
            self.pos.x = 0.0;
            self.prev.x = self.pos.x;
        }
        if self.pos.y < 0.0 {
            self.pos.y = 1.0;
            self.prev.y = self.pos.y;
        }
        if self.pos.y > 1.0 {
            self.pos.y = 0.0;
            self.prev.y = self.pos.y;
        }
    }

    /// The last step as stroke points.
    pub fn segment(&self) -> Vec<Vec2> {
        vec![self.prev, self.pos]
    }
}

/// A circle that confines dots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f64,
}

impl Circle {
    pub fn new(x: f64, y: f64, radius: f64) -> Self {
        Self {
            center: Vec2::new(x, y),
            radius,
        }
    }

    /// Strictly inside: points on the rim are outside.
    pub fn contains(&self, p: Vec2) -> bool {
        p.distance(self.center) < self.radius
    }

    pub fn overlaps(&self, other: &Circle) -> bool {
        self.center.distance(other.center) < self.radius + other.radius
    }

    /// `n` dots at random angles on the rim, each with a step jittered to
    /// `step·U[0.8, 1.2)`.
    ///
    /// The rim point for angle θ is `center + (sin θ, cos θ)·radius`.
    pub fn rim_dots(&self, rng: &mut Xorshift64, n: usize, step: f64) -> Vec<Dot> {
        (0..n)
            .map(|_| {
                let theta = rng.next_angle();
                let dot_step = step * rng.next_range(0.8, 1.2);
                let pos = self.center + Vec2::new(theta.sin(), theta.cos()) * self.radius;
                Dot::at(pos, dot_step)
            })
            .collect()
    }
}

/// The curl velocity of `field` at `p`, sampled at `p·factor`.
pub fn curl_velocity<F: ScalarField2D + ?Sized>(field: &F, p: Vec2, factor: f64) -> Vec2 {
    let (nx, ny) = curl_2d(field, p.x * factor, p.y * factor, CURL_EPSILON);
    Vec2::new(nx, ny)
}

/// Palette color for the noise value at `p·factor`.
pub fn noise_color<F: ScalarField2D + ?Sized>(
    field: &F,
    palette: &Palette,
    p: Vec2,
    factor: f64,
) -> Rgba {
    palette.from_noise(field.at(p.x * factor, p.y * factor))
}

/// Per-stroke opacity `0.05 + U·0.1` and width `lw·U[0.8, 1.2)`, drawn in
/// that order.
pub fn faint_stroke_style(rng: &mut Xorshift64, lw: f64) -> (f64, f64) {
    let alpha = 0.05 + rng.next_f64() * 0.1;
    let width = lw * rng.next_range(0.8, 1.2);
    (alpha, width)
}

/// Settings for [`advect_confined`].
#[derive(Debug, Clone, Copy)]
pub struct Advection {
    pub iterations: usize,
    pub factor: f64,
    pub line_width: f64,
    /// Multiplier on the curl velocity.
    pub gain: f64,
}

impl Advection {
    /// Velocity of a dot at `p`.
    pub fn velocity<F: ScalarField2D + ?Sized>(&self, field: &F, p: Vec2) -> Vec2 {
        curl_velocity(field, p, self.factor) * self.gain
    }
}

/// Advects `dots` inside `circle` for the configured number of iterations,
/// emitting a faint noise-colored stroke for every step that stays strictly
/// inside the circle.
///
/// Style draws (alpha, width) happen only for emitted strokes.
pub fn advect_confined<F: ScalarField2D + ?Sized>(
    scene: &mut Scene,
    rng: &mut Xorshift64,
    field: &F,
    palette: &Palette,
    circle: &Circle,
    dots: &mut [Dot],
    advection: Advection,
) {
    for _ in 0..advection.iterations {
        for dot in dots.iter_mut() {
            dot.advance(advection.velocity(field, dot.pos));
            let color = noise_color(field, palette, dot.pos, advection.factor);
            if circle.contains(dot.pos) && circle.contains(dot.prev) {
                let (alpha, width) = faint_stroke_style(rng, advection.line_width);
                scene.add_stroke(dot.segment(), false, width, color, alpha);
            }
        }
    }
}
