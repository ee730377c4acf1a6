#![deny(unsafe_code)]
//! Swirl engine: many small circles on a golden-angle spiral, each filled
//! with curl-noise strands.
//!
//! Circle `i` of `N` sits at angle `i·π(3-√5)` and radius `√(i/N)·0.45`
//! from the center, which spreads them evenly over a disc. Strands follow
//! the same confined advection as the pearls engine but without outlines.

use std::f64::consts::PI;

use genart_core::error::EngineError;
use genart_core::field::GradientField;
use genart_core::params::{
    pick, pick_int, require_count, require_non_negative, require_positive, Params,
};
use genart_core::particle::{advect_confined, Advection, Circle};
use genart_core::{Engine, Palette, Scene, Xorshift64};
use serde_json::{json, Value};

const DEFAULT_CIRCLES: i64 = 500;
const DEFAULT_DOTS: i64 = 100;
const DEFAULT_LINE_WIDTH: f64 = 0.001;
const DEFAULT_ITERATIONS: i64 = 1000;
const DEFAULT_FACTOR: f64 = 1.5;
const DEFAULT_STEP: f64 = 0.003;
const DEFAULT_MAX_RADIUS: f64 = 0.05;

/// Radius of the disc the spiral fills.
const SPIRAL_RADIUS: f64 = 0.45;

/// Resolved swirl parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SwirlParams {
    pub circles: usize,
    pub dots: usize,
    pub line_width: f64,
    pub iterations: usize,
    pub factor: f64,
    pub step: f64,
    pub max_radius: f64,
}

impl SwirlParams {
    pub fn from_params(params: &Params) -> Result<Self, EngineError> {
        let name = Swirl.name();
        let line_width = pick(params, "lw", DEFAULT_LINE_WIDTH);
        let factor = pick(params, "factor", DEFAULT_FACTOR);
        let step = pick(params, "step", DEFAULT_STEP);
        let max_radius = pick(params, "maxRadius", DEFAULT_MAX_RADIUS);
        require_non_negative(name, "lw", line_width)?;
        require_positive(name, "factor", factor)?;
        require_positive(name, "step", step)?;
        require_positive(name, "maxRadius", max_radius)?;
        Ok(Self {
            circles: require_count(name, "circles", pick_int(params, "circles", DEFAULT_CIRCLES))?,
            dots: require_count(name, "dots", pick_int(params, "dots", DEFAULT_DOTS))?,
            line_width,
            iterations: require_count(
                name,
                "nIters",
                pick_int(params, "nIters", DEFAULT_ITERATIONS),
            )?,
            factor,
            step,
            max_radius,
        })
    }
}

/// Golden-angle spiral of `n` circles with radii in [0.1·max, max).
pub fn spiral_circles(rng: &mut Xorshift64, n: usize, max_radius: f64) -> Vec<Circle> {
    let golden_angle = PI * (3.0 - 5.0_f64.sqrt());
    (0..n)
        .map(|i| {
            let theta = golden_angle * i as f64;
            let r = (i as f64 / n as f64).sqrt() * SPIRAL_RADIUS;
            Circle::new(
                0.5 + r * theta.cos(),
                0.5 + r * theta.sin(),
                rng.next_range(max_radius * 0.1, max_radius),
            )
        })
        .collect()
}

/// Spiral of circles with confined curl-noise strands.
pub struct Swirl;

impl Engine for Swirl {
    fn name(&self) -> &'static str {
        "swirl"
    }

    #[tracing::instrument(name = "swirl", skip_all)]
    fn generate(
        &self,
        rng: &mut Xorshift64,
        params: &Params,
        palette: &Palette,
    ) -> Result<Scene, EngineError> {
        let p = SwirlParams::from_params(params)?;

        let circles = spiral_circles(rng, p.circles, p.max_radius);
        let mut dots: Vec<_> = circles
            .iter()
            .map(|c| c.rim_dots(rng, p.dots, p.step))
            .collect();
        let field = GradientField::new(rng.next_seed(), 1.0);
        let advection = Advection {
            iterations: p.iterations,
            factor: p.factor,
            line_width: p.line_width,
            gain: 1.0,
        };

        let mut scene = Scene::new();
        for (circle, circle_dots) in circles.iter().zip(dots.iter_mut()) {
            advect_confined(&mut scene, rng, &field, palette, circle, circle_dots, advection);
        }
        tracing::debug!(strokes = scene.len(), "swirl generated");
        Ok(scene)
    }

    fn param_schema(&self) -> Value {
        json!({
            "circles": {"type": "integer", "default": DEFAULT_CIRCLES, "min": 1, "description": "Circles on the spiral"},
            "dots": {"type": "integer", "default": DEFAULT_DOTS, "min": 1, "description": "Particles per circle"},
            "lw": {"type": "number", "default": DEFAULT_LINE_WIDTH, "min": 0.0, "description": "Base strand width"},
            "nIters": {"type": "integer", "default": DEFAULT_ITERATIONS, "min": 1, "description": "Advection steps per particle"},
            "factor": {"type": "number", "default": DEFAULT_FACTOR, "description": "Noise frequency multiplier"},
            "step": {"type": "number", "default": DEFAULT_STEP, "description": "Base distance per unit of curl"},
            "maxRadius": {"type": "number", "default": DEFAULT_MAX_RADIUS, "description": "Largest circle radius"}
        })
    }
}
