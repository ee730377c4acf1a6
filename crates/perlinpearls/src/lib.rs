#![deny(unsafe_code)]
//! Perlin pearls engine: a few non-overlapping circles filled with curl-noise
//! strands, each finished with a black outline.
//!
//! Circles are placed by rejection sampling. Dots start on each circle's rim
//! and follow the curl of a Perlin field; a step leaves a mark only while it
//! stays strictly inside its circle, which is what gives the pearls their
//! clean edge.

use std::f64::consts::TAU;

use genart_core::error::EngineError;
use genart_core::field::GradientField;
use genart_core::geom::arc;
use genart_core::params::{
    pick, pick_int, require_count, require_non_negative, require_positive, Params,
};
use genart_core::particle::{advect_confined, Advection, Circle};
use genart_core::{Engine, Palette, Rgba, Scene, Xorshift64};
use serde_json::{json, Value};
use tracing::warn;

const DEFAULT_CIRCLES: i64 = 5;
const DEFAULT_DOTS: i64 = 500;
const DEFAULT_LINE_WIDTH: f64 = 0.001;
const DEFAULT_ITERATIONS: i64 = 2000;
const DEFAULT_FACTOR: f64 = 1.5;
const DEFAULT_STEP: f64 = 0.003;

/// Segments in each outline (the outline has one more point, closing the loop).
const OUTLINE_SEGMENTS: usize = 200;
/// Candidate circles tried per requested circle before giving up.
const ATTEMPTS_PER_CIRCLE: usize = 10_000;

/// Resolved perlin pearls parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct PearlsParams {
    pub circles: usize,
    pub dots: usize,
    pub line_width: f64,
    pub iterations: usize,
    pub factor: f64,
    pub step: f64,
    /// Defaults to twice the strand width.
    pub outline_width: f64,
}

impl PearlsParams {
    pub fn from_params(params: &Params) -> Result<Self, EngineError> {
        let name = PerlinPearls.name();
        let line_width = pick(params, "lw", DEFAULT_LINE_WIDTH);
        let factor = pick(params, "factor", DEFAULT_FACTOR);
        let step = pick(params, "step", DEFAULT_STEP);
        let outline_width = pick(params, "outlineWidth", line_width * 2.0);
        require_non_negative(name, "lw", line_width)?;
        require_positive(name, "factor", factor)?;
        require_positive(name, "step", step)?;
        require_non_negative(name, "outlineWidth", outline_width)?;
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
            outline_width,
        })
    }

    /// Strands differentiate the field in unscaled coordinates, so their
    /// curl carries an extra `factor`.
    pub fn advection(&self) -> Advection {
        Advection {
            iterations: self.iterations,
            factor: self.factor,
            line_width: self.line_width,
            gain: self.factor,
        }
    }
}

/// Rejection-samples up to `n` non-overlapping circles with centers in
/// [0.1, 0.9)² and radii in [0.05, 0.2).
///
/// Stops after a bounded number of candidates, so crowded requests return
/// fewer circles instead of looping forever.
pub fn place_circles(rng: &mut Xorshift64, n: usize) -> Vec<Circle> {
    let budget = n.saturating_mul(ATTEMPTS_PER_CIRCLE);
    let mut circles: Vec<Circle> = Vec::new();
    let mut attempts = 0;
    while circles.len() < n && attempts < budget {
        attempts += 1;
        let candidate = Circle::new(
            rng.next_range(0.1, 0.9),
            rng.next_range(0.1, 0.9),
            rng.next_range(0.05, 0.2),
        );
        if !circles.iter().any(|c| candidate.overlaps(c)) {
            circles.push(candidate);
        }
    }
    if circles.len() < n {
        warn!(
            requested = n,
            placed = circles.len(),
            attempts,
            "could not place every circle without overlap"
        );
    }
    circles
}

/// Closed outline through `OUTLINE_SEGMENTS + 1` rim points.
fn outline(circle: &Circle) -> Vec<genart_core::Vec2> {
    arc(
        circle.center.x,
        circle.center.y,
        circle.radius,
        0.0,
        TAU,
        OUTLINE_SEGMENTS + 1,
    )
}

/// Curl-noise strands confined to non-overlapping outlined circles.
pub struct PerlinPearls;

impl Engine for PerlinPearls {
    fn name(&self) -> &'static str {
        "perlinpearls"
    }

    #[tracing::instrument(name = "perlinpearls", skip_all)]
    fn generate(
        &self,
        rng: &mut Xorshift64,
        params: &Params,
        palette: &Palette,
    ) -> Result<Scene, EngineError> {
        let p = PearlsParams::from_params(params)?;

        let circles = place_circles(rng, p.circles);
        let mut dots: Vec<_> = circles
            .iter()
            .map(|c| c.rim_dots(rng, p.dots, p.step))
            .collect();
        let field = GradientField::new(rng.next_seed(), 1.0);
        let advection = p.advection();

        let mut scene = Scene::new();
        for (circle, circle_dots) in circles.iter().zip(dots.iter_mut()) {
            advect_confined(&mut scene, rng, &field, palette, circle, circle_dots, advection);
            scene.add_stroke(outline(circle), true, p.outline_width, Rgba::BLACK, 1.0);
        }
        tracing::debug!(circles = circles.len(), items = scene.len(), "pearls generated");
        Ok(scene)
    }

    fn param_schema(&self) -> Value {
        json!({
            "circles": {"type": "integer", "default": DEFAULT_CIRCLES, "min": 1, "description": "Number of pearls"},
            "dots": {"type": "integer", "default": DEFAULT_DOTS, "min": 1, "description": "Particles per pearl"},
            "lw": {"type": "number", "default": DEFAULT_LINE_WIDTH, "min": 0.0, "description": "Base strand width"},
            "nIters": {"type": "integer", "default": DEFAULT_ITERATIONS, "min": 1, "description": "Advection steps per particle"},
            "factor": {"type": "number", "default": DEFAULT_FACTOR, "description": "Noise frequency multiplier"},
            "step": {"type": "number", "default": DEFAULT_STEP, "description": "Base distance per unit of curl"},
            "outlineWidth": {"type": "number", "default": DEFAULT_LINE_WIDTH * 2.0, "min": 0.0, "description": "Outline width (defaults to 2 * lw)"}
        })
    }
}
