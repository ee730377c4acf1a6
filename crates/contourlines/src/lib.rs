#![deny(unsafe_code)]
//! Contour lines engine: random walkers with a low-pass heading, stamped
//! with small dots.
//!
//! Each walker blends 90% of its previous heading with 10% of a heading read
//! from a simplex field, so paths curve smoothly along the field's contours.
//! A walker may stop early at random (`resetProb` per step) and always stops
//! when it leaves the unit square.

use std::f64::consts::TAU;

use genart_core::error::EngineError;
use genart_core::field::{ScalarField2D, SimplexField};
use genart_core::geom::{circle_at, in_unit_square, Vec2};
use genart_core::params::{
    pick, pick_int, require_count, require_non_negative, require_positive, Params,
};
use genart_core::{Engine, Palette, Scene, Xorshift64};
use serde_json::{json, Value};

const DEFAULT_LINES: i64 = 3000;
const DEFAULT_STEPS: i64 = 500;
const DEFAULT_SCALE: f64 = 0.01;
const DEFAULT_STEP: f64 = 0.0008;
const DEFAULT_RESET_PROB: f64 = 0.005;
const DEFAULT_DOT_SIZE: f64 = 0.0015;

/// Segments in each stamped dot.
const DOT_SEGMENTS: usize = 12;
/// Weight of the previous heading in the low-pass filter.
const HEADING_INERTIA: f64 = 0.9;
/// Field coordinates are the position divided by this.
const FIELD_ZOOM: f64 = 100.0;

/// Resolved contour-line parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ContourParams {
    pub lines: usize,
    pub steps: usize,
    pub scale: f64,
    pub step: f64,
    pub reset_prob: f64,
    pub dot_size: f64,
}

impl ContourParams {
    pub fn from_params(params: &Params) -> Result<Self, EngineError> {
        let name = ContourLines.name();
        let scale = pick(params, "scale", DEFAULT_SCALE);
        let step = pick(params, "step", DEFAULT_STEP);
        let dot_size = pick(params, "dotSize", DEFAULT_DOT_SIZE);
        require_positive(name, "scale", scale)?;
        require_positive(name, "step", step)?;
        require_non_negative(name, "dotSize", dot_size)?;
        Ok(Self {
            lines: require_count(name, "lines", pick_int(params, "lines", DEFAULT_LINES))?,
            steps: require_count(name, "steps", pick_int(params, "steps", DEFAULT_STEPS))?,
            scale,
            step,
            reset_prob: pick(params, "resetProb", DEFAULT_RESET_PROB),
            dot_size,
        })
    }
}

/// Next heading: mostly the previous one, nudged toward the field.
fn blend_heading(prev: f64, field_value: f64) -> f64 {
    HEADING_INERTIA * prev + (1.0 - HEADING_INERTIA) * (field_value * TAU)
}

/// Field-guided random walkers stamped with dots.
pub struct ContourLines;

impl Engine for ContourLines {
    fn name(&self) -> &'static str {
        "contourlines"
    }

    #[tracing::instrument(name = "contourlines", skip_all)]
    fn generate(
        &self,
        rng: &mut Xorshift64,
        params: &Params,
        palette: &Palette,
    ) -> Result<Scene, EngineError> {
        let p = ContourParams::from_params(params)?;
        let field = SimplexField::new(rng.next_seed(), p.scale);

        let mut scene = Scene::new();
        for _ in 0..p.lines {
            let mut pos = Vec2::new(rng.next_f64(), rng.next_f64());
            let mut heading = rng.next_angle();
            for _ in 0..p.steps {
                if rng.next_f64() < p.reset_prob {
                    break;
                }
                heading = blend_heading(heading, field.at(pos.x / FIELD_ZOOM, pos.y / FIELD_ZOOM));
                pos += Vec2::new(heading.cos(), heading.sin()) * p.step;
                if !in_unit_square(pos) {
                    break;
                }
                let dot = circle_at(pos.x, pos.y, p.dot_size, DOT_SEGMENTS);
                let color = palette.pick(rng);
                let alpha = 0.5 + rng.next_f64() * 0.4;
                scene.add_fill(dot.points, color, alpha);
            }
        }
        tracing::debug!(dots = scene.len(), "contour lines generated");
        Ok(scene)
    }

    fn param_schema(&self) -> Value {
        json!({
            "lines": {"type": "integer", "default": DEFAULT_LINES, "min": 1, "description": "Number of walkers"},
            "steps": {"type": "integer", "default": DEFAULT_STEPS, "min": 1, "description": "Maximum steps per walker"},
            "scale": {"type": "number", "default": DEFAULT_SCALE, "description": "Noise scale"},
            "step": {"type": "number", "default": DEFAULT_STEP, "description": "Distance per step"},
            "resetProb": {"type": "number", "default": DEFAULT_RESET_PROB, "description": "Per-step probability of ending a walk"},
            "dotSize": {"type": "number", "default": DEFAULT_DOT_SIZE, "min": 0.0, "description": "Radius of each stamped dot"}
        })
    }
}
