#![deny(unsafe_code)]
//! Flow-field engine: particles walk a simplex angle field and leave one
//! polyline each.
//!
//! The field value at a particle's position, scaled by π, is its heading.
//! A particle walks until it has taken `steps` steps or left the unit
//! square. Walks that recorded at least two points become translucent black
//! polylines.

use std::f64::consts::PI;

use genart_core::error::EngineError;
use genart_core::field::{ScalarField2D, SimplexField};
use genart_core::geom::{in_unit_square, Vec2};
use genart_core::params::{
    pick, pick_int, require_count, require_non_negative, require_positive, Params,
};
use genart_core::{Engine, Palette, Rgba, Scene, Xorshift64};
use serde_json::{json, Value};

const DEFAULT_PARTICLES: i64 = 1000;
const DEFAULT_STEPS: i64 = 300;
const DEFAULT_SCALE: f64 = 0.002;
const DEFAULT_STEP: f64 = 0.002;
const DEFAULT_LINE_WIDTH: f64 = 0.0015;

const LINE_ALPHA: f64 = 0.3;
const LINE_COLOR: Rgba = Rgba::new(0.0, 0.0, 0.0, LINE_ALPHA);

/// Resolved flow-field parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowFieldParams {
    pub particles: usize,
    pub steps: usize,
    pub scale: f64,
    pub step: f64,
    pub line_width: f64,
}

impl FlowFieldParams {
    /// Each invalid value fails with its own error, checked in declaration
    /// order.
    pub fn from_params(params: &Params) -> Result<Self, EngineError> {
        let name = FlowField.name();
        let particles = require_count(
            name,
            "particles",
            pick_int(params, "particles", DEFAULT_PARTICLES),
        )?;
        let steps = require_count(name, "steps", pick_int(params, "steps", DEFAULT_STEPS))?;
        let scale = pick(params, "scale", DEFAULT_SCALE);
        require_positive(name, "scale", scale)?;
        let step = pick(params, "step", DEFAULT_STEP);
        require_positive(name, "step", step)?;
        let line_width = pick(params, "lw", DEFAULT_LINE_WIDTH);
        require_non_negative(name, "lw", line_width)?;
        Ok(Self {
            particles,
            steps,
            scale,
            step,
            line_width,
        })
    }
}

/// Directed flow-field polylines.
pub struct FlowField;

impl FlowField {
    /// Walks one particle from `start`. The start point itself is not
    /// recorded.
    fn walk<F: ScalarField2D>(field: &F, start: Vec2, p: &FlowFieldParams) -> Vec<Vec2> {
        let mut pos = start;
        let mut points = Vec::new();
        for _ in 0..p.steps {
            let angle = field.at(pos.x, pos.y) * PI;
            pos += Vec2::new(angle.cos(), angle.sin()) * p.step;
            if !in_unit_square(pos) {
                break;
            }
            points.push(pos);
        }
        points
    }
}

impl Engine for FlowField {
    fn name(&self) -> &'static str {
        "flowfield"
    }

    #[tracing::instrument(name = "flowfield", skip_all)]
    fn generate(
        &self,
        rng: &mut Xorshift64,
        params: &Params,
        _palette: &Palette,
    ) -> Result<Scene, EngineError> {
        let p = FlowFieldParams::from_params(params)?;
        let field = SimplexField::new(rng.next_seed(), p.scale);

        let mut scene = Scene::new();
        for _ in 0..p.particles {
            let start = Vec2::new(rng.next_f64(), rng.next_f64());
            let points = Self::walk(&field, start, &p);
            if points.len() > 1 {
                scene.add_stroke(points, false, p.line_width, LINE_COLOR, LINE_ALPHA);
            }
        }
        tracing::debug!(
            lines = scene.len(),
            particles = p.particles,
            "flow field generated"
        );
        Ok(scene)
    }

    fn param_schema(&self) -> Value {
        json!({
            "particles": {"type": "integer", "default": DEFAULT_PARTICLES, "min": 1, "description": "Number of walkers"},
            "steps": {"type": "integer", "default": DEFAULT_STEPS, "min": 1, "description": "Maximum steps per walker"},
            "scale": {"type": "number", "default": DEFAULT_SCALE, "description": "Noise scale (larger is smoother)"},
            "step": {"type": "number", "default": DEFAULT_STEP, "description": "Distance per step"},
            "lw": {"type": "number", "default": DEFAULT_LINE_WIDTH, "min": 0.0, "description": "Line width"}
        })
    }
}
