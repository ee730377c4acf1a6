#![deny(unsafe_code)]
//! Strata engine: stacked regular polygons roughened by midpoint displacement.
//!
//! Layer `i` is a regular `sides`-gon of radius `0.5 - 0.02·i`, rotated by
//! `i·rotation`. Its outline is subdivided `depth` times; each pass inserts
//! the midpoint of every edge, pushed along the edge normal by the Perlin
//! noise under it. Layers are filled in palette order, largest first.

use genart_core::error::EngineError;
use genart_core::field::{GradientField, ScalarField2D};
use genart_core::geom::{regular_polygon, Vec2};
use genart_core::params::{
    pick, pick_int, require_at_most, require_count, require_non_negative, Params,
};
use genart_core::{Engine, Palette, Scene, Xorshift64};
use serde_json::{json, Value};

const DEFAULT_SIDES: i64 = 6;
const DEFAULT_LAYERS: i64 = 20;
const DEFAULT_DEPTH: i64 = 5;
const DEFAULT_MAGNITUDE: f64 = 0.1;
const DEFAULT_ROTATION: f64 = 0.01;

/// Radius lost per layer.
const LAYER_SHRINK: f64 = 0.02;
const LAYER_ALPHA: f64 = 0.8;
const MIN_SIDES: i64 = 3;
const MAX_SIDES: i64 = 1024;
/// Points per layer are `sides · 2^depth`.
const MAX_DEPTH: i64 = 16;

/// Resolved strata parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct StrataParams {
    pub sides: usize,
    pub layers: usize,
    pub depth: usize,
    pub magnitude: f64,
    pub rotation: f64,
}

impl StrataParams {
    pub fn from_params(params: &Params) -> Result<Self, EngineError> {
        let name = Strata.name();
        let sides = pick_int(params, "sides", DEFAULT_SIDES);
        if sides < MIN_SIDES {
            return Err(EngineError::InvalidParameter {
                engine: name.to_string(),
                name: "sides".to_string(),
                value: sides as f64,
                reason: "must be >= 3".to_string(),
            });
        }
        require_at_most(name, "sides", sides, MAX_SIDES)?;
        let depth = pick_int(params, "depth", DEFAULT_DEPTH);
        require_non_negative(name, "depth", depth as f64)?;
        require_at_most(name, "depth", depth, MAX_DEPTH)?;
        Ok(Self {
            sides: sides as usize,
            layers: require_count(name, "layers", pick_int(params, "layers", DEFAULT_LAYERS))?,
            depth: depth as usize,
            magnitude: pick(params, "magnitude", DEFAULT_MAGNITUDE),
            rotation: pick(params, "rotation", DEFAULT_ROTATION),
        })
    }
}

/// One displacement pass: every edge `(p1, p2)` contributes `p1` followed by
/// its displaced midpoint, doubling the point count.
fn displace_once<F: ScalarField2D>(points: &[Vec2], field: &F, magnitude: f64) -> Vec<Vec2> {
    let n = points.len();
    let mut out = Vec::with_capacity(n * 2);
    for i in 0..n {
        let p1 = points[i];
        let p2 = points[(i + 1) % n];
        let mid = (p1 + p2) * 0.5;
        let edge = p2 - p1;
        let normal = Vec2::new(-edge.y, edge.x).normalize_or_zero();
        out.push(p1);
        out.push(mid + normal * (field.at(mid.x, mid.y) * magnitude));
    }
    out
}

/// Applies `depth` displacement passes.
pub fn subdivide<F: ScalarField2D>(
    points: Vec<Vec2>,
    depth: usize,
    field: &F,
    magnitude: f64,
) -> Vec<Vec2> {
    (0..depth).fold(points, |pts, _| displace_once(&pts, field, magnitude))
}

/// Layered noise-displaced polygons.
pub struct Strata;

impl Engine for Strata {
    fn name(&self) -> &'static str {
        "strata"
    }

    #[tracing::instrument(name = "strata", skip_all)]
    fn generate(
        &self,
        rng: &mut Xorshift64,
        params: &Params,
        palette: &Palette,
    ) -> Result<Scene, EngineError> {
        let p = StrataParams::from_params(params)?;
        let field = GradientField::new(rng.next_seed(), 1.0);

        let mut scene = Scene::new();
        for i in 0..p.layers {
            let radius = (0.5 - i as f64 * LAYER_SHRINK).max(0.0);
            let base = regular_polygon(0.5, 0.5, radius, p.sides, i as f64 * p.rotation);
            let points = subdivide(base, p.depth, &field, p.magnitude);
            scene.add_fill(points, palette.by_index(i), LAYER_ALPHA);
        }
        tracing::debug!(layers = p.layers, depth = p.depth, "strata generated");
        Ok(scene)
    }

    fn param_schema(&self) -> Value {
        json!({
            "sides": {"type": "integer", "default": DEFAULT_SIDES, "min": MIN_SIDES, "max": MAX_SIDES, "description": "Sides of the base polygon"},
            "layers": {"type": "integer", "default": DEFAULT_LAYERS, "min": 1, "description": "Number of stacked layers"},
            "depth": {"type": "integer", "default": DEFAULT_DEPTH, "min": 0, "max": MAX_DEPTH, "description": "Subdivision passes (points double each pass)"},
            "magnitude": {"type": "number", "default": DEFAULT_MAGNITUDE, "description": "Midpoint displacement scale"},
            "rotation": {"type": "number", "default": DEFAULT_ROTATION, "description": "Extra rotation per layer, radians"}
        })
    }
}
