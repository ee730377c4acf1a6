#![deny(unsafe_code)]
//! Flow engine: free particles advected by curl noise over a torus.
//!
//! Dots start uniformly in the unit square and follow the curl of a Perlin
//! field. Every step leaves a faint two-point stroke colored by the noise
//! value under the dot. Dots that leave the square re-enter from the
//! opposite edge.

use genart_core::error::EngineError;
use genart_core::field::GradientField;
use genart_core::geom::Vec2;
use genart_core::params::{
    pick, pick_int, require_count, require_non_negative, require_positive, Params,
};
use genart_core::particle::{curl_velocity, faint_stroke_style, noise_color, Dot};
use genart_core::{Engine, Palette, Scene, Xorshift64};
use serde_json::{json, Value};

const DEFAULT_DOTS: i64 = 5000;
const DEFAULT_LINE_WIDTH: f64 = 0.001;
const DEFAULT_ITERATIONS: i64 = 100;
const DEFAULT_FACTOR: f64 = 1.5;
const DEFAULT_STEP: f64 = 0.005;

/// Resolved flow parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowParams {
    pub dots: usize,
    pub line_width: f64,
    pub iterations: usize,
    /// Spatial frequency multiplier applied before sampling the field.
    pub factor: f64,
    pub step: f64,
}

impl FlowParams {
    pub fn from_params(params: &Params) -> Result<Self, EngineError> {
        let name = Flow.name();
        let line_width = pick(params, "lw", DEFAULT_LINE_WIDTH);
        let factor = pick(params, "factor", DEFAULT_FACTOR);
        let step = pick(params, "step", DEFAULT_STEP);
        require_non_negative(name, "lw", line_width)?;
        require_positive(name, "factor", factor)?;
        require_positive(name, "step", step)?;
        Ok(Self {
            dots: require_count(name, "dots", pick_int(params, "dots", DEFAULT_DOTS))?,
            line_width,
            iterations: require_count(
                name,
                "nIters",
                pick_int(params, "nIters", DEFAULT_ITERATIONS),
            )?,
            factor,
            step,
        })
    }
}

/// Curl-noise particle flow with toroidal wrap.
pub struct Flow;

impl Engine for Flow {
    fn name(&self) -> &'static str {
        "flow"
    }

    #[tracing::instrument(name = "flow", skip_all)]
    fn generate(
        &self,
        rng: &mut Xorshift64,
        params: &Params,
        palette: &Palette,
    ) -> Result<Scene, EngineError> {
        let p = FlowParams::from_params(params)?;

        let mut dots: Vec<Dot> = (0..p.dots)
            .map(|_| {
                let x = rng.next_f64();
                let y = rng.next_f64();
                Dot::at(Vec2::new(x, y), p.step)
            })
            .collect();
        let field = GradientField::new(rng.next_seed(), 1.0);

        let mut scene = Scene::new();
        for _ in 0..p.iterations {
            for dot in &mut dots {
                dot.advance(curl_velocity(&field, dot.pos, p.factor));
                let color = noise_color(&field, palette, dot.pos, p.factor);
                let (alpha, width) = faint_stroke_style(rng, p.line_width);
                scene.add_stroke(dot.segment(), false, width, color, alpha);
                dot.wrap_unit();
            }
        }
        tracing::debug!(strokes = scene.len(), "flow generated");
        Ok(scene)
    }

    fn param_schema(&self) -> Value {
        json!({
            "dots": {"type": "integer", "default": DEFAULT_DOTS, "min": 1, "description": "Number of particles"},
            "lw": {"type": "number", "default": DEFAULT_LINE_WIDTH, "min": 0.0, "description": "Base stroke width"},
            "nIters": {"type": "integer", "default": DEFAULT_ITERATIONS, "min": 1, "description": "Advection steps per particle"},
            "factor": {"type": "number", "default": DEFAULT_FACTOR, "description": "Noise frequency multiplier"},
            "step": {"type": "number", "default": DEFAULT_STEP, "description": "Distance moved per unit of curl"}
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use genart_core::Item;

    fn params(pairs: &[(&str, f64)]) -> Params {
        pairs.iter().map(|&(k, v)| (k.to_string(), v)).collect()
    }

    fn small() -> Params {
        params(&[("dots", 30.0), ("nIters", 20.0)])
    }

    fn generate(seed: u64, params: &Params) -> Scene {
        Flow.generate(&mut Xorshift64::new(seed), params, &Palette::rainbow())
            .unwrap()
    }

    // ---- Parameter tests ----

    #[test]
    fn defaults_when_params_empty() {
        let p = FlowParams::from_params(&Params::new()).unwrap();
        assert_eq!(p.dots, 5000);
        assert_eq!(p.iterations, 100);
        assert_eq!(p.step, DEFAULT_STEP);
    }

    #[test]
    fn invalid_values_are_rejected() {
        for (key, value) in [("dots", 0.0), ("nIters", -1.0), ("factor", 0.0), ("step", -0.1), ("lw", -1.0)] {
            let err = FlowParams::from_params(&params(&[(key, value)])).unwrap_err();
            assert!(
                matches!(err, EngineError::InvalidParameter { ref name, .. } if name == key),
                "{key}: {err}"
            );
        }
    }

    // ---- Scene tests ----

    #[test]
    fn one_stroke_per_dot_per_iteration() {
        let scene = generate(1, &small());
        assert_eq!(scene.len(), 30 * 20);
        assert_eq!(scene.stroke_count(), scene.len());
    }

    #[test]
    fn strokes_are_short_faint_segments() {
        let scene = generate(2, &small());
        for item in scene.items() {
            let Item::Stroke(stroke) = item else {
                panic!("expected only strokes");
            };
            assert_eq!(stroke.path.len(), 2);
            assert!(!stroke.path.closed);
            assert!((0.05..0.15).contains(&stroke.alpha));
        }
    }

    #[test]
    fn wrapped_dots_restart_inside_the_square() {
        // A huge step pushes dots out every iteration; each new stroke must
        // start from a position already wrapped back into [0, 1].
        let scene = generate(3, &params(&[("dots", 20.0), ("nIters", 10.0), ("step", 5.0)]));
        for item in scene.items().iter().skip(20) {
            let Item::Stroke(stroke) = item else { continue };
            let start = stroke.path.points[0];
            assert!((0.0..=1.0).contains(&start.x) && (0.0..=1.0).contains(&start.y));
        }
    }

    // ---- Determinism tests ----

    #[test]
    fn same_seed_same_scene() {
        assert_eq!(generate(7, &small()), generate(7, &small()));
    }

    #[test]
    fn different_seed_different_scene() {
        assert_ne!(generate(7, &small()), generate(8, &small()));
    }
}
