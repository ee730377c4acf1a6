#![deny(unsafe_code)]
//! Black hole engine: concentric rings distorted by 3D simplex noise.
//!
//! Rings grow from an inner `hole` radius out to a fixed outer radius. Each
//! ring samples the noise around its circumference at a frequency that rises
//! with the ring index, and the displacement envelope grows quadratically,
//! so the inner rings stay calm while the outer ones tear apart. The third
//! noise coordinate steps by `gap` per ring, which keeps neighbouring rings
//! correlated.

use std::f64::consts::TAU;

use genart_core::error::EngineError;
use genart_core::field::{ScalarField3D, SimplexField3D};
use genart_core::geom::Vec2;
use genart_core::params::{pick, pick_int, require_count, require_non_negative, Params};
use genart_core::{Engine, Palette, Scene, Xorshift64};
use serde_json::{json, Value};

const DEFAULT_CIRCLES: i64 = 120;
const DEFAULT_DENSITY: f64 = 0.6;
const DEFAULT_GAP: f64 = 0.02;
const DEFAULT_LINE_WIDTH: f64 = 0.0008;
const DEFAULT_SEGMENTS: i64 = 900;
const DEFAULT_HOLE: f64 = 0.1;
const DEFAULT_FREQ: f64 = 6.0;
const DEFAULT_AMP: f64 = 1.2;

/// Radius of the outermost ring.
const OUTER_RADIUS: f64 = 0.45;
const CENTER: Vec2 = Vec2::new(0.5, 0.5);

/// Resolved black hole parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct BlackholeParams {
    pub circles: usize,
    pub density: f64,
    pub gap: f64,
    pub line_width: f64,
    pub segments: usize,
    pub hole: f64,
    pub freq: f64,
    pub amp: f64,
    /// Preset palette id overriding the supplied palette, when set.
    pub palette: Option<i64>,
}

impl BlackholeParams {
    /// Picks every parameter with its default and validates the result.
    pub fn from_params(params: &Params) -> Result<Self, EngineError> {
        let name = Blackhole.name();
        let line_width = pick(params, "lw", DEFAULT_LINE_WIDTH);
        require_non_negative(name, "lw", line_width)?;
        Ok(Self {
            circles: require_count(name, "circles", pick_int(params, "circles", DEFAULT_CIRCLES))?,
            density: pick(params, "density", DEFAULT_DENSITY),
            gap: pick(params, "gap", DEFAULT_GAP),
            line_width,
            segments: require_count(
                name,
                "segments",
                pick_int(params, "segments", DEFAULT_SEGMENTS),
            )?,
            hole: pick(params, "hole", DEFAULT_HOLE),
            freq: pick(params, "freq", DEFAULT_FREQ),
            amp: pick(params, "amp", DEFAULT_AMP),
            palette: params.get("palette").map(|&id| id as i64),
        })
    }
}

/// Noise-perturbed concentric rings.
pub struct Blackhole;

impl Engine for Blackhole {
    fn name(&self) -> &'static str {
        "blackhole"
    }

    #[tracing::instrument(name = "blackhole", skip_all)]
    fn generate(
        &self,
        rng: &mut Xorshift64,
        params: &Params,
        palette: &Palette,
    ) -> Result<Scene, EngineError> {
        let p = BlackholeParams::from_params(params)?;
        let preset;
        let colors = match p.palette {
            Some(id) => {
                preset = Palette::preset(id);
                &preset
            }
            None => palette,
        };

        let field = SimplexField3D::new(rng.next_seed(), 1.0);
        let k_max = 0.5 + rng.next_f64() * 0.5;

        let mut scene = Scene::new();
        for i in 0..p.circles {
            let t = i as f64 / p.circles as f64;
            let radius = p.hole + t * (OUTER_RADIUS - p.hole);
            let k = k_max * t.sqrt();
            let envelope = p.density * t * t;
            let start = rng.next_angle();

            let points = (0..p.segments)
                .map(|j| {
                    let theta = start + TAU * j as f64 / p.segments as f64;
                    let (sin, cos) = theta.sin_cos();
                    let nv = field.at(
                        k * p.freq * (cos + 1.0),
                        k * p.freq * (sin + 1.0),
                        i as f64 * p.gap,
                    );
                    let r = (radius + nv * envelope * p.amp).max(p.hole);
                    CENTER + Vec2::new(cos, sin) * r
                })
                .collect();

            let alpha = 0.6 + rng.next_f64() * 0.25;
            scene.add_stroke(points, true, p.line_width, colors.pick(rng), alpha);
        }
        tracing::debug!(rings = scene.len(), k_max, "rings generated");
        Ok(scene)
    }

    fn param_schema(&self) -> Value {
        json!({
            "circles": {"type": "integer", "default": DEFAULT_CIRCLES, "min": 1, "description": "Number of rings"},
            "density": {"type": "number", "default": DEFAULT_DENSITY, "description": "Displacement envelope at the outer ring"},
            "gap": {"type": "number", "default": DEFAULT_GAP, "description": "Noise z step between rings"},
            "lw": {"type": "number", "default": DEFAULT_LINE_WIDTH, "min": 0.0, "description": "Ring line width"},
            "segments": {"type": "integer", "default": DEFAULT_SEGMENTS, "min": 1, "description": "Points per ring"},
            "hole": {"type": "number", "default": DEFAULT_HOLE, "description": "Inner radius; rings never dip below it"},
            "freq": {"type": "number", "default": DEFAULT_FREQ, "description": "Angular noise frequency"},
            "amp": {"type": "number", "default": DEFAULT_AMP, "description": "Displacement amplitude"},
            "palette": {"type": "integer", "description": "Preset id (1 warm, 2 cool, 3 rainbow, else mono); unset uses the run palette"}
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
        params(&[("circles", 12.0), ("segments", 60.0)])
    }

    fn generate(seed: u64, params: &Params, palette: &Palette) -> Scene {
        Blackhole
            .generate(&mut Xorshift64::new(seed), params, palette)
            .unwrap()
    }

    // ---- Parameter tests ----

    #[test]
    fn defaults_when_params_empty() {
        let p = BlackholeParams::from_params(&Params::new()).unwrap();
        assert_eq!(p.circles, 120);
        assert_eq!(p.segments, 900);
        assert_eq!(p.palette, None);
    }

    #[test]
    fn zero_circles_is_rejected() {
        let err = BlackholeParams::from_params(&params(&[("circles", 0.0)])).unwrap_err();
        assert!(matches!(err, EngineError::InvalidParameter { ref name, .. } if name == "circles"));
    }

    #[test]
    fn negative_segments_is_rejected() {
        assert!(BlackholeParams::from_params(&params(&[("segments", -3.0)])).is_err());
    }

    // ---- Geometry tests ----

    #[test]
    fn one_closed_ring_per_circle() {
        let scene = generate(1, &small(), &Palette::warm());
        assert_eq!(scene.len(), 12);
        for item in scene.items() {
            let Item::Stroke(stroke) = item else {
                panic!("expected only strokes");
            };
            assert!(stroke.path.closed);
            assert_eq!(stroke.path.len(), 60);
            assert!((0.6..0.85).contains(&stroke.alpha));
        }
    }

    #[test]
    fn rings_never_fall_inside_hole() {
        let scene = generate(3, &small(), &Palette::warm());
        for item in scene.items() {
            let Item::Stroke(stroke) = item else { continue };
            for p in &stroke.path.points {
                assert!(p.distance(CENTER) >= DEFAULT_HOLE - 1e-9);
            }
        }
    }

    #[test]
    fn first_ring_is_undisturbed() {
        // t = 0 zeroes both the frequency and the envelope.
        let scene = generate(4, &small(), &Palette::mono());
        let Item::Stroke(stroke) = &scene.items()[0] else {
            panic!("expected stroke");
        };
        for p in &stroke.path.points {
            assert!((p.distance(CENTER) - DEFAULT_HOLE).abs() < 1e-9);
        }
    }

    // ---- Palette tests ----

    #[test]
    fn colors_come_from_supplied_palette() {
        let palette = Palette::cool();
        let scene = generate(5, &small(), &palette);
        for item in scene.items() {
            let Item::Stroke(stroke) = item else { continue };
            assert!(palette.colors().contains(&stroke.color));
        }
    }

    #[test]
    fn palette_param_selects_preset() {
        let mut p = small();
        p.insert("palette".to_string(), 3.0);
        let rainbow = Palette::rainbow();
        let scene = generate(5, &p, &Palette::mono());
        for item in scene.items() {
            let Item::Stroke(stroke) = item else { continue };
            assert!(rainbow.colors().contains(&stroke.color));
        }
    }

    // ---- Determinism tests ----

    #[test]
    fn same_seed_same_scene() {
        assert_eq!(
            generate(9, &small(), &Palette::warm()),
            generate(9, &small(), &Palette::warm())
        );
    }

    #[test]
    fn different_seed_different_scene() {
        assert_ne!(
            generate(9, &small(), &Palette::warm()),
            generate(10, &small(), &Palette::warm())
        );
    }
}
