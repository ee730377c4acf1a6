#![deny(unsafe_code)]
//! Primitive shape engines: a square, a circle, and a square with jittered
//! corners.
//!
//! These draw a single filled shape with a dark outline at the canvas
//! center. They ignore the palette and are mostly useful for checking the
//! render pipeline end to end.

use genart_core::error::EngineError;
use genart_core::geom::{self, Vec2};
use genart_core::params::{pick, pick_int, require_non_negative, Params};
use genart_core::{Engine, Palette, Rgba, Scene, Xorshift64};
use serde_json::{json, Value};

/// Default square side.
const DEFAULT_SIZE: f64 = 0.6;
/// Default outline width.
const DEFAULT_LINE_WIDTH: f64 = 0.003;
/// Default circle radius.
const DEFAULT_RADIUS: f64 = 0.3;
/// Default circle segment count.
const DEFAULT_SEGMENTS: i64 = 128;
/// Requested segment counts below this are raised to it.
const MIN_SEGMENTS: i64 = 8;
/// Requested segment counts above this are lowered to it.
const MAX_SEGMENTS: i64 = 4096;
/// Default corner jitter.
const DEFAULT_JITTER: f64 = 0.02;

const SQUARE_FILL: Rgba = Rgba::rgb(0.9, 0.2, 0.2);
const SQUARE_STROKE: Rgba = Rgba::rgb(0.1, 0.1, 0.1);
const CIRCLE_FILL: Rgba = Rgba::new(0.2, 0.5, 0.9, 0.9);
const CIRCLE_STROKE: Rgba = Rgba::rgb(0.05, 0.05, 0.05);
const JITTER_FILL: Rgba = Rgba::new(0.8, 0.4, 0.2, 0.9);

/// Fill then outline the same closed path.
fn outlined(points: Vec<Vec2>, fill: Rgba, fill_alpha: f64, stroke: Rgba, lw: f64) -> Scene {
    let mut scene = Scene::new();
    scene.add_fill(points.clone(), fill, fill_alpha);
    scene.add_stroke(points, true, lw, stroke, 1.0);
    scene
}

fn line_width(engine: &str, params: &Params) -> Result<f64, EngineError> {
    let lw = pick(params, "lw", DEFAULT_LINE_WIDTH);
    require_non_negative(engine, "lw", lw)?;
    Ok(lw)
}

/// A centered square.
pub struct Square;

impl Engine for Square {
    fn name(&self) -> &'static str {
        "square"
    }

    #[tracing::instrument(name = "square", skip_all)]
    fn generate(
        &self,
        _rng: &mut Xorshift64,
        params: &Params,
        _palette: &Palette,
    ) -> Result<Scene, EngineError> {
        let size = pick(params, "size", DEFAULT_SIZE);
        let lw = line_width(self.name(), params)?;
        let path = geom::square(0.5, 0.5, size);
        Ok(outlined(path.points, SQUARE_FILL, 1.0, SQUARE_STROKE, lw))
    }

    fn param_schema(&self) -> Value {
        json!({
            "size": {
                "type": "number",
                "default": DEFAULT_SIZE,
                "description": "Side length in logical units"
            },
            "lw": {
                "type": "number",
                "default": DEFAULT_LINE_WIDTH,
                "min": 0.0,
                "description": "Outline width as a fraction of the short image side"
            }
        })
    }
}

/// A centered circle.
pub struct Circle;

impl Engine for Circle {
    fn name(&self) -> &'static str {
        "circle"
    }

    #[tracing::instrument(name = "circle", skip_all)]
    fn generate(
        &self,
        _rng: &mut Xorshift64,
        params: &Params,
        _palette: &Palette,
    ) -> Result<Scene, EngineError> {
        let radius = pick(params, "radius", DEFAULT_RADIUS);
        let segments =
            pick_int(params, "segments", DEFAULT_SEGMENTS).clamp(MIN_SEGMENTS, MAX_SEGMENTS);
        let lw = line_width(self.name(), params)?;
        let path = geom::circle(0.5, 0.5, radius, segments as usize);
        Ok(outlined(path.points, CIRCLE_FILL, 0.9, CIRCLE_STROKE, lw))
    }

    fn param_schema(&self) -> Value {
        json!({
            "radius": {
                "type": "number",
                "default": DEFAULT_RADIUS,
                "description": "Radius in logical units"
            },
            "segments": {
                "type": "integer",
                "default": DEFAULT_SEGMENTS,
                "min": MIN_SEGMENTS,
                "max": MAX_SEGMENTS,
                "description": "Polygon segments (at least 64 are drawn)"
            },
            "lw": {
                "type": "number",
                "default": DEFAULT_LINE_WIDTH,
                "min": 0.0,
                "description": "Outline width as a fraction of the short image side"
            }
        })
    }
}

/// A centered square whose corners are each nudged by up to `jitter`.
pub struct JitterSquare;

impl Engine for JitterSquare {
    fn name(&self) -> &'static str {
        "jittersquare"
    }

    #[tracing::instrument(name = "jittersquare", skip_all)]
    fn generate(
        &self,
        rng: &mut Xorshift64,
        params: &Params,
        _palette: &Palette,
    ) -> Result<Scene, EngineError> {
        let size = pick(params, "size", DEFAULT_SIZE);
        let lw = line_width(self.name(), params)?;
        let jitter = pick(params, "jitter", DEFAULT_JITTER);

        let points = geom::square(0.5, 0.5, size)
            .points
            .into_iter()
            .map(|p| {
                let jx = rng.next_signed() * jitter;
                let jy = rng.next_signed() * jitter;
                p + Vec2::new(jx, jy)
            })
            .collect();
        Ok(outlined(points, JITTER_FILL, 0.9, Rgba::BLACK, lw))
    }

    fn param_schema(&self) -> Value {
        json!({
            "size": {
                "type": "number",
                "default": DEFAULT_SIZE,
                "description": "Side length before jitter"
            },
            "lw": {
                "type": "number",
                "default": DEFAULT_LINE_WIDTH,
                "min": 0.0,
                "description": "Outline width as a fraction of the short image side"
            },
            "jitter": {
                "type": "number",
                "default": DEFAULT_JITTER,
                "description": "Maximum per-axis corner displacement"
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use genart_core::{Item, Path};

    fn generate(engine: &dyn Engine, seed: u64, params: &Params) -> Scene {
        engine
            .generate(&mut Xorshift64::new(seed), params, &Palette::mono())
            .unwrap()
    }

    fn params(pairs: &[(&str, f64)]) -> Params {
        pairs.iter().map(|&(k, v)| (k.to_string(), v)).collect()
    }

    fn fill_path(scene: &Scene) -> &Path {
        match &scene.items()[0] {
            Item::Fill(fill) => &fill.polygon,
            other => panic!("expected Fill first, got {other:?}"),
        }
    }

    // ---- Square tests ----

    #[test]
    fn square_is_fill_then_closed_stroke() {
        let scene = generate(&Square, 1, &Params::new());
        assert_eq!(scene.len(), 2);
        match (&scene.items()[0], &scene.items()[1]) {
            (Item::Fill(fill), Item::Stroke(stroke)) => {
                assert_eq!(fill.color, SQUARE_FILL);
                assert_eq!(fill.alpha, 1.0);
                assert!(stroke.path.closed);
                assert_eq!(stroke.width, DEFAULT_LINE_WIDTH);
                assert_eq!(stroke.path.points, fill.polygon.points);
            }
            other => panic!("unexpected items {other:?}"),
        }
    }

    #[test]
    fn square_respects_size() {
        let scene = generate(&Square, 1, &params(&[("size", 0.2)]));
        let pts = &fill_path(&scene).points;
        assert!((pts[0].x - 0.4).abs() < 1e-12);
        assert!((pts[2].x - 0.6).abs() < 1e-12);
    }

    #[test]
    fn negative_line_width_is_rejected() {
        let engines: [&dyn Engine; 3] = [&Square, &Circle, &JitterSquare];
        for engine in engines {
            let err = engine
                .generate(&mut Xorshift64::new(1), &params(&[("lw", -0.1)]), &Palette::mono())
                .unwrap_err();
            assert!(
                matches!(err, EngineError::InvalidParameter { ref name, .. } if name == "lw"),
                "{}: {err}",
                engine.name()
            );
        }
    }

    // ---- Circle tests ----

    #[test]
    fn circle_uses_requested_segments() {
        let scene = generate(&Circle, 1, &Params::new());
        assert_eq!(fill_path(&scene).len(), 128);
    }

    #[test]
    fn circle_never_drops_below_geometry_minimum() {
        let scene = generate(&Circle, 1, &params(&[("segments", 3.0)]));
        assert_eq!(fill_path(&scene).len(), geom::MIN_CIRCLE_SEGMENTS);
    }

    #[test]
    fn circle_segments_are_capped() {
        let scene = generate(&Circle, 1, &params(&[("segments", 1e30)]));
        assert_eq!(fill_path(&scene).len(), MAX_SEGMENTS as usize);
    }

    #[test]
    fn circle_fill_is_translucent_blue() {
        let scene = generate(&Circle, 1, &Params::new());
        let Item::Fill(fill) = &scene.items()[0] else {
            panic!("expected fill");
        };
        assert_eq!(fill.alpha, 0.9);
        assert_eq!(fill.color, CIRCLE_FILL);
    }

    // ---- JitterSquare tests ----

    #[test]
    fn jitter_stays_within_bound() {
        let scene = generate(&JitterSquare, 99, &params(&[("jitter", 0.05)]));
        let base = geom::square(0.5, 0.5, DEFAULT_SIZE);
        for (p, q) in fill_path(&scene).points.iter().zip(&base.points) {
            assert!((p.x - q.x).abs() <= 0.05 + 1e-12);
            assert!((p.y - q.y).abs() <= 0.05 + 1e-12);
        }
    }

    #[test]
    fn zero_jitter_is_a_plain_square() {
        let scene = generate(&JitterSquare, 5, &params(&[("jitter", 0.0)]));
        assert_eq!(fill_path(&scene).points, geom::square(0.5, 0.5, DEFAULT_SIZE).points);
    }

    #[test]
    fn jittersquare_depends_on_seed() {
        let a = generate(&JitterSquare, 1, &Params::new());
        let b = generate(&JitterSquare, 2, &Params::new());
        assert_ne!(a, b);
        assert_eq!(a, generate(&JitterSquare, 1, &Params::new()));
    }

    // ---- Schema tests ----

    #[test]
    fn schemas_describe_every_parameter() {
        let cases: [(&dyn Engine, &[&str]); 3] = [
            (&Square, &["size", "lw"]),
            (&Circle, &["radius", "segments", "lw"]),
            (&JitterSquare, &["size", "lw", "jitter"]),
        ];
        for (engine, keys) in cases {
            let schema = engine.param_schema();
            for key in keys {
                assert!(schema[key].get("default").is_some(), "{}: {key}", engine.name());
            }
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn jittersquare_always_has_four_corners(seed: u64, jitter in 0.0_f64..0.2) {
                let scene = generate(&JitterSquare, seed, &params(&[("jitter", jitter)]));
                prop_assert_eq!(scene.len(), 2);
                prop_assert_eq!(fill_path(&scene).len(), 4);
            }
        }
    }
}
