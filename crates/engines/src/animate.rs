//! Static and animated runs.
//!
//! A static run derives one sub-seed from the root seed and the engine name,
//! generates, and renders. An animated run repeats that per frame with the
//! frame index mixed into the seed, interpolating parameters (and optionally
//! the palette base color) along an eased timeline, then reduces each frame
//! to the shared GIF palette.

use std::collections::BTreeMap;
use std::f64::consts::PI;
use std::path::{Path, PathBuf};

use genart_core::color::lerp;
use genart_core::error::EngineError;
use genart_core::{derive_seed, Config, Engine, Params, Rgba, Xorshift64};
use image::RgbaImage;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::quantize::{quantize, FixedPalette};
use crate::render::{render, RenderConfig};
use crate::snapshot::{frame_log_path, write_frame_log, write_gif, write_png};
use crate::EngineKind;

/// Timeline shaping applied to the raw frame fraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    #[default]
    Linear,
    /// Smooth in and out.
    Cosine,
    /// One full oscillation starting and ending at the midpoint.
    Sin,
}

impl Easing {
    /// Parses an easing name. Unknown names fall back to linear.
    pub fn from_name(name: &str) -> Self {
        match name {
            "cosine" => Easing::Cosine,
            "sin" => Easing::Sin,
            _ => Easing::Linear,
        }
    }

    pub fn apply(self, t: f64) -> f64 {
        match self {
            Easing::Linear => t,
            Easing::Cosine => 0.5 - 0.5 * (t * PI).cos(),
            Easing::Sin => 0.5 + 0.5 * (2.0 * PI * t).sin(),
        }
    }
}

pub fn ease(t: f64, easing: Easing) -> f64 {
    easing.apply(t)
}

/// Upper bound on frames per animation.
pub const MAX_FRAMES: usize = 10_000;

/// Number of frames for `duration` seconds at `fps`, rounded.
///
/// Fewer than two frames is an `EngineError::Animation`: the timeline
/// fraction `f / (n - 1)` needs at least two endpoints. So is anything
/// above [`MAX_FRAMES`].
pub fn frame_count(duration: f64, fps: u32) -> Result<usize, EngineError> {
    let frames = (duration * f64::from(fps)).round();
    if frames.is_nan() || frames <= 1.0 {
        return Err(EngineError::Animation(format!(
            "{duration}s at {fps} fps gives {frames} frames, need at least 2"
        )));
    }
    if frames > MAX_FRAMES as f64 {
        return Err(EngineError::Animation(format!(
            "{duration}s at {fps} fps gives {frames} frames, at most {MAX_FRAMES} allowed"
        )));
    }
    Ok(frames as usize)
}

/// GIF frame delay in hundredths of a second.
pub fn delay_centiseconds(fps: u32) -> u32 {
    100 / fps.max(1)
}

/// Parameters logged for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameLog {
    pub frame: usize,
    pub params: Params,
}

/// One interpolation target of the `vary` section.
#[derive(Debug, Clone, Copy, PartialEq)]
enum VaryRange {
    Scalar(f64, f64),
    Color(Rgba, Rgba),
}

fn color_entry(value: &Value) -> Option<Rgba> {
    let values: Vec<f64> = value
        .as_array()?
        .iter()
        .map(Value::as_f64)
        .collect::<Option<_>>()?;
    match values.as_slice() {
        [r, g, b, ..] => Some(Rgba::rgb(*r, *g, *b)),
        _ => None,
    }
}

/// Reads a `[start, end]` pair. Anything else is skipped.
fn parse_vary(value: &Value) -> Option<VaryRange> {
    let [start, end] = value.as_array()?.as_slice() else {
        return None;
    };
    if let (Some(a), Some(b)) = (start.as_f64(), end.as_f64()) {
        return Some(VaryRange::Scalar(a, b));
    }
    Some(VaryRange::Color(color_entry(start)?, color_entry(end)?))
}

/// Inputs of one frame: its parameters and the palette base color.
///
/// The base color is threaded from frame to frame; a color entry in
/// `vary` replaces it, otherwise it carries over unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameState {
    pub params: Params,
    pub base: Rgba,
}

impl FrameState {
    pub fn new(params: Params, base: Rgba) -> Self {
        Self { params, base }
    }

    /// State at timeline position `t`: `base_params` with every scalar
    /// entry of `vary` interpolated, and the base color updated by any color
    /// entry.
    pub fn at(&self, base_params: &Params, vary: &BTreeMap<String, Value>, t: f64) -> Self {
        let mut next = Self::new(base_params.clone(), self.base);
        for (key, raw) in vary {
            match parse_vary(raw) {
                Some(VaryRange::Scalar(a, b)) => {
                    next.params.insert(key.clone(), lerp(a, b, t));
                }
                Some(VaryRange::Color(a, b)) => next.base = a.lerp(b, t),
                None => debug!(key = %key, "skipping malformed vary entry"),
            }
        }
        next
    }
}

/// Rendered frames of an animated run.
#[derive(Debug, Clone)]
pub struct Animation {
    /// Reduced to the fixed 256-color palette.
    pub frames: Vec<RgbaImage>,
    pub delay_cs: u32,
    /// Empty unless frame logging is enabled.
    pub log: Vec<FrameLog>,
}

/// Generates and renders one image from `config`.
#[tracing::instrument(name = "static", skip_all, fields(engine = engine.name()))]
pub fn render_static(engine: &dyn Engine, config: &Config) -> Result<RgbaImage, EngineError> {
    let palette = config.palette.build()?;
    let seed = derive_seed(config.seed, engine.name(), None);
    let mut rng = Xorshift64::from_seed(seed);
    let scene = engine.generate(&mut rng, &config.params, &palette)?;
    debug!(seed, items = scene.len(), "scene generated");
    render(&scene, &RenderConfig::from_config(config, Some(palette)))
}

/// Generates, renders, and quantizes every frame of `config.animation`.
#[tracing::instrument(name = "animate", skip_all, fields(engine = engine.name()))]
pub fn render_animation(engine: &dyn Engine, config: &Config) -> Result<Animation, EngineError> {
    let anim = config
        .animation
        .as_ref()
        .ok_or_else(|| EngineError::Animation("no animation section in config".into()))?;
    let n = frame_count(anim.duration, anim.fps)?;
    let easing = Easing::from_name(&anim.easing);
    let gif_palette = FixedPalette::new();

    let mut state = FrameState::new(config.params.clone(), config.palette.base);
    let mut frames = Vec::with_capacity(n);
    let mut log = Vec::new();
    for f in 0..n {
        let t = easing.apply(f as f64 / (n - 1) as f64);
        state = state.at(&config.params, &anim.vary, t);
        if anim.log_frames {
            log.push(FrameLog {
                frame: f,
                params: state.params.clone(),
            });
        }

        let palette = config.palette.build_with_base(state.base)?;
        let seed = derive_seed(config.seed, engine.name(), Some(f as u64));
        let scene = engine.generate(&mut Xorshift64::from_seed(seed), &state.params, &palette)?;
        let mut img = render(&scene, &RenderConfig::from_config(config, Some(palette)))?;
        quantize(&mut img, &gif_palette);
        debug!(frame = f, t, items = scene.len(), "frame rendered");
        frames.push(img);
    }

    Ok(Animation {
        frames,
        delay_cs: delay_centiseconds(anim.fps),
        log,
    })
}

/// What a run wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutput {
    pub out: PathBuf,
    pub frames: usize,
    pub frame_log: Option<PathBuf>,
}

/// Validates `config`, runs it, and writes the PNG (static) or GIF plus
/// optional frame log (animated).
#[tracing::instrument(name = "run", skip_all, fields(engine = %config.engine))]
pub fn run(config: &Config) -> Result<RunOutput, EngineError> {
    config.validate(EngineKind::list_engines())?;
    let engine = EngineKind::from_name(&config.engine)?;
    let out = Path::new(&config.out);

    let Some(anim) = &config.animation else {
        let img = render_static(&engine, config)?;
        write_png(&img, out)?;
        return Ok(RunOutput {
            out: out.to_path_buf(),
            frames: 1,
            frame_log: None,
        });
    };

    let animation = render_animation(&engine, config)?;
    let frames = animation.frames.len();
    let frame_log = if anim.log_frames {
        let path = frame_log_path(out);
        write_frame_log(&animation.log, &path)?;
        Some(path)
    } else {
        None
    };
    write_gif(animation.frames, animation.delay_cs, out)?;
    info!(frames, out = %out.display(), "animation complete");
    Ok(RunOutput {
        out: out.to_path_buf(),
        frames,
        frame_log,
    })
}
