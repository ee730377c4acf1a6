//! Reproducible run configuration.
//!
//! A [`Config`] captures everything needed to recreate an image or an
//! animation: engine name, canvas size, output path, root seed, background,
//! palette recipe, parameter overrides, render settings, and an optional
//! animation section. It is both the input of a run and what a run reports.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::color::Rgba;
use crate::error::EngineError;
use crate::palette::{Palette, PaletteKind};
use crate::params::Params;

/// A full run configuration. Missing fields take their defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub engine: String,
    pub width: i64,
    pub height: i64,
    pub out: String,
    pub seed: i64,
    #[serde(rename = "bg")]
    pub background: Rgba,
    pub palette: PaletteSpec,
    pub params: Params,
    pub render: RenderSettings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation: Option<AnimationSpec>,
}

/// How to build the palette handed to the engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PaletteSpec {
    #[serde(rename = "type")]
    pub kind: String,
    pub base: Rgba,
    pub n: usize,
}

/// Rasterization settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderSettings {
    pub margin: f64,
    pub supersample: u32,
}

/// Animation section. Its presence switches a run from PNG to GIF.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnimationSpec {
    /// Seconds.
    pub duration: f64,
    pub fps: u32,
    /// Parameter (or color) name to a `[start, end]` pair.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub vary: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub easing: String,
    #[serde(default)]
    pub log_frames: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            engine: String::new(),
            width: 1000,
            height: 1000,
            out: "out.png".to_string(),
            seed: 42,
            background: Rgba::WHITE,
            palette: PaletteSpec::default(),
            params: Params::new(),
            render: RenderSettings::default(),
            animation: None,
        }
    }
}

impl Default for PaletteSpec {
    fn default() -> Self {
        Self {
            kind: "mono".to_string(),
            base: Rgba::rgb(0.2, 0.4, 0.8),
            n: 5,
        }
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            margin: 0.05,
            supersample: 1,
        }
    }
}

impl PaletteSpec {
    pub fn kind(&self) -> Result<PaletteKind, EngineError> {
        self.kind.parse()
    }

    /// Generates the palette from `base`, which may differ from the
    /// configured base while an animation varies it.
    pub fn build_with_base(&self, base: Rgba) -> Result<Palette, EngineError> {
        Ok(Palette::generate(self.kind()?, base, self.n))
    }

    pub fn build(&self) -> Result<Palette, EngineError> {
        self.build_with_base(self.base)
    }
}

impl Config {
    /// Creates a config for `engine` with every other field at its default.
    pub fn new(engine: &str) -> Self {
        Self {
            engine: engine.to_string(),
            ..Self::default()
        }
    }

    /// Parses a config from raw JSON (input starting with `{`) or from the
    /// JSON file at the given path.
    pub fn load(input: &str) -> Result<Self, EngineError> {
        if input.trim_start().starts_with('{') {
            return Self::from_json(input);
        }
        let text = std::fs::read_to_string(Path::new(input))
            .map_err(|e| EngineError::Io(format!("{input}: {e}")))?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, EngineError> {
        serde_json::from_str(text).map_err(|e| EngineError::InvalidConfig(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String, EngineError> {
        serde_json::to_string_pretty(self).map_err(|e| EngineError::InvalidConfig(e.to_string()))
    }

    /// Rejects configs that cannot run, before any work is done.
    ///
    /// `engines` lists the registered engine names.
    pub fn validate(&self, engines: &[&str]) -> Result<(), EngineError> {
        if !engines.contains(&self.engine.as_str()) {
            return Err(EngineError::UnknownEngine(self.engine.clone()));
        }
        self.palette.kind()?;
        if self.width <= 0 || self.height <= 0 {
            return Err(EngineError::InvalidDimensions);
        }
        if self.out.trim().is_empty() {
            return Err(EngineError::InvalidConfig(
                "output path cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn is_animated(&self) -> bool {
        self.animation.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ENGINES: &[&str] = &["square", "flow"];

    #[test]
    fn new_creates_config_with_defaults() {
        let c = Config::new("square");
        assert_eq!(c.engine, "square");
        assert_eq!(c.width, 1000);
        assert_eq!(c.height, 1000);
        assert_eq!(c.out, "out.png");
        assert_eq!(c.seed, 42);
        assert_eq!(c.background, Rgba::WHITE);
        assert_eq!(c.palette.kind, "mono");
        assert_eq!(c.palette.n, 5);
        assert_eq!(c.render.margin, 0.05);
        assert_eq!(c.render.supersample, 1);
        assert!(c.params.is_empty());
        assert!(!c.is_animated());
    }

    #[test]
    fn json_round_trip_with_defaults() {
        let original = Config::new("flow");
        let text = original.to_json_pretty().unwrap();
        let restored = Config::from_json(&text).unwrap();
        assert_eq!(original, restored);
    }

    #[test]
    fn json_uses_wire_names() {
        let v = serde_json::to_value(Config::new("flow")).unwrap();
        assert!(v.get("bg").is_some());
        assert_eq!(v["palette"]["type"], "mono");
        assert_eq!(v["bg"], json!([1.0, 1.0, 1.0, 1.0]));
        assert!(v.get("animation").is_none());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let c = Config::from_json(r#"{"engine": "flow", "params": {"dots": 10}}"#).unwrap();
        assert_eq!(c.engine, "flow");
        assert_eq!(c.width, 1000);
        assert_eq!(c.params["dots"], 10.0);
        assert_eq!(c.palette, PaletteSpec::default());
    }

    #[test]
    fn animation_section_parses() {
        let c = Config::from_json(
            r#"{
                "engine": "flow",
                "bg": {"R": 0, "G": 0, "B": 0, "A": 1},
                "animation": {
                    "duration": 2.0,
                    "fps": 10,
                    "vary": {"step": [0.001, 0.01], "base": [[1,0,0],[0,0,1]]},
                    "easing": "cosine",
                    "log_frames": true
                }
            }"#,
        )
        .unwrap();
        assert_eq!(c.background, Rgba::BLACK);
        let anim = c.animation.unwrap();
        assert_eq!(anim.fps, 10);
        assert_eq!(anim.easing, "cosine");
        assert!(anim.log_frames);
        assert_eq!(anim.vary.len(), 2);
    }

    #[test]
    fn malformed_json_is_invalid_config() {
        assert!(matches!(
            Config::from_json("{not json"),
            Err(EngineError::InvalidConfig(_))
        ));
    }

    // -- load --

    #[test]
    fn load_accepts_raw_json() {
        let c = Config::load(r#"  {"engine": "square", "width": 64}"#).unwrap();
        assert_eq!(c.width, 64);
    }

    #[test]
    fn load_reads_file_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        std::fs::write(&path, r#"{"engine": "square", "seed": 7}"#).unwrap();
        let c = Config::load(path.to_str().unwrap()).unwrap();
        assert_eq!(c.seed, 7);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        assert!(matches!(
            Config::load(path.to_str().unwrap()),
            Err(EngineError::Io(_))
        ));
    }

    // -- validate --

    #[test]
    fn validate_succeeds_for_default_config() {
        assert!(Config::new("square").validate(ENGINES).is_ok());
    }

    #[test]
    fn validate_rejects_unknown_engine() {
        let err = Config::new("nope").validate(ENGINES).unwrap_err();
        assert!(matches!(err, EngineError::UnknownEngine(ref n) if n == "nope"));
    }

    #[test]
    fn validate_rejects_unknown_palette_type() {
        let mut c = Config::new("square");
        c.palette.kind = "plaid".to_string();
        assert!(matches!(
            c.validate(ENGINES),
            Err(EngineError::UnknownPalette(_))
        ));
    }

    #[test]
    fn validate_rejects_non_positive_dimensions() {
        let mut c = Config::new("square");
        c.width = 0;
        assert!(matches!(
            c.validate(ENGINES),
            Err(EngineError::InvalidDimensions)
        ));
        c.width = 10;
        c.height = -5;
        assert!(matches!(
            c.validate(ENGINES),
            Err(EngineError::InvalidDimensions)
        ));
    }

    #[test]
    fn validate_rejects_empty_output() {
        let mut c = Config::new("square");
        c.out = "  ".to_string();
        assert!(matches!(
            c.validate(ENGINES),
            Err(EngineError::InvalidConfig(_))
        ));
    }

    // -- palette --

    #[test]
    fn palette_spec_builds_configured_kind() {
        let spec = PaletteSpec {
            kind: "split".to_string(),
            base: Rgba::rgb(0.9, 0.1, 0.1),
            n: 6,
        };
        assert_eq!(
            spec.build().unwrap(),
            Palette::split_complementary(Rgba::rgb(0.9, 0.1, 0.1), 6)
        );
    }

    #[test]
    fn palette_spec_with_overridden_base() {
        let spec = PaletteSpec::default();
        let red = Rgba::rgb(1.0, 0.0, 0.0);
        assert_eq!(
            spec.build_with_base(red).unwrap(),
            Palette::monochrome(red, 5)
        );
    }
}
