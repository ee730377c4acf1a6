#![deny(unsafe_code)]
//! Engine registry plus everything downstream of a scene: rasterization,
//! fixed-palette quantization, the animation driver, and image writers.
//!
//! This crate sits between `genart-core` (which defines the `Engine` trait)
//! and the individual engine crates (`genart-shapes`, `genart-flow`, etc.).
//! The CLI depends only on this crate and core.

pub mod animate;
pub mod pixel;
pub mod quantize;
pub mod render;
pub mod snapshot;

use genart_core::error::EngineError;
use genart_core::{Engine, Palette, Params, Scene, Xorshift64};
use serde_json::Value;

pub use animate::{run, RunOutput};
pub use render::{render, RenderConfig};

/// All available engine names, in listing order.
const ENGINE_NAMES: &[&str] = &[
    "square",
    "circle",
    "jittersquare",
    "blackhole",
    "flow",
    "flowfield",
    "perlinpearls",
    "swirl",
    "strata",
    "contourlines",
];

/// Enumeration of all available generative art engines.
///
/// Wraps each engine implementation and delegates `Engine` trait methods.
/// Use [`EngineKind::from_name`] for string-based construction (CLI, config).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineKind {
    /// Centered square.
    Square,
    /// Centered polygon circle.
    Circle,
    /// Square with jittered corners.
    JitterSquare,
    /// Noise-perturbed concentric rings.
    Blackhole,
    /// Free curl-noise particles with toroidal wrap.
    Flow,
    /// Directed flow-field polylines.
    FlowField,
    /// Confined curl strands in outlined circles.
    PerlinPearls,
    /// Confined curl strands in a golden-angle spiral of circles.
    Swirl,
    /// Layered midpoint-displaced polygons.
    Strata,
    /// Low-pass random walks stamped with dots.
    ContourLines,
}

impl EngineKind {
    /// Looks an engine up by name.
    ///
    /// Returns `EngineError::UnknownEngine` if the name is not recognized.
    pub fn from_name(name: &str) -> Result<Self, EngineError> {
        match name {
            "square" => Ok(EngineKind::Square),
            "circle" => Ok(EngineKind::Circle),
            "jittersquare" => Ok(EngineKind::JitterSquare),
            "blackhole" => Ok(EngineKind::Blackhole),
            "flow" => Ok(EngineKind::Flow),
            "flowfield" => Ok(EngineKind::FlowField),
            "perlinpearls" => Ok(EngineKind::PerlinPearls),
            "swirl" => Ok(EngineKind::Swirl),
            "strata" => Ok(EngineKind::Strata),
            "contourlines" => Ok(EngineKind::ContourLines),
            _ => Err(EngineError::UnknownEngine(name.to_string())),
        }
    }

    /// Returns a slice of all recognized engine names.
    pub fn list_engines() -> &'static [&'static str] {
        ENGINE_NAMES
    }

    fn inner(&self) -> &'static dyn Engine {
        match self {
            EngineKind::Square => &genart_shapes::Square,
            EngineKind::Circle => &genart_shapes::Circle,
            EngineKind::JitterSquare => &genart_shapes::JitterSquare,
            EngineKind::Blackhole => &genart_blackhole::Blackhole,
            EngineKind::Flow => &genart_flow::Flow,
            EngineKind::FlowField => &genart_flowfield::FlowField,
            EngineKind::PerlinPearls => &genart_perlinpearls::PerlinPearls,
            EngineKind::Swirl => &genart_swirl::Swirl,
            EngineKind::Strata => &genart_strata::Strata,
            EngineKind::ContourLines => &genart_contourlines::ContourLines,
        }
    }
}

impl Engine for EngineKind {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn generate(
        &self,
        rng: &mut Xorshift64,
        params: &Params,
        palette: &Palette,
    ) -> Result<Scene, EngineError> {
        self.inner().generate(rng, params, palette)
    }

    fn param_schema(&self) -> Value {
        self.inner().param_schema()
    }
}
