//! The core `Engine` trait that every generative engine implements.
//!
//! The trait is object-safe so engines can be used as `dyn Engine` for runtime
//! selection by name.

use serde_json::Value;

use crate::error::EngineError;
use crate::palette::Palette;
use crate::params::Params;
use crate::prng::Xorshift64;
use crate::scene::Scene;

/// Core trait for generative engines.
///
/// `generate` is a pure function of its inputs: it draws every random value
/// from `rng`, reads parameters through [`pick`](crate::params::pick), and
/// returns a [`Scene`] in logical [0, 1]² coordinates. It performs no I/O.
///
/// This trait is **object-safe**: you can use `Box<dyn Engine>` or `&dyn Engine`
/// for runtime polymorphism.
pub trait Engine {
    /// Stable registry name, also the label fed to seed derivation.
    fn name(&self) -> &'static str;

    /// Builds a scene.
    ///
    /// Fails with [`EngineError::InvalidParameter`] when a present parameter
    /// is unusable. Missing parameters take their defaults.
    fn generate(
        &self,
        rng: &mut Xorshift64,
        params: &Params,
        palette: &Palette,
    ) -> Result<Scene, EngineError>;

    /// Schema describing all available parameters, their types and defaults.
    fn param_schema(&self) -> Value;
}
