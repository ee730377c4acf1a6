#![deny(unsafe_code)]
//! Core types and traits for the genart procedural image generator.
//!
//! Provides the `Engine` trait, the `Scene`/`Item`/`Path` drawing model,
//! `Rgba` color with HSL conversion, `Palette` generators and presets,
//! deterministic seeding (`derive_seed`, `Xorshift64`), scalar noise fields
//! with gradient and curl operators, particle advection helpers, parameter
//! helpers, and the run `Config`.

pub mod color;
pub mod config;
pub mod engine;
pub mod error;
pub mod field;
pub mod geom;
pub mod palette;
pub mod params;
pub mod particle;
pub mod prng;
pub mod scene;
pub mod seed;

pub use color::Rgba;
pub use config::{AnimationSpec, Config, PaletteSpec, RenderSettings};
pub use engine::Engine;
pub use error::EngineError;
pub use geom::Vec2;
pub use palette::{Palette, PaletteKind};
pub use params::{pick, pick_int, Params};
pub use prng::Xorshift64;
pub use scene::{Fill, Item, Path, Scene, Stroke};
pub use seed::derive_seed;
