//! Error types for the genart core.

use thiserror::Error;

/// Errors produced by configuration, generation, rendering, and animation.
///
/// Every error is final: all operations are pure and deterministic, so
/// retrying with the same inputs cannot succeed.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Width or height was zero or negative (or too large to allocate).
    #[error("invalid dimensions: width and height must be > 0")]
    InvalidDimensions,

    /// An engine rejected one of its numeric parameters.
    #[error("{engine}: invalid {name} {value} ({reason})")]
    InvalidParameter {
        engine: String,
        name: String,
        value: f64,
        reason: String,
    },

    /// The requested engine name is not registered.
    #[error("unknown engine: {0}")]
    UnknownEngine(String),

    /// The requested palette type is not one of the known generation modes.
    #[error("unknown palette type: {0}")]
    UnknownPalette(String),

    /// A color could not be decoded.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// A palette could not be constructed from the given colors.
    #[error("invalid palette: {0}")]
    InvalidPalette(String),

    /// The run configuration is malformed or incomplete.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// The animation section is missing or describes too few frames.
    #[error("animation: {0}")]
    Animation(String),

    /// Reading or writing a file failed.
    #[error("io: {0}")]
    Io(String),
}
