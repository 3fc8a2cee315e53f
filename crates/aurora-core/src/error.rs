use thiserror::Error;

/// Rejected configuration, reported once when a manager or lab is built.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("particle_count must be at least 1")]
    ZeroParticles,
    #[error("{field} must be positive (got {value})")]
    NonPositive { field: &'static str, value: f32 },
    #[error("{field} must be finite")]
    NonFinite { field: &'static str },
    #[error("{field} range is inverted ({min} > {max})")]
    InvertedRange {
        field: &'static str,
        min: f32,
        max: f32,
    },
}

/// A view name from the debug console didn't match any camera view.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown camera view `{0}`")]
pub struct UnknownView(pub String);
