//! Error types for configuration and the rendering host.
//!
//! Neither the pool nor the coordinator has recoverable errors of its own; a
//! torn active/inactive partition is a logic bug and panics instead.

use thiserror::Error;

/// A rejected [`SquaresConfig`](crate::config::SquaresConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("`{name}` must be greater than zero (got {value})")]
    NonPositive { name: &'static str, value: f64 },

    #[error("`{name}` must not be negative (got {value})")]
    Negative { name: &'static str, value: f64 },

    #[error("`{name}` has min {min} greater than max {max}")]
    InvertedRange { name: &'static str, min: f64, max: f64 },

    #[error("`{name}` must lie within [0, 1] (got {value})")]
    OutOfUnitRange { name: &'static str, value: f64 },

    #[error("`colorClasses` must name at least one class")]
    NoColorClasses,
}

/// Failure reported by an [`AnimationHost`](crate::lifecycle::AnimationHost).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("no window")]
    NoWindow,

    #[error("no document")]
    NoDocument,

    #[error("document has no body")]
    NoBody,

    /// An exception thrown by the browser, stringified.
    #[error("js: {0}")]
    Js(String),
}
