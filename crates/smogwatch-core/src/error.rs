//! Error types for smogwatch-core.
//!
//! The analysis functions themselves never fail: insufficient data produces
//! empty results and degenerate input resolves to documented fallback values.
//! Errors only arise when building an engine from an invalid configuration.

use thiserror::Error;

/// Errors that can occur when configuring the analysis engine.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias using smogwatch-core's Error type.
pub type Result<T> = std::result::Result<T, Error>;
