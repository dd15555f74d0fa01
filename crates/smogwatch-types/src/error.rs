//! Error types for smogwatch-types.

use thiserror::Error;

/// Errors that can occur when parsing SmogWatch names and labels.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// The metric name is not one of the tracked pollutants.
    #[error("Unknown metric: '{0}' (expected one of aqi, pm25, pm10, co2)")]
    UnknownMetric(String),

    /// The risk level name is not one of the four tiers.
    #[error("Unknown risk level: '{0}'")]
    UnknownRiskLevel(String),
}

/// Result type alias using smogwatch-types' ParseError type.
pub type ParseResult<T> = std::result::Result<T, ParseError>;
