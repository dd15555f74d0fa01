//! Shared data model for SmogWatch air-quality monitoring.
//!
//! This crate provides the canonical reading shape and the analysis result
//! types exchanged between the analysis engine (smogwatch-core), the
//! reading store (smogwatch-store) and the presentation layers.
//!
//! # Features
//!
//! - [`Reading`]: one time-stamped sample of AQI, PM2.5, PM10 and CO2
//! - [`Metric`]: the tracked pollutants and their labels
//! - [`TrendPrediction`], [`Anomaly`], [`CorrelationInsight`], [`DailyTrend`]:
//!   analysis outputs
//! - Optional serde support (enabled by default)
//!
//! # Example
//!
//! ```
//! use smogwatch_types::{Metric, Reading};
//!
//! let reading = Reading { timestamp: 1_700_000_000_000, aqi: 42, co2: 415.0, ..Default::default() };
//! assert_eq!(reading.value(Metric::Aqi), 42.0);
//! assert_eq!(reading.value(Metric::Pm25), 0.0);
//! ```

pub mod error;
pub mod types;

pub use error::{ParseError, ParseResult};
pub use types::{
    Anomaly, CorrelationInsight, DailyTrend, Metric, PREDICTION_TIMEFRAME, Reading, RiskLevel,
    Severity, Trend, TrendPrediction, WeatherFactor, series,
};
