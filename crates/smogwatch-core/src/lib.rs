//! Trend prediction and anomaly analysis for SmogWatch air-quality readings.
//!
//! This crate is the analysis engine. It takes an ordered window of
//! [`Reading`]s and produces one-hour-ahead forecasts, Z-score anomalies and
//! correlation insights. It does no I/O; history comes from the caller
//! (usually `smogwatch-store`).
//!
//! # Features
//!
//! - **Prediction**: least-squares regression, hour-of-day seasonal factor,
//!   simulated weather adjustment, confidence and risk scoring
//! - **Anomalies**: per-metric Z-scores, top results first
//! - **Correlations**: a fixed insight table or computed Pearson coefficients
//! - **Daily trend**: latest value against the previous day's average
//! - **Validation**: bounds and ordering checks for incoming readings
//!
//! The engine never fails on data. Too little history yields empty results
//! and degenerate windows resolve to fixed fallbacks (zero spread reports no
//! anomalies, zero mean gives the lowest confidence). Only constructing an
//! engine from a bad configuration returns [`Error`].
//!
//! # Quick Start
//!
//! ```
//! use smogwatch_core::{Analyzer, PredictorConfig};
//! use smogwatch_core::weather::SimulatedWeather;
//! use smogwatch_types::Reading;
//!
//! let history: Vec<Reading> = (0..24)
//!     .map(|i| Reading {
//!         timestamp: 1_700_000_000_000 + i * 3_600_000,
//!         aqi: 45 + (i % 5) as u32,
//!         pm25: 12.0,
//!         pm10: 25.0,
//!         co2: 420.0 + i as f64,
//!     })
//!     .collect();
//!
//! let mut analyzer = Analyzer::new(PredictorConfig::default())?
//!     .with_weather(SimulatedWeather::seeded(42));
//! let report = analyzer.analyze(&history);
//!
//! for prediction in &report.predictions {
//!     println!("{}: {} -> {} ({})", prediction.metric, prediction.current_value,
//!         prediction.predicted_value, prediction.trend);
//! }
//! # Ok::<(), smogwatch_core::Error>(())
//! ```

pub mod analysis;
pub mod anomaly;
pub mod correlation;
pub mod error;
pub mod predict;
pub mod scoring;
pub mod seasonal;
pub mod stats;
pub mod thresholds;
pub mod trend;
pub mod validation;
pub mod weather;

pub use smogwatch_types as types;
pub use smogwatch_types::Reading;

pub use analysis::{AnalysisReport, Analyzer};
pub use anomaly::{AnomalyDetector, detect_anomalies};
pub use correlation::{CorrelationMode, analyze_correlations};
pub use error::{Error, Result};
pub use predict::{Clock, FixedClock, Predictor, PredictorConfig, SystemClock, generate_predictions};
pub use scoring::{calculate_confidence, recommendation};
pub use seasonal::SeasonalModel;
pub use thresholds::{RiskThresholds, ThresholdTable};
pub use trend::daily_trend;
pub use validation::{ReadingValidator, ValidationResult, ValidationWarning};
pub use weather::{FixedWeather, SimulatedWeather, WeatherSource};
