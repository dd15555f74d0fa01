//! Z-score anomaly detection.
//!
//! Each metric's window mean and population standard deviation are
//! computed; readings whose absolute Z-score exceeds the threshold are
//! reported, most extreme first.

use std::cmp::Ordering;

use tracing::debug;

use smogwatch_types::{Anomaly, Metric, Reading, Severity, series};

use crate::error::{Error, Result};
use crate::stats::{mean, round_to, std_dev};

/// Fewest readings for which anomalies are reported.
pub const MIN_ANOMALY_SAMPLES: usize = 10;
/// Default Z-score threshold.
pub const DEFAULT_THRESHOLD: f64 = 2.5;
/// Default number of anomalies returned.
pub const DEFAULT_MAX_RESULTS: usize = 5;
/// Multiple of the threshold above which an anomaly is severe.
pub const SEVERE_MULTIPLIER: f64 = 1.5;

/// Detects outliers across the tracked metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct AnomalyDetector {
    threshold: f64,
    max_results: usize,
    metrics: Vec<Metric>,
}

impl Default for AnomalyDetector {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            max_results: DEFAULT_MAX_RESULTS,
            metrics: Metric::ALL.to_vec(),
        }
    }
}

impl AnomalyDetector {
    /// Detector with a custom Z-score threshold.
    ///
    /// The threshold must be finite and positive.
    pub fn new(threshold: f64) -> Result<Self> {
        Self::default().with_threshold(threshold)
    }

    /// Replace the Z-score threshold.
    pub fn with_threshold(mut self, threshold: f64) -> Result<Self> {
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "anomaly threshold must be a positive number (got {threshold})"
            )));
        }
        self.threshold = threshold;
        Ok(self)
    }

    /// Limit the number of anomalies returned.
    #[must_use]
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Restrict detection to `metrics`.
    #[must_use]
    pub fn with_metrics(mut self, metrics: impl Into<Vec<Metric>>) -> Self {
        self.metrics = metrics.into();
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Find the most extreme readings in `history`.
    pub fn detect(&self, history: &[Reading]) -> Vec<Anomaly> {
        if history.len() < MIN_ANOMALY_SAMPLES {
            return Vec::new();
        }

        // (unrounded z, anomaly)
        let mut found: Vec<(f64, Anomaly)> = Vec::new();

        for &metric in &self.metrics {
            let values = series(history, metric);
            let mean = mean(&values);
            let sd = std_dev(&values);
            if sd == 0.0 || !sd.is_finite() {
                debug!(metric = metric.key(), "Zero spread, no anomalies possible");
                continue;
            }

            for (reading, &value) in history.iter().zip(&values) {
                let z = ((value - mean) / sd).abs();
                if z > self.threshold {
                    let severity = if z > self.threshold * SEVERE_MULTIPLIER {
                        Severity::Severe
                    } else {
                        Severity::Moderate
                    };
                    found.push((
                        z,
                        Anomaly {
                            timestamp: reading.timestamp,
                            metric: metric.label().to_string(),
                            value,
                            zscore: round_to(z, 2),
                            severity,
                        },
                    ));
                }
            }
        }

        found.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
        found.truncate(self.max_results);

        debug!(count = found.len(), threshold = self.threshold, "Anomaly scan complete");
        found.into_iter().map(|(_, anomaly)| anomaly).collect()
    }
}

/// Detect anomalies across all metrics with the given threshold.
///
/// Thresholds that are not positive fall back to [`DEFAULT_THRESHOLD`].
pub fn detect_anomalies(history: &[Reading], threshold: f64) -> Vec<Anomaly> {
    AnomalyDetector::new(threshold)
        .unwrap_or_default()
        .detect(history)
}
