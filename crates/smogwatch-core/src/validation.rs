//! Data validation and bounds checking for readings.
//!
//! The analysis functions tolerate odd input, but readings with negative or
//! non-finite values are rejected before they reach the store, and ordering
//! problems in a history window are surfaced as warnings.
//!
//! # Example
//!
//! ```
//! use smogwatch_core::ReadingValidator;
//! use smogwatch_types::Reading;
//!
//! let validator = ReadingValidator::default();
//!
//! let reading = Reading { timestamp: 1_700_000_000_000, aqi: 42, pm25: 12.0, pm10: 20.0, co2: 415.0 };
//! let result = validator.validate(&reading);
//! assert!(result.is_valid);
//! assert!(!result.has_warnings());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use smogwatch_types::{Metric, Reading};

/// Warning types for validation issues.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ValidationWarning {
    /// A metric value is below zero.
    NegativeValue { metric: Metric, value: f64 },
    /// A metric value is NaN or infinite.
    NonFiniteValue { metric: Metric },
    /// A metric value is above its plausible maximum.
    ValueTooHigh { metric: Metric, value: f64, max: f64 },
    /// Every metric is zero, which usually means a sensor fault.
    AllZeros,
    /// A reading is older than the one before it.
    OutOfOrder { index: usize, timestamp: i64, previous: i64 },
    /// Two consecutive readings share a timestamp.
    DuplicateTimestamp { index: usize, timestamp: i64 },
}

impl ValidationWarning {
    /// Whether this warning makes a reading unusable.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ValidationWarning::NegativeValue { .. } | ValidationWarning::NonFiniteValue { .. }
        )
    }
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationWarning::NegativeValue { metric, value } => {
                write!(f, "{} value {} is negative", metric, value)
            }
            ValidationWarning::NonFiniteValue { metric } => {
                write!(f, "{} value is not a finite number", metric)
            }
            ValidationWarning::ValueTooHigh { metric, value, max } => {
                write!(f, "{} value {} exceeds maximum {}", metric, value, max)
            }
            ValidationWarning::AllZeros => {
                write!(f, "All readings are zero - possible sensor error")
            }
            ValidationWarning::OutOfOrder {
                index,
                timestamp,
                previous,
            } => write!(
                f,
                "Reading {} at {} is older than the previous reading at {}",
                index, timestamp, previous
            ),
            ValidationWarning::DuplicateTimestamp { index, timestamp } => {
                write!(f, "Reading {} repeats timestamp {}", index, timestamp)
            }
        }
    }
}

/// Result of validating a reading or a series.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    /// Whether the input passed validation.
    pub is_valid: bool,
    /// List of warnings (may be non-empty even if valid).
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    fn from_warnings(warnings: Vec<ValidationWarning>) -> Self {
        Self {
            is_valid: !warnings.iter().any(ValidationWarning::is_fatal),
            warnings,
        }
    }

    /// Check if there are any warnings.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Plausible upper bounds per metric.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatorConfig {
    /// Maximum expected AQI.
    pub aqi_max: f64,
    /// Maximum expected PM2.5 (µg/m³).
    pub pm25_max: f64,
    /// Maximum expected PM10 (µg/m³).
    pub pm10_max: f64,
    /// Maximum expected CO2 (ppm).
    pub co2_max: f64,
    /// Warn when every metric is zero.
    pub warn_on_all_zeros: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            aqi_max: 500.0, // top of the AQI scale
            pm25_max: 1000.0,
            pm10_max: 2000.0,
            co2_max: 10_000.0,
            warn_on_all_zeros: true,
        }
    }
}

impl ValidatorConfig {
    /// Upper bound for `metric`.
    pub fn max_for(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Aqi => self.aqi_max,
            Metric::Pm25 => self.pm25_max,
            Metric::Pm10 => self.pm10_max,
            Metric::Co2 => self.co2_max,
        }
    }

    /// Set whether to warn on all zeros.
    #[must_use]
    pub fn warn_on_all_zeros(mut self, warn: bool) -> Self {
        self.warn_on_all_zeros = warn;
        self
    }
}

/// Validator for readings and reading series.
#[derive(Debug, Clone, Default)]
pub struct ReadingValidator {
    config: ValidatorConfig,
}

impl ReadingValidator {
    /// Create a new validator with the given configuration.
    pub fn new(config: ValidatorConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validate a single reading.
    pub fn validate(&self, reading: &Reading) -> ValidationResult {
        ValidationResult::from_warnings(self.reading_warnings(reading))
    }

    fn reading_warnings(&self, reading: &Reading) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        if self.config.warn_on_all_zeros
            && Metric::ALL.iter().all(|&m| reading.value(m) == 0.0)
        {
            warnings.push(ValidationWarning::AllZeros);
            return warnings;
        }

        for metric in Metric::ALL {
            let value = reading.value(metric);
            if !value.is_finite() {
                warnings.push(ValidationWarning::NonFiniteValue { metric });
            } else if value < 0.0 {
                warnings.push(ValidationWarning::NegativeValue { metric, value });
            } else {
                let max = self.config.max_for(metric);
                if value > max {
                    warnings.push(ValidationWarning::ValueTooHigh { metric, value, max });
                }
            }
        }

        warnings
    }

    /// Validate a history window: every reading, plus timestamp ordering.
    pub fn validate_series(&self, history: &[Reading]) -> ValidationResult {
        let mut warnings = Vec::new();
        let mut previous: Option<i64> = None;

        for (index, reading) in history.iter().enumerate() {
            warnings.extend(self.reading_warnings(reading));

            if let Some(previous) = previous {
                if reading.timestamp < previous {
                    warnings.push(ValidationWarning::OutOfOrder {
                        index,
                        timestamp: reading.timestamp,
                        previous,
                    });
                } else if reading.timestamp == previous {
                    warnings.push(ValidationWarning::DuplicateTimestamp {
                        index,
                        timestamp: reading.timestamp,
                    });
                }
            }
            previous = Some(reading.timestamp);
        }

        ValidationResult::from_warnings(warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(timestamp: i64) -> Reading {
        Reading {
            timestamp,
            aqi: 55,
            pm25: 18.0,
            pm10: 30.0,
            co2: 430.0,
        }
    }

    #[test]
    fn test_valid_reading() {
        let result = ReadingValidator::default().validate(&reading(0));
        assert!(result.is_valid);
        assert!(!result.has_warnings());
    }

    #[test]
    fn test_negative_value_is_invalid() {
        let mut r = reading(0);
        r.pm25 = -1.0;
        let result = ReadingValidator::default().validate(&r);
        assert!(!result.is_valid);
        assert_eq!(
            result.warnings,
            [ValidationWarning::NegativeValue {
                metric: Metric::Pm25,
                value: -1.0
            }]
        );
    }

    #[test]
    fn test_non_finite_is_invalid() {
        let mut r = reading(0);
        r.co2 = f64::INFINITY;
        let result = ReadingValidator::default().validate(&r);
        assert!(!result.is_valid);
        assert!(result.warnings[0].to_string().contains("CO₂"));
    }

    #[test]
    fn test_too_high_is_only_a_warning() {
        let mut r = reading(0);
        r.aqi = 700;
        let result = ReadingValidator::default().validate(&r);
        assert!(result.is_valid);
        assert!(matches!(
            result.warnings[0],
            ValidationWarning::ValueTooHigh { metric: Metric::Aqi, .. }
        ));
    }

    #[test]
    fn test_all_zeros() {
        let zero = Reading::default();
        let result = ReadingValidator::default().validate(&zero);
        assert!(result.is_valid);
        assert_eq!(result.warnings, [ValidationWarning::AllZeros]);

        let quiet = ReadingValidator::new(ValidatorConfig::default().warn_on_all_zeros(false));
        assert!(!quiet.validate(&zero).has_warnings());
    }

    #[test]
    fn test_series_ordering() {
        let history = [reading(10), reading(20), reading(20), reading(5)];
        let result = ReadingValidator::default().validate_series(&history);
        assert!(result.is_valid);
        assert_eq!(
            result.warnings,
            [
                ValidationWarning::DuplicateTimestamp {
                    index: 2,
                    timestamp: 20
                },
                ValidationWarning::OutOfOrder {
                    index: 3,
                    timestamp: 5,
                    previous: 20
                },
            ]
        );
    }

    #[test]
    fn test_series_with_bad_value_is_invalid() {
        let mut bad = reading(30);
        bad.pm10 = f64::NAN;
        let result = ReadingValidator::default().validate_series(&[reading(10), bad]);
        assert!(!result.is_valid);
    }
}
