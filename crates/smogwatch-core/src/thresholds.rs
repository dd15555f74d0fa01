//! Risk thresholds and forecast classification.
//!
//! Each tracked metric has three inclusive lower bounds (medium, high,
//! critical). A forecast is placed in the highest tier whose bound it
//! reaches; metrics without an entry are always [`RiskLevel::Low`].
//!
//! # Example
//!
//! ```
//! use smogwatch_core::ThresholdTable;
//! use smogwatch_types::{Metric, RiskLevel};
//!
//! let table = ThresholdTable::default();
//! assert_eq!(table.assess(120.0, Metric::Aqi), RiskLevel::High);
//! assert_eq!(table.assess(600.0, Metric::Co2), RiskLevel::Critical);
//!
//! // The simpler deployment does not track particulates
//! let basic = ThresholdTable::basic();
//! assert_eq!(basic.assess(500.0, Metric::Pm25), RiskLevel::Low);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use smogwatch_types::{Metric, RiskLevel};

use crate::error::{Error, Result};

/// Tier boundaries for one metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskThresholds {
    /// Lowest value considered medium risk.
    pub medium: f64,
    /// Lowest value considered high risk.
    pub high: f64,
    /// Lowest value considered critical.
    pub critical: f64,
}

impl RiskThresholds {
    /// AQI: 50 / 100 / 150.
    pub const AQI: RiskThresholds = RiskThresholds::new(50.0, 100.0, 150.0);
    /// PM2.5: 25 / 50 / 75 µg/m³.
    pub const PM25: RiskThresholds = RiskThresholds::new(25.0, 50.0, 75.0);
    /// PM10: 50 / 100 / 150 µg/m³.
    pub const PM10: RiskThresholds = RiskThresholds::new(50.0, 100.0, 150.0);
    /// CO2: 400 / 500 / 600 ppm.
    pub const CO2: RiskThresholds = RiskThresholds::new(400.0, 500.0, 600.0);

    /// Create thresholds from the three tier bounds.
    pub const fn new(medium: f64, high: f64, critical: f64) -> Self {
        Self {
            medium,
            high,
            critical,
        }
    }

    /// Default thresholds for `metric`.
    pub fn default_for(metric: Metric) -> Self {
        match metric {
            Metric::Aqi => Self::AQI,
            Metric::Pm25 => Self::PM25,
            Metric::Pm10 => Self::PM10,
            Metric::Co2 => Self::CO2,
        }
    }

    /// Classify `value`, checking the critical bound first.
    pub fn evaluate(&self, value: f64) -> RiskLevel {
        if value >= self.critical {
            RiskLevel::Critical
        } else if value >= self.high {
            RiskLevel::High
        } else if value >= self.medium {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    /// Check that the bounds are finite, non-negative and ascending.
    pub fn validate(&self, metric: Metric) -> Result<()> {
        let bounds = [self.medium, self.high, self.critical];
        if bounds.iter().any(|b| !b.is_finite() || *b < 0.0) {
            return Err(Error::InvalidConfig(format!(
                "{} thresholds must be finite and non-negative",
                metric.key()
            )));
        }
        if !(self.medium <= self.high && self.high <= self.critical) {
            return Err(Error::InvalidConfig(format!(
                "{} thresholds must satisfy medium <= high <= critical (got {} / {} / {})",
                metric.key(),
                self.medium,
                self.high,
                self.critical
            )));
        }
        Ok(())
    }
}

/// Per-metric threshold lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThresholdTable {
    entries: BTreeMap<Metric, RiskThresholds>,
}

impl Default for ThresholdTable {
    fn default() -> Self {
        Self::for_metrics(&Metric::ALL)
    }
}

impl ThresholdTable {
    /// A table without any entries; every metric assesses as low.
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Default thresholds for the given metrics only.
    pub fn for_metrics(metrics: &[Metric]) -> Self {
        Self {
            entries: metrics
                .iter()
                .map(|&m| (m, RiskThresholds::default_for(m)))
                .collect(),
        }
    }

    /// The table of the AQI/CO2 deployment.
    pub fn basic() -> Self {
        Self::for_metrics(&Metric::BASIC)
    }

    /// Set or replace the thresholds for `metric`.
    #[must_use]
    pub fn with(mut self, metric: Metric, thresholds: RiskThresholds) -> Self {
        self.entries.insert(metric, thresholds);
        self
    }

    /// Thresholds for `metric`, if tracked.
    pub fn get(&self, metric: Metric) -> Option<&RiskThresholds> {
        self.entries.get(&metric)
    }

    /// Metrics that have an entry.
    pub fn metrics(&self) -> impl Iterator<Item = Metric> + '_ {
        self.entries.keys().copied()
    }

    /// Risk tier of a forecast `value` for `metric`.
    pub fn assess(&self, value: f64, metric: Metric) -> RiskLevel {
        self.get(metric)
            .map_or(RiskLevel::Low, |thresholds| thresholds.evaluate(value))
    }

    /// Risk tier for a metric given by name; unknown names are low risk.
    pub fn assess_named(&self, value: f64, metric: &str) -> RiskLevel {
        metric
            .parse::<Metric>()
            .map_or(RiskLevel::Low, |m| self.assess(value, m))
    }

    /// Validate every entry.
    pub fn validate(&self) -> Result<()> {
        self.entries
            .iter()
            .try_for_each(|(metric, thresholds)| thresholds.validate(*metric))
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Raising the forecast never lowers the assigned tier.
        #[test]
        fn assessment_is_monotonic(idx in 0usize..4, a in 0.0f64..2000.0, b in 0.0f64..2000.0) {
            let metric = Metric::ALL[idx];
            let table = ThresholdTable::default();
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(table.assess(low, metric) <= table.assess(high, metric));
        }
    }
}
