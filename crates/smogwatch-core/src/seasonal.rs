//! Hour-of-day seasonal adjustment.
//!
//! Pollution follows a typical diurnal cycle: lowest in the small hours,
//! peaking with the morning and evening traffic. Forecasts are scaled by the
//! factor for the hour being predicted.

use serde::{Deserialize, Serialize};

/// Multiplier for each local hour, index 0 = midnight.
pub const HOURLY_FACTORS: [f64; 24] = [
    0.7, 0.6, 0.5, 0.5, 0.6, 0.8, // 00-05
    1.2, 1.5, 1.8, 1.6, 1.3, 1.2, // 06-11
    1.1, 1.0, 1.1, 1.3, 1.5, 1.8, // 12-17
    1.9, 1.7, 1.4, 1.2, 1.0, 0.8, // 18-23
];

/// Seasonal factor for `hour`; hours outside 0-23 get 1.0.
///
/// ```
/// use smogwatch_core::seasonal::seasonal_factor;
///
/// assert_eq!(seasonal_factor(3), 0.5);
/// assert_eq!(seasonal_factor(18), 1.9);
/// assert_eq!(seasonal_factor(24), 1.0);
/// ```
pub fn seasonal_factor(hour: u8) -> f64 {
    HOURLY_FACTORS
        .get(usize::from(hour))
        .copied()
        .unwrap_or(1.0)
}

/// Which seasonal model a predictor applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeasonalModel {
    /// The fixed [`HOURLY_FACTORS`] table.
    #[default]
    Diurnal,
    /// No seasonal scaling (factor 1.0 at every hour).
    Flat,
}

impl SeasonalModel {
    /// Factor applied to a forecast for `hour`.
    pub fn factor(&self, hour: u8) -> f64 {
        match self {
            SeasonalModel::Diurnal => seasonal_factor(hour),
            SeasonalModel::Flat => 1.0,
        }
    }
}
