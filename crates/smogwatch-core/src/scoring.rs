//! Confidence scoring and advisory text.

use smogwatch_types::{Metric, RiskLevel};

use crate::stats::{mean, std_dev};

/// Confidence reported for series too short to judge.
pub const DEFAULT_CONFIDENCE: f64 = 0.5;
/// Lowest confidence ever reported for a judged series.
pub const MIN_CONFIDENCE: f64 = 0.3;
/// Highest confidence ever reported.
pub const MAX_CONFIDENCE: f64 = 0.95;
/// Minimum series length for a variability-based confidence.
pub const MIN_CONFIDENCE_SAMPLES: usize = 3;

/// Advice returned for metrics without a dedicated entry.
pub const GENERIC_RECOMMENDATION: &str = "Continue monitoring.";

/// Confidence in a forecast, inversely proportional to the series' variability.
///
/// Computes `1 − stddev/mean` clamped to `[0.3, 0.95]`. Series shorter than
/// three values get exactly 0.5. A zero mean, where the coefficient of
/// variation is undefined, gets the 0.3 floor.
///
/// ```
/// use smogwatch_core::scoring::calculate_confidence;
///
/// assert_eq!(calculate_confidence(&[1.0, 2.0]), 0.5);
/// assert_eq!(calculate_confidence(&[400.0, 400.0, 400.0]), 0.95);
/// assert_eq!(calculate_confidence(&[0.0, 0.0, 0.0]), 0.3);
/// ```
pub fn calculate_confidence(values: &[f64]) -> f64 {
    if values.len() < MIN_CONFIDENCE_SAMPLES {
        return DEFAULT_CONFIDENCE;
    }

    let mean = mean(values);
    if mean == 0.0 {
        return MIN_CONFIDENCE;
    }

    let coefficient_of_variation = std_dev(values) / mean;
    let confidence = 1.0 - coefficient_of_variation;
    if confidence.is_nan() {
        return MIN_CONFIDENCE;
    }
    confidence.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
}

/// Advisory text for a forecast of `metric` at `risk`.
pub fn recommendation(metric: Metric, risk: RiskLevel) -> &'static str {
    match (metric, risk) {
        (Metric::Aqi, RiskLevel::Critical) => {
            "🚨 Critical alert! Suspend non-essential operations and activate emergency protocols."
        }
        (Metric::Aqi, RiskLevel::High) => {
            "⚠️ Cut industrial activity by 50% and monitor continuously."
        }
        (Metric::Aqi, RiskLevel::Medium) => {
            "📊 Apply preventive measures and increase monitoring frequency."
        }
        (Metric::Aqi, RiskLevel::Low) => "✅ Normal conditions. Keep routine monitoring.",

        (Metric::Pm25, RiskLevel::Critical) => {
            "🚨 Critical PM2.5 levels! Run filtration systems at maximum."
        }
        (Metric::Pm25, RiskLevel::High) => "⚠️ Reduce fine particle emissions and check filters.",
        (Metric::Pm25, RiskLevel::Medium) => "📊 Watch dust sources and adjust ventilation.",
        (Metric::Pm25, RiskLevel::Low) => "✅ Fine particles under control.",

        (Metric::Pm10, RiskLevel::Critical) => {
            "🚨 Coarse particles at critical level! Suspend mining activity."
        }
        (Metric::Pm10, RiskLevel::High) => {
            "⚠️ Apply dust suppression and reduce earth moving."
        }
        (Metric::Pm10, RiskLevel::Medium) => "📊 Increase water spraying over dusty areas.",
        (Metric::Pm10, RiskLevel::Low) => "✅ Coarse particle control is adequate.",

        (Metric::Co2, RiskLevel::Critical) => {
            "🚨 Critical CO₂! Inspect combustion and ventilation systems."
        }
        (Metric::Co2, RiskLevel::High) => {
            "⚠️ Optimise combustion processes and increase ventilation."
        }
        (Metric::Co2, RiskLevel::Medium) => "📊 Monitor energy efficiency and CO₂ sources.",
        (Metric::Co2, RiskLevel::Low) => "✅ CO₂ emissions within expected range.",
    }
}

/// Advisory text for a possibly unknown metric.
pub fn recommendation_for(metric: Option<Metric>, risk: RiskLevel) -> &'static str {
    metric.map_or(GENERIC_RECOMMENDATION, |m| recommendation(m, risk))
}

/// Advisory text for a metric given by name.
pub fn recommendation_named(metric: &str, risk: RiskLevel) -> &'static str {
    recommendation_for(metric.parse().ok(), risk)
}
