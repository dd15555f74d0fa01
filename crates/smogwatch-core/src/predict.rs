//! One-step-ahead trend prediction.
//!
//! For every tracked metric the predictor fits a least-squares line through
//! the history window, extrapolates one step past the last sample, and then
//! scales the forecast by the hour-of-day seasonal factor and a simulated
//! weather adjustment. The forecast is classified against the last observed
//! value, scored for confidence and risk, and paired with advice.
//!
//! # Example
//!
//! ```
//! use smogwatch_core::predict::{FixedClock, Predictor, PredictorConfig};
//! use smogwatch_core::weather::FixedWeather;
//! use smogwatch_types::Reading;
//!
//! let history: Vec<Reading> = (0..8)
//!     .map(|i| Reading { timestamp: i * 60_000, aqi: 40 + i as u32, co2: 420.0, ..Default::default() })
//!     .collect();
//!
//! let mut predictor = Predictor::new(PredictorConfig::default())
//!     .unwrap()
//!     .with_weather(FixedWeather::neutral())
//!     .with_clock(FixedClock(12));
//!
//! let predictions = predictor.generate_predictions(&history);
//! assert_eq!(predictions.len(), 4);
//! assert_eq!(predictions[0].metric, "AQI");
//! ```

use std::collections::HashSet;
use std::fmt;

use time::OffsetDateTime;
use tracing::debug;

use smogwatch_types::{
    Metric, PREDICTION_TIMEFRAME, Reading, RiskLevel, Trend, TrendPrediction, WeatherFactor,
    series,
};

use crate::error::{Error, Result};
use crate::scoring::{calculate_confidence, recommendation};
use crate::seasonal::SeasonalModel;
use crate::stats::{linear_regression, round_to};
use crate::thresholds::ThresholdTable;
use crate::weather::{SimulatedWeather, WeatherSource, weather_adjustment};

/// Fewest readings for which predictions are produced.
pub const MIN_PREDICTION_SAMPLES: usize = 5;

/// Ratio above the last value that counts as increasing.
pub const INCREASING_RATIO: f64 = 1.05;
/// Ratio below the last value that counts as decreasing.
pub const DECREASING_RATIO: f64 = 0.95;

/// Source of the current local hour.
pub trait Clock: Send + Sync {
    /// Hour of day in `0..24`.
    fn local_hour(&self) -> u8;
}

/// Reads the wall clock in the local time zone.
///
/// Falls back to UTC when the local offset cannot be determined, which
/// happens on some platforms in multi-threaded processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn local_hour(&self) -> u8 {
        OffsetDateTime::now_local()
            .unwrap_or_else(|_| OffsetDateTime::now_utc())
            .hour()
    }
}

/// A clock stuck at one hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub u8);

impl Clock for FixedClock {
    fn local_hour(&self) -> u8 {
        self.0 % 24
    }
}

/// What a [`Predictor`] forecasts and how it scores the result.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictorConfig {
    /// Metrics to forecast, in output order.
    pub metrics: Vec<Metric>,
    /// Risk thresholds used to classify forecasts.
    pub thresholds: ThresholdTable,
    /// Seasonal scaling applied to forecasts.
    pub seasonal: SeasonalModel,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            metrics: Metric::ALL.to_vec(),
            thresholds: ThresholdTable::default(),
            seasonal: SeasonalModel::default(),
        }
    }
}

impl PredictorConfig {
    /// Configuration of the AQI/CO2 deployment.
    pub fn basic() -> Self {
        Self {
            metrics: Metric::BASIC.to_vec(),
            thresholds: ThresholdTable::basic(),
            seasonal: SeasonalModel::default(),
        }
    }

    /// Replace the metric list.
    #[must_use]
    pub fn metrics(mut self, metrics: impl Into<Vec<Metric>>) -> Self {
        self.metrics = metrics.into();
        self
    }

    /// Replace the threshold table.
    #[must_use]
    pub fn thresholds(mut self, thresholds: ThresholdTable) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Replace the seasonal model.
    #[must_use]
    pub fn seasonal(mut self, seasonal: SeasonalModel) -> Self {
        self.seasonal = seasonal;
        self
    }

    /// Check the metric list and thresholds.
    pub fn validate(&self) -> Result<()> {
        if self.metrics.is_empty() {
            return Err(Error::InvalidConfig(
                "at least one metric must be tracked".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for metric in &self.metrics {
            if !seen.insert(*metric) {
                return Err(Error::InvalidConfig(format!(
                    "metric '{}' is listed more than once",
                    metric.key()
                )));
            }
        }
        self.thresholds.validate()
    }
}

/// Forecasts the next value of each tracked metric.
pub struct Predictor {
    config: PredictorConfig,
    weather: Box<dyn WeatherSource>,
    clock: Box<dyn Clock>,
}

impl fmt::Debug for Predictor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predictor")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Predictor {
    /// Create a predictor with simulated weather and the system clock.
    pub fn new(config: PredictorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            weather: Box::new(SimulatedWeather::from_entropy()),
            clock: Box::new(SystemClock),
        })
    }

    /// Replace the weather source.
    #[must_use]
    pub fn with_weather(mut self, weather: impl WeatherSource + 'static) -> Self {
        self.weather = Box::new(weather);
        self
    }

    /// Replace the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &PredictorConfig {
        &self.config
    }

    /// Forecast every tracked metric for the hour after now.
    ///
    /// Returns an empty vector when `history` has fewer than
    /// [`MIN_PREDICTION_SAMPLES`] readings.
    pub fn generate_predictions(&mut self, history: &[Reading]) -> Vec<TrendPrediction> {
        let hour = self.clock.local_hour();
        self.predict_at(history, hour)
    }

    /// Forecast every tracked metric as if the local hour were `current_hour`.
    ///
    /// The seasonal factor of `(current_hour + 1) % 24` is applied. One weather
    /// sample is drawn and shared by all metrics.
    pub fn predict_at(&mut self, history: &[Reading], current_hour: u8) -> Vec<TrendPrediction> {
        if history.len() < MIN_PREDICTION_SAMPLES {
            debug!(
                samples = history.len(),
                "Not enough history for predictions"
            );
            return Vec::new();
        }

        let target_hour = (current_hour % 24 + 1) % 24;
        let weather = self.weather.sample();

        self.config
            .metrics
            .iter()
            .filter_map(|&metric| self.forecast_metric(history, metric, target_hour, &weather))
            .collect()
    }

    fn forecast_metric(
        &self,
        history: &[Reading],
        metric: Metric,
        target_hour: u8,
        weather: &WeatherFactor,
    ) -> Option<TrendPrediction> {
        let values = series(history, metric);
        let current = *values.last()?;
        let fit = linear_regression(&values)?;

        let raw = fit.predict(values.len() as f64);
        let seasonal = self.config.seasonal.factor(target_hour);
        let adjustment = weather_adjustment(metric, weather);
        let mut predicted = (raw * seasonal * adjustment).max(0.0);
        if !predicted.is_finite() {
            predicted = 0.0;
        }

        let trend = classify_trend(predicted, current);
        let confidence = calculate_confidence(&values);
        let risk_level = self.config.thresholds.assess(predicted, metric);

        debug!(
            metric = metric.key(),
            slope = fit.slope,
            raw,
            seasonal,
            adjustment,
            predicted,
            %trend,
            %risk_level,
            "Forecast computed"
        );

        Some(TrendPrediction {
            metric: metric.label().to_string(),
            current_value: current.round(),
            predicted_value: predicted.round(),
            trend,
            confidence: round_to(confidence, 2),
            timeframe: PREDICTION_TIMEFRAME.to_string(),
            risk_level,
            recommendation: recommendation(metric, risk_level).to_string(),
        })
    }
}

/// Direction of `predicted` relative to the last observed value.
pub fn classify_trend(predicted: f64, current: f64) -> Trend {
    if predicted > current * INCREASING_RATIO {
        Trend::Increasing
    } else if predicted < current * DECREASING_RATIO {
        Trend::Decreasing
    } else {
        Trend::Stable
    }
}

/// Forecast every metric with default settings and simulated weather.
pub fn generate_predictions(history: &[Reading]) -> Vec<TrendPrediction> {
    Predictor {
        config: PredictorConfig::default(),
        weather: Box::new(SimulatedWeather::from_entropy()),
        clock: Box::new(SystemClock),
    }
    .generate_predictions(history)
}

/// Highest risk tier among `predictions`, if any.
pub fn highest_risk(predictions: &[TrendPrediction]) -> Option<RiskLevel> {
    predictions.iter().map(|p| p.risk_level).max()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::FixedWeather;

    fn aqi_history(values: &[u32]) -> Vec<Reading> {
        values
            .iter()
            .enumerate()
            .map(|(i, &aqi)| Reading {
                timestamp: i as i64 * 3_600_000,
                aqi,
                pm25: 20.0,
                pm10: 40.0,
                co2: 410.0,
            })
            .collect()
    }

    fn pinned(config: PredictorConfig) -> Predictor {
        Predictor::new(config.seasonal(SeasonalModel::Flat))
            .unwrap()
            .with_weather(FixedWeather::neutral())
            .with_clock(FixedClock(12))
    }

    #[test]
    fn test_too_little_history_yields_nothing() {
        let mut predictor = pinned(PredictorConfig::default());
        assert!(predictor.generate_predictions(&[]).is_empty());
        assert!(predictor.generate_predictions(&aqi_history(&[1, 2, 3, 4])).is_empty());
        assert_eq!(predictor.generate_predictions(&aqi_history(&[1, 2, 3, 4, 5])).len(), 4);
    }

    #[test]
    fn test_pure_regression_forecast() {
        // slope 2, intercept 60: forecast at x=6 is 72, within 5% of 70.
        let mut predictor = pinned(PredictorConfig::default());
        let predictions = predictor.generate_predictions(&aqi_history(&[60, 62, 64, 66, 68, 70]));
        let aqi = &predictions[0];
        assert_eq!(aqi.metric, "AQI");
        assert_eq!(aqi.current_value, 70.0);
        assert_eq!(aqi.predicted_value, 72.0);
        assert_eq!(aqi.trend, Trend::Stable);
        assert_eq!(aqi.risk_level, RiskLevel::Medium);
        assert_eq!(aqi.timeframe, "1 hour");
    }

    #[test]
    fn test_steep_rise_is_increasing() {
        let mut predictor = pinned(PredictorConfig::default());
        let predictions = predictor.generate_predictions(&aqi_history(&[50, 55, 60, 65, 70, 75]));
        let aqi = &predictions[0];
        assert_eq!(aqi.predicted_value, 80.0);
        assert_eq!(aqi.trend, Trend::Increasing);
    }

    #[test]
    fn test_steep_fall_is_decreasing() {
        let mut predictor = pinned(PredictorConfig::default());
        let predictions =
            predictor.generate_predictions(&aqi_history(&[100, 90, 80, 70, 60, 50]));
        assert_eq!(predictions[0].predicted_value, 40.0);
        assert_eq!(predictions[0].trend, Trend::Decreasing);
        assert_eq!(predictions[0].risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_forecast_is_never_negative() {
        let mut predictor = pinned(PredictorConfig::default());
        let predictions = predictor.generate_predictions(&aqi_history(&[50, 40, 30, 20, 10, 0]));
        assert_eq!(predictions[0].predicted_value, 0.0);
        assert_eq!(predictions[0].trend, Trend::Stable);
    }

    #[test]
    fn test_seasonal_factor_uses_next_hour() {
        let mut predictor = Predictor::new(PredictorConfig::default().metrics([Metric::Aqi]))
            .unwrap()
            .with_weather(FixedWeather::neutral());
        let history = aqi_history(&[100, 100, 100, 100, 100]);

        // 17:00 forecasts for 18:00 (factor 1.9)
        let evening = predictor.predict_at(&history, 17);
        assert_eq!(evening[0].predicted_value, 190.0);
        assert_eq!(evening[0].risk_level, RiskLevel::Critical);

        // 23:00 wraps to midnight (factor 0.7)
        let night = predictor.predict_at(&history, 23);
        assert_eq!(night[0].predicted_value, 70.0);
        assert_eq!(night[0].trend, Trend::Decreasing);
    }

    #[test]
    fn test_weather_adjusts_co2_and_particulates() {
        let weather = WeatherFactor {
            temperature: 25.0,
            humidity: 40.0,
            wind_speed: 10.0,
            pressure: 1040.0,
        };
        let mut predictor = Predictor::new(PredictorConfig::default().seasonal(SeasonalModel::Flat))
            .unwrap()
            .with_weather(FixedWeather(weather));
        let history: Vec<Reading> = (0..5)
            .map(|i| Reading {
                timestamp: i,
                aqi: 100,
                pm25: 100.0,
                pm10: 100.0,
                co2: 510.0,
            })
            .collect();

        let predictions = predictor.predict_at(&history, 0);
        assert_eq!(predictions[0].predicted_value, 100.0);
        // 100 * 0.9 * 1.2
        assert_eq!(predictions[1].predicted_value, 108.0);
        assert_eq!(predictions[2].predicted_value, 108.0);
        // 510 * 1040 / 1020
        assert_eq!(predictions[3].predicted_value, 520.0);
        assert_eq!(predictions[3].risk_level, RiskLevel::High);
    }

    #[test]
    fn test_output_follows_metric_order() {
        let mut predictor = pinned(PredictorConfig::default().metrics([Metric::Co2, Metric::Aqi]));
        let predictions = predictor.generate_predictions(&aqi_history(&[1, 2, 3, 4, 5]));
        let labels: Vec<_> = predictions.iter().map(|p| p.metric.as_str()).collect();
        assert_eq!(labels, ["CO2", "AQI"]);
    }

    #[test]
    fn test_basic_config_tracks_aqi_and_co2() {
        let mut predictor = pinned(PredictorConfig::basic());
        let predictions = predictor.generate_predictions(&aqi_history(&[1, 2, 3, 4, 5]));
        assert_eq!(predictions.len(), 2);
        assert_eq!(predictions[1].metric, "CO2");
    }

    #[test]
    fn test_confidence_is_rounded() {
        let mut predictor = pinned(PredictorConfig::default().metrics([Metric::Aqi]));
        let predictions = predictor.generate_predictions(&aqi_history(&[60, 62, 64, 66, 68, 70]));
        let confidence = predictions[0].confidence;
        assert_eq!(confidence, round_to(confidence, 2));
        assert!((0.3..=0.95).contains(&confidence));
    }

    #[test]
    fn test_recommendation_matches_risk() {
        let mut predictor = pinned(PredictorConfig::default());
        let predictions = predictor.generate_predictions(&aqi_history(&[200, 200, 200, 200, 200]));
        assert_eq!(predictions[0].risk_level, RiskLevel::Critical);
        assert_eq!(
            predictions[0].recommendation,
            recommendation(Metric::Aqi, RiskLevel::Critical)
        );
    }

    #[test]
    fn test_seeded_weather_is_reproducible() {
        let history = aqi_history(&[30, 35, 33, 40, 42, 41, 45]);
        let run = |seed| {
            Predictor::new(PredictorConfig::default())
                .unwrap()
                .with_weather(SimulatedWeather::seeded(seed))
                .with_clock(FixedClock(8))
                .generate_predictions(&history)
        };
        assert_eq!(run(11), run(11));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let empty = PredictorConfig::default().metrics(Vec::new());
        assert!(matches!(Predictor::new(empty), Err(Error::InvalidConfig(_))));

        let duplicate = PredictorConfig::default().metrics([Metric::Aqi, Metric::Aqi]);
        let err = Predictor::new(duplicate).unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_classify_trend_bands() {
        assert_eq!(classify_trend(106.0, 100.0), Trend::Increasing);
        assert_eq!(classify_trend(105.0, 100.0), Trend::Stable);
        assert_eq!(classify_trend(95.0, 100.0), Trend::Stable);
        assert_eq!(classify_trend(94.0, 100.0), Trend::Decreasing);
        assert_eq!(classify_trend(0.0, 0.0), Trend::Stable);
    }

    #[test]
    fn test_fixed_clock_wraps() {
        assert_eq!(FixedClock(25).local_hour(), 1);
        assert!(SystemClock.local_hour() < 24);
    }

    #[test]
    fn test_highest_risk() {
        let mut predictor = pinned(PredictorConfig::default());
        let predictions = predictor.generate_predictions(&aqi_history(&[120, 120, 120, 120, 120]));
        assert_eq!(highest_risk(&predictions), Some(RiskLevel::High));
        assert_eq!(highest_risk(&[]), None);
    }
}
