//! Simulated weather covariates.
//!
//! There is no real weather feed: each prediction run draws one
//! [`WeatherFactor`] from uniform ranges. The source is a trait so tests and
//! callers that need reproducible forecasts can seed it or pin it.
//!
//! # Example
//!
//! ```
//! use smogwatch_core::weather::{SimulatedWeather, WeatherSource};
//!
//! let mut a = SimulatedWeather::seeded(7);
//! let mut b = SimulatedWeather::seeded(7);
//! assert_eq!(a.sample(), b.sample());
//! ```

use std::ops::Range;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use smogwatch_types::{Metric, WeatherFactor};

/// Temperature range in °C.
pub const TEMPERATURE_RANGE: Range<f64> = 20.0..35.0;
/// Relative humidity range in percent.
pub const HUMIDITY_RANGE: Range<f64> = 40.0..80.0;
/// Wind speed range in km/h.
pub const WIND_SPEED_RANGE: Range<f64> = 5.0..20.0;
/// Pressure range in hPa.
pub const PRESSURE_RANGE: Range<f64> = 1000.0..1040.0;

/// A provider of weather samples for the forecast horizon.
pub trait WeatherSource: Send {
    /// Produce the conditions for the next forecast run.
    fn sample(&mut self) -> WeatherFactor;
}

/// Independent uniform draws within the simulated ranges.
#[derive(Debug, Clone)]
pub struct SimulatedWeather<R = StdRng> {
    rng: R,
}

impl SimulatedWeather<StdRng> {
    /// Non-reproducible source seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_os_rng())
    }

    /// Reproducible source: the same seed yields the same sequence of samples.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> SimulatedWeather<R> {
    /// Wrap an existing random number generator.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng + Send> WeatherSource for SimulatedWeather<R> {
    fn sample(&mut self) -> WeatherFactor {
        WeatherFactor {
            temperature: self.rng.random_range(TEMPERATURE_RANGE),
            humidity: self.rng.random_range(HUMIDITY_RANGE),
            wind_speed: self.rng.random_range(WIND_SPEED_RANGE),
            pressure: self.rng.random_range(PRESSURE_RANGE),
        }
    }
}

/// Always returns the same conditions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedWeather(pub WeatherFactor);

impl FixedWeather {
    /// Conditions that leave every forecast unchanged.
    pub fn neutral() -> Self {
        Self(WeatherFactor::NEUTRAL)
    }
}

impl WeatherSource for FixedWeather {
    fn sample(&mut self) -> WeatherFactor {
        self.0
    }
}

/// Multiplier applied to a forecast of `metric` under `weather`.
///
/// - CO2 scales with pressure relative to 1020 hPa.
/// - Particulates are dispersed by wind and aggregated by humidity.
/// - AQI is not weather-adjusted.
pub fn weather_adjustment(metric: Metric, weather: &WeatherFactor) -> f64 {
    match metric {
        Metric::Co2 => weather.pressure / WeatherFactor::REFERENCE_PRESSURE,
        Metric::Pm25 | Metric::Pm10 => {
            (1.0 - weather.wind_speed / 100.0) * (1.0 + weather.humidity / 200.0)
        }
        Metric::Aqi => 1.0,
    }
}
