//! Core types for SmogWatch readings and analysis results.

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// A tracked pollution metric.
///
/// The serde representation is the lowercase table key (`"aqi"`, `"pm25"`,
/// `"pm10"`, `"co2"`), which is also what configuration files use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Metric {
    /// Air Quality Index (unitless).
    Aqi,
    /// Fine particulate matter, ≤2.5 µm (µg/m³).
    Pm25,
    /// Coarse particulate matter, ≤10 µm (µg/m³).
    Pm10,
    /// Carbon dioxide concentration (ppm).
    Co2,
}

impl Metric {
    /// Every tracked metric, in the order analysis results are reported.
    pub const ALL: [Metric; 4] = [Metric::Aqi, Metric::Pm25, Metric::Pm10, Metric::Co2];

    /// The reduced metric set used by deployments without particulate sensors.
    pub const BASIC: [Metric; 2] = [Metric::Aqi, Metric::Co2];

    /// Lowercase lookup key (`aqi`, `pm25`, `pm10`, `co2`).
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            Metric::Aqi => "aqi",
            Metric::Pm25 => "pm25",
            Metric::Pm10 => "pm10",
            Metric::Co2 => "co2",
        }
    }

    /// Upper-cased label used in prediction and anomaly output.
    ///
    /// ```
    /// use smogwatch_types::Metric;
    ///
    /// assert_eq!(Metric::Pm25.label(), "PM25");
    /// assert_eq!(Metric::Co2.label(), "CO2");
    /// ```
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Aqi => "AQI",
            Metric::Pm25 => "PM25",
            Metric::Pm10 => "PM10",
            Metric::Co2 => "CO2",
        }
    }

    /// Human-friendly name used in correlation insights.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Metric::Aqi => "AQI",
            Metric::Pm25 => "PM2.5",
            Metric::Pm10 => "PM10",
            Metric::Co2 => "CO₂",
        }
    }

    /// Measurement unit, empty for the unitless AQI.
    #[must_use]
    pub fn unit(&self) -> &'static str {
        match self {
            Metric::Aqi => "",
            Metric::Pm25 | Metric::Pm10 => "µg/m³",
            Metric::Co2 => "ppm",
        }
    }

    /// Whether this metric measures airborne particulates.
    #[must_use]
    pub fn is_particulate(&self) -> bool {
        matches!(self, Metric::Pm25 | Metric::Pm10)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Metric {
    type Err = ParseError;

    /// Parse a metric from its key, label or display name (case-insensitive).
    ///
    /// ```
    /// use smogwatch_types::Metric;
    ///
    /// assert_eq!("pm2.5".parse::<Metric>(), Ok(Metric::Pm25));
    /// assert_eq!("CO₂".parse::<Metric>(), Ok(Metric::Co2));
    /// assert!("ozone".parse::<Metric>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "aqi" => Ok(Metric::Aqi),
            "pm25" | "pm2.5" | "pm2_5" => Ok(Metric::Pm25),
            "pm10" => Ok(Metric::Pm10),
            "co2" | "co₂" => Ok(Metric::Co2),
            _ => Err(ParseError::UnknownMetric(s.to_string())),
        }
    }
}

/// One sensor sample.
///
/// Fields missing from a serialized reading deserialize as zero, so sensors
/// that do not report particulates still produce a usable reading.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Reading {
    /// Capture instant in milliseconds since the Unix epoch.
    pub timestamp: i64,
    /// Air Quality Index.
    pub aqi: u32,
    /// PM2.5 concentration in µg/m³.
    pub pm25: f64,
    /// PM10 concentration in µg/m³.
    pub pm10: f64,
    /// CO2 concentration in ppm.
    pub co2: f64,
}

impl Reading {
    /// The value of `metric` in this reading.
    #[must_use]
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Aqi => f64::from(self.aqi),
            Metric::Pm25 => self.pm25,
            Metric::Pm10 => self.pm10,
            Metric::Co2 => self.co2,
        }
    }
}

/// Extract the ordered series of one metric from a reading history.
#[must_use]
pub fn series(history: &[Reading], metric: Metric) -> Vec<f64> {
    history.iter().map(|r| r.value(metric)).collect()
}

/// Simulated atmospheric conditions for one forecast horizon.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct WeatherFactor {
    /// Air temperature in °C.
    pub temperature: f64,
    /// Relative humidity in percent.
    pub humidity: f64,
    /// Wind speed in km/h.
    pub wind_speed: f64,
    /// Atmospheric pressure in hPa.
    pub pressure: f64,
}

impl WeatherFactor {
    /// Reference pressure in hPa; CO2 forecasts scale by `pressure / REFERENCE_PRESSURE`.
    pub const REFERENCE_PRESSURE: f64 = 1020.0;

    /// Conditions under which every weather adjustment multiplies by exactly 1.0.
    pub const NEUTRAL: WeatherFactor = WeatherFactor {
        temperature: 20.0,
        humidity: 0.0,
        wind_speed: 0.0,
        pressure: Self::REFERENCE_PRESSURE,
    };
}

/// Direction of a forecast relative to the last observed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Increasing => write!(f, "increasing"),
            Trend::Decreasing => write!(f, "decreasing"),
            Trend::Stable => write!(f, "stable"),
        }
    }
}

/// Risk tier assigned to a forecast value.
///
/// Ordered by severity: `Low < Medium < High < Critical`.
///
/// ```
/// use smogwatch_types::RiskLevel;
///
/// assert!(RiskLevel::Critical > RiskLevel::High);
/// assert_eq!(RiskLevel::Medium.to_string(), "medium");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::Medium => write!(f, "medium"),
            RiskLevel::High => write!(f, "high"),
            RiskLevel::Critical => write!(f, "critical"),
        }
    }
}

impl FromStr for RiskLevel {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(RiskLevel::Low),
            "medium" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            "critical" => Ok(RiskLevel::Critical),
            _ => Err(ParseError::UnknownRiskLevel(s.to_string())),
        }
    }
}

/// Severity of a detected anomaly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Severity {
    Moderate,
    Severe,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Moderate => write!(f, "moderate"),
            Severity::Severe => write!(f, "severe"),
        }
    }
}

/// Forecast horizon label attached to every prediction.
pub const PREDICTION_TIMEFRAME: &str = "1 hour";

/// One-step-ahead forecast for a single metric.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct TrendPrediction {
    /// Upper-cased metric label (see [`Metric::label`]).
    pub metric: String,
    /// Last observed value, rounded to an integer.
    pub current_value: f64,
    /// Forecast value, rounded to an integer.
    pub predicted_value: f64,
    pub trend: Trend,
    /// Confidence in `[0.3, 0.95]` (or exactly 0.5 for very short series).
    pub confidence: f64,
    pub timeframe: String,
    pub risk_level: RiskLevel,
    pub recommendation: String,
}

/// A reading whose metric value lies far from the window mean.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Anomaly {
    /// Timestamp of the offending reading (ms since epoch).
    pub timestamp: i64,
    /// Upper-cased metric label.
    pub metric: String,
    pub value: f64,
    /// Absolute Z-score, rounded to 2 decimals.
    pub zscore: f64,
    pub severity: Severity,
}

/// A pairwise relationship between two metrics.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CorrelationInsight {
    /// Display names of the two metrics.
    pub metrics: [String; 2],
    pub correlation: f64,
    pub insight: String,
}

impl CorrelationInsight {
    /// Build an insight from a pair of names.
    pub fn new(a: &str, b: &str, correlation: f64, insight: &str) -> Self {
        Self {
            metrics: [a.to_string(), b.to_string()],
            correlation,
            insight: insight.to_string(),
        }
    }
}

/// Change of the latest value against the previous day's average.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct DailyTrend {
    /// Percentage change, rounded to an integer.
    pub percentage_change: i64,
    pub trend: Trend,
}

impl DailyTrend {
    /// The result reported when there is nothing to compare against.
    pub const UNCHANGED: DailyTrend = DailyTrend {
        percentage_change: 0,
        trend: Trend::Stable,
    };
}
