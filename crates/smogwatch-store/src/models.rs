//! Data models for stored data.

use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use smogwatch_types::Reading;

/// A sensor stored in the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSensor {
    /// Sensor identifier.
    pub id: String,
    /// Human-readable installation site.
    pub location: Option<String>,
    /// First time this sensor was seen.
    #[serde(with = "time::serde::rfc3339")]
    pub first_seen: OffsetDateTime,
    /// Last time this sensor reported.
    #[serde(with = "time::serde::rfc3339")]
    pub last_seen: OffsetDateTime,
}

/// A reading stored in the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredReading {
    /// Database row ID.
    pub id: i64,
    /// Sensor identifier.
    pub sensor_id: String,
    /// Capture instant in Unix milliseconds.
    pub timestamp: i64,
    pub aqi: u32,
    pub pm25: f64,
    pub pm10: f64,
    pub co2: f64,
}

impl StoredReading {
    /// Convert to the canonical reading shape.
    pub fn to_reading(&self) -> Reading {
        Reading {
            timestamp: self.timestamp,
            aqi: self.aqi,
            pm25: self.pm25,
            pm10: self.pm10,
            co2: self.co2,
        }
    }
}

/// Whether a sensor has reported recently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorState {
    Online,
    Offline,
}

impl fmt::Display for SensorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorState::Online => write!(f, "online"),
            SensorState::Offline => write!(f, "offline"),
        }
    }
}

/// Current status of one sensor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorStatus {
    pub id: String,
    pub location: Option<String>,
    pub status: SensorState,
    /// Latest AQI, 0 when offline.
    pub aqi: u32,
    /// Latest CO2, 0 when offline.
    pub co2: f64,
    /// Time of the latest reading.
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_update: Option<OffsetDateTime>,
    /// Whole minutes since the latest reading.
    pub minutes_since_update: Option<i64>,
}

/// Outcome of a CSV import.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportResult {
    /// Total data rows seen.
    pub total: usize,
    /// Rows stored.
    pub imported: usize,
    /// Rows rejected.
    pub skipped: usize,
    /// One message per rejected row.
    pub errors: Vec<String>,
}
