//! Main store implementation.

use std::io;
use std::path::Path;

use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row};
use serde::Deserialize;
use time::format_description::well_known::Rfc3339;
use time::{Date, Duration, OffsetDateTime, Time};
use tracing::{debug, info, warn};

use smogwatch_core::ReadingValidator;
use smogwatch_types::{Metric, Reading};

use crate::error::{Error, Result};
use crate::models::{ImportResult, SensorState, SensorStatus, StoredReading, StoredSensor};
use crate::queries::{ReadingQuery, unix_millis};
use crate::schema;

/// SQLite-based store for SmogWatch readings.
pub struct Store {
    conn: Connection,
    validator: ReadingValidator,
}

impl Store {
    /// Open or create a database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| Error::CreateDirectory {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        info!("Opening database at {}", path.display());
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;

        schema::initialize(&conn)?;

        Ok(Self::from_connection(conn))
    }

    /// Open the default database location.
    pub fn open_default() -> Result<Self> {
        Self::open(crate::default_db_path())
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        schema::initialize(&conn)?;
        Ok(Self::from_connection(conn))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn,
            validator: ReadingValidator::default(),
        }
    }
}

fn datetime_from_millis(idx: usize, ms: i64) -> rusqlite::Result<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(ms) * 1_000_000)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Integer, Box::new(e)))
}

fn sensor_from_row(row: &Row<'_>) -> rusqlite::Result<StoredSensor> {
    Ok(StoredSensor {
        id: row.get(0)?,
        location: row.get(1)?,
        first_seen: datetime_from_millis(2, row.get(2)?)?,
        last_seen: datetime_from_millis(3, row.get(3)?)?,
    })
}

fn reading_from_row(row: &Row<'_>) -> rusqlite::Result<StoredReading> {
    Ok(StoredReading {
        id: row.get(0)?,
        sensor_id: row.get(1)?,
        timestamp: row.get(2)?,
        aqi: row.get::<_, i64>(3)?.clamp(0, i64::from(u32::MAX)) as u32,
        pm25: row.get(4)?,
        pm10: row.get(5)?,
        co2: row.get(6)?,
    })
}

// Sensor operations
impl Store {
    /// Get or create a sensor entry. A `None` location keeps the stored one.
    pub fn upsert_sensor(&self, sensor_id: &str, location: Option<&str>) -> Result<StoredSensor> {
        let now = unix_millis(OffsetDateTime::now_utc());

        self.conn.execute(
            "INSERT INTO sensors (id, location, first_seen, last_seen) VALUES (?1, ?2, ?3, ?3)
             ON CONFLICT(id) DO UPDATE SET
                location = COALESCE(?2, location),
                last_seen = ?3",
            rusqlite::params![sensor_id, location, now],
        )?;

        self.get_sensor(sensor_id)?
            .ok_or_else(|| Error::SensorNotFound(sensor_id.to_string()))
    }

    /// Get a sensor by ID.
    pub fn get_sensor(&self, sensor_id: &str) -> Result<Option<StoredSensor>> {
        let sensor = self
            .conn
            .query_row(
                "SELECT id, location, first_seen, last_seen FROM sensors WHERE id = ?",
                [sensor_id],
                sensor_from_row,
            )
            .optional()?;

        Ok(sensor)
    }

    /// List all sensors by ID.
    pub fn list_sensors(&self) -> Result<Vec<StoredSensor>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, location, first_seen, last_seen FROM sensors ORDER BY id")?;

        let sensors = stmt
            .query_map([], sensor_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(sensors)
    }

    /// Status of every sensor as of `now`.
    ///
    /// A sensor is online when its latest reading is no older than
    /// `offline_after`.
    pub fn sensor_status(
        &self,
        now: OffsetDateTime,
        offline_after: Duration,
    ) -> Result<Vec<SensorStatus>> {
        let mut statuses = Vec::new();

        for sensor in self.list_sensors()? {
            let latest = self.latest_reading(Some(&sensor.id))?;
            let last_update = latest
                .as_ref()
                .map(|r| datetime_from_millis(2, r.timestamp))
                .transpose()?;
            let age = last_update.map(|t| now - t);
            let online = age.is_some_and(|age| age <= offline_after);

            let (aqi, co2) = match (&latest, online) {
                (Some(r), true) => (r.aqi, r.co2),
                _ => (0, 0.0),
            };

            statuses.push(SensorStatus {
                id: sensor.id,
                location: sensor.location,
                status: if online {
                    SensorState::Online
                } else {
                    SensorState::Offline
                },
                aqi,
                co2,
                last_update,
                minutes_since_update: age.map(|a| a.whole_minutes()),
            });
        }

        Ok(statuses)
    }
}

// Reading operations
impl Store {
    fn check(&self, reading: &Reading) -> Result<()> {
        let result = self.validator.validate(reading);
        if !result.is_valid {
            let reasons: Vec<String> = result
                .warnings
                .iter()
                .filter(|w| w.is_fatal())
                .map(ToString::to_string)
                .collect();
            return Err(Error::InvalidReading(reasons.join("; ")));
        }
        for warning in &result.warnings {
            warn!(timestamp = reading.timestamp, "{}", warning);
        }
        Ok(())
    }

    fn insert_row(conn: &Connection, sensor_id: &str, reading: &Reading) -> Result<i64> {
        conn.execute(
            "INSERT INTO readings (sensor_id, timestamp_ms, aqi, pm25, pm10, co2)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                sensor_id,
                reading.timestamp,
                reading.aqi,
                reading.pm25,
                reading.pm10,
                reading.co2,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Insert one reading, creating the sensor if needed.
    ///
    /// Readings with negative or non-finite values are rejected.
    pub fn insert_reading(&self, sensor_id: &str, reading: &Reading) -> Result<i64> {
        self.check(reading)?;
        self.upsert_sensor(sensor_id, None)?;
        let id = Self::insert_row(&self.conn, sensor_id, reading)?;
        debug!(sensor = sensor_id, id, "Inserted reading");
        Ok(id)
    }

    /// Insert a batch of readings in one transaction.
    ///
    /// Either every reading is stored or none is.
    pub fn insert_readings(&self, sensor_id: &str, readings: &[Reading]) -> Result<usize> {
        for reading in readings {
            self.check(reading)?;
        }

        let tx = self.conn.unchecked_transaction()?;
        self.upsert_sensor(sensor_id, None)?;
        for reading in readings {
            Self::insert_row(&tx, sensor_id, reading)?;
        }
        tx.commit()?;

        info!("Inserted {} readings for {}", readings.len(), sensor_id);
        Ok(readings.len())
    }

    /// Query readings with filters.
    pub fn query_readings(&self, query: &ReadingQuery) -> Result<Vec<StoredReading>> {
        let sql = query.build_sql();
        let (_, params) = query.build_where();

        debug!("Executing query: {}", sql);

        let params_ref: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let readings = stmt
            .query_map(params_ref.as_slice(), reading_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(readings)
    }

    /// The newest reading, optionally for one sensor.
    pub fn latest_reading(&self, sensor_id: Option<&str>) -> Result<Option<StoredReading>> {
        let mut query = ReadingQuery::new().limit(1);
        if let Some(id) = sensor_id {
            query = query.sensor(id);
        }
        let mut readings = self.query_readings(&query)?;
        Ok(readings.pop())
    }

    /// The most recent `n` readings in chronological order.
    pub fn recent_history(&self, sensor_id: Option<&str>, n: u32) -> Result<Vec<Reading>> {
        let mut query = ReadingQuery::new().limit(n);
        if let Some(id) = sensor_id {
            query = query.sensor(id);
        }
        let mut history: Vec<Reading> = self
            .query_readings(&query)?
            .iter()
            .map(StoredReading::to_reading)
            .collect();
        history.reverse();
        Ok(history)
    }

    /// Average of `metric` over the UTC calendar day `day`, if any readings exist.
    pub fn daily_average(
        &self,
        sensor_id: Option<&str>,
        metric: Metric,
        day: Date,
    ) -> Result<Option<f64>> {
        let start = day.with_time(Time::MIDNIGHT).assume_utc();
        let end = start + Duration::days(1);

        // Column names come from the closed Metric enum.
        let sql = format!(
            "SELECT AVG({}) FROM readings
             WHERE timestamp_ms >= ?1 AND timestamp_ms < ?2
               AND (?3 IS NULL OR sensor_id = ?3)",
            metric.key()
        );

        let average: Option<f64> = self.conn.query_row(
            &sql,
            rusqlite::params![unix_millis(start), unix_millis(end), sensor_id],
            |row| row.get(0),
        )?;

        Ok(average)
    }

    /// Count readings, optionally for one sensor.
    pub fn count_readings(&self, sensor_id: Option<&str>) -> Result<u64> {
        let count: i64 = match sensor_id {
            Some(id) => self.conn.query_row(
                "SELECT COUNT(*) FROM readings WHERE sensor_id = ?",
                [id],
                |row| row.get(0),
            )?,
            None => self
                .conn
                .query_row("SELECT COUNT(*) FROM readings", [], |row| row.get(0))?,
        };

        Ok(count as u64)
    }
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    timestamp: String,
    #[serde(default)]
    aqi: Option<f64>,
    #[serde(default)]
    pm25: Option<f64>,
    #[serde(default)]
    pm10: Option<f64>,
    #[serde(default)]
    co2: Option<f64>,
}

impl CsvRow {
    fn into_reading(self) -> std::result::Result<Reading, String> {
        let timestamp = parse_timestamp(&self.timestamp)?;
        let aqi = self.aqi.unwrap_or(0.0);
        if !aqi.is_finite() || aqi < 0.0 || aqi > f64::from(u32::MAX) {
            return Err(format!("aqi {aqi} is out of range"));
        }
        Ok(Reading {
            timestamp,
            aqi: aqi.round() as u32,
            pm25: self.pm25.unwrap_or(0.0),
            pm10: self.pm10.unwrap_or(0.0),
            co2: self.co2.unwrap_or(0.0),
        })
    }
}

/// Unix milliseconds or an RFC 3339 instant.
fn parse_timestamp(value: &str) -> std::result::Result<i64, String> {
    let value = value.trim();
    if let Ok(ms) = value.parse::<i64>() {
        return Ok(ms);
    }
    OffsetDateTime::parse(value, &Rfc3339)
        .map(unix_millis)
        .map_err(|e| format!("invalid timestamp '{value}': {e}"))
}

// Import operations
impl Store {
    /// Import readings from CSV with a `timestamp,aqi,pm25,pm10,co2` header.
    ///
    /// Missing columns and empty cells read as zero. Rows that fail to parse
    /// or validate are skipped and reported; the rest are stored in one
    /// transaction.
    pub fn import_csv<R: io::Read>(&self, reader: R, sensor_id: &str) -> Result<ImportResult> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        if !csv_reader.headers()?.iter().any(|h| h == "timestamp") {
            return Err(Error::InvalidReading(
                "CSV header must include a 'timestamp' column".to_string(),
            ));
        }

        let mut result = ImportResult::default();
        let mut readings = Vec::new();

        for (index, row) in csv_reader.deserialize::<CsvRow>().enumerate() {
            result.total += 1;
            // header is line 1
            let line = index + 2;
            let reading = match row {
                Ok(row) => row.into_reading(),
                Err(e) => Err(e.to_string()),
            };
            match reading.and_then(|r| self.check(&r).map(|()| r).map_err(|e| e.to_string())) {
                Ok(reading) => readings.push(reading),
                Err(message) => {
                    result.skipped += 1;
                    result.errors.push(format!("line {line}: {message}"));
                }
            }
        }

        if !readings.is_empty() {
            result.imported = self.insert_readings(sensor_id, &readings)?;
        }

        info!(
            sensor = sensor_id,
            imported = result.imported,
            skipped = result.skipped,
            "CSV import finished"
        );
        Ok(result)
    }

    /// Import a CSV file; see [`Store::import_csv`].
    pub fn import_csv_file<P: AsRef<Path>>(&self, path: P, sensor_id: &str) -> Result<ImportResult> {
        let file = std::fs::File::open(path)?;
        self.import_csv(io::BufReader::new(file), sensor_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    fn reading(timestamp: i64, aqi: u32) -> Reading {
        Reading {
            timestamp,
            aqi,
            pm25: 12.0,
            pm10: 30.0,
            co2: 420.0,
        }
    }

    fn ms(t: OffsetDateTime) -> i64 {
        unix_millis(t)
    }

    #[test]
    fn test_open_in_memory() {
        let store = Store::open_in_memory().unwrap();
        assert!(store.list_sensors().unwrap().is_empty());
        assert_eq!(store.count_readings(None).unwrap(), 0);
    }

    #[test]
    fn test_open_on_disk_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("data.db");
        {
            let store = Store::open(&path).unwrap();
            store.insert_reading("S001", &reading(1_000, 50)).unwrap();
        }
        let reopened = Store::open(&path).unwrap();
        assert_eq!(reopened.count_readings(Some("S001")).unwrap(), 1);
    }

    #[test]
    fn test_upsert_sensor() {
        let store = Store::open_in_memory().unwrap();

        let sensor = store.upsert_sensor("S001", Some("North Quarry")).unwrap();
        assert_eq!(sensor.id, "S001");
        assert_eq!(sensor.location.as_deref(), Some("North Quarry"));

        // None keeps the location
        let sensor = store.upsert_sensor("S001", None).unwrap();
        assert_eq!(sensor.location.as_deref(), Some("North Quarry"));

        let sensor = store.upsert_sensor("S001", Some("Steel Mill")).unwrap();
        assert_eq!(sensor.location.as_deref(), Some("Steel Mill"));
        assert!(sensor.last_seen >= sensor.first_seen);
    }

    #[test]
    fn test_insert_and_query_reading() {
        let store = Store::open_in_memory().unwrap();
        store.insert_reading("S001", &reading(1_000, 50)).unwrap();

        let readings = store
            .query_readings(&ReadingQuery::new().sensor("S001"))
            .unwrap();
        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].aqi, 50);
        assert_eq!(readings[0].to_reading(), reading(1_000, 50));
    }

    #[test]
    fn test_rejects_invalid_reading() {
        let store = Store::open_in_memory().unwrap();
        let mut bad = reading(1_000, 50);
        bad.co2 = -3.0;

        let err = store.insert_reading("S001", &bad).unwrap_err();
        assert!(matches!(err, Error::InvalidReading(_)));
        assert!(store.get_sensor("S001").unwrap().is_none());
    }

    #[test]
    fn test_batch_insert_is_atomic() {
        let store = Store::open_in_memory().unwrap();
        let mut batch: Vec<Reading> = (0..5).map(|i| reading(i * 1000, 40 + i as u32)).collect();
        assert_eq!(store.insert_readings("S001", &batch).unwrap(), 5);

        batch[3].pm25 = f64::NAN;
        assert!(store.insert_readings("S001", &batch).is_err());
        assert_eq!(store.count_readings(Some("S001")).unwrap(), 5);
    }

    #[test]
    fn test_failed_batch_leaves_no_sensor() {
        let store = Store::open_in_memory().unwrap();
        store.conn.execute_batch("DROP TABLE readings").unwrap();

        let batch = [reading(1_000, 40), reading(2_000, 41)];
        assert!(store.insert_readings("S009", &batch).is_err());
        assert!(store.get_sensor("S009").unwrap().is_none());
    }

    #[test]
    fn test_latest_and_recent_history() {
        let store = Store::open_in_memory().unwrap();
        let batch: Vec<Reading> = (0..30).map(|i| reading(i * 60_000, i as u32)).collect();
        store.insert_readings("S001", &batch).unwrap();
        store.insert_reading("S002", &reading(10, 99)).unwrap();

        let latest = store.latest_reading(Some("S001")).unwrap().unwrap();
        assert_eq!(latest.aqi, 29);

        let history = store.recent_history(Some("S001"), 24).unwrap();
        assert_eq!(history.len(), 24);
        assert_eq!(history[0].aqi, 6);
        assert_eq!(history[23].aqi, 29);
        assert!(history.windows(2).all(|w| w[0].timestamp < w[1].timestamp));

        assert_eq!(store.count_readings(None).unwrap(), 31);
    }

    #[test]
    fn test_latest_reading_empty() {
        let store = Store::open_in_memory().unwrap();
        assert!(store.latest_reading(None).unwrap().is_none());
        assert!(store.recent_history(None, 24).unwrap().is_empty());
    }

    #[test]
    fn test_query_time_range() {
        let store = Store::open_in_memory().unwrap();
        let base = datetime!(2024-05-01 00:00:00 UTC);
        let batch: Vec<Reading> = (0..10)
            .map(|h| reading(ms(base + Duration::hours(h)), h as u32))
            .collect();
        store.insert_readings("S001", &batch).unwrap();

        let query = ReadingQuery::new()
            .since(base + Duration::hours(2))
            .until(base + Duration::hours(5))
            .oldest_first();
        let aqi: Vec<u32> = store
            .query_readings(&query)
            .unwrap()
            .iter()
            .map(|r| r.aqi)
            .collect();
        assert_eq!(aqi, [2, 3, 4, 5]);
    }

    #[test]
    fn test_daily_average() {
        let store = Store::open_in_memory().unwrap();
        let day = datetime!(2024-05-01 00:00:00 UTC);
        store.insert_reading("S001", &reading(ms(day + Duration::hours(1)), 40)).unwrap();
        store.insert_reading("S001", &reading(ms(day + Duration::hours(23)), 60)).unwrap();
        store.insert_reading("S001", &reading(ms(day + Duration::hours(24)), 500)).unwrap();
        store.insert_reading("S002", &reading(ms(day + Duration::hours(2)), 200)).unwrap();

        let avg = store
            .daily_average(Some("S001"), Metric::Aqi, date!(2024 - 05 - 01))
            .unwrap();
        assert_eq!(avg, Some(50.0));

        let all = store
            .daily_average(None, Metric::Aqi, date!(2024 - 05 - 01))
            .unwrap();
        assert_eq!(all, Some(100.0));

        let co2 = store
            .daily_average(Some("S001"), Metric::Co2, date!(2024 - 05 - 01))
            .unwrap();
        assert_eq!(co2, Some(420.0));

        let empty = store
            .daily_average(None, Metric::Aqi, date!(2024 - 04 - 30))
            .unwrap();
        assert_eq!(empty, None);
    }

    #[test]
    fn test_sensor_status() {
        let store = Store::open_in_memory().unwrap();
        let now = datetime!(2024-05-01 12:00:00 UTC);
        store.upsert_sensor("S001", Some("North Quarry")).unwrap();
        store.upsert_sensor("S002", Some("Cement Plant")).unwrap();
        store.upsert_sensor("S003", None).unwrap();
        store
            .insert_reading("S001", &reading(ms(now - Duration::minutes(3)), 70))
            .unwrap();
        store
            .insert_reading("S002", &reading(ms(now - Duration::hours(2)), 80))
            .unwrap();

        let statuses = store.sensor_status(now, Duration::minutes(15)).unwrap();
        assert_eq!(statuses.len(), 3);

        assert_eq!(statuses[0].status, SensorState::Online);
        assert_eq!(statuses[0].aqi, 70);
        assert_eq!(statuses[0].minutes_since_update, Some(3));

        assert_eq!(statuses[1].status, SensorState::Offline);
        assert_eq!(statuses[1].aqi, 0);
        assert_eq!(statuses[1].minutes_since_update, Some(120));

        assert_eq!(statuses[2].status, SensorState::Offline);
        assert!(statuses[2].last_update.is_none());
    }

    #[test]
    fn test_stored_values_json_shape() {
        let store = Store::open_in_memory().unwrap();
        let now = datetime!(2024-05-01 12:00:00 UTC);
        store.upsert_sensor("S001", Some("North Quarry")).unwrap();
        store
            .insert_reading("S001", &reading(ms(now - Duration::minutes(5)), 70))
            .unwrap();

        let status = &store.sensor_status(now, Duration::minutes(15)).unwrap()[0];
        let json = serde_json::to_value(status).unwrap();
        assert_eq!(json["id"], "S001");
        assert_eq!(json["location"], "North Quarry");
        assert_eq!(json["status"], "online");
        assert_eq!(json["minutesSinceUpdate"], 5);
        assert_eq!(json["lastUpdate"], "2024-05-01T11:55:00Z");

        let stored = store.latest_reading(Some("S001")).unwrap().unwrap();
        let json = serde_json::to_value(&stored).unwrap();
        assert_eq!(json["sensor_id"], "S001");
        assert_eq!(json["timestamp"], ms(now - Duration::minutes(5)));
        assert_eq!(json["aqi"], 70);
    }

    #[test]
    fn test_import_csv() {
        let store = Store::open_in_memory().unwrap();
        let data = "\
timestamp,aqi,pm25,pm10,co2
1000,50,12.5,30,420
2000,55,,31,425
2024-05-01T10:00:00Z,60,14,32,430
bogus,1,1,1,1
4000,-5,1,1,1
5000,65,1,1,-2
";
        let result = store.import_csv(data.as_bytes(), "S009").unwrap();
        assert_eq!(result.total, 6);
        assert_eq!(result.imported, 3);
        assert_eq!(result.skipped, 3);
        assert!(result.errors[0].starts_with("line 5"));

        let history = store.recent_history(Some("S009"), 10).unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].pm25, 12.5);
        assert_eq!(history[1].pm25, 0.0);
        assert_eq!(history[2].timestamp, ms(datetime!(2024-05-01 10:00:00 UTC)));
    }

    #[test]
    fn test_import_csv_missing_columns() {
        let store = Store::open_in_memory().unwrap();
        let data = "timestamp,aqi,co2\n1000,40,410\n2000,42,415\n";
        let result = store.import_csv(data.as_bytes(), "S001").unwrap();
        assert_eq!(result.imported, 2);

        let latest = store.latest_reading(Some("S001")).unwrap().unwrap();
        assert_eq!(latest.pm10, 0.0);
        assert_eq!(latest.co2, 415.0);
    }

    #[test]
    fn test_import_csv_requires_timestamp_column() {
        let store = Store::open_in_memory().unwrap();
        let err = store.import_csv("aqi,co2\n1,2\n".as_bytes(), "S001").unwrap_err();
        assert!(err.to_string().contains("timestamp"));
    }

    #[test]
    fn test_import_csv_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("readings.csv");
        std::fs::write(&path, "timestamp,aqi,pm25,pm10,co2\n1,2,3,4,5\n").unwrap();

        let store = Store::open_in_memory().unwrap();
        let result = store.import_csv_file(&path, "S001").unwrap();
        assert_eq!(result.imported, 1);

        assert!(matches!(
            store.import_csv_file(dir.path().join("missing.csv"), "S001"),
            Err(Error::Io(_))
        ));
    }
}
