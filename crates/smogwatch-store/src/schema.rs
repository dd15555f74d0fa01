//! Versioned database schema.
//!
//! Each entry in [`MIGRATIONS`] moves the schema up one version. Opening a
//! database applies every step above the recorded version in one
//! transaction. Timestamps are stored as Unix milliseconds.

use rusqlite::{Connection, OptionalExtension};
use tracing::{info, warn};

use crate::error::Result;

/// Ordered schema steps; step `i` produces version `i + 1`.
const MIGRATIONS: &[&str] = &[r#"
    CREATE TABLE sensors (
        id TEXT PRIMARY KEY,
        location TEXT,
        first_seen INTEGER NOT NULL,
        last_seen INTEGER NOT NULL
    );

    CREATE TABLE readings (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        sensor_id TEXT NOT NULL REFERENCES sensors(id),
        timestamp_ms INTEGER NOT NULL,
        aqi INTEGER NOT NULL DEFAULT 0,
        pm25 REAL NOT NULL DEFAULT 0,
        pm10 REAL NOT NULL DEFAULT 0,
        co2 REAL NOT NULL DEFAULT 0
    );

    CREATE INDEX idx_readings_sensor_time ON readings(sensor_id, timestamp_ms);
    CREATE INDEX idx_readings_time ON readings(timestamp_ms);
"#];

/// Schema version written by this build.
pub const SCHEMA_VERSION: i32 = MIGRATIONS.len() as i32;

/// Bring the schema up to [`SCHEMA_VERSION`].
pub fn initialize(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            version INTEGER NOT NULL
        );",
    )?;

    let current = schema_version(conn)?;
    if current > SCHEMA_VERSION {
        warn!(
            found = current,
            supported = SCHEMA_VERSION,
            "Database was written by a newer release"
        );
        return Ok(());
    }
    if current == SCHEMA_VERSION {
        return Ok(());
    }

    let tx = conn.unchecked_transaction()?;
    for (step, sql) in MIGRATIONS.iter().enumerate().skip(current as usize) {
        tx.execute_batch(sql)?;
        info!(version = step + 1, "Applied schema step");
    }
    tx.execute(
        "INSERT OR REPLACE INTO schema_version (id, version) VALUES (1, ?1)",
        [SCHEMA_VERSION],
    )?;
    tx.commit()?;

    Ok(())
}

/// Recorded schema version, 0 for a fresh database.
fn schema_version(conn: &Connection) -> Result<i32> {
    let version = conn
        .query_row("SELECT version FROM schema_version WHERE id = 1", [], |row| {
            row.get(0)
        })
        .optional()?;
    Ok(version.unwrap_or(0))
}
