//! Local data persistence for SmogWatch sensor readings.
//!
//! This crate provides SQLite-based storage for pollution readings and is
//! the history source for the analysis engine. A [`Store`] owns a single
//! connection; callers hold the handle and pass it where it is needed.
//!
//! # Features
//!
//! - Store readings per sensor, validated on insert
//! - Query by sensor and time range, with pagination
//! - Recent history windows in chronological order
//! - Daily averages for day-over-day trends
//! - Sensor online/offline status
//! - CSV import
//!
//! # Example
//!
//! ```no_run
//! use smogwatch_store::{Store, ReadingQuery};
//!
//! let store = Store::open_default()?;
//!
//! let history = store.recent_history(Some("S001"), 24)?;
//! println!("{} readings", history.len());
//!
//! let query = ReadingQuery::new().sensor("S001").limit(10);
//! let readings = store.query_readings(&query)?;
//! # Ok::<(), smogwatch_store::Error>(())
//! ```

mod error;
mod models;
mod queries;
mod schema;
mod store;

pub use error::{Error, Result};
pub use models::{ImportResult, SensorState, SensorStatus, StoredReading, StoredSensor};
pub use queries::ReadingQuery;
pub use store::Store;

/// Default database path following platform conventions.
///
/// - Linux: `~/.local/share/smogwatch/data.db`
/// - macOS: `~/Library/Application Support/smogwatch/data.db`
/// - Windows: `C:\Users\<user>\AppData\Local\smogwatch\data.db`
pub fn default_db_path() -> std::path::PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("smogwatch")
        .join("data.db")
}
