//! Error types for smogwatch-store.

use std::path::PathBuf;

/// Result type for smogwatch-store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in smogwatch-store.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Database error from SQLite.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Failed to create database directory.
    #[error("Failed to create database directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Sensor not found in database.
    #[error("Sensor not found: {0}")]
    SensorNotFound(String),

    /// Reading rejected before insertion.
    #[error("Invalid reading: {0}")]
    InvalidReading(String),

    /// CSV parse error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
