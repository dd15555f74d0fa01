//! Command-line interface for SmogWatch pollution analysis.
//!
//! Reads sensor history from the SmogWatch database (or a CSV file) and runs
//! the forecasting, anomaly and correlation engines over it.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `predict` | Forecast each metric one hour ahead |
//! | `anomalies` | List readings far from the window mean |
//! | `correlations` | Describe relationships between metrics |
//! | `trend` | Compare the latest value with yesterday's average |
//! | `analyze` | Run all three engines together |
//! | `import` | Load a CSV file into the database |
//! | `watch` | Re-run the analysis on an interval |
//!
//! # Output Formats
//!
//! - **Text** (default): tables and colored risk levels
//! - **JSON**: the same structures the HTTP service returns
//!
//! # Environment
//!
//! - `SMOGWATCH_DB`: database path
//! - `SMOGWATCH_SENSOR`: default sensor ID
//! - `NO_COLOR`: disable colors
//!
//! # Example
//!
//! ```bash
//! smogwatch import readings.csv --sensor S001 --location "Harbour"
//! smogwatch predict --sensor S001
//! smogwatch anomalies --csv readings.csv --threshold 3 --format json
//! ```

// The binary lives in main.rs; the library re-exports the engine crates.

pub use smogwatch_core;
pub use smogwatch_store;
pub use smogwatch_types;
