//! Server configuration.
//!
//! Loaded from `server.toml`. Every section is optional and falls back to
//! its defaults:
//!
//! ```toml
//! [server]
//! bind = "127.0.0.1:8080"
//!
//! [storage]
//! path = "/var/lib/smogwatch/data.db"
//!
//! [analysis]
//! metrics = ["aqi", "co2"]
//! history_window = 24
//! anomaly_threshold = 2.5
//! refresh_interval_secs = 10
//! correlation_mode = "computed"
//!
//! [analysis.thresholds.aqi]
//! medium = 50.0
//! high = 100.0
//! critical = 150.0
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use smogwatch_core::anomaly::DEFAULT_THRESHOLD;
use smogwatch_core::predict::MIN_PREDICTION_SAMPLES;
use smogwatch_core::{
    Analyzer, AnomalyDetector, CorrelationMode, PredictorConfig, SeasonalModel,
    SimulatedWeather, ThresholdTable,
};
use smogwatch_types::Metric;

/// Server configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server settings.
    pub server: ServerConfig,
    /// Storage settings.
    pub storage: StorageConfig,
    /// Analysis engine settings.
    pub analysis: AnalysisConfig,
}

impl Config {
    /// Load configuration from the default path.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = default_config_path();
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Read {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.as_ref().to_path_buf(),
            source: e,
        })
    }

    /// Load and validate configuration from a file.
    pub fn load_validated<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Self::load(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;

        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        std::fs::write(path.as_ref(), content).map_err(|e| ConfigError::Write {
            path: path.as_ref().to_path_buf(),
            source: e,
        })
    }

    /// Validate the configuration and return any errors.
    ///
    /// This checks:
    /// - Server bind address is valid (host:port format)
    /// - Storage path is not empty
    /// - Analysis window, threshold and refresh interval are in range
    /// - The metric list and risk thresholds are usable by the engine
    ///
    /// # Example
    ///
    /// ```
    /// use smogwatch_service::Config;
    ///
    /// let config = Config::default();
    /// assert!(config.validate().is_ok());
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        errors.extend(self.server.validate());
        errors.extend(self.storage.validate());
        errors.extend(self.analysis.validate());

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:8080").
    pub bind: String,
    /// Capacity of the ingest broadcast channel feeding WebSocket clients.
    pub broadcast_buffer: usize,
}

/// Default ingest broadcast capacity.
pub const DEFAULT_BROADCAST_BUFFER: usize = 100;

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
            broadcast_buffer: DEFAULT_BROADCAST_BUFFER,
        }
    }
}

impl ServerConfig {
    /// Validate server configuration.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.bind.is_empty() {
            errors.push(ValidationError::new(
                "server.bind",
                "bind address cannot be empty",
            ));
        } else {
            let parts: Vec<&str> = self.bind.rsplitn(2, ':').collect();
            if parts.len() != 2 {
                errors.push(ValidationError::new(
                    "server.bind",
                    format!(
                        "invalid bind address '{}': expected format 'host:port'",
                        self.bind
                    ),
                ));
            } else {
                match parts[0].parse::<u16>() {
                    Ok(0) => {
                        errors.push(ValidationError::new("server.bind", "port cannot be 0"));
                    }
                    Err(_) => {
                        errors.push(ValidationError::new(
                            "server.bind",
                            format!("invalid port '{}'", parts[0]),
                        ));
                    }
                    Ok(_) => {}
                }
            }
        }

        if self.broadcast_buffer == 0 {
            errors.push(ValidationError::new(
                "server.broadcast_buffer",
                "broadcast buffer must hold at least one message",
            ));
        }

        errors
    }
}

/// Storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Database file path.
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: smogwatch_store::default_db_path(),
        }
    }
}

impl StorageConfig {
    /// Validate storage configuration.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.path.as_os_str().is_empty() {
            errors.push(ValidationError::new(
                "storage.path",
                "database path cannot be empty",
            ));
        }

        errors
    }
}

/// Smallest accepted history window.
pub const MIN_HISTORY_WINDOW: u32 = MIN_PREDICTION_SAMPLES as u32;
/// Largest accepted history window.
pub const MAX_HISTORY_WINDOW: u32 = 10_000;
/// Minimum WebSocket refresh interval in seconds.
pub const MIN_REFRESH_INTERVAL: u64 = 1;
/// Maximum WebSocket refresh interval in seconds (1 hour).
pub const MAX_REFRESH_INTERVAL: u64 = 3600;

/// Analysis engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Metrics to forecast and scan, in output order.
    pub metrics: Vec<Metric>,
    /// Number of most recent readings analysed per request.
    pub history_window: u32,
    /// Z-score above which a reading is anomalous.
    pub anomaly_threshold: f64,
    /// Seconds between WebSocket analysis snapshots.
    pub refresh_interval_secs: u64,
    /// Fixed insight table or computed coefficients.
    pub correlation_mode: CorrelationMode,
    /// Hour-of-day scaling of forecasts.
    pub seasonal: SeasonalModel,
    /// Risk thresholds per metric.
    pub thresholds: ThresholdTable,
    /// A sensor is offline once its last reading is older than this.
    pub offline_after_secs: u64,
    /// Seed for the simulated weather; entropy when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather_seed: Option<u64>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            metrics: Metric::ALL.to_vec(),
            history_window: 24,
            anomaly_threshold: DEFAULT_THRESHOLD,
            refresh_interval_secs: 10,
            correlation_mode: CorrelationMode::default(),
            seasonal: SeasonalModel::default(),
            thresholds: ThresholdTable::default(),
            offline_after_secs: 15 * 60,
            weather_seed: None,
        }
    }
}

impl AnalysisConfig {
    /// Validate analysis configuration.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if !(MIN_HISTORY_WINDOW..=MAX_HISTORY_WINDOW).contains(&self.history_window) {
            errors.push(ValidationError::new(
                "analysis.history_window",
                format!(
                    "history window {} is out of range ({}-{})",
                    self.history_window, MIN_HISTORY_WINDOW, MAX_HISTORY_WINDOW
                ),
            ));
        }

        if !self.anomaly_threshold.is_finite() || self.anomaly_threshold <= 0.0 {
            errors.push(ValidationError::new(
                "analysis.anomaly_threshold",
                format!(
                    "anomaly threshold must be a positive number, got {}",
                    self.anomaly_threshold
                ),
            ));
        }

        if !(MIN_REFRESH_INTERVAL..=MAX_REFRESH_INTERVAL).contains(&self.refresh_interval_secs) {
            errors.push(ValidationError::new(
                "analysis.refresh_interval_secs",
                format!(
                    "refresh interval {}s is out of range ({}-{}s)",
                    self.refresh_interval_secs, MIN_REFRESH_INTERVAL, MAX_REFRESH_INTERVAL
                ),
            ));
        }

        if self.offline_after_secs == 0 {
            errors.push(ValidationError::new(
                "analysis.offline_after_secs",
                "offline timeout must be greater than 0",
            ));
        }

        if let Err(e) = self.predictor_config().validate() {
            errors.push(ValidationError::new("analysis", e.to_string()));
        }

        errors
    }

    /// Predictor settings derived from this section.
    pub fn predictor_config(&self) -> PredictorConfig {
        PredictorConfig::default()
            .metrics(self.metrics.clone())
            .thresholds(self.thresholds.clone())
            .seasonal(self.seasonal)
    }

    /// Build an analyzer from this section.
    pub fn build_analyzer(&self) -> smogwatch_core::Result<Analyzer> {
        let detector =
            AnomalyDetector::new(self.anomaly_threshold)?.with_metrics(self.metrics.clone());
        let analyzer = Analyzer::new(self.predictor_config())?
            .with_detector(detector)
            .with_correlation_mode(self.correlation_mode);

        Ok(match self.weather_seed {
            Some(seed) => analyzer.with_weather(SimulatedWeather::seeded(seed)),
            None => analyzer,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),
    #[error("Failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    Validation(Vec<ValidationError>),
}

/// A single validation error with context.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The field path (e.g., `server.bind` or `analysis.history_window`).
    pub field: String,
    /// Description of the validation failure.
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Default configuration file path.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("smogwatch")
        .join("server.toml")
}
