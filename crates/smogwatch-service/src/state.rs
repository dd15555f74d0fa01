//! Application state shared across handlers.
//!
//! # Lock Ordering
//!
//! Handlers that need more than one lock acquire them in this order:
//! 1. `config`
//! 2. `store`
//! 3. `analyzer`
//!
//! The store lock is released before the analyzer runs, so a slow analysis
//! never blocks ingestion.
//!
//! # Broadcast Channel Behavior
//!
//! Every ingested reading is published on `readings_tx` for WebSocket
//! clients. The buffer holds `server.broadcast_buffer` events; slow
//! subscribers lose the oldest ones and senders never block.

use std::sync::Arc;

use serde::Serialize;
use time::OffsetDateTime;
use tokio::sync::{Mutex, RwLock, broadcast};

use smogwatch_core::{AnalysisReport, Analyzer};
use smogwatch_store::Store;
use smogwatch_types::Reading;

use crate::config::Config;

/// Shared application state.
pub struct AppState {
    /// The data store (wrapped in Mutex for thread-safe access).
    pub store: Mutex<Store>,
    /// Configuration.
    pub config: RwLock<Config>,
    /// The analysis engine. Locked because its weather source advances per call.
    pub analyzer: Mutex<Analyzer>,
    /// Broadcast channel for ingested readings.
    pub readings_tx: broadcast::Sender<ReadingEvent>,
}

impl AppState {
    /// Create new application state with an analyzer built from `config.analysis`.
    pub fn new(store: Store, config: Config) -> smogwatch_core::Result<Arc<Self>> {
        let analyzer = config.analysis.build_analyzer()?;
        Ok(Self::with_analyzer(store, config, analyzer))
    }

    /// Create new application state around an existing analyzer.
    pub fn with_analyzer(store: Store, config: Config, analyzer: Analyzer) -> Arc<Self> {
        let (readings_tx, _) = broadcast::channel(config.server.broadcast_buffer.max(1));
        Arc::new(Self {
            store: Mutex::new(store),
            config: RwLock::new(config),
            analyzer: Mutex::new(analyzer),
            readings_tx,
        })
    }

    /// The configured history window for `sensor_id`, oldest first.
    pub async fn history(&self, sensor_id: Option<&str>) -> smogwatch_store::Result<Vec<Reading>> {
        let window = self.config.read().await.analysis.history_window;
        let store = self.store.lock().await;
        store.recent_history(sensor_id, window)
    }

    /// Run the full analysis over the current window.
    pub async fn snapshot(&self, sensor_id: Option<&str>) -> smogwatch_store::Result<AnalysisSnapshot> {
        let history = self.history(sensor_id).await?;
        let report = self.analyzer.lock().await.analyze(&history);
        Ok(AnalysisSnapshot {
            timestamp: OffsetDateTime::now_utc(),
            sensor: sensor_id.map(str::to_string),
            report,
        })
    }
}

/// A reading accepted by the ingest endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingEvent {
    /// Sensor the reading belongs to.
    pub sensor_id: String,
    /// The reading data.
    pub reading: Reading,
}

/// Analysis results for one window at one instant.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSnapshot {
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    /// Sensor filter, `None` for all sensors.
    pub sensor: Option<String>,
    #[serde(flatten)]
    pub report: AnalysisReport,
}
