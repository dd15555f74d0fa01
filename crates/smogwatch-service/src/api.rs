//! REST API endpoints for the smogwatch-service.
//!
//! Data endpoints expose stored readings; analysis endpoints run the engine
//! over the configured history window. Every endpoint that reads history
//! accepts an optional `sensor` query parameter; without it readings from
//! all sensors are merged.
//!
//! ## Error Handling
//!
//! All endpoints return structured JSON errors via [`AppError`]. Rejected
//! readings and bad parameters return HTTP 400, missing data 404, and other
//! store failures 500.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use tracing::{debug, info};

use smogwatch_core::{AnomalyDetector, CorrelationMode, analyze_correlations, daily_trend};
use smogwatch_store::{ReadingQuery, SensorStatus, StoredReading};
use smogwatch_types::{Anomaly, CorrelationInsight, DailyTrend, Metric, Reading, TrendPrediction};

use crate::state::{AnalysisSnapshot, AppState, ReadingEvent};

/// Default number of readings returned by `/api/data/historical`.
pub const DEFAULT_HISTORY_LIMIT: u32 = 24;
/// Largest page accepted by `/api/data/historical`.
pub const MAX_HISTORY_LIMIT: u32 = 1000;

/// Create the API router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        // Health and status
        .route("/api/health", get(health))
        .route("/api/status", get(get_status))
        // Stored data
        .route("/api/data/latest", get(get_latest))
        .route("/api/data/historical", get(get_historical))
        .route("/api/data/trend", get(get_trend))
        .route("/api/data/sensors", get(get_sensors))
        .route("/api/data/readings", post(ingest_reading))
        // Analysis
        .route("/api/analysis", get(get_analysis))
        .route("/api/analysis/predictions", get(get_predictions))
        .route("/api/analysis/anomalies", get(get_anomalies))
        .route("/api/analysis/correlations", get(get_correlations))
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

/// Health check endpoint.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: OffsetDateTime::now_utc(),
    })
}

/// Service status response.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub version: &'static str,
    /// Number of known sensors.
    pub sensors: usize,
    /// Number of stored readings.
    pub readings: u64,
    pub analysis: AnalysisSummary,
}

/// The analysis settings in effect.
#[derive(Debug, Serialize)]
pub struct AnalysisSummary {
    pub metrics: Vec<Metric>,
    pub history_window: u32,
    pub anomaly_threshold: f64,
    pub correlation_mode: CorrelationMode,
    pub refresh_interval_secs: u64,
}

async fn get_status(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, AppError> {
    let analysis = {
        let config = state.config.read().await;
        AnalysisSummary {
            metrics: config.analysis.metrics.clone(),
            history_window: config.analysis.history_window,
            anomaly_threshold: config.analysis.anomaly_threshold,
            correlation_mode: config.analysis.correlation_mode,
            refresh_interval_secs: config.analysis.refresh_interval_secs,
        }
    };

    let store = state.store.lock().await;
    Ok(Json(StatusResponse {
        version: env!("CARGO_PKG_VERSION"),
        sensors: store.list_sensors()?.len(),
        readings: store.count_readings(None)?,
        analysis,
    }))
}

/// Query parameters shared by endpoints that read one sensor's history.
#[derive(Debug, Default, Deserialize)]
pub struct SensorQuery {
    /// Restrict to one sensor.
    pub sensor: Option<String>,
}

/// Latest stored reading.
///
/// Returns [`AppError::NotFound`] when nothing has been stored yet.
async fn get_latest(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SensorQuery>,
) -> Result<Json<StoredReading>, AppError> {
    let store = state.store.lock().await;
    let reading = store
        .latest_reading(query.sensor.as_deref())?
        .ok_or_else(|| AppError::NotFound("No data available".to_string()))?;
    Ok(Json(reading))
}

/// Query parameters for `/api/data/historical`.
#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub sensor: Option<String>,
    /// Number of most recent readings (default 24, max 1000).
    pub limit: Option<u32>,
}

impl HistoryQuery {
    /// Validate the requested page size.
    pub fn validate(&self) -> Result<u32, AppError> {
        let limit = self.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
        if limit == 0 || limit > MAX_HISTORY_LIMIT {
            return Err(AppError::BadRequest(format!(
                "limit must be between 1 and {}",
                MAX_HISTORY_LIMIT
            )));
        }
        Ok(limit)
    }
}

/// Most recent readings in chronological order.
async fn get_historical(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<StoredReading>>, AppError> {
    let limit = query.validate()?;

    let mut reading_query = ReadingQuery::new().limit(limit);
    if let Some(sensor) = &query.sensor {
        reading_query = reading_query.sensor(sensor);
    }

    let store = state.store.lock().await;
    let mut readings = store.query_readings(&reading_query)?;
    readings.reverse();
    Ok(Json(readings))
}

/// Query parameters for `/api/data/trend`.
#[derive(Debug, Default, Deserialize)]
pub struct TrendQuery {
    pub sensor: Option<String>,
    /// Metric key or label (default `aqi`).
    pub metric: Option<String>,
}

/// Day-over-day trend response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendResponse {
    pub metric: String,
    pub current_value: f64,
    /// Average over the previous UTC day, if any readings exist.
    pub previous_day_average: Option<f64>,
    #[serde(flatten)]
    pub trend: DailyTrend,
}

/// Latest value compared with yesterday's average.
async fn get_trend(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TrendQuery>,
) -> Result<Json<TrendResponse>, AppError> {
    let metric = match query.metric.as_deref() {
        Some(name) => name
            .parse::<Metric>()
            .map_err(|e| AppError::BadRequest(e.to_string()))?,
        None => Metric::Aqi,
    };
    let sensor = query.sensor.as_deref();

    let store = state.store.lock().await;
    let latest = store
        .latest_reading(sensor)?
        .ok_or_else(|| AppError::NotFound("No data available".to_string()))?;

    let current = latest.to_reading().value(metric);
    let previous_day_average = match OffsetDateTime::now_utc().date().previous_day() {
        Some(day) => store.daily_average(sensor, metric, day)?,
        None => None,
    };

    Ok(Json(TrendResponse {
        metric: metric.label().to_string(),
        current_value: current,
        previous_day_average,
        trend: daily_trend(current, previous_day_average),
    }))
}

/// Online/offline status of every sensor.
async fn get_sensors(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<SensorStatus>>, AppError> {
    let offline_after = state.config.read().await.analysis.offline_after_secs;
    let offline_after = Duration::seconds(i64::try_from(offline_after).unwrap_or(i64::MAX));

    let store = state.store.lock().await;
    let statuses = store.sensor_status(OffsetDateTime::now_utc(), offline_after)?;
    Ok(Json(statuses))
}

/// Request body for `POST /api/data/readings`.
#[derive(Debug, Deserialize)]
pub struct IngestRequest {
    /// Sensor the reading belongs to.
    pub sensor: String,
    /// Installation site, stored with the sensor.
    #[serde(default)]
    pub location: Option<String>,
    /// The reading. A missing or zero timestamp means "now".
    pub reading: Reading,
}

/// Response for an accepted reading.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestResponse {
    pub id: i64,
    pub sensor_id: String,
    pub timestamp: i64,
}

/// Store a reading and publish it to WebSocket clients.
///
/// # Errors
///
/// - [`AppError::BadRequest`] if the sensor ID is blank or the reading has
///   negative or non-finite values.
async fn ingest_reading(
    State(state): State<Arc<AppState>>,
    Json(request): Json<IngestRequest>,
) -> Result<(StatusCode, Json<IngestResponse>), AppError> {
    let sensor_id = request.sensor.trim();
    if sensor_id.is_empty() {
        return Err(AppError::BadRequest("sensor cannot be empty".to_string()));
    }

    let mut reading = request.reading;
    if reading.timestamp == 0 {
        reading.timestamp = (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64;
    }

    let id = {
        let store = state.store.lock().await;
        let id = store.insert_reading(sensor_id, &reading)?;
        if let Some(location) = request.location.as_deref() {
            store.upsert_sensor(sensor_id, Some(location))?;
        }
        id
    };

    debug!(sensor = sensor_id, id, "Accepted reading");

    // No subscribers is fine
    let _ = state.readings_tx.send(ReadingEvent {
        sensor_id: sensor_id.to_string(),
        reading,
    });

    Ok((
        StatusCode::CREATED,
        Json(IngestResponse {
            id,
            sensor_id: sensor_id.to_string(),
            timestamp: reading.timestamp,
        }),
    ))
}

/// Full analysis of the current window.
async fn get_analysis(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SensorQuery>,
) -> Result<Json<AnalysisSnapshot>, AppError> {
    let snapshot = state.snapshot(query.sensor.as_deref()).await?;
    info!(
        samples = snapshot.report.samples,
        anomalies = snapshot.report.anomalies.len(),
        "Served analysis"
    );
    Ok(Json(snapshot))
}

/// One-hour-ahead forecasts.
async fn get_predictions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SensorQuery>,
) -> Result<Json<Vec<TrendPrediction>>, AppError> {
    let history = state.history(query.sensor.as_deref()).await?;
    let predictions = state.analyzer.lock().await.predictions(&history);
    Ok(Json(predictions))
}

/// Query parameters for `/api/analysis/anomalies`.
#[derive(Debug, Default, Deserialize)]
pub struct AnomalyQuery {
    pub sensor: Option<String>,
    /// Z-score threshold overriding `analysis.anomaly_threshold`.
    pub threshold: Option<f64>,
}

/// Readings far from the window mean.
async fn get_anomalies(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AnomalyQuery>,
) -> Result<Json<Vec<Anomaly>>, AppError> {
    let detector = match query.threshold {
        Some(threshold) => {
            let metrics = state.config.read().await.analysis.metrics.clone();
            Some(
                AnomalyDetector::new(threshold)
                    .map_err(|e| AppError::BadRequest(e.to_string()))?
                    .with_metrics(metrics),
            )
        }
        None => None,
    };

    let history = state.history(query.sensor.as_deref()).await?;
    let anomalies = match detector {
        Some(detector) => detector.detect(&history),
        None => state.analyzer.lock().await.anomalies(&history),
    };
    Ok(Json(anomalies))
}

/// Query parameters for `/api/analysis/correlations`.
#[derive(Debug, Default, Deserialize)]
pub struct CorrelationQuery {
    pub sensor: Option<String>,
    /// `static` or `computed`, overriding `analysis.correlation_mode`.
    pub mode: Option<CorrelationMode>,
}

/// Relationships between the tracked metrics.
async fn get_correlations(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CorrelationQuery>,
) -> Result<Json<Vec<CorrelationInsight>>, AppError> {
    let metrics = state.config.read().await.analysis.metrics.clone();
    let history = state.history(query.sensor.as_deref()).await?;

    let insights = match query.mode {
        Some(mode) => analyze_correlations(&history, &metrics, mode),
        None => state.analyzer.lock().await.correlations(&history),
    };
    Ok(Json(insights))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Store(smogwatch_store::Error),
}

impl From<smogwatch_store::Error> for AppError {
    fn from(e: smogwatch_store::Error) -> Self {
        match e {
            smogwatch_store::Error::InvalidReading(msg) => AppError::BadRequest(msg),
            smogwatch_store::Error::SensorNotFound(id) => {
                AppError::NotFound(format!("Sensor not found: {}", id))
            }
            other => AppError::Store(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        };

        let body = serde_json::json!({
            "error": message,
        });

        (status, Json(body)).into_response()
    }
}
