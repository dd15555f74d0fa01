//! WebSocket handler for real-time analysis.
//!
//! Each client receives an analysis snapshot on connect, another every
//! `analysis.refresh_interval_secs`, and every reading accepted by the
//! ingest endpoint in between. Messages are JSON objects tagged by `type`:
//!
//! ```json
//! {"type": "snapshot", "timestamp": "...", "samples": 24, "predictions": [...], ...}
//! {"type": "reading", "sensorId": "S001", "reading": {...}}
//! ```

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    extract::{
        Query, State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::IntoResponse,
    routing::get,
};
use futures::{SinkExt, StreamExt};
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use crate::api::SensorQuery;
use crate::state::{AnalysisSnapshot, AppState, ReadingEvent};

/// Create the WebSocket router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/ws", get(ws_handler))
}

/// A message pushed to WebSocket clients.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WsMessage {
    Snapshot(AnalysisSnapshot),
    Reading(ReadingEvent),
}

impl WsMessage {
    fn to_text(&self) -> Option<Message> {
        match serde_json::to_string(self) {
            Ok(json) => Some(Message::Text(json.into())),
            Err(e) => {
                warn!("Failed to serialize message: {}", e);
                None
            }
        }
    }
}

/// WebSocket upgrade handler.
async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<SensorQuery>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state, query.sensor))
}

/// Build a snapshot message, logging store failures.
async fn snapshot_message(state: &AppState, sensor: Option<&str>) -> Option<Message> {
    match state.snapshot(sensor).await {
        Ok(snapshot) => WsMessage::Snapshot(snapshot).to_text(),
        Err(e) => {
            warn!("Failed to build analysis snapshot: {}", e);
            None
        }
    }
}

/// Handle a WebSocket connection.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>, sensor: Option<String>) {
    let (mut sender, mut receiver) = socket.split();

    // Subscribe before the first snapshot so no reading is missed
    let mut rx = state.readings_tx.subscribe();
    let refresh_secs = state.config.read().await.analysis.refresh_interval_secs;

    info!(sensor = sensor.as_deref(), "WebSocket client connected");

    if let Some(message) = snapshot_message(&state, sensor.as_deref()).await
        && sender.send(message).await.is_err()
    {
        info!("WebSocket client disconnected during initial snapshot");
        return;
    }

    debug!("Sent initial snapshot to WebSocket client");

    let mut send_task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(refresh_secs.max(1)));
        // The first tick completes immediately; the initial snapshot covers it
        ticker.tick().await;

        loop {
            let message = tokio::select! {
                _ = ticker.tick() => snapshot_message(&state, sensor.as_deref()).await,
                event = rx.recv() => match event {
                    Ok(event) => {
                        if sensor.as_deref().is_some_and(|s| s != event.sensor_id) {
                            continue;
                        }
                        WsMessage::Reading(event).to_text()
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "WebSocket client lagging, readings dropped");
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                },
            };

            if let Some(message) = message
                && sender.send(message).await.is_err()
            {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn(async move {
        while let Some(result) = receiver.next().await {
            match result {
                Ok(Message::Close(_)) => break,
                Ok(Message::Ping(_)) => {
                    // Pong is handled automatically by axum
                    debug!("Received ping");
                }
                Ok(_) => {}
                Err(e) => {
                    warn!("WebSocket receive error: {}", e);
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => {
            recv_task.abort();
        },
        _ = &mut recv_task => {
            send_task.abort();
        },
    }

    info!("WebSocket client disconnected");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use smogwatch_core::{AnalysisReport, Analyzer, FixedWeather, PredictorConfig};
    use smogwatch_store::Store;
    use smogwatch_types::Reading;
    use time::OffsetDateTime;
    use tower::ServiceExt;

    use crate::config::Config;

    fn test_state() -> Arc<AppState> {
        let analyzer = Analyzer::new(PredictorConfig::default())
            .unwrap()
            .with_weather(FixedWeather::neutral());
        AppState::with_analyzer(Store::open_in_memory().unwrap(), Config::default(), analyzer)
    }

    #[test]
    fn test_snapshot_message_shape() {
        let message = WsMessage::Snapshot(AnalysisSnapshot {
            timestamp: OffsetDateTime::UNIX_EPOCH,
            sensor: Some("S001".to_string()),
            report: AnalysisReport {
                samples: 0,
                predictions: Vec::new(),
                anomalies: Vec::new(),
                correlations: Vec::new(),
            },
        });

        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["type"], "snapshot");
        assert_eq!(json["timestamp"], "1970-01-01T00:00:00Z");
        assert_eq!(json["sensor"], "S001");
        assert_eq!(json["samples"], 0);
        assert!(json["predictions"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_reading_message_shape() {
        let message = WsMessage::Reading(ReadingEvent {
            sensor_id: "S002".to_string(),
            reading: Reading {
                timestamp: 1_700_000_000_000,
                aqi: 77,
                ..Default::default()
            },
        });

        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["type"], "reading");
        assert_eq!(json["sensorId"], "S002");
        assert_eq!(json["reading"]["aqi"], 77);
    }

    #[tokio::test]
    async fn test_snapshot_message_from_state() {
        let state = test_state();
        let message = snapshot_message(&state, None).await.unwrap();
        let Message::Text(text) = message else {
            panic!("expected a text message");
        };
        let json: serde_json::Value = serde_json::from_str(text.as_str()).unwrap();
        assert_eq!(json["type"], "snapshot");
        assert_eq!(json["samples"], 0);
    }

    #[tokio::test]
    async fn test_ws_route_requires_upgrade() {
        let app = router().with_state(test_state());
        let response = app
            .oneshot(Request::builder().uri("/api/ws").body(Body::empty()).unwrap())
            .await
            .unwrap();

        // A plain GET without upgrade headers is rejected
        assert_ne!(response.status(), StatusCode::OK);
        assert!(response.status().is_client_error());
    }
}
