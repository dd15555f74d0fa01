//! HTTP REST API and real-time analysis stream for SmogWatch sensors.
//!
//! This crate provides a service that:
//! - Accepts sensor readings over HTTP and stores them in the local database
//! - Exposes stored readings, day-over-day trends and sensor status
//! - Runs the analysis engine on request (forecasts, anomalies, correlations)
//! - Streams analysis snapshots and new readings over WebSocket
//!
//! # REST API Endpoints
//!
//! - `GET /api/health` - Service health check
//! - `GET /api/status` - Counts and analysis settings
//! - `GET /api/data/latest` - Latest reading (404 when empty)
//! - `GET /api/data/historical` - Most recent readings, oldest first
//! - `GET /api/data/trend` - Latest value against yesterday's average
//! - `GET /api/data/sensors` - Online/offline status per sensor
//! - `POST /api/data/readings` - Ingest one reading
//! - `GET /api/analysis` - Full analysis snapshot
//! - `GET /api/analysis/predictions` - One-hour-ahead forecasts
//! - `GET /api/analysis/anomalies` - Z-score anomalies
//! - `GET /api/analysis/correlations` - Metric relationships
//! - `WS /api/ws` - Real-time analysis stream
//!
//! # Configuration
//!
//! The service reads configuration from `~/.config/smogwatch/server.toml`;
//! see [`config`] for the full format.

pub mod api;
pub mod config;
pub mod state;
pub mod ws;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use config::{AnalysisConfig, Config, ConfigError, ServerConfig, StorageConfig};
pub use state::{AnalysisSnapshot, AppState, ReadingEvent};

/// Build the full application router with tracing and CORS layers.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(api::router())
        .merge(ws::router())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use smogwatch_store::Store;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_app_serves_api_with_cors() {
        let state = AppState::new(Store::open_in_memory().unwrap(), Config::default()).unwrap();
        let response = app(state)
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .header("origin", "http://example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn test_app_unknown_route() {
        let state = AppState::new(Store::open_in_memory().unwrap(), Config::default()).unwrap();
        let response = app(state)
            .oneshot(Request::builder().uri("/api/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
