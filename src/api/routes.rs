use axum::{routing::get, Router};

use crate::server::AppState;

use super::health::{health, stats};
use super::metrics::{connection_metrics, prometheus_metrics};

pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health & Stats
        .route("/health", get(health))
        .route("/stats", get(stats))
        // Connection gauge
        .route("/metrics", get(connection_metrics))
        .route("/metrics/prometheus", get(prometheus_metrics))
}
