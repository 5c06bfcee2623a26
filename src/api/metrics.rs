//! Connection gauge endpoints.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;

use crate::error::Result;
use crate::metrics::{encode_metrics, ConnectionMetrics};
use crate::server::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsResponse {
    pub active_connections: usize,
}

/// GET /metrics - number of open SSE connections
pub async fn connection_metrics(State(state): State<AppState>) -> Json<MetricsResponse> {
    Json(MetricsResponse {
        active_connections: state.tracker.current_count(),
    })
}

/// GET /metrics/prometheus - Prometheus text exposition
pub async fn prometheus_metrics(State(state): State<AppState>) -> Result<impl IntoResponse> {
    ConnectionMetrics::set_active(state.tracker.current_count());

    let output = encode_metrics()?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        output,
    ))
}
