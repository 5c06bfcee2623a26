//! Prometheus metrics for the streaming endpoint.
//!
//! The JSON `/metrics` endpoint reads the tracker directly; these series
//! back the Prometheus exposition at `/metrics/prometheus`.

mod helpers;

pub use helpers::{encode_metrics, ConnectionMetrics};

use lazy_static::lazy_static;
use prometheus::{
    register_histogram, register_int_counter, register_int_gauge, Histogram, IntCounter, IntGauge,
};

/// Prefix for all metrics
const METRIC_PREFIX: &str = "sse";

lazy_static! {
    /// Number of open streaming connections, refreshed from the tracker at scrape time
    pub static ref CONNECTIONS_ACTIVE: IntGauge = register_int_gauge!(
        format!("{}_connections_active", METRIC_PREFIX),
        "Number of open SSE connections"
    ).unwrap();

    /// Streaming connections opened since process start
    pub static ref CONNECTIONS_OPENED: IntCounter = register_int_counter!(
        format!("{}_connections_opened_total", METRIC_PREFIX),
        "Total SSE connections opened"
    ).unwrap();

    /// Streaming connections closed since process start
    pub static ref CONNECTIONS_CLOSED: IntCounter = register_int_counter!(
        format!("{}_connections_closed_total", METRIC_PREFIX),
        "Total SSE connections closed"
    ).unwrap();

    /// How long streaming connections stayed open
    pub static ref CONNECTION_DURATION: Histogram = register_histogram!(
        format!("{}_connection_duration_seconds", METRIC_PREFIX),
        "SSE connection duration in seconds",
        vec![1.0, 10.0, 60.0, 300.0, 900.0, 3600.0, 14400.0, 86400.0]
    ).unwrap();
}
