//! Metrics helper structs for convenient metric recording

use prometheus::{Encoder, TextEncoder};

use super::{CONNECTIONS_ACTIVE, CONNECTIONS_CLOSED, CONNECTIONS_OPENED, CONNECTION_DURATION};

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}

/// Helper struct for recording connection lifecycle metrics
pub struct ConnectionMetrics;

impl ConnectionMetrics {
    pub fn record_opened() {
        CONNECTIONS_OPENED.inc();
    }

    /// Record a closed connection and how long it was open
    pub fn record_closed(duration_secs: f64) {
        CONNECTIONS_CLOSED.inc();
        CONNECTION_DURATION.observe(duration_secs);
    }

    /// Publish the tracker's current reading to the gauge
    pub fn set_active(count: usize) {
        CONNECTIONS_ACTIVE.set(i64::try_from(count).unwrap_or(i64::MAX));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_contains_connection_series() {
        ConnectionMetrics::set_active(2);
        ConnectionMetrics::record_opened();
        ConnectionMetrics::record_closed(0.5);

        let output = encode_metrics().unwrap();
        assert!(output.contains("sse_connections_active"));
        assert!(output.contains("sse_connections_opened_total"));
        assert!(output.contains("sse_connections_closed_total"));
        assert!(output.contains("sse_connection_duration_seconds"));
    }
}
