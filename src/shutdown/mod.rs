//! Graceful shutdown handling for the streaming service.
//!
//! Open SSE streams have no natural end, so the HTTP server's own graceful
//! shutdown would wait on them forever. The shutdown sequence:
//! 1. Flips the [`ShutdownSignal`] so every suspended stream resumes and
//!    releases its tracker registration
//! 2. Waits for the tracker to drain to zero (bounded by a timeout)

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::timeout;

use crate::connection_tracker::ConnectionTracker;

/// One-shot, process-wide shutdown notification.
///
/// Backed by a `watch` channel so a stream that subscribes after the
/// signal was raised still observes it.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    tx: Arc<watch::Sender<bool>>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Raise the signal. Later calls are no-ops.
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> ShutdownListener {
        ShutdownListener {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving half handed to each stream.
#[derive(Debug)]
pub struct ShutdownListener {
    rx: watch::Receiver<bool>,
}

impl ShutdownListener {
    /// Resolves once shutdown is signalled, or when the signal source is
    /// gone (treated the same way).
    pub async fn wait(&mut self) {
        if self.rx.wait_for(|triggered| *triggered).await.is_err() {
            tracing::debug!("Shutdown signal source dropped");
        }
    }
}

/// Configuration for graceful shutdown behavior
#[derive(Debug, Clone)]
pub struct ShutdownConfig {
    /// Time to wait for open streams to release (default: 10 seconds)
    pub drain_timeout: Duration,
    /// How often the tracker is polled while draining
    pub poll_interval: Duration,
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            drain_timeout: Duration::from_secs(10),
            poll_interval: Duration::from_millis(100),
        }
    }
}

/// Drives the shutdown sequence for streaming connections
pub struct GracefulShutdown {
    tracker: Arc<ConnectionTracker>,
    signal: ShutdownSignal,
    config: ShutdownConfig,
}

impl GracefulShutdown {
    pub fn new(tracker: Arc<ConnectionTracker>, signal: ShutdownSignal) -> Self {
        Self::with_config(tracker, signal, ShutdownConfig::default())
    }

    pub fn with_config(
        tracker: Arc<ConnectionTracker>,
        signal: ShutdownSignal,
        config: ShutdownConfig,
    ) -> Self {
        Self {
            tracker,
            signal,
            config,
        }
    }

    #[tracing::instrument(
        name = "graceful_shutdown",
        skip(self),
        fields(active_connections = self.tracker.current_count())
    )]
    pub async fn execute(&self, reason: &str) -> ShutdownResult {
        let start = std::time::Instant::now();
        let connections_at_start = self.tracker.current_count();

        tracing::info!(reason = %reason, "Signalling open streams to close");
        self.signal.trigger();

        let remaining = self.wait_for_connections_to_close().await;

        let result = ShutdownResult {
            connections_at_start,
            connections_closed: connections_at_start.saturating_sub(remaining),
            remaining,
            duration: start.elapsed(),
        };

        tracing::info!(
            connections_closed = result.connections_closed,
            remaining = result.remaining,
            duration_ms = result.duration.as_millis(),
            "Graceful shutdown completed"
        );

        result
    }

    /// Wait for the tracker to reach zero; returns what is still open.
    async fn wait_for_connections_to_close(&self) -> usize {
        if self.tracker.current_count() == 0 {
            return 0;
        }

        let tracker = &self.tracker;
        let poll_interval = self.config.poll_interval;
        let wait_future = async {
            while tracker.current_count() > 0 {
                tokio::time::sleep(poll_interval).await;
            }
        };

        let _ = timeout(self.config.drain_timeout, wait_future).await;

        let remaining = self.tracker.current_count();
        if remaining > 0 {
            tracing::warn!(
                remaining_connections = remaining,
                "Some connections did not close gracefully"
            );
        }
        remaining
    }
}

/// Result of a graceful shutdown operation
#[derive(Debug, Default)]
pub struct ShutdownResult {
    /// Open connections when shutdown began
    pub connections_at_start: usize,
    /// Connections released during the drain
    pub connections_closed: usize,
    /// Connections still registered when the drain ended
    pub remaining: usize,
    /// Total time taken for shutdown
    pub duration: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_shutdown_no_connections() {
        let tracker = Arc::new(ConnectionTracker::new());
        let signal = ShutdownSignal::new();
        let shutdown = GracefulShutdown::new(tracker, signal.clone());

        let result = shutdown.execute("test shutdown").await;

        assert!(signal.is_triggered());
        assert_eq!(result.connections_at_start, 0);
        assert_eq!(result.connections_closed, 0);
        assert_eq!(result.remaining, 0);
    }

    #[tokio::test]
    async fn test_late_subscriber_sees_signal() {
        let signal = ShutdownSignal::new();
        signal.trigger();

        let mut listener = signal.subscribe();
        tokio::time::timeout(Duration::from_secs(1), listener.wait())
            .await
            .expect("listener should resolve immediately");
    }

    #[tokio::test]
    async fn test_drains_listening_tasks() {
        let tracker = Arc::new(ConnectionTracker::new());
        let signal = ShutdownSignal::new();

        for _ in 0..3 {
            let guard = tracker.track();
            let mut listener = signal.subscribe();
            tokio::spawn(async move {
                let _guard = guard;
                listener.wait().await;
            });
        }
        assert_eq!(tracker.current_count(), 3);

        let shutdown = GracefulShutdown::new(tracker.clone(), signal);
        let result = shutdown.execute("test").await;

        assert_eq!(result.connections_at_start, 3);
        assert_eq!(result.connections_closed, 3);
        assert_eq!(result.remaining, 0);
        assert_eq!(tracker.current_count(), 0);
    }

    #[tokio::test]
    async fn test_drain_timeout_reports_remaining() {
        let tracker = Arc::new(ConnectionTracker::new());
        let _stuck = tracker.track();

        let config = ShutdownConfig {
            drain_timeout: Duration::from_millis(50),
            poll_interval: Duration::from_millis(10),
        };
        let shutdown = GracefulShutdown::with_config(tracker, ShutdownSignal::new(), config);
        let result = shutdown.execute("test").await;

        assert_eq!(result.connections_at_start, 1);
        assert_eq!(result.remaining, 1);
        assert_eq!(result.connections_closed, 0);
    }

    #[test]
    fn test_shutdown_config_defaults() {
        let config = ShutdownConfig::default();
        assert_eq!(config.drain_timeout, Duration::from_secs(10));
        assert_eq!(config.poll_interval, Duration::from_millis(100));
    }
}
