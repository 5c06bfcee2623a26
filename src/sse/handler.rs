//! SSE handler implementation.

use std::convert::Infallible;
use std::time::Duration;

use axum::{
    extract::State,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
};
use futures::stream::{self, Stream};

use crate::connection_tracker::ConnectionGuard;
use crate::metrics::ConnectionMetrics;
use crate::server::AppState;
use crate::shutdown::ShutdownListener;

/// SSE connect handler
#[tracing::instrument(name = "sse.connect", skip(state))]
pub async fn sse_handler(State(state): State<AppState>) -> Response {
    // Nothing between here and the returned response awaits, so registering
    // before the event-stream framing is built is not observable.
    let guard = state.tracker.track();
    let lifecycle = StreamLifecycle::new(guard);

    tracing::info!(
        connection_id = %lifecycle.guard.id(),
        active_connections = state.tracker.current_count(),
        "SSE connection established"
    );

    let stream = create_sse_stream(lifecycle, state.shutdown.subscribe());
    let sse = Sse::new(stream);

    match state.settings.sse.keep_alive_secs {
        Some(secs) if secs > 0 => sse
            .keep_alive(KeepAlive::new().interval(Duration::from_secs(secs)))
            .into_response(),
        _ => sse.into_response(),
    }
}

/// Create the SSE event stream.
///
/// The stream yields no events. It owns the lifecycle guard and finishes
/// only when shutdown is signalled; a client disconnect drops it before
/// that. Either way the guard is dropped with the stream.
fn create_sse_stream(
    lifecycle: StreamLifecycle,
    listener: ShutdownListener,
) -> impl Stream<Item = Result<Event, Infallible>> {
    stream::unfold(
        (lifecycle, listener),
        |(lifecycle, mut listener)| async move {
            listener.wait().await;
            tracing::debug!(
                connection_id = %lifecycle.guard.id(),
                "Closing SSE stream for shutdown"
            );
            drop(lifecycle);
            None::<(Result<Event, Infallible>, (StreamLifecycle, ShutdownListener))>
        },
    )
}

/// Logs and records metrics for one stream; the inner guard releases the
/// tracker registration right after.
struct StreamLifecycle {
    guard: ConnectionGuard,
}

impl StreamLifecycle {
    fn new(guard: ConnectionGuard) -> Self {
        ConnectionMetrics::record_opened();
        Self { guard }
    }
}

impl Drop for StreamLifecycle {
    fn drop(&mut self) {
        let duration = self.guard.elapsed().as_secs_f64();
        ConnectionMetrics::record_closed(duration);

        tracing::info!(
            connection_id = %self.guard.id(),
            duration_secs = duration,
            "SSE connection closed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use futures::StreamExt;

    use crate::connection_tracker::ConnectionTracker;
    use crate::shutdown::ShutdownSignal;

    #[tokio::test]
    async fn test_stream_ends_on_shutdown_and_releases() {
        let tracker = Arc::new(ConnectionTracker::new());
        let signal = ShutdownSignal::new();

        let stream = create_sse_stream(StreamLifecycle::new(tracker.track()), signal.subscribe());
        let consumer = tokio::spawn(async move { stream.collect::<Vec<_>>().await });

        tokio::task::yield_now().await;
        assert_eq!(tracker.current_count(), 1);

        signal.trigger();
        let events = consumer.await.unwrap();

        assert!(events.is_empty());
        assert_eq!(tracker.current_count(), 0);
    }

    #[tokio::test]
    async fn test_stream_ends_when_signal_source_dropped() {
        let tracker = Arc::new(ConnectionTracker::new());
        let signal = ShutdownSignal::new();

        let stream = create_sse_stream(StreamLifecycle::new(tracker.track()), signal.subscribe());
        let consumer = tokio::spawn(async move { stream.collect::<Vec<_>>().await });
        tokio::task::yield_now().await;

        // Dropping the last sender without triggering is a fault in the
        // signal source; the stream must still release.
        drop(signal);
        let events = tokio::time::timeout(Duration::from_secs(1), consumer)
            .await
            .expect("stream should end when the signal source is gone")
            .unwrap();

        assert!(events.is_empty());
        assert_eq!(tracker.current_count(), 0);
    }

    #[tokio::test]
    async fn test_dropping_unpolled_stream_releases() {
        let tracker = Arc::new(ConnectionTracker::new());
        let signal = ShutdownSignal::new();

        let stream = create_sse_stream(StreamLifecycle::new(tracker.track()), signal.subscribe());
        assert_eq!(tracker.current_count(), 1);

        drop(stream);
        assert_eq!(tracker.current_count(), 0);
    }

    #[tokio::test]
    async fn test_dropping_suspended_stream_releases() {
        let tracker = Arc::new(ConnectionTracker::new());
        let signal = ShutdownSignal::new();

        let mut stream = tokio_test::task::spawn(create_sse_stream(
            StreamLifecycle::new(tracker.track()),
            signal.subscribe(),
        ));

        // Parked inside the shutdown wait, no events.
        tokio_test::assert_pending!(stream.poll_next());
        assert_eq!(tracker.current_count(), 1);

        drop(stream);
        assert_eq!(tracker.current_count(), 0);
    }
}
