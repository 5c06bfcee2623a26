//! Atomic connection counter

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use super::{ConnectionGuard, TrackerStats};

/// Counts streaming connections that are currently open.
///
/// All mutation goes through single atomic read-modify-write operations;
/// reads never block writers. Registration is only reachable through
/// [`ConnectionTracker::track`], so a decrement without a prior increment
/// cannot be expressed outside this module.
#[derive(Debug, Default)]
pub struct ConnectionTracker {
    count: AtomicUsize,
    opened_total: AtomicU64,
    closed_total: AtomicU64,
}

impl ConnectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection and return the guard that unregisters it.
    pub fn track(self: &Arc<Self>) -> ConnectionGuard {
        self.increment();
        ConnectionGuard::new(Arc::clone(self))
    }

    /// Current number of open connections.
    ///
    /// This is a gauge reading: it may already be stale when the caller
    /// looks at it.
    pub fn current_count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    pub fn stats(&self) -> TrackerStats {
        TrackerStats {
            active_connections: self.current_count(),
            opened_total: self.opened_total.load(Ordering::Relaxed),
            closed_total: self.closed_total.load(Ordering::Relaxed),
        }
    }

    pub(super) fn increment(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
        self.opened_total.fetch_add(1, Ordering::Relaxed);
    }

    pub(super) fn decrement(&self) {
        let previous = self.count.fetch_sub(1, Ordering::SeqCst);
        debug_assert!(previous > 0, "connection tracker decremented below zero");
        self.closed_total.fetch_add(1, Ordering::Relaxed);
    }
}
