//! Scoped registration of a single connection

use std::sync::Arc;
use std::time::{Duration, Instant};

use uuid::Uuid;

use super::ConnectionTracker;

/// Holds one registration in a [`ConnectionTracker`].
///
/// Created only by [`ConnectionTracker::track`]. Not `Clone`: dropping it
/// is the single place the tracker is decremented.
#[derive(Debug)]
pub struct ConnectionGuard {
    id: Uuid,
    opened_at: Instant,
    tracker: Arc<ConnectionTracker>,
}

impl ConnectionGuard {
    pub(super) fn new(tracker: Arc<ConnectionTracker>) -> Self {
        Self {
            id: Uuid::new_v4(),
            opened_at: Instant::now(),
            tracker,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Time since the connection was registered
    pub fn elapsed(&self) -> Duration {
        self.opened_at.elapsed()
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.tracker.decrement();
    }
}
