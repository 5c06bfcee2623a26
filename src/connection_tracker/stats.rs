//! Tracker statistics

use serde::Serialize;

/// Point-in-time snapshot of the tracker counters.
///
/// The fields are read independently, so under concurrent traffic
/// `opened_total - closed_total` may differ from `active_connections`
/// by the number of in-flight registrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrackerStats {
    pub active_connections: usize,
    pub opened_total: u64,
    pub closed_total: u64,
}
