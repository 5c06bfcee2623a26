//! Process-wide gauge of open streaming connections.
//!
//! The tracker is created once by the composition root (`AppState`) and
//! shared by reference. A connection is registered with
//! [`ConnectionTracker::track`], which hands back a [`ConnectionGuard`];
//! the matching unregistration happens when that guard is dropped, so
//! every exit path of a handler (normal close, client abort, task
//! cancellation, panic unwind) releases exactly once.

mod guard;
mod stats;
mod tracker;

pub use guard::ConnectionGuard;
pub use stats::TrackerStats;
pub use tracker::ConnectionTracker;
