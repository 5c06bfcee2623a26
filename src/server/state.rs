use std::sync::Arc;
use std::time::Instant;

use crate::config::Settings;
use crate::connection_tracker::ConnectionTracker;
use crate::shutdown::ShutdownSignal;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub tracker: Arc<ConnectionTracker>,
    pub shutdown: ShutdownSignal,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: Arc::new(settings),
            tracker: Arc::new(ConnectionTracker::new()),
            shutdown: ShutdownSignal::new(),
            started_at: Instant::now(),
        }
    }
}
