//! API layer - HTTP endpoint handlers.

mod health;
mod metrics;
mod routes;

pub use health::{health, stats, HealthResponse};
pub use metrics::{connection_metrics, prometheus_metrics, MetricsResponse};
pub use routes::api_routes;
