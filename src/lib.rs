// Shared components
pub mod config;
pub mod error;
pub mod metrics;

// Domain layer
pub mod connection_tracker;

// Application layer
pub mod api;
pub mod server;
pub mod sse;

// Supporting modules
pub mod shutdown;
pub mod telemetry;
