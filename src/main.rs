use std::time::Duration;

use anyhow::Result;
use tokio::net::TcpListener;
use tokio::signal;

use sse_connection_tracker::config::Settings;
use sse_connection_tracker::server::{create_app, AppState};
use sse_connection_tracker::shutdown::{GracefulShutdown, ShutdownConfig};
use sse_connection_tracker::telemetry::init_telemetry;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let settings = Settings::new()?;

    // Initialize tracing; the guard flushes exporters on exit
    let _telemetry = init_telemetry(&settings.otel)?;
    tracing::info!("Configuration loaded");

    // Create application state
    let state = AppState::new(settings.clone());
    tracing::info!("Application state initialized");

    let shutdown = GracefulShutdown::with_config(
        state.tracker.clone(),
        state.shutdown.clone(),
        ShutdownConfig {
            drain_timeout: Duration::from_secs(settings.shutdown.drain_timeout_secs),
            ..ShutdownConfig::default()
        },
    );

    // Create Axum app
    let app = create_app(state);

    // Start server
    let addr = settings.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal_handler(shutdown))
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal_handler(shutdown: GracefulShutdown) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let reason = tokio::select! {
        _ = ctrl_c => "ctrl_c",
        _ = terminate => "terminate",
    };

    tracing::info!(reason = reason, "Shutdown signal received, closing open streams");

    // Release every suspended stream before the server waits on its connections
    shutdown.execute(reason).await;
}
