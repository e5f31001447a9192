//! Eggy - A state-managed HTTP server for egg-cooking countdown control
//!
//! This is the main entry point for the eggy application.

use std::sync::Arc;
use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use eggy::{
    api::create_router,
    config::Config,
    services::{HistoryStore, SettingsStore},
    state::AppState,
    tasks::countdown_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("eggy={},tower_http=info", config.log_level()))
        .init();

    info!("Starting eggy server v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, data_dir={}",
        config.host,
        config.port,
        config.data_dir.display()
    );

    // The history and settings files live under the data directory
    std::fs::create_dir_all(&config.data_dir)
        .with_context(|| format!("Failed to create data dir {}", config.data_dir.display()))?;
    let history = HistoryStore::new(&config.data_dir);
    let settings = SettingsStore::new(&config.data_dir);

    // Create application state
    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        history,
        settings,
    ));

    // Start the countdown background task
    let timer_state = Arc::clone(&state);
    tokio::spawn(async move {
        countdown_task(timer_state).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /timer/start          - Start or resume the countdown");
    info!("  POST /timer/pause          - Pause the countdown");
    info!("  POST /timer/toggle         - Pause if running, otherwise start");
    info!("  POST /timer/reset          - Back to idle at the full duration");
    info!("  POST /timer/preset/:id     - Select soft/medium/hard preset");
    info!("  POST /timer/custom         - Set a custom cook time");
    info!("  POST /notification/dismiss - Hide the completion notification");
    info!("  GET  /presets              - Egg preset catalog");
    info!("  GET  /status               - Current snapshot and server info");
    info!("  GET  /events               - Live snapshot stream (SSE)");
    info!("  GET  /history              - Completed cooks, newest first");
    info!("  GET  /theme                - Light/dark preference");
    info!("  GET  /health               - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
