//! Service entry point: load config, wire the client, serve webhooks.

use std::sync::Arc;

use tracker_webhooks::config::Config;
use tracker_webhooks::server::{self, AppState};
use tracker_webhooks::services::tracking_client::TrackingClient;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Bridges `log` records from the library via tracing-log.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        log::error!("[main] {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;

    let store = Arc::new(TrackingClient::new(config.tracker)?);
    let state = AppState {
        store,
        policy: Arc::new(config.projects),
    };

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    log::info!("[main] listening on {}", config.bind_addr);

    axum::serve(listener, server::routes(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("[main] shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("[main] failed to listen for shutdown signal: {}", e);
    }
}
