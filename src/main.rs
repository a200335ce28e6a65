// =============================================================================
// Candle Lens — Main Entry Point
// =============================================================================
//
// Single-page web service: pick a ticker, a period, pattern categories, a
// strength threshold and a set of indicators; get back a three-pane chart, a
// table of the bars where patterns fired and a CSV export of everything.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod analysis;
mod api;
mod app_state;
mod indicators;
mod market_data;
mod patterns;
mod presentation;
mod selection;
mod server_config;
mod types;

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::server_config::{ServerConfig, CONFIG_FILE};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("╔══════════════════════════════════════════════════════════╗");
    info!("║        Candle Lens — Starting Up                        ║");
    info!("╚══════════════════════════════════════════════════════════╝");

    let mut config = ServerConfig::load(CONFIG_FILE).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        ServerConfig::default()
    });
    config.apply_env_overrides(|key| std::env::var(key).ok());

    info!(
        output_dir = %config.output_dir.display(),
        default_period = %config.default_period,
        indicators = config.default_indicators.len(),
        "Configuration ready"
    );

    // ── 2. Shared state ──────────────────────────────────────────────────
    let bind_addr = config.bind_addr.clone();
    let state = Arc::new(AppState::new(config)?);

    // ── 3. API server ────────────────────────────────────────────────────
    let app = api::rest::router(state);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind API server on {bind_addr}"))?;
    info!(addr = %bind_addr, "API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("API server failed")?;

    info!("Candle Lens shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
