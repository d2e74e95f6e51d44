// Vendor Directory - Web Server
//
// Reads config from env vars:
//   VENDOR_DIR_DATA_DIR            - store directory (default: data)
//   VENDOR_DIR_BIND_ADDR           - listen address (default: 0.0.0.0:3000)
//   VENDOR_DIR_FETCH_TIMEOUT_SECS  - import fetch timeout (default: 8)
//   VENDOR_DIR_FREE_RESULTS        - search results shown before the gate (default: 3)

use anyhow::{Context, Result};
use tracing::info;
use vendor_directory::server::{build_router, AppState};
use vendor_directory::AppConfig;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,vendor_directory=debug,tower_http=info".into()),
        )
        .init();

    let config = AppConfig::from_env().context("Failed to read configuration")?;
    let state = AppState::new(&config)?;
    info!(data_dir = %config.store.data_dir.display(), "record stores ready");

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;

    info!(addr = %config.bind_addr, "server running");

    axum::serve(listener, app)
        .await
        .context("Server terminated")?;

    Ok(())
}
