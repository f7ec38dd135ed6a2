pub mod api;
pub mod logging;
pub mod models;
pub mod services;

use logging::LogSettings;
use services::config_store::{AppConfig, ConfigStore};

use anyhow::Context;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Instant;
use tracing::{info, warn};

static PROCESS_START: OnceLock<Instant> = OnceLock::new();

fn startup_elapsed_ms() -> u128 {
    PROCESS_START
        .get()
        .map(|t| t.elapsed().as_millis())
        .unwrap_or(0)
}

fn config_store() -> Option<ConfigStore> {
    ConfigStore::default_config_dir().map(ConfigStore::new)
}

/// Load the config file, falling back to defaults when no config directory is known.
pub fn load_config() -> anyhow::Result<AppConfig> {
    match config_store() {
        Some(store) => {
            let config = store
                .load()
                .with_context(|| format!("loading {}", store.config_file().display()))?;
            info!(path = %store.config_file().display(), exists = store.exists(), "config.loaded");
            Ok(config)
        }
        None => {
            warn!("No config directory available, using defaults");
            Ok(AppConfig::default())
        }
    }
}

/// Write a default `config.json`, backing up any existing file. Returns the path written.
pub fn write_default_config() -> anyhow::Result<PathBuf> {
    let store = config_store().context("no config directory available")?;
    store.save(&AppConfig::default())?;
    Ok(store.config_file().to_path_buf())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Load configuration and serve the HTTP API until Ctrl-C.
pub async fn run() -> anyhow::Result<()> {
    PROCESS_START.get_or_init(Instant::now);

    let logging_t0 = Instant::now();
    let settings = LogSettings::from_env();
    let log_file = logging::init_logging(&settings);
    info!(
        version = env!("CARGO_PKG_VERSION"),
        log_file = ?log_file,
        startup_ms = startup_elapsed_ms(),
        logging_ms = logging_t0.elapsed().as_millis(),
        "=== DraftScope Started ==="
    );

    let config = load_config()?;
    let addr = config.server.bind_addr()?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!(%addr, startup_ms = startup_elapsed_ms(), "server.listening");

    api::serve(listener, config.detection, shutdown_signal()).await?;

    info!("=== DraftScope Exited ===");
    Ok(())
}
