// HTTP API
// axum router exposing the detector over JSON

pub mod error;
pub mod handlers;
pub mod middleware;

use crate::services::config_store::DetectionConfig;
use axum::routing::{get, post};
use axum::Router;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<DetectionConfig>,
}

pub fn router(config: DetectionConfig) -> Router {
    let state = AppState {
        config: Arc::new(config),
    };

    Router::new()
        .route("/health", get(handlers::health))
        .route("/detect", get(handlers::health).post(handlers::detect_text))
        .route("/detect-sentences", post(handlers::detect_sentences))
        .route("/batch", post(handlers::detect_batch_texts))
        .layer(axum::middleware::from_fn(middleware::cors))
        .layer(axum::middleware::from_fn(middleware::log_requests))
        .with_state(state)
}

/// Serve until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, config: DetectionConfig, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(config))
        .with_graceful_shutdown(shutdown)
        .await
}
