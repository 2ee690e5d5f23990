use std::sync::Arc;

pub mod core;
pub mod error_handler;
mod routes;

use ai_llm_service::error_handler::process_env;
use axum::{
    Router,
    routing::{delete, get, post},
};
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

pub use crate::core::app_state::{AppConfig, AppState, ConfigError};
use crate::error_handler::AppError;
use crate::routes::{
    health::health_route::health_route,
    review::review_route::review_route,
    reviews::{delete_review_route::delete_review_route, list_reviews_route::list_reviews_route},
    webhook::webhook_route::webhook_route,
};

/// All HTTP routes over the given state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health_route))
        .route("/review", post(review_route))
        .route("/reviews", get(list_reviews_route))
        .route("/review/{id}", delete(delete_review_route))
        .route("/webhook", post(webhook_route))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Reads the configuration from the process environment and serves until Ctrl+C.
pub async fn start() -> Result<(), AppError> {
    let cfg = AppConfig::from_env(&process_env)?;
    let state = Arc::new(AppState::from_config(&cfg)?);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&cfg.listen_addr)
        .await
        .map_err(|source| AppError::Bind {
            addr: cfg.listen_addr.clone(),
            source,
        })?;
    info!(addr = %cfg.listen_addr, "server running");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("server stopped");
    Ok(())
}

/// Resolves when Ctrl+C is pressed.
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
