//! HTTP binder: route table and serve loop.

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use super::config::ServerConfig;
use super::handlers::{
    hash_handler, health_handler, liveness_handler, login_handler, metrics_handler,
    readiness_handler, validate_handler, AppState,
};
use super::middleware::build_http_layers;

/// Assembles the axum router with all routes and middleware.
///
/// Routes:
/// - `POST /v1/hash` -- hash a password
/// - `POST /v1/validate` -- check a password against a digest
/// - `POST /v1/login` -- exchange credentials for a session token
/// - `GET /metrics` -- scrape output of the metrics sink
/// - `GET /health` -- lifecycle phase and uptime
/// - `GET /health/live` -- liveness probe
/// - `GET /health/ready` -- readiness probe
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/v1/hash", post(hash_handler))
        .route("/v1/validate", post(validate_handler))
        .route("/v1/login", post(login_handler))
        .route("/metrics", get(metrics_handler))
        .route("/health", get(health_handler))
        .route("/health/live", get(liveness_handler))
        .route("/health/ready", get(readiness_handler))
        .layer(build_http_layers(config))
        .with_state(state)
}

/// Serves `router` on an already-bound listener until the server fails.
///
/// Never returns `Ok` on its own; the task is stopped by the coordinator.
///
/// # Errors
///
/// Returns the I/O error that stopped the accept loop.
pub async fn serve_http(listener: TcpListener, router: Router) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(transport = "HTTP", %addr, "listening");
    }
    axum::serve(listener, router).await
}
