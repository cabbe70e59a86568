//! HTTP transport middleware for the vault server.
//!
//! Middleware ordering follows the outer-to-inner convention: the first
//! layer listed is the outermost (processes the request first on the way
//! in, and the response last on the way out).

use axum::http::header::HeaderName;
use axum::http::StatusCode;
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::config::ServerConfig;

/// The composed Tower layer type produced by [`build_http_layers`].
type HttpLayers = tower::layer::util::Stack<
    PropagateRequestIdLayer,
    tower::layer::util::Stack<
        TimeoutLayer,
        tower::layer::util::Stack<
            TraceLayer<
                tower_http::classify::SharedClassifier<tower_http::classify::ServerErrorsAsFailures>,
            >,
            tower::layer::util::Stack<
                SetRequestIdLayer<MakeRequestUuid>,
                tower::layer::util::Identity,
            >,
        >,
    >,
>;

/// Builds the HTTP-level Tower middleware stack.
///
/// **Middleware ordering (outermost to innermost):**
/// 1. `SetRequestId` -- assigns a UUID v4 `X-Request-Id` to every incoming request
/// 2. `Tracing` -- access log with structured request/response spans
/// 3. `Timeout` -- answers 408 once `request_timeout` elapses
/// 4. `PropagateRequestId` -- copies `X-Request-Id` from the request to the response
///
/// This is transport-level middleware only. Capability-level concerns
/// (call logging, metrics) live in `service::middleware`.
#[must_use]
pub fn build_http_layers(config: &ServerConfig) -> HttpLayers {
    let x_request_id = HeaderName::from_static("x-request-id");

    ServiceBuilder::new()
        .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            config.request_timeout,
        ))
        .layer(PropagateRequestIdLayer::new(x_request_id))
        .into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Method, Request};
    use tower::ServiceExt;
    use vault_core::{Vault, VaultError};

    use crate::network::handlers::test_support::RejectingAuth;
    use crate::network::handlers::AppState;
    use crate::network::{build_router, Lifecycle};
    use crate::observability::InMemoryMetrics;
    use crate::service::{build_vault_pipeline, Endpoints};

    /// Vault whose every call outlives any reasonable request timeout.
    struct StalledVault;

    #[async_trait]
    impl Vault for StalledVault {
        async fn hash(&self, _password: &str) -> Result<String, VaultError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok("late".to_string())
        }

        async fn validate(&self, _password: &str, _hash: &str) -> Result<bool, VaultError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(true)
        }
    }

    #[test]
    fn build_http_layers_does_not_panic_with_defaults() {
        let _layers = build_http_layers(&ServerConfig::default());
    }

    #[test]
    fn build_http_layers_with_custom_timeout() {
        let config = ServerConfig {
            request_timeout: Duration::from_secs(5),
            ..ServerConfig::default()
        };
        let _layers = build_http_layers(&config);
    }

    #[tokio::test]
    async fn slow_request_is_answered_with_408() {
        let metrics = Arc::new(InMemoryMetrics::new());
        let vault = Arc::new(build_vault_pipeline(StalledVault, metrics.clone()));
        let endpoints = Endpoints::new(vault.clone(), Arc::new(RejectingAuth(vault)));
        let state = AppState::new(
            endpoints,
            metrics.clone(),
            Lifecycle::new(),
            StatusCode::INTERNAL_SERVER_ERROR,
        );
        let config = ServerConfig {
            request_timeout: Duration::from_millis(20),
            ..ServerConfig::default()
        };
        let router = build_router(state, &config);

        let request = Request::builder()
            .method(Method::POST)
            .uri("/v1/hash")
            .body(Body::from(r#"{"password":"pw"}"#))
            .unwrap();
        let resp = tokio::time::timeout(Duration::from_secs(2), router.oneshot(request))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(resp.status(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(metrics.request_count("hash", false), 0);
    }
}
