//! HTTP handler definitions for the vault server.
//!
//! This module defines `AppState` (the shared state carried through axum
//! extractors) and re-exports all handler functions for convenient access
//! when building the router.

pub mod health;
pub mod metrics;
pub mod vault;

pub use health::{health_handler, liveness_handler, readiness_handler};
pub use metrics::metrics_handler;
pub use vault::{hash_handler, login_handler, validate_handler};

use std::sync::Arc;
use std::time::Instant;

use axum::http::StatusCode;

use super::Lifecycle;
use crate::service::Endpoints;
use crate::traits::MetricsSink;

/// Shared application state passed to all axum handlers via `State` extraction.
///
/// Holds `Arc`s and cheap handles so cloning per request is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Endpoint adapters the vault routes dispatch to.
    pub endpoints: Endpoints,
    /// Metrics sink rendered by `GET /metrics`.
    pub metrics: Arc<dyn MetricsSink>,
    /// Lifecycle phase, consulted by the readiness probe.
    pub lifecycle: Lifecycle,
    /// Status used in the error envelope for capability errors.
    pub error_status: StatusCode,
    /// Server process start time, used for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    #[must_use]
    pub fn new(
        endpoints: Endpoints,
        metrics: Arc<dyn MetricsSink>,
        lifecycle: Lifecycle,
        error_status: StatusCode,
    ) -> Self {
        Self {
            endpoints,
            metrics,
            lifecycle,
            error_status,
            start_time: Instant::now(),
        }
    }
}
