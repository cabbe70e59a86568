//! Pipeline composition: wraps the capability in the middleware decorators.

use std::sync::Arc;

use tower::ServiceBuilder;
use vault_core::Vault;

use super::instrumenting::{InstrumentingLayer, InstrumentingMiddleware};
use super::logging::{LoggingLayer, LoggingMiddleware};
use crate::traits::MetricsSink;

/// The fully decorated vault produced by [`build_vault_pipeline`].
pub type DecoratedVault<V> = InstrumentingMiddleware<LoggingMiddleware<V>>;

/// Wrap `vault` with the middleware decorators.
///
/// Layer order (outermost to innermost):
/// 1. `InstrumentingLayer` -- count and time the call as the caller sees it
/// 2. `LoggingLayer` -- log the capability's own outcome
///
/// Construction therefore reads capability -> logging -> instrumenting.
#[must_use]
pub fn build_vault_pipeline<V: Vault>(vault: V, metrics: Arc<dyn MetricsSink>) -> DecoratedVault<V> {
    ServiceBuilder::new()
        .layer(InstrumentingLayer::new(metrics))
        .layer(LoggingLayer)
        .service(vault)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
