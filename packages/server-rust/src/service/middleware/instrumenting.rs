//! Instrumenting middleware for the vault capability.
//!
//! Records request count and latency into a [`MetricsSink`] exactly once per
//! call. Recording happens in a drop guard, so a call whose future is dropped
//! before completion is still counted (as failed).

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tower::Layer;
use vault_core::{Vault, VaultError};

use crate::traits::MetricsSink;

// ---------------------------------------------------------------------------
// InstrumentingLayer
// ---------------------------------------------------------------------------

/// Layer producing [`InstrumentingMiddleware`] bound to a metrics sink.
#[derive(Clone)]
pub struct InstrumentingLayer {
    metrics: Arc<dyn MetricsSink>,
}

impl InstrumentingLayer {
    #[must_use]
    pub fn new(metrics: Arc<dyn MetricsSink>) -> Self {
        Self { metrics }
    }
}

impl<V> Layer<V> for InstrumentingLayer {
    type Service = InstrumentingMiddleware<V>;

    fn layer(&self, inner: V) -> Self::Service {
        InstrumentingMiddleware {
            inner,
            metrics: Arc::clone(&self.metrics),
        }
    }
}

// ---------------------------------------------------------------------------
// InstrumentingMiddleware
// ---------------------------------------------------------------------------

/// Vault decorator feeding per-call count and latency into a [`MetricsSink`].
#[derive(Clone)]
pub struct InstrumentingMiddleware<V> {
    inner: V,
    metrics: Arc<dyn MetricsSink>,
}

/// Records one observation when dropped.
struct CallRecord<'a> {
    metrics: &'a dyn MetricsSink,
    method: &'static str,
    start: Instant,
    failed: bool,
}

impl<'a> CallRecord<'a> {
    fn start(metrics: &'a dyn MetricsSink, method: &'static str) -> Self {
        Self {
            metrics,
            method,
            start: Instant::now(),
            failed: true,
        }
    }

    fn finish<T>(mut self, result: &Result<T, VaultError>) {
        self.failed = result.is_err();
    }
}

impl Drop for CallRecord<'_> {
    fn drop(&mut self) {
        self.metrics
            .record_request(self.method, self.failed, self.start.elapsed());
    }
}

#[async_trait]
impl<V: Vault> Vault for InstrumentingMiddleware<V> {
    async fn hash(&self, password: &str) -> Result<String, VaultError> {
        let record = CallRecord::start(self.metrics.as_ref(), "hash");
        let result = self.inner.hash(password).await;
        record.finish(&result);
        result
    }

    async fn validate(&self, password: &str, hash: &str) -> Result<bool, VaultError> {
        let record = CallRecord::start(self.metrics.as_ref(), "validate");
        let result = self.inner.validate(password, hash).await;
        if let Ok(valid) = result {
            self.metrics.record_validation(valid);
        }
        record.finish(&result);
        result
    }
}
