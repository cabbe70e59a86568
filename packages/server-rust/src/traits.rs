use std::time::Duration;

/// Pluggable metrics backend fed by the instrumenting middleware.
/// Implementations: Prometheus (production), in-memory (tests).
///
/// Methods are infallible: a backend that can fail must log or drop the
/// failure itself rather than hand it back to a request.
pub trait MetricsSink: Send + Sync {
    /// Count one call of `method` and record its latency.
    fn record_request(&self, method: &'static str, failed: bool, latency: Duration);

    /// Record the outcome of a successful `validate` call.
    fn record_validation(&self, valid: bool);

    /// Render the current state in the backend's scrape format.
    fn render(&self) -> String;

    /// Periodic housekeeping, such as draining histogram buffers.
    ///
    /// Called on a fixed interval by the coordinator.
    fn run_upkeep(&self) {}
}

/// A span that has been closed, handed to a [`SpanSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinishedSpan {
    /// Service the span belongs to (e.g., `"vault"`).
    pub service: String,
    /// Boundary the span was opened at (e.g., `"server"`).
    pub name: &'static str,
    /// Fully qualified method, e.g. `/pb.Vault/Hash`.
    pub method: String,
    /// Wall time between start and finish.
    pub elapsed: Duration,
}

/// Pluggable trace backend receiving finished spans.
pub trait SpanSink: Send + Sync {
    /// Called exactly once per span, after it finishes. Must not fail.
    fn report(&self, span: FinishedSpan);
}
