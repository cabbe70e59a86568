//! Observability sinks and logging setup.
//!
//! - [`metrics`]: Prometheus and in-memory [`MetricsSink`](crate::traits::MetricsSink) implementations
//! - [`tracer`]: span tracer plus log and in-memory [`SpanSink`](crate::traits::SpanSink) implementations
//! - [`logging`]: global `tracing` subscriber installation

pub mod logging;
pub mod metrics;
pub mod tracer;

pub use logging::init_logging;
pub use metrics::{InMemoryMetrics, PrometheusMetrics};
pub use tracer::{ActiveSpan, LogSpanSink, RecordingSpanSink, Tracer};
