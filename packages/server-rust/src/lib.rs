//! Vault Server — exposes the password vault over gRPC and HTTP/JSON behind
//! a logging and metrics middleware chain, and runs both transports under a
//! single lifecycle coordinator.

pub mod network;
pub mod observability;
pub mod service;
pub mod traits;

pub use traits::{FinishedSpan, MetricsSink, SpanSink};
