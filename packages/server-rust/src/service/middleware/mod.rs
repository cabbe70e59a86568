//! Decorators layered around the vault capability.
//!
//! - [`logging`]: one structured log event per call
//! - [`instrumenting`]: request count, latency, and validate outcome metrics
//! - [`pipeline`]: composes the decorators in their fixed order

pub mod instrumenting;
pub mod logging;
pub mod pipeline;

pub use instrumenting::{InstrumentingLayer, InstrumentingMiddleware};
pub use logging::{LoggingLayer, LoggingMiddleware};
pub use pipeline::{build_vault_pipeline, DecoratedVault};
