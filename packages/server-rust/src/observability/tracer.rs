//! Span tracer used at the RPC boundary.
//!
//! A [`Tracer`] opens an [`ActiveSpan`], which carries a `tracing` span for
//! the duration of the call and reports a [`FinishedSpan`] to the configured
//! [`SpanSink`] when dropped. Reporting on drop covers success, failure, and
//! cancellation alike.

use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use tracing::{debug, info_span, Span};

use crate::traits::{FinishedSpan, SpanSink};

/// Span name used for every inbound server call.
pub const SERVER_SPAN: &str = "server";

/// Opens spans for a single service and forwards finished ones to a sink.
#[derive(Clone)]
pub struct Tracer {
    service: Arc<str>,
    sink: Arc<dyn SpanSink>,
}

impl Tracer {
    #[must_use]
    pub fn new(service: impl Into<Arc<str>>, sink: Arc<dyn SpanSink>) -> Self {
        Self {
            service: service.into(),
            sink,
        }
    }

    /// Starts a [`SERVER_SPAN`] span for `method`.
    #[must_use]
    pub fn start_span(&self, method: &str) -> ActiveSpan {
        let span = info_span!(
            "server",
            service = %self.service,
            rpc.method = %method,
        );
        ActiveSpan {
            span,
            service: Arc::clone(&self.service),
            method: method.to_string(),
            started: Instant::now(),
            sink: Arc::clone(&self.sink),
        }
    }
}

impl std::fmt::Debug for Tracer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tracer")
            .field("service", &self.service)
            .finish_non_exhaustive()
    }
}

/// A span in progress. Finishes when dropped.
pub struct ActiveSpan {
    span: Span,
    service: Arc<str>,
    method: String,
    started: Instant,
    sink: Arc<dyn SpanSink>,
}

impl ActiveSpan {
    /// The `tracing` span to enter or instrument the call with.
    #[must_use]
    pub fn span(&self) -> &Span {
        &self.span
    }
}

impl Drop for ActiveSpan {
    fn drop(&mut self) {
        self.sink.report(FinishedSpan {
            service: self.service.to_string(),
            name: SERVER_SPAN,
            method: std::mem::take(&mut self.method),
            elapsed: self.started.elapsed(),
        });
    }
}

// ---------------------------------------------------------------------------
// Sinks
// ---------------------------------------------------------------------------

/// Reports finished spans as debug-level log events.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSpanSink;

impl SpanSink for LogSpanSink {
    fn report(&self, span: FinishedSpan) {
        #[allow(clippy::cast_possible_truncation)]
        let took_us = span.elapsed.as_micros() as u64;
        debug!(
            service = %span.service,
            span = span.name,
            rpc.method = %span.method,
            took_us,
            "span finished"
        );
    }
}

/// Keeps finished spans in memory so tests can inspect them.
#[derive(Debug, Default)]
pub struct RecordingSpanSink {
    spans: Mutex<Vec<FinishedSpan>>,
}

impl RecordingSpanSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every span reported so far.
    #[must_use]
    pub fn spans(&self) -> Vec<FinishedSpan> {
        self.spans.lock().clone()
    }
}

impl SpanSink for RecordingSpanSink {
    fn report(&self, span: FinishedSpan) {
        self.spans.lock().push(span);
    }
}
