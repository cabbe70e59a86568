//! Metrics sinks: Prometheus for production, in-memory for tests.
//!
//! The Prometheus sink owns its recorder and installs it only for the
//! duration of each record call (`metrics::with_local_recorder`), so no
//! process-global recorder is involved and several sinks can coexist.
//! Without the exporter's own listener nothing drains its histogram buffers,
//! so whoever owns the sink must call [`MetricsSink::run_upkeep`] periodically.

use std::fmt::Write as _;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use dashmap::DashMap;
use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle, PrometheusRecorder};
use parking_lot::Mutex;

use crate::traits::MetricsSink;

/// Requests received, labeled by `method` and `error`.
pub const REQUEST_COUNT: &str = "vault_service_request_count";
/// Request latency summary in microseconds, labeled by `method` and `error`.
pub const REQUEST_LATENCY: &str = "vault_service_request_latency_microseconds";
/// Summary of `validate` outcomes (1 = match, 0 = mismatch). No labels.
pub const VALIDATE_RESULT: &str = "vault_service_validate_result";

fn error_label(failed: bool) -> &'static str {
    if failed {
        "true"
    } else {
        "false"
    }
}

// ---------------------------------------------------------------------------
// PrometheusMetrics
// ---------------------------------------------------------------------------

/// Prometheus-backed sink. Histograms render as summaries (no buckets configured).
pub struct PrometheusMetrics {
    recorder: PrometheusRecorder,
    handle: PrometheusHandle,
}

impl PrometheusMetrics {
    /// Builds a recorder and registers metric descriptions on it.
    #[must_use]
    pub fn new() -> Self {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            describe_counter!(REQUEST_COUNT, "Number of requests received.");
            describe_histogram!(
                REQUEST_LATENCY,
                Unit::Microseconds,
                "Total duration of requests in microseconds."
            );
            describe_histogram!(VALIDATE_RESULT, "The result of each validate call.");
        });

        Self { recorder, handle }
    }
}

impl Default for PrometheusMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PrometheusMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrometheusMetrics").finish_non_exhaustive()
    }
}

impl MetricsSink for PrometheusMetrics {
    fn record_request(&self, method: &'static str, failed: bool, latency: Duration) {
        let error = error_label(failed);
        #[allow(clippy::cast_precision_loss)]
        let micros = latency.as_micros() as f64;

        metrics::with_local_recorder(&self.recorder, || {
            counter!(REQUEST_COUNT, "method" => method, "error" => error).increment(1);
            histogram!(REQUEST_LATENCY, "method" => method, "error" => error).record(micros);
        });
    }

    fn record_validation(&self, valid: bool) {
        let value = if valid { 1.0 } else { 0.0 };
        metrics::with_local_recorder(&self.recorder, || {
            histogram!(VALIDATE_RESULT).record(value);
        });
    }

    fn render(&self) -> String {
        self.handle.render()
    }

    fn run_upkeep(&self) {
        self.handle.run_upkeep();
    }
}

// ---------------------------------------------------------------------------
// InMemoryMetrics
// ---------------------------------------------------------------------------

/// Sink that keeps every observation in memory so tests can assert on them.
#[derive(Debug, Default)]
pub struct InMemoryMetrics {
    requests: DashMap<(&'static str, bool), u64>,
    latencies: DashMap<(&'static str, bool), Vec<Duration>>,
    validations: Mutex<Vec<bool>>,
    upkeep_runs: AtomicUsize,
}

impl InMemoryMetrics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counter value for `method` with the given error label.
    #[must_use]
    pub fn request_count(&self, method: &'static str, failed: bool) -> u64 {
        self.requests.get(&(method, failed)).map_or(0, |c| *c)
    }

    /// Counter value for `method` across both error labels.
    #[must_use]
    pub fn total_requests(&self, method: &'static str) -> u64 {
        self.request_count(method, false) + self.request_count(method, true)
    }

    /// Number of latency observations for `method` with the given error label.
    #[must_use]
    pub fn latency_observations(&self, method: &'static str, failed: bool) -> usize {
        self.latencies.get(&(method, failed)).map_or(0, |v| v.len())
    }

    /// Every recorded validation outcome, in order.
    #[must_use]
    pub fn validations(&self) -> Vec<bool> {
        self.validations.lock().clone()
    }

    /// How many times upkeep has run.
    #[must_use]
    pub fn upkeep_runs(&self) -> usize {
        self.upkeep_runs.load(Ordering::Relaxed)
    }
}

impl MetricsSink for InMemoryMetrics {
    fn record_request(&self, method: &'static str, failed: bool, latency: Duration) {
        *self.requests.entry((method, failed)).or_insert(0) += 1;
        self.latencies
            .entry((method, failed))
            .or_default()
            .push(latency);
    }

    fn record_validation(&self, valid: bool) {
        self.validations.lock().push(valid);
    }

    fn render(&self) -> String {
        let mut rows: Vec<_> = self
            .requests
            .iter()
            .map(|entry| {
                let (method, failed) = *entry.key();
                (method, failed, *entry.value())
            })
            .collect();
        rows.sort_unstable();

        let mut out = String::new();
        for (method, failed, count) in rows {
            let _ = writeln!(
                out,
                "{REQUEST_COUNT}{{method=\"{method}\",error=\"{}\"}} {count}",
                error_label(failed)
            );
        }
        out
    }

    fn run_upkeep(&self) {
        self.upkeep_runs.fetch_add(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prometheus_renders_labeled_counter() {
        let sink = PrometheusMetrics::new();
        sink.record_request("hash", false, Duration::from_micros(120));
        sink.record_request("hash", false, Duration::from_micros(80));
        sink.record_request("validate", true, Duration::from_micros(10));

        let text = sink.render();
        assert!(text.contains(REQUEST_COUNT));
        assert!(text.contains("method=\"hash\""));
        assert!(text.contains("error=\"true\""));
        assert!(text.contains(REQUEST_LATENCY));
    }

    #[test]
    fn prometheus_renders_validate_summary() {
        let sink = PrometheusMetrics::new();
        sink.record_validation(true);
        sink.record_validation(false);

        let text = sink.render();
        assert!(text.contains(&format!("{VALIDATE_RESULT}_count 2")));
    }

    #[test]
    fn prometheus_upkeep_keeps_summaries_rendering() {
        let sink = PrometheusMetrics::new();
        for i in 0..50 {
            sink.record_request("validate", false, Duration::from_micros(i));
            sink.record_validation(i % 2 == 0);
        }
        sink.run_upkeep();
        sink.record_validation(true);
        sink.run_upkeep();

        let text = sink.render();
        assert!(text.contains(&format!("{VALIDATE_RESULT}_count 51")));
        assert!(text.contains(REQUEST_LATENCY));
    }

    #[test]
    fn in_memory_counts_upkeep_runs() {
        let sink = InMemoryMetrics::new();
        assert_eq!(sink.upkeep_runs(), 0);
        sink.run_upkeep();
        sink.run_upkeep();
        assert_eq!(sink.upkeep_runs(), 2);
    }

    #[test]
    fn prometheus_sinks_are_independent() {
        let a = PrometheusMetrics::new();
        let b = PrometheusMetrics::new();
        a.record_request("hash", false, Duration::from_micros(1));

        assert!(a.render().contains("method=\"hash\""));
        assert!(!b.render().contains("method=\"hash\""));
    }

    #[test]
    fn in_memory_counts_per_label() {
        let sink = InMemoryMetrics::new();
        sink.record_request("hash", false, Duration::from_micros(5));
        sink.record_request("hash", true, Duration::from_micros(5));
        sink.record_request("hash", true, Duration::from_micros(5));

        assert_eq!(sink.request_count("hash", false), 1);
        assert_eq!(sink.request_count("hash", true), 2);
        assert_eq!(sink.total_requests("hash"), 3);
        assert_eq!(sink.latency_observations("hash", true), 2);
        assert_eq!(sink.total_requests("validate"), 0);
    }

    #[test]
    fn in_memory_render_is_sorted() {
        let sink = InMemoryMetrics::new();
        sink.record_request("validate", false, Duration::ZERO);
        sink.record_request("hash", false, Duration::ZERO);

        let text = sink.render();
        let hash_at = text.find("hash").unwrap();
        let validate_at = text.find("validate").unwrap();
        assert!(hash_at < validate_at);
    }
}
