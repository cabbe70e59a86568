//! Logging middleware for the vault capability.
//!
//! Emits one structured event per call after the inner vault returns. The
//! event reflects the inner result exactly; the result itself is passed
//! through untouched. The `err` field is always present and reads `nil` on
//! success.

use std::time::Instant;

use async_trait::async_trait;
use tower::Layer;
use tracing::info;
use vault_core::{Vault, VaultError};

// ---------------------------------------------------------------------------
// LoggingLayer
// ---------------------------------------------------------------------------

/// Layer producing [`LoggingMiddleware`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingLayer;

impl<V> Layer<V> for LoggingLayer {
    type Service = LoggingMiddleware<V>;

    fn layer(&self, inner: V) -> Self::Service {
        LoggingMiddleware { inner }
    }
}

// ---------------------------------------------------------------------------
// LoggingMiddleware
// ---------------------------------------------------------------------------

/// Vault decorator that logs method, elapsed time, and error for every call.
///
/// Passwords and digests are never logged.
#[derive(Debug, Clone)]
pub struct LoggingMiddleware<V> {
    inner: V,
}

impl<V> LoggingMiddleware<V> {
    #[must_use]
    pub fn new(inner: V) -> Self {
        Self { inner }
    }
}

fn err_field<T>(result: &Result<T, VaultError>) -> String {
    result
        .as_ref()
        .err()
        .map_or_else(|| "nil".to_string(), ToString::to_string)
}

#[allow(clippy::cast_possible_truncation)]
fn elapsed_us(start: Instant) -> u64 {
    start.elapsed().as_micros() as u64
}

#[async_trait]
impl<V: Vault> Vault for LoggingMiddleware<V> {
    async fn hash(&self, password: &str) -> Result<String, VaultError> {
        let start = Instant::now();
        let result = self.inner.hash(password).await;

        info!(
            method = "hash",
            took_us = elapsed_us(start),
            err = %err_field(&result),
            "call complete"
        );
        result
    }

    async fn validate(&self, password: &str, hash: &str) -> Result<bool, VaultError> {
        let start = Instant::now();
        let result = self.inner.validate(password, hash).await;

        info!(
            method = "validate",
            took_us = elapsed_us(start),
            valid = result.as_ref().ok().copied(),
            err = %err_field(&result),
            "call complete"
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::Arc;

    use parking_lot::Mutex;
    use tracing_subscriber::fmt::MakeWriter;

    use super::*;

    /// Collects everything the subscriber writes.
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn lines(&self) -> Vec<serde_json::Value> {
            let buf = self.0.lock();
            String::from_utf8_lossy(&buf)
                .lines()
                .map(|l| serde_json::from_str(l).unwrap())
                .collect()
        }
    }

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn json_subscriber(out: Captured) -> impl tracing::Subscriber + Send + Sync {
        tracing_subscriber::fmt()
            .json()
            .with_writer(out)
            .finish()
    }

    struct FixedVault {
        fail: bool,
    }

    #[async_trait]
    impl Vault for FixedVault {
        async fn hash(&self, _password: &str) -> Result<String, VaultError> {
            if self.fail {
                Err(VaultError::Internal("disk on fire".into()))
            } else {
                Ok("digest".into())
            }
        }

        async fn validate(&self, _password: &str, _hash: &str) -> Result<bool, VaultError> {
            if self.fail {
                Err(VaultError::InvalidCredentials)
            } else {
                Ok(true)
            }
        }
    }

    #[tokio::test]
    async fn passes_result_through() {
        let svc = LoggingLayer.layer(FixedVault { fail: false });
        assert_eq!(svc.hash("pw").await.unwrap(), "digest");
        assert!(svc.validate("pw", "digest").await.unwrap());

        let svc = LoggingLayer.layer(FixedVault { fail: true });
        assert_eq!(
            svc.validate("pw", "digest").await.unwrap_err(),
            VaultError::InvalidCredentials
        );
    }

    #[tokio::test]
    async fn logs_method_and_error_after_call() {
        let out = Captured::default();
        let _guard = tracing::subscriber::set_default(json_subscriber(out.clone()));

        let svc = LoggingLayer.layer(FixedVault { fail: true });
        let _ = svc.hash("hunter2").await;

        let lines = out.lines();
        assert_eq!(lines.len(), 1);
        let fields = &lines[0]["fields"];
        assert_eq!(fields["method"], "hash");
        assert_eq!(fields["err"], "internal error: disk on fire");
        assert!(fields["took_us"].is_number());
    }

    #[tokio::test]
    async fn success_logs_nil_error_and_no_secrets() {
        let out = Captured::default();
        let _guard = tracing::subscriber::set_default(json_subscriber(out.clone()));

        let svc = LoggingLayer.layer(FixedVault { fail: false });
        let _ = svc.validate("hunter2", "digest").await;

        let lines = out.lines();
        assert_eq!(lines.len(), 1);
        let fields = &lines[0]["fields"];
        assert_eq!(fields["method"], "validate");
        assert_eq!(fields["valid"], true);
        assert_eq!(fields["err"], "nil");

        let raw = lines[0].to_string();
        assert!(!raw.contains("hunter2"));
    }
}
