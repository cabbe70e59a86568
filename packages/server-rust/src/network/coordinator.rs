//! Lifecycle coordinator: runs both transports and the signal watcher, and
//! stops everything on the first termination event any of them reports.
//!
//! Each of those tasks sends exactly one [`Termination`] into a shared
//! channel. A metrics upkeep task runs beside them and never reports. The
//! coordinator consumes exactly one value, aborts the remaining tasks without
//! draining, and returns the value to the caller.

use std::fmt;
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use super::config::ServerConfig;
use super::handlers::AppState;
use super::http::{build_router, serve_http};
use super::lifecycle::{Lifecycle, LifecyclePhase};
use super::rpc::{serve_rpc, RpcBinder};
use crate::observability::Tracer;
use crate::service::Endpoints;
use crate::traits::MetricsSink;

/// One slot per reporting task, so no sender ever waits.
const COMPLETION_CAPACITY: usize = 3;

type ShutdownSignal = Pin<Box<dyn Future<Output = String> + Send>>;

// ---------------------------------------------------------------------------
// Termination
// ---------------------------------------------------------------------------

/// Wire protocol a listener task serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Http,
    Rpc,
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http => f.write_str("HTTP"),
            Self::Rpc => f.write_str("gRPC"),
        }
    }
}

/// Why the process is stopping.
#[derive(Debug, Error)]
pub enum Termination {
    /// The signal watcher fired.
    #[error("received {0}")]
    Signal(String),

    /// A listener could not bind its address.
    #[error("{transport} listener failed to bind {addr}: {source}")]
    Bind {
        transport: Transport,
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// A server loop failed after binding.
    #[error("{transport} server failed: {message}")]
    Serve { transport: Transport, message: String },

    /// A server loop returned without an error.
    #[error("{0} server stopped")]
    Stopped(Transport),

    /// Every sender went away before reporting.
    #[error("completion channel closed without a termination event")]
    ChannelClosed,
}

// ---------------------------------------------------------------------------
// Coordinator
// ---------------------------------------------------------------------------

/// Runs the HTTP binder, the RPC binder, and the signal watcher until one of
/// them reports.
pub struct Coordinator {
    config: ServerConfig,
    endpoints: Endpoints,
    metrics: Arc<dyn MetricsSink>,
    tracer: Tracer,
    lifecycle: Lifecycle,
    shutdown: Option<ShutdownSignal>,
}

impl Coordinator {
    /// Takes the already assembled endpoints and sinks.
    #[must_use]
    pub fn new(
        config: ServerConfig,
        endpoints: Endpoints,
        metrics: Arc<dyn MetricsSink>,
        tracer: Tracer,
    ) -> Self {
        Self {
            config,
            endpoints,
            metrics,
            tracer,
            lifecycle: Lifecycle::new(),
            shutdown: None,
        }
    }

    /// Replaces the OS signal watcher with `signal`.
    ///
    /// When `signal` resolves the coordinator terminates with
    /// [`Termination::Signal`].
    #[must_use]
    pub fn with_shutdown_signal<F>(mut self, signal: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.shutdown = Some(Box::pin(async move {
            signal.await;
            "shutdown request".to_string()
        }));
        self
    }

    /// Handle observing this coordinator's phase.
    #[must_use]
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle.clone()
    }

    /// Starts every task and waits for the first termination event.
    ///
    /// Returns once the remaining tasks have been aborted.
    pub async fn run(self) -> Termination {
        let Self {
            config,
            endpoints,
            metrics,
            tracer,
            lifecycle,
            shutdown,
        } = self;

        let (tx, mut rx) = mpsc::channel(COMPLETION_CAPACITY);
        let mut tasks = JoinSet::new();

        let upkeep_metrics = Arc::clone(&metrics);
        let upkeep_every = config.metrics_upkeep;
        tasks.spawn(async move {
            let mut ticker = tokio::time::interval(upkeep_every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                upkeep_metrics.run_upkeep();
            }
        });

        let state = AppState::new(
            endpoints.clone(),
            metrics,
            lifecycle.clone(),
            config.error_status,
        );
        let router = build_router(state, &config);
        let http_addr = config.http_addr;
        let http_tx = tx.clone();
        tasks.spawn(async move {
            let outcome = match TcpListener::bind(http_addr).await {
                Ok(listener) => match serve_http(listener, router).await {
                    Ok(()) => Termination::Stopped(Transport::Http),
                    Err(e) => Termination::Serve {
                        transport: Transport::Http,
                        message: e.to_string(),
                    },
                },
                Err(source) => Termination::Bind {
                    transport: Transport::Http,
                    addr: http_addr,
                    source,
                },
            };
            let _ = http_tx.send(outcome).await;
        });

        let rpc_addr = config.rpc_addr;
        let rpc_tx = tx.clone();
        let binder = RpcBinder::new(endpoints);
        tasks.spawn(async move {
            let outcome = match TcpListener::bind(rpc_addr).await {
                Ok(listener) => match serve_rpc(listener, binder, tracer).await {
                    Ok(()) => Termination::Stopped(Transport::Rpc),
                    Err(e) => Termination::Serve {
                        transport: Transport::Rpc,
                        message: e.to_string(),
                    },
                },
                Err(source) => Termination::Bind {
                    transport: Transport::Rpc,
                    addr: rpc_addr,
                    source,
                },
            };
            let _ = rpc_tx.send(outcome).await;
        });

        let signal: ShutdownSignal = match shutdown {
            Some(signal) => signal,
            None => Box::pin(os_signal()),
        };
        tasks.spawn(async move {
            let name = signal.await;
            let _ = tx.send(Termination::Signal(name)).await;
        });

        lifecycle.advance(LifecyclePhase::Running);
        info!(
            http = %config.http_addr,
            grpc = %config.rpc_addr,
            "vault server running"
        );

        let termination = rx.recv().await.unwrap_or(Termination::ChannelClosed);

        lifecycle.advance(LifecyclePhase::ShuttingDown);
        error!(cause = %termination, "fatal");
        tasks.shutdown().await;
        lifecycle.advance(LifecyclePhase::Terminated);

        termination
    }
}

impl fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coordinator")
            .field("config", &self.config)
            .field("phase", &self.lifecycle.phase())
            .finish_non_exhaustive()
    }
}

/// Resolves with the signal name on SIGINT or SIGTERM.
///
/// A handler that cannot be installed is logged and never fires.
async fn os_signal() -> String {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => "SIGINT".to_string(),
            Err(e) => {
                warn!(error = %e, "failed to install SIGINT handler");
                std::future::pending().await
            }
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                "SIGTERM".to_string()
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending().await
            }
        }
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<String>();

    tokio::select! {
        name = ctrl_c => name,
        name = sigterm => name,
    }
}
