//! `vault-server` binary: parses flags, wires the vault pipeline, and runs
//! the coordinator until the first termination event.

use std::sync::Arc;

use clap::Parser;
use tracing::info;
use vault_core::{Argon2Vault, UserDirectory};
use vault_server::network::{Coordinator, ServerArgs};
use vault_server::observability::{init_logging, LogSpanSink, PrometheusMetrics, Tracer};
use vault_server::service::{build_vault_pipeline, Endpoints};
use vault_server::traits::MetricsSink;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerArgs::parse().into_config();
    init_logging(config.console)?;

    let metrics: Arc<dyn MetricsSink> = Arc::new(PrometheusMetrics::new());
    let tracer = Tracer::new("vault", Arc::new(LogSpanSink));

    let vault = Arc::new(build_vault_pipeline(Argon2Vault::new(), Arc::clone(&metrics)));
    let directory = Arc::new(UserDirectory::new(Arc::clone(&vault)));
    let endpoints = Endpoints::new(vault, directory);

    info!(version = env!("CARGO_PKG_VERSION"), "starting vault server");
    // Only returns on a fatal event, which it has already logged.
    Coordinator::new(config, endpoints, metrics, tracer)
        .run()
        .await;
    std::process::exit(1);
}
