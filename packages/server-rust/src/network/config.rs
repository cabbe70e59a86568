//! Network configuration types and command-line parsing for the vault server.

use std::net::SocketAddr;
use std::time::Duration;

use axum::http::StatusCode;
use clap::Parser;

/// Top-level configuration for both transports.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen address.
    pub http_addr: SocketAddr,
    /// gRPC listen address.
    pub rpc_addr: SocketAddr,
    /// Human-readable logs instead of JSON lines.
    pub console: bool,
    /// Maximum time an HTTP request may take before the server answers 408.
    pub request_timeout: Duration,
    /// Status used in the HTTP error envelope for capability errors.
    pub error_status: StatusCode,
    /// How often the metrics sink runs its upkeep.
    pub metrics_upkeep: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: SocketAddr::from(([0, 0, 0, 0], 8086)),
            rpc_addr: SocketAddr::from(([0, 0, 0, 0], 8085)),
            console: false,
            request_timeout: Duration::from_secs(30),
            error_status: StatusCode::INTERNAL_SERVER_ERROR,
            metrics_upkeep: Duration::from_secs(5),
        }
    }
}

/// Command-line flags, each with an environment fallback.
#[derive(Parser, Debug, Clone)]
#[command(name = "vault-server", version, about = "Password vault over gRPC and HTTP")]
pub struct ServerArgs {
    /// HTTP listen address. `:PORT` listens on every interface.
    #[arg(
        short = 'H',
        long = "http",
        env = "VAULT_HTTP_ADDR",
        default_value = ":8086",
        value_parser = parse_listen_addr
    )]
    pub http_addr: SocketAddr,

    /// gRPC listen address. `:PORT` listens on every interface.
    #[arg(
        short = 'G',
        long = "grpc",
        env = "VAULT_GRPC_ADDR",
        default_value = ":8085",
        value_parser = parse_listen_addr
    )]
    pub rpc_addr: SocketAddr,

    /// Turns on pretty console logging.
    #[arg(short = 'c', long, env = "VAULT_CONSOLE")]
    pub console: bool,

    /// HTTP request timeout in seconds.
    #[arg(long, env = "VAULT_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// HTTP status returned for capability errors.
    #[arg(long, env = "VAULT_ERROR_STATUS", default_value_t = 500, value_parser = parse_error_status)]
    pub error_status: u16,

    /// Seconds between metrics upkeep runs.
    #[arg(long, env = "VAULT_METRICS_UPKEEP_SECS", default_value_t = 5)]
    pub metrics_upkeep_secs: u64,
}

/// Accepts `host:port`, or `:port` for the unspecified IPv4 address.
fn parse_listen_addr(raw: &str) -> Result<SocketAddr, String> {
    match raw.strip_prefix(':') {
        Some(port) => port
            .parse::<u16>()
            .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
            .map_err(|e| format!("invalid port {port:?}: {e}")),
        None => raw.parse().map_err(|e| format!("{e}")),
    }
}

fn parse_error_status(raw: &str) -> Result<u16, String> {
    let code: u16 = raw.parse().map_err(|e| format!("{e}"))?;
    match StatusCode::from_u16(code) {
        Ok(status) if status.is_client_error() || status.is_server_error() => Ok(code),
        _ => Err(format!("{code} is not a 4xx or 5xx status")),
    }
}

impl ServerArgs {
    /// Converts parsed flags into a [`ServerConfig`].
    #[must_use]
    pub fn into_config(self) -> ServerConfig {
        ServerConfig {
            http_addr: self.http_addr,
            rpc_addr: self.rpc_addr,
            console: self.console,
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            error_status: StatusCode::from_u16(self.error_status)
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            metrics_upkeep: Duration::from_secs(self.metrics_upkeep_secs.max(1)),
        }
    }
}
