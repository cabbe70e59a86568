//! Transport side of the server: configuration, HTTP and gRPC binders, and
//! the lifecycle coordinator that runs them.

pub mod config;
pub mod coordinator;
pub mod handlers;
pub mod http;
pub mod lifecycle;
pub mod middleware;
pub mod rpc;

pub use config::*;
pub use coordinator::{Coordinator, Termination, Transport};
pub use handlers::AppState;
pub use http::{build_router, serve_http};
pub use lifecycle::*;
pub use rpc::{serve_rpc, RpcBinder, VaultRpcClient};
