//! gRPC binder for the `pb.Vault` service.
//!
//! - [`proto`]: wire messages and method paths
//! - [`codec`]: prost codec that reports undecodable requests as `InvalidArgument`
//! - [`server`]: `VaultRpc` trait and the tonic service dispatching to it
//! - [`binder`]: `VaultRpc` implementation over the endpoint adapters
//! - [`trace`]: tower layer opening a `server` span per call
//! - [`client`]: typed client for the same service

pub mod binder;
pub mod client;
pub mod codec;
pub mod proto;
pub mod server;
pub mod trace;

pub use binder::{status_from_error, RpcBinder};
pub use client::VaultRpcClient;
pub use codec::VaultCodec;
pub use server::{serve_rpc, VaultRpc, VaultRpcServer};
pub use trace::{RpcTraceLayer, RpcTraceService};
