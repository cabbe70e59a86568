//! Capability-facing half of the server.
//!
//! 1. **Middleware** (`middleware`): decorators wrapping the vault (logging, metrics)
//! 2. **Endpoints** (`endpoint`): one transport-neutral function per operation

pub mod endpoint;
pub mod middleware;

pub use endpoint::{
    make_hash_endpoint, make_login_endpoint, make_validate_endpoint, Endpoint, Endpoints,
};
pub use middleware::{build_vault_pipeline, DecoratedVault};
