//! Vault Core — the credential capability, the login directory, and the
//! per-operation request/response types shared by every transport.

pub mod argon;
pub mod directory;
pub mod error;
pub mod messages;
pub mod traits;

pub use argon::Argon2Vault;
pub use directory::UserDirectory;
pub use error::{ErrorKind, VaultError};
pub use messages::{
    HashRequest, HashResponse, LoginRequest, LoginResponse, ValidateRequest, ValidateResponse,
};
pub use traits::{Authenticator, Vault};

#[cfg(test)]
mod tests {
    #[test]
    fn crate_loads() {
        // Empty body: if this test runs, the crate compiles and loads.
    }
}
