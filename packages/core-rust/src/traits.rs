use std::sync::Arc;

use async_trait::async_trait;

use crate::error::VaultError;

/// The credential capability: hash a password, check a password against a digest.
///
/// Middleware decorators implement this same trait around an inner `Vault`,
/// so a decorated vault is indistinguishable from the bare one to callers.
#[async_trait]
pub trait Vault: Send + Sync {
    /// Produces a self-describing digest of `password`.
    async fn hash(&self, password: &str) -> Result<String, VaultError>;

    /// Returns whether `password` matches `hash`. A mismatch is `Ok(false)`, not an error.
    async fn validate(&self, password: &str, hash: &str) -> Result<bool, VaultError>;
}

#[async_trait]
impl<V: Vault + ?Sized> Vault for Arc<V> {
    async fn hash(&self, password: &str) -> Result<String, VaultError> {
        (**self).hash(password).await
    }

    async fn validate(&self, password: &str, hash: &str) -> Result<bool, VaultError> {
        (**self).validate(password, hash).await
    }
}

/// Exchanges a username/password pair for a session token.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Returns a fresh token, or `VaultError::InvalidCredentials`.
    async fn login(&self, username: &str, password: &str) -> Result<String, VaultError>;
}
