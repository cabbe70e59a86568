//! In-memory login directory backing the `login` operation.
//!
//! Maps usernames to digests produced by the wrapped [`Vault`]. Nothing is
//! persisted; the directory lives as long as the process.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use crate::error::VaultError;
use crate::traits::{Authenticator, Vault};

/// Username -> digest table that authenticates through a [`Vault`].
///
/// Passing an already-decorated vault means login checks are logged and
/// counted like any other `validate` call.
pub struct UserDirectory<V> {
    vault: Arc<V>,
    users: DashMap<String, String>,
}

impl<V: Vault> UserDirectory<V> {
    /// Creates an empty directory.
    #[must_use]
    pub fn new(vault: Arc<V>) -> Self {
        Self {
            vault,
            users: DashMap::new(),
        }
    }

    /// Hashes `password` and stores it under `username`, replacing any previous entry.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::InvalidArgument` for an empty username, or whatever
    /// the vault returns when hashing fails.
    pub async fn register(&self, username: &str, password: &str) -> Result<(), VaultError> {
        if username.is_empty() {
            return Err(VaultError::InvalidArgument(
                "username must not be empty".to_string(),
            ));
        }
        let digest = self.vault.hash(password).await?;
        self.users.insert(username.to_string(), digest);
        Ok(())
    }

    /// Number of registered users.
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Returns true when no users are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl<V: Vault> Authenticator for UserDirectory<V> {
    async fn login(&self, username: &str, password: &str) -> Result<String, VaultError> {
        // Clone out of the map so no shard lock is held across the await.
        let Some(digest) = self.users.get(username).map(|d| d.value().clone()) else {
            return Err(VaultError::InvalidCredentials);
        };

        if self.vault.validate(password, &digest).await? {
            Ok(Uuid::new_v4().to_string())
        } else {
            Err(VaultError::InvalidCredentials)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reversible "digest" so tests don't pay for real hashing.
    struct PlainVault;

    #[async_trait]
    impl Vault for PlainVault {
        async fn hash(&self, password: &str) -> Result<String, VaultError> {
            Ok(format!("plain:{password}"))
        }

        async fn validate(&self, password: &str, hash: &str) -> Result<bool, VaultError> {
            Ok(hash == format!("plain:{password}"))
        }
    }

    #[tokio::test]
    async fn registered_user_logs_in() {
        let dir = UserDirectory::new(Arc::new(PlainVault));
        dir.register("alice", "secret").await.unwrap();

        let token = dir.login("alice", "secret").await.unwrap();
        assert!(Uuid::parse_str(&token).is_ok());
    }

    #[tokio::test]
    async fn tokens_are_unique_per_login() {
        let dir = UserDirectory::new(Arc::new(PlainVault));
        dir.register("alice", "secret").await.unwrap();

        let a = dir.login("alice", "secret").await.unwrap();
        let b = dir.login("alice", "secret").await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn wrong_password_is_invalid_credentials() {
        let dir = UserDirectory::new(Arc::new(PlainVault));
        dir.register("alice", "secret").await.unwrap();

        let err = dir.login("alice", "nope").await.unwrap_err();
        assert_eq!(err, VaultError::InvalidCredentials);
    }

    #[tokio::test]
    async fn unknown_user_is_invalid_credentials() {
        let dir = UserDirectory::new(Arc::new(PlainVault));
        let err = dir.login("bob", "secret").await.unwrap_err();
        assert_eq!(err, VaultError::InvalidCredentials);
    }

    #[tokio::test]
    async fn empty_username_is_rejected() {
        let dir = UserDirectory::new(Arc::new(PlainVault));
        let err = dir.register("", "secret").await.unwrap_err();
        assert!(matches!(err, VaultError::InvalidArgument(_)));
        assert!(dir.is_empty());
    }

    #[tokio::test]
    async fn re_register_replaces_digest() {
        let dir = UserDirectory::new(Arc::new(PlainVault));
        dir.register("alice", "old").await.unwrap();
        dir.register("alice", "new").await.unwrap();

        assert_eq!(dir.len(), 1);
        assert!(dir.login("alice", "new").await.is_ok());
        assert!(dir.login("alice", "old").await.is_err());
    }
}
