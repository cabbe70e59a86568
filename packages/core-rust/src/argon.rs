//! Argon2id-backed [`Vault`] implementation.
//!
//! Digests are PHC strings (`$argon2id$v=19$m=...`), so the parameters and
//! salt used at hash time travel with the digest and `validate` needs no
//! side configuration.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use async_trait::async_trait;
use tracing::debug;

use crate::error::VaultError;
use crate::traits::Vault;

/// Password vault hashing with Argon2id.
///
/// Hashing is CPU-bound, so both operations run on the blocking pool.
#[derive(Debug, Clone)]
pub struct Argon2Vault {
    params: Params,
}

impl Argon2Vault {
    /// Creates a vault using the crate's default Argon2id cost parameters.
    #[must_use]
    pub fn new() -> Self {
        Self {
            params: Params::default(),
        }
    }

    /// Creates a vault with explicit cost parameters (cheaper ones for tests).
    #[must_use]
    pub fn with_params(params: Params) -> Self {
        Self { params }
    }

    fn hasher(params: Params) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    }
}

impl Default for Argon2Vault {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Vault for Argon2Vault {
    async fn hash(&self, password: &str) -> Result<String, VaultError> {
        if password.is_empty() {
            return Err(VaultError::InvalidArgument(
                "password must not be empty".to_string(),
            ));
        }

        let password = password.to_owned();
        let params = self.params.clone();
        tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            Self::hasher(params)
                .hash_password(password.as_bytes(), &salt)
                .map(|digest| digest.to_string())
                .map_err(|e| VaultError::Internal(e.to_string()))
        })
        .await
        .map_err(|e| VaultError::Internal(format!("hash task failed: {e}")))?
    }

    async fn validate(&self, password: &str, hash: &str) -> Result<bool, VaultError> {
        let password = password.to_owned();
        let hash = hash.to_owned();
        let params = self.params.clone();
        tokio::task::spawn_blocking(move || {
            // An unparseable digest cannot match anything.
            let Ok(parsed) = PasswordHash::new(&hash) else {
                debug!("validate called with a malformed digest");
                return false;
            };
            Self::hasher(params)
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .await
        .map_err(|e| VaultError::Internal(format!("validate task failed: {e}")))
    }
}
