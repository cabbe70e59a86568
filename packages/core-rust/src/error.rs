//! Error taxonomy shared by the capability, the endpoint adapters, and the
//! transport binders.
//!
//! Errors carry a coarse [`ErrorKind`] so binders can pick a wire-level status
//! without matching on message text.

/// Coarse classification of a [`VaultError`], used by transport binders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller supplied an unusable value (e.g., an empty password).
    InvalidArgument,
    /// The supplied credentials did not match.
    InvalidCredentials,
    /// Anything else that went wrong inside the capability.
    Internal,
}

impl ErrorKind {
    /// Returns the lowercase name used in logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidArgument => "invalid_argument",
            Self::InvalidCredentials => "invalid_credentials",
            Self::Internal => "internal",
        }
    }
}

/// Errors returned by the credential capability.
///
/// These pass through endpoint adapters and middleware untouched; only the
/// transport binders translate them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VaultError {
    #[error("{0}")]
    InvalidArgument(String),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("internal error: {0}")]
    Internal(String),
}

impl VaultError {
    /// Returns the kind of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::InvalidCredentials => ErrorKind::InvalidCredentials,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        assert_eq!(
            VaultError::InvalidArgument("x".into()).kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            VaultError::InvalidCredentials.kind(),
            ErrorKind::InvalidCredentials
        );
        assert_eq!(VaultError::Internal("x".into()).kind(), ErrorKind::Internal);
    }

    #[test]
    fn display_is_the_bare_message() {
        assert_eq!(VaultError::InvalidCredentials.to_string(), "invalid credentials");
        assert_eq!(
            VaultError::InvalidArgument("password must not be empty".into()).to_string(),
            "password must not be empty"
        );
    }
}
