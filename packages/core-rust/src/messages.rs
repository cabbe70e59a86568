//! Per-operation request/response types.
//!
//! Each call gets its own instance; nothing here is shared between calls.
//! Failures travel as the `Err` arm of a `Result`, never as a field.

use serde::{Deserialize, Serialize};

/// Input of the `hash` operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashRequest {
    pub password: String,
}

/// Output of the `hash` operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashResponse {
    pub hash: String,
}

/// Input of the `validate` operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateRequest {
    pub password: String,
    pub hash: String,
}

/// Output of the `validate` operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateResponse {
    pub valid: bool,
}

/// Input of the `login` operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Output of the `login` operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}
