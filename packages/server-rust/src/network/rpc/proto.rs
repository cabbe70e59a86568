//! Protobuf messages for `pb.Vault`, declared by hand with `prost` derives.
//!
//! ```proto
//! service Vault {
//!   rpc Hash(HashRequest) returns (HashResponse) {}
//!   rpc Validate(ValidateRequest) returns (ValidateResponse) {}
//! }
//! ```

/// Fully qualified service name.
pub const SERVICE_NAME: &str = "pb.Vault";
/// Request path of `Hash`.
pub const HASH_PATH: &str = "/pb.Vault/Hash";
/// Request path of `Validate`.
pub const VALIDATE_PATH: &str = "/pb.Vault/Validate";

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct HashRequest {
    #[prost(string, tag = "1")]
    pub password: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct HashResponse {
    #[prost(string, tag = "1")]
    pub hash: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ValidateRequest {
    #[prost(string, tag = "1")]
    pub password: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub hash: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ValidateResponse {
    #[prost(bool, tag = "1")]
    pub valid: bool,
}

// ---------------------------------------------------------------------------
// Conversions to and from the transport-neutral DTOs
// ---------------------------------------------------------------------------

impl From<HashRequest> for vault_core::HashRequest {
    fn from(msg: HashRequest) -> Self {
        Self {
            password: msg.password,
        }
    }
}

impl From<vault_core::HashResponse> for HashResponse {
    fn from(dto: vault_core::HashResponse) -> Self {
        Self { hash: dto.hash }
    }
}

impl From<ValidateRequest> for vault_core::ValidateRequest {
    fn from(msg: ValidateRequest) -> Self {
        Self {
            password: msg.password,
            hash: msg.hash,
        }
    }
}

impl From<vault_core::ValidateResponse> for ValidateResponse {
    fn from(dto: vault_core::ValidateResponse) -> Self {
        Self { valid: dto.valid }
    }
}

#[cfg(test)]
mod tests {
    use prost::Message;

    use super::*;

    #[test]
    fn paths_are_under_the_service_name() {
        assert!(HASH_PATH.starts_with(&format!("/{SERVICE_NAME}/")));
        assert!(VALIDATE_PATH.starts_with(&format!("/{SERVICE_NAME}/")));
    }

    #[test]
    fn validate_request_uses_stable_tags() {
        let msg = ValidateRequest {
            password: "a".into(),
            hash: "b".into(),
        };
        // field 1 (len-delimited) "a", field 2 (len-delimited) "b"
        assert_eq!(msg.encode_to_vec(), vec![0x0a, 0x01, b'a', 0x12, 0x01, b'b']);
    }

    #[test]
    fn default_response_encodes_empty() {
        assert!(ValidateResponse { valid: false }.encode_to_vec().is_empty());
    }

    #[test]
    fn converts_to_dto() {
        let dto: vault_core::ValidateRequest = ValidateRequest {
            password: "pw".into(),
            hash: "h".into(),
        }
        .into();
        assert_eq!(dto.password, "pw");
        assert_eq!(dto.hash, "h");
    }
}
