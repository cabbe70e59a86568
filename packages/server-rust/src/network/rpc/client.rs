//! Typed client for `pb.Vault`.

use http::uri::PathAndQuery;
use tonic::client::Grpc;
use tonic::transport::Channel;
use tonic::{Request, Status};

use super::codec::VaultCodec;
use super::proto::{
    HashRequest, HashResponse, ValidateRequest, ValidateResponse, HASH_PATH, VALIDATE_PATH,
};

/// Client for the vault gRPC service.
#[derive(Debug, Clone)]
pub struct VaultRpcClient {
    inner: Grpc<Channel>,
}

impl VaultRpcClient {
    /// Connects to `dst`, e.g. `http://127.0.0.1:8085`.
    ///
    /// # Errors
    ///
    /// Fails if `dst` is not a valid URI or the connection cannot be made.
    pub async fn connect(dst: impl Into<String>) -> anyhow::Result<Self> {
        let channel = Channel::from_shared(dst.into())?.connect().await?;
        Ok(Self::new(channel))
    }

    #[must_use]
    pub fn new(channel: Channel) -> Self {
        Self {
            inner: Grpc::new(channel),
        }
    }

    /// Calls `Hash`.
    ///
    /// # Errors
    ///
    /// Returns the status sent by the server, or `Unavailable` if the
    /// channel is not ready.
    pub async fn hash(&mut self, password: impl Into<String>) -> Result<String, Status> {
        self.ready().await?;
        let request = Request::new(HashRequest {
            password: password.into(),
        });
        let response = self
            .inner
            .unary(
                request,
                PathAndQuery::from_static(HASH_PATH),
                VaultCodec::<HashRequest, HashResponse>::default(),
            )
            .await?;
        Ok(response.into_inner().hash)
    }

    /// Calls `Validate`.
    ///
    /// # Errors
    ///
    /// Returns the status sent by the server, or `Unavailable` if the
    /// channel is not ready.
    pub async fn validate(
        &mut self,
        password: impl Into<String>,
        hash: impl Into<String>,
    ) -> Result<bool, Status> {
        self.ready().await?;
        let request = Request::new(ValidateRequest {
            password: password.into(),
            hash: hash.into(),
        });
        let response = self
            .inner
            .unary(
                request,
                PathAndQuery::from_static(VALIDATE_PATH),
                VaultCodec::<ValidateRequest, ValidateResponse>::default(),
            )
            .await?;
        Ok(response.into_inner().valid)
    }

    async fn ready(&mut self) -> Result<(), Status> {
        self.inner
            .ready()
            .await
            .map_err(|e| Status::unavailable(format!("service was not ready: {e}")))
    }
}
