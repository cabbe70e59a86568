//! `VaultRpc` implementation dispatching to the endpoint adapters.

use async_trait::async_trait;
use tonic::{Request, Response, Status};
use vault_core::{ErrorKind, VaultError};

use super::proto::{HashRequest, HashResponse, ValidateRequest, ValidateResponse};
use super::server::VaultRpc;
use crate::service::Endpoints;

/// Maps a capability error to the gRPC status returned to the caller.
#[must_use]
pub fn status_from_error(err: &VaultError) -> Status {
    let message = err.to_string();
    match err.kind() {
        ErrorKind::InvalidArgument => Status::invalid_argument(message),
        ErrorKind::InvalidCredentials => Status::unauthenticated(message),
        ErrorKind::Internal => Status::internal(message),
    }
}

/// Binds the `Hash` and `Validate` endpoints to the gRPC service.
#[derive(Debug, Clone)]
pub struct RpcBinder {
    endpoints: Endpoints,
}

impl RpcBinder {
    #[must_use]
    pub fn new(endpoints: Endpoints) -> Self {
        Self { endpoints }
    }
}

#[async_trait]
impl VaultRpc for RpcBinder {
    async fn hash(&self, request: Request<HashRequest>) -> Result<Response<HashResponse>, Status> {
        let dto = request.into_inner().into();
        match self.endpoints.hash.invoke(dto).await {
            Ok(resp) => Ok(Response::new(resp.into())),
            Err(err) => Err(status_from_error(&err)),
        }
    }

    async fn validate(
        &self,
        request: Request<ValidateRequest>,
    ) -> Result<Response<ValidateResponse>, Status> {
        let dto = request.into_inner().into();
        match self.endpoints.validate.invoke(dto).await {
            Ok(resp) => Ok(Response::new(resp.into())),
            Err(err) => Err(status_from_error(&err)),
        }
    }
}
