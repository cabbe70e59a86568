//! Tonic service for `pb.Vault`, written without build-time codegen.

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use async_trait::async_trait;
use http::header::CONTENT_TYPE;
use http::HeaderValue;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::body::{empty_body, BoxBody};
use tonic::server::{Grpc, NamedService, UnaryService};
use tonic::transport::Server;
use tonic::{Code, Request, Response, Status};
use tower::Service;
use tracing::info;

use super::codec::VaultCodec;
use super::proto::{
    HashRequest, HashResponse, ValidateRequest, ValidateResponse, HASH_PATH, SERVICE_NAME,
    VALIDATE_PATH,
};
use super::trace::RpcTraceLayer;
use crate::observability::Tracer;

type BoxFuture<T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'static>>;

/// Server-side handlers of `pb.Vault`.
#[async_trait]
pub trait VaultRpc: Send + Sync + 'static {
    async fn hash(&self, request: Request<HashRequest>) -> Result<Response<HashResponse>, Status>;

    async fn validate(
        &self,
        request: Request<ValidateRequest>,
    ) -> Result<Response<ValidateResponse>, Status>;
}

/// Routes `pb.Vault` requests to a [`VaultRpc`] implementation.
#[derive(Debug)]
pub struct VaultRpcServer<T> {
    inner: Arc<T>,
}

impl<T> VaultRpcServer<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }
}

impl<T> Clone for VaultRpcServer<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> NamedService for VaultRpcServer<T> {
    const NAME: &'static str = SERVICE_NAME;
}

struct HashMethod<T>(Arc<T>);

impl<T: VaultRpc> UnaryService<HashRequest> for HashMethod<T> {
    type Response = HashResponse;
    type Future = BoxFuture<Response<HashResponse>, Status>;

    fn call(&mut self, request: Request<HashRequest>) -> Self::Future {
        let inner = Arc::clone(&self.0);
        Box::pin(async move { inner.hash(request).await })
    }
}

struct ValidateMethod<T>(Arc<T>);

impl<T: VaultRpc> UnaryService<ValidateRequest> for ValidateMethod<T> {
    type Response = ValidateResponse;
    type Future = BoxFuture<Response<ValidateResponse>, Status>;

    fn call(&mut self, request: Request<ValidateRequest>) -> Self::Future {
        let inner = Arc::clone(&self.0);
        Box::pin(async move { inner.validate(request).await })
    }
}

impl<T, B> Service<http::Request<B>> for VaultRpcServer<T>
where
    T: VaultRpc,
    B: http_body::Body + Send + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>> + Send + 'static,
{
    type Response = http::Response<BoxBody>;
    type Error = Infallible;
    type Future = BoxFuture<Self::Response, Self::Error>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: http::Request<B>) -> Self::Future {
        let inner = Arc::clone(&self.inner);
        match req.uri().path() {
            HASH_PATH => Box::pin(async move {
                let mut grpc = Grpc::new(VaultCodec::<HashResponse, HashRequest>::default());
                Ok(grpc.unary(HashMethod(inner), req).await)
            }),
            VALIDATE_PATH => Box::pin(async move {
                let mut grpc =
                    Grpc::new(VaultCodec::<ValidateResponse, ValidateRequest>::default());
                Ok(grpc.unary(ValidateMethod(inner), req).await)
            }),
            _ => Box::pin(async move { Ok(unimplemented_response()) }),
        }
    }
}

fn unimplemented_response() -> http::Response<BoxBody> {
    let mut response = http::Response::new(empty_body());
    let headers = response.headers_mut();
    headers.insert("grpc-status", HeaderValue::from(Code::Unimplemented as i32));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/grpc"));
    response
}

/// Serves `service` on an already-bound listener, tracing every call.
///
/// # Errors
///
/// Returns the transport error that stopped the server.
pub async fn serve_rpc<T: VaultRpc>(
    listener: TcpListener,
    service: T,
    tracer: Tracer,
) -> Result<(), tonic::transport::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(transport = "gRPC", %addr, "listening");
    }
    Server::builder()
        .layer(RpcTraceLayer::new(tracer))
        .add_service(VaultRpcServer::new(service))
        .serve_with_incoming(TcpListenerStream::new(listener))
        .await
}
