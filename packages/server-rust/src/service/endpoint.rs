//! Endpoint adapters: transport-neutral functions wrapping one capability
//! operation each.
//!
//! An [`Endpoint`] takes a request DTO and resolves to the response DTO or
//! the capability's error, unchanged. Decoding and encoding belong to the
//! transport binders.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use tower::Service;
use vault_core::{
    Authenticator, HashRequest, HashResponse, LoginRequest, LoginResponse, ValidateRequest,
    ValidateResponse, Vault, VaultError,
};

type BoxedFuture<T> = Pin<Box<dyn Future<Output = Result<T, VaultError>> + Send>>;

type BoxedFn<Req, Resp> = Arc<dyn Fn(Req) -> BoxedFuture<Resp> + Send + Sync>;

// ---------------------------------------------------------------------------
// Endpoint
// ---------------------------------------------------------------------------

/// A cloneable `Req -> Result<Resp, VaultError>` function.
///
/// Also a `tower::Service`, so it works with `ServiceExt::oneshot` and friends.
pub struct Endpoint<Req, Resp> {
    f: BoxedFn<Req, Resp>,
}

impl<Req, Resp> Endpoint<Req, Resp> {
    /// Wrap an async function as an endpoint.
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(Req) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Resp, VaultError>> + Send + 'static,
    {
        Self {
            f: Arc::new(move |req| -> BoxedFuture<Resp> { Box::pin(f(req)) }),
        }
    }

    /// Invoke the endpoint.
    ///
    /// # Errors
    ///
    /// Returns whatever error the wrapped operation produced.
    pub async fn invoke(&self, req: Req) -> Result<Resp, VaultError> {
        (self.f)(req).await
    }
}

impl<Req, Resp> Clone for Endpoint<Req, Resp> {
    fn clone(&self) -> Self {
        Self {
            f: Arc::clone(&self.f),
        }
    }
}

impl<Req, Resp> std::fmt::Debug for Endpoint<Req, Resp> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Endpoint").finish_non_exhaustive()
    }
}

impl<Req, Resp> Service<Req> for Endpoint<Req, Resp> {
    type Response = Resp;
    type Error = VaultError;
    type Future = BoxedFuture<Resp>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Req) -> Self::Future {
        (self.f)(req)
    }
}

// ---------------------------------------------------------------------------
// Constructors
// ---------------------------------------------------------------------------

/// Endpoint for `Vault::hash`.
pub fn make_hash_endpoint<V>(vault: Arc<V>) -> Endpoint<HashRequest, HashResponse>
where
    V: Vault + ?Sized + 'static,
{
    Endpoint::new(move |req: HashRequest| {
        let vault = Arc::clone(&vault);
        async move {
            let hash = vault.hash(&req.password).await?;
            Ok(HashResponse { hash })
        }
    })
}

/// Endpoint for `Vault::validate`.
pub fn make_validate_endpoint<V>(vault: Arc<V>) -> Endpoint<ValidateRequest, ValidateResponse>
where
    V: Vault + ?Sized + 'static,
{
    Endpoint::new(move |req: ValidateRequest| {
        let vault = Arc::clone(&vault);
        async move {
            let valid = vault.validate(&req.password, &req.hash).await?;
            Ok(ValidateResponse { valid })
        }
    })
}

/// Endpoint for `Authenticator::login`.
pub fn make_login_endpoint<A>(auth: Arc<A>) -> Endpoint<LoginRequest, LoginResponse>
where
    A: Authenticator + ?Sized + 'static,
{
    Endpoint::new(move |req: LoginRequest| {
        let auth = Arc::clone(&auth);
        async move {
            let token = auth.login(&req.username, &req.password).await?;
            Ok(LoginResponse { token })
        }
    })
}

// ---------------------------------------------------------------------------
// Endpoints
// ---------------------------------------------------------------------------

/// Every endpoint the binders expose. Built once at startup.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub hash: Endpoint<HashRequest, HashResponse>,
    pub validate: Endpoint<ValidateRequest, ValidateResponse>,
    pub login: Endpoint<LoginRequest, LoginResponse>,
}

impl Endpoints {
    /// Builds all endpoints over a (typically decorated) vault and an authenticator.
    pub fn new<V, A>(vault: Arc<V>, auth: Arc<A>) -> Self
    where
        V: Vault + ?Sized + 'static,
        A: Authenticator + ?Sized + 'static,
    {
        Self {
            hash: make_hash_endpoint(Arc::clone(&vault)),
            validate: make_validate_endpoint(vault),
            login: make_login_endpoint(auth),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
