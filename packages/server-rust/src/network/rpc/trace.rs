//! Tower layer tracing every inbound RPC.
//!
//! Wraps the whole tonic router: each request gets a `server` span named
//! after its request path, entered while the inner service runs and
//! finished once the response is ready.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tower::{Layer, Service};
use tracing::Instrument;

use crate::observability::Tracer;

/// Layer producing [`RpcTraceService`].
#[derive(Debug, Clone)]
pub struct RpcTraceLayer {
    tracer: Tracer,
}

impl RpcTraceLayer {
    #[must_use]
    pub fn new(tracer: Tracer) -> Self {
        Self { tracer }
    }
}

impl<S> Layer<S> for RpcTraceLayer {
    type Service = RpcTraceService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RpcTraceService {
            inner,
            tracer: self.tracer.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RpcTraceService<S> {
    inner: S,
    tracer: Tracer,
}

impl<S, B> Service<http::Request<B>> for RpcTraceService<S>
where
    S: Service<http::Request<B>> + 'static,
    S::Future: Send + 'static,
    B: 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<S::Response, S::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: http::Request<B>) -> Self::Future {
        let active = self.tracer.start_span(req.uri().path());
        let span = active.span().clone();

        let fut = {
            let _entered = span.enter();
            self.inner.call(req)
        };

        Box::pin(
            async move {
                let result = fut.await;
                drop(active);
                result
            }
            .instrument(span),
        )
    }
}
