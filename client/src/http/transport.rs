use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use bytes::Bytes;
use http_body_util::BodyExt;
use hyper::{Request, Response};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use tokio::time;
use tower::{Layer, Service};
use tracing::{debug, warn};

use crate::http::ReqBody;
use crate::http::error::TransportError;

/// Boxed, `Send` future used by the services in this module.
type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

/// Per-request timeout override, carried in request extensions.
#[derive(Debug, Clone, Copy)]
pub struct RequestTimeout(pub Duration);

// ---------------------------------------------------------------------------
// Hyper transport
// ---------------------------------------------------------------------------

/// The innermost stage: sends the request with hyper and buffers the reply
/// body.
#[derive(Clone, Debug)]
pub struct HyperTransport {
    client: Client<HttpConnector, ReqBody>,
}

impl HyperTransport {
    pub fn new() -> Self {
        let client = Client::builder(TokioExecutor::new()).build_http();
        Self { client }
    }
}

impl Default for HyperTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<Request<ReqBody>> for HyperTransport {
    type Response = Response<Bytes>;
    type Error = TransportError;
    type Future = BoxFuture<Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        let client = self.client.clone();

        Box::pin(async move {
            let response = client
                .request(req)
                .await
                .map_err(|e| TransportError::Connect(Box::new(e)))?;

            let (parts, body) = response.into_parts();
            let bytes = body
                .collect()
                .await
                .map_err(|e| TransportError::Body(Box::new(e)))?
                .to_bytes();

            debug!("Received {} ({} bytes)", parts.status, bytes.len());
            Ok(Response::from_parts(parts, bytes))
        })
    }
}

// ---------------------------------------------------------------------------
// Timeout
// ---------------------------------------------------------------------------

/// Tower layer for request timeouts
///
/// If the inner service does not answer within the configured duration (or
/// the request's own [`RequestTimeout`]), the call fails with
/// [`TransportError::Timeout`].
#[derive(Clone)]
pub struct TimeoutLayer {
    duration: Duration,
}

impl TimeoutLayer {
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }
}

impl<S> Layer<S> for TimeoutLayer {
    type Service = TimeoutService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TimeoutService {
            inner,
            duration: self.duration,
        }
    }
}

/// The actual timeout service
#[derive(Clone)]
pub struct TimeoutService<S> {
    inner: S,
    duration: Duration,
}

impl<S, B> Service<Request<B>> for TimeoutService<S>
where
    S: Service<Request<B>, Error = TransportError> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Response: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = TransportError;
    type Future = BoxFuture<Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<B>) -> Self::Future {
        let duration = req
            .extensions()
            .get::<RequestTimeout>()
            .map(|t| t.0)
            .unwrap_or(self.duration);
        let mut inner = self.inner.clone();

        Box::pin(async move {
            match time::timeout(duration, inner.call(req)).await {
                Ok(result) => result,
                Err(_) => {
                    warn!("Request timed out after {:?}", duration);
                    Err(TransportError::Timeout(duration))
                }
            }
        })
    }
}
