use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use hyper::{Request, Response};
use shared::types::{ApiResponse, ErrorBody};
use tower::{Layer, Service};
use tracing::{debug, error, warn};

use crate::http::error::{
    ApiError, NETWORK_UNREACHABLE, REQUEST_FAILED, StatusKind, TransportError,
};
use crate::notify::Notifier;
use crate::router::Router;
use crate::session::SessionState;

/// Side effects of the response stage: user notifications and, on 401, the
/// session teardown and the jump to the login screen.
#[derive(Clone)]
pub struct ResponseHooks {
    session: SessionState,
    router: Router,
    notifier: Notifier,
}

impl ResponseHooks {
    pub fn new(session: SessionState, router: Router, notifier: Notifier) -> Self {
        Self {
            session,
            router,
            notifier,
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Turn a transport outcome into an envelope or a rejection. Each
    /// rejection produces exactly one notification.
    pub fn classify(
        &self,
        outcome: Result<Response<Bytes>, TransportError>,
    ) -> Result<ApiResponse, ApiError> {
        let response = match outcome {
            Ok(response) => response,
            Err(err) => {
                warn!("No response received: {}", err);
                self.notifier.error(NETWORK_UNREACHABLE);
                return Err(err.into());
            }
        };

        let (parts, body) = response.into_parts();
        let status = parts.status;

        if status.is_success() {
            // 204 and friends carry no envelope.
            if body.is_empty() {
                return Ok(ApiResponse {
                    code: i64::from(status.as_u16()),
                    data: None,
                    message: None,
                });
            }

            return match serde_json::from_slice::<ApiResponse>(&body) {
                Ok(envelope) => {
                    debug!("Envelope code {} ({})", envelope.code, status);
                    Ok(envelope)
                }
                Err(err) => {
                    error!("Malformed response envelope: {}", err);
                    self.notifier.error(REQUEST_FAILED);
                    Err(ApiError::Decode(err))
                }
            };
        }

        let error_body = serde_json::from_slice::<ErrorBody>(&body).ok();
        let kind = StatusKind::from_status(status);
        warn!(
            "Request failed with {}: {}",
            status,
            error_body
                .as_ref()
                .and_then(ErrorBody::message)
                .unwrap_or("<no message>")
        );

        match kind {
            StatusKind::AuthExpired => self.session_expired(),
            _ => {
                let message = error_body
                    .as_ref()
                    .and_then(ErrorBody::message)
                    .unwrap_or(kind.generic_message());
                self.notifier.error(message);
            }
        }

        Err(ApiError::Status {
            kind,
            status,
            body: error_body,
        })
    }

    fn session_expired(&self) {
        self.notifier.error(StatusKind::AuthExpired.generic_message());
        self.session.reset_state();
        if let Err(e) = self.router.push(self.router.login_path()) {
            error!("Could not navigate to login after 401: {}", e);
        }
    }
}

/// Outermost pipeline stage: everything below it yields raw responses,
/// everything above it sees envelopes and [`ApiError`]s.
#[derive(Clone)]
pub struct ResponseLayer {
    hooks: ResponseHooks,
}

impl ResponseLayer {
    pub fn new(hooks: ResponseHooks) -> Self {
        Self { hooks }
    }
}

impl<S> Layer<S> for ResponseLayer {
    type Service = ResponseService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ResponseService {
            inner,
            hooks: self.hooks.clone(),
        }
    }
}

#[derive(Clone)]
pub struct ResponseService<S> {
    inner: S,
    hooks: ResponseHooks,
}

impl<S, B> Service<Request<B>> for ResponseService<S>
where
    S: Service<Request<B>, Response = Response<Bytes>, Error = TransportError>
        + Clone
        + Send
        + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = ApiResponse;
    type Error = ApiError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        match self.inner.poll_ready(cx) {
            Poll::Ready(Err(err)) => Poll::Ready(self.hooks.classify(Err(err)).map(|_| ())),
            Poll::Ready(Ok(())) => Poll::Ready(Ok(())),
            Poll::Pending => Poll::Pending,
        }
    }

    fn call(&mut self, req: Request<B>) -> Self::Future {
        let hooks = self.hooks.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let outcome = inner.call(req).await;
            hooks.classify(outcome)
        })
    }
}
