use std::task::{Context, Poll};

use hyper::Request;
use hyper::header::{AUTHORIZATION, HeaderValue};
use tower::{Layer, Service};
use tracing::warn;

use crate::session::SessionState;

/// Tower layer that attaches `Authorization: Bearer <token>` while a session
/// holds a token. Requests are otherwise passed through untouched.
#[derive(Clone)]
pub struct BearerAuthLayer {
    session: SessionState,
}

impl BearerAuthLayer {
    pub fn new(session: SessionState) -> Self {
        Self { session }
    }
}

impl<S> Layer<S> for BearerAuthLayer {
    type Service = BearerAuthService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        BearerAuthService {
            inner,
            session: self.session.clone(),
        }
    }
}

#[derive(Clone)]
pub struct BearerAuthService<S> {
    inner: S,
    session: SessionState,
}

impl<S, B> Service<Request<B>> for BearerAuthService<S>
where
    S: Service<Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<B>) -> Self::Future {
        // Read at send time so a login or a 401 elsewhere is seen immediately.
        if let Some(token) = self.session.bearer_token() {
            match HeaderValue::from_str(&format!("Bearer {}", token)) {
                Ok(mut value) => {
                    value.set_sensitive(true);
                    req.headers_mut().insert(AUTHORIZATION, value);
                }
                Err(_) => warn!("Stored access token is not a valid header value, sending without it"),
            }
        }

        self.inner.call(req)
    }
}
