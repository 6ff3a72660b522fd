pub mod auth;
pub mod classify;
pub mod client;
pub mod error;
pub mod transport;
pub mod upload;

pub use self::auth::BearerAuthLayer;
pub use self::classify::{ResponseHooks, ResponseLayer};
pub use self::client::{HttpClient, Payload, RequestOptions};
pub use self::error::{ApiError, BoxError, StatusKind, TransportError};
pub use self::transport::{HyperTransport, RequestTimeout, TimeoutLayer};
pub use self::upload::{ProgressCallback, UploadFile};

use bytes::Bytes;
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Empty, Full};

/// Request body type accepted by every stage of the pipeline.
pub type ReqBody = UnsyncBoxBody<Bytes, BoxError>;

pub fn full<T: Into<Bytes>>(chunk: T) -> ReqBody {
    Full::new(chunk.into())
        .map_err(|never| match never {})
        .boxed_unsync()
}

pub fn empty() -> ReqBody {
    Empty::<Bytes>::new()
        .map_err(|never| match never {})
        .boxed_unsync()
}
