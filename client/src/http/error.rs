use std::time::Duration;

use hyper::StatusCode;
use shared::types::ErrorBody;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

// ---------------------------------------------------------------------------
// Generic user-facing messages
// ---------------------------------------------------------------------------

pub const NETWORK_UNREACHABLE: &str = "Network connection failed, please check your network";
pub const SESSION_EXPIRED: &str = "Session expired, please log in again";
pub const FORBIDDEN: &str = "Insufficient permission";
pub const NOT_FOUND: &str = "The requested resource does not exist";
pub const SERVER_ERROR: &str = "Internal server error";
pub const REQUEST_FAILED: &str = "Request failed";

/// No response reached the client.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("connection failed: {0}")]
    Connect(#[source] BoxError),

    #[error("failed to read response body: {0}")]
    Body(#[source] BoxError),
}

/// Classes of non-2xx replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    /// 401: the session is no longer valid.
    AuthExpired,
    /// 403
    Forbidden,
    /// 404
    NotFound,
    /// 500
    ServerError,
    Other,
}

impl StatusKind {
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => Self::AuthExpired,
            StatusCode::FORBIDDEN => Self::Forbidden,
            StatusCode::NOT_FOUND => Self::NotFound,
            StatusCode::INTERNAL_SERVER_ERROR => Self::ServerError,
            _ => Self::Other,
        }
    }

    pub fn generic_message(&self) -> &'static str {
        match self {
            Self::AuthExpired => SESSION_EXPIRED,
            Self::Forbidden => FORBIDDEN,
            Self::NotFound => NOT_FOUND,
            Self::ServerError => SERVER_ERROR,
            Self::Other => REQUEST_FAILED,
        }
    }
}

/// Why an API call was rejected.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("{}", status_description(*status, body.as_ref()))]
    Status {
        kind: StatusKind,
        status: StatusCode,
        body: Option<ErrorBody>,
    },

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

fn status_description(status: StatusCode, body: Option<&ErrorBody>) -> String {
    match body.and_then(ErrorBody::message) {
        Some(message) => message.to_string(),
        None => format!("request failed with status code {}", status.as_u16()),
    }
}

impl ApiError {
    pub fn kind(&self) -> Option<StatusKind> {
        match self {
            Self::Status { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Server error body, when the server sent one.
    pub fn body(&self) -> Option<&ErrorBody> {
        match self {
            Self::Status { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    pub fn is_auth_expired(&self) -> bool {
        self.kind() == Some(StatusKind::AuthExpired)
    }

    /// Server message when there is one, otherwise the error text.
    pub fn message(&self) -> String {
        self.to_string()
    }
}
