use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::user::UserProfile;

// ---------------------------------------------------------------------------
// Login wire types
// ---------------------------------------------------------------------------

/// Credentials posted to `/users/auth/login/`.
#[derive(Clone, Serialize, Deserialize)]
pub struct LoginData {
    pub username: String,
    pub password: String,
}

impl LoginData {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

// Keeps the password out of logs.
impl fmt::Debug for LoginData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginData")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// `data` of a successful login envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginPayload {
    /// Short-lived bearer token.
    pub access: String,
    /// Long-lived token; only used to end the server-side session.
    pub refresh: String,
    pub user: UserProfile,
}

// ---------------------------------------------------------------------------
// Logout
// ---------------------------------------------------------------------------

/// Body posted to `/users/auth/logout/`. A missing refresh token is sent as
/// `null`; the server accepts that and still answers with success.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogoutData {
    pub refresh: Option<String>,
}

impl fmt::Display for LoginPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "user_id={}, username={}, role={}",
            self.user.id, self.user.username, self.user.role
        )
    }
}
