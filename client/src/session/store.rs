use shared::types::{LoginData, LogoutData};
use tracing::{debug, info, warn};

use crate::api;
use crate::http::HttpClient;
use crate::router::Router;
use crate::session::SessionState;

/// Result of [`SessionStore::do_login`]. A rejected login is a normal value,
/// not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub success: bool,
    pub message: Option<String>,
}

impl LoginOutcome {
    fn succeeded() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    fn failed(message: Option<String>) -> Self {
        Self {
            success: false,
            message,
        }
    }
}

/// Login, logout and profile refresh on top of the shared [`SessionState`].
#[derive(Clone)]
pub struct SessionStore {
    state: SessionState,
    http: HttpClient,
    router: Router,
}

impl SessionStore {
    pub fn new(state: SessionState, http: HttpClient, router: Router) -> Self {
        Self {
            state,
            http,
            router,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Authenticate and install the returned tokens and profile.
    ///
    /// Leaves the current session untouched on any kind of failure.
    pub async fn do_login(&self, credentials: &LoginData) -> LoginOutcome {
        info!("Logging in as {}", credentials.username);

        match api::user::login(&self.http, credentials).await {
            Ok(envelope) if envelope.is_success() => match envelope.data {
                Some(payload) => {
                    self.state.establish(payload);
                    LoginOutcome::succeeded()
                }
                None => {
                    warn!("Login succeeded without a token payload");
                    LoginOutcome::failed(envelope.message)
                }
            },
            Ok(envelope) => {
                info!("Login rejected with code {}", envelope.code);
                LoginOutcome::failed(envelope.message)
            }
            Err(err) => LoginOutcome::failed(Some(err.message())),
        }
    }

    /// End the session. Local cleanup and the redirect to the login screen
    /// run whatever the logout endpoint does, including when this future is
    /// dropped before it finishes.
    pub async fn do_logout(&self) {
        let _cleanup = LogoutCleanup {
            state: &self.state,
            router: &self.router,
        };

        let body = LogoutData {
            refresh: self.state.refresh_token(),
        };

        if let Err(err) = api::user::logout(&self.http, &body).await {
            debug!("Logout endpoint failed, clearing locally anyway: {}", err);
        }
    }

    /// Reload the current user's profile. `false` on any failure, in which
    /// case nothing changes.
    pub async fn fetch_user_info(&self) -> bool {
        match api::user::get_user_info(&self.http).await {
            Ok(envelope) if envelope.is_success() => match envelope.data {
                Some(profile) => {
                    self.state.set_profile(profile);
                    true
                }
                None => false,
            },
            Ok(envelope) => {
                debug!("Profile refresh returned code {}", envelope.code);
                false
            }
            Err(err) => {
                debug!("Profile refresh failed: {}", err);
                false
            }
        }
    }

    pub fn reset_state(&self) {
        self.state.reset_state();
    }

    pub fn has_role<S: AsRef<str>>(&self, roles: &[S]) -> bool {
        self.state.has_role(roles)
    }

    pub fn is_admin(&self) -> bool {
        self.state.is_admin()
    }
}

struct LogoutCleanup<'a> {
    state: &'a SessionState,
    router: &'a Router,
}

impl Drop for LogoutCleanup<'_> {
    fn drop(&mut self) {
        self.state.reset_state();
        if let Err(e) = self.router.push(self.router.login_path()) {
            warn!("Could not navigate to login after logout: {}", e);
        }
        info!("Logged out");
    }
}
