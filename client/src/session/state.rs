use std::sync::Arc;

use shared::types::{LoginPayload, UserProfile};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::session::storage::{REFRESH_TOKEN_KEY, TOKEN_KEY, TokenStorage};

/// Authentication state held by the client.
///
/// Fields are private: the derived values below are the only way to read
/// them, so they always agree with the two stored fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    access_token: String,
    user_profile: Option<UserProfile>,
}

impl Session {
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn user_profile(&self) -> Option<&UserProfile> {
        self.user_profile.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        !self.access_token.is_empty()
    }

    /// Role of the current profile, `""` when no profile is loaded.
    pub fn user_role(&self) -> &str {
        self.user_profile
            .as_ref()
            .map(|p| p.role.as_str())
            .unwrap_or("")
    }

    pub fn user_name(&self) -> &str {
        self.user_profile
            .as_ref()
            .map(|p| p.username.as_str())
            .unwrap_or("")
    }

    /// True iff a profile is loaded and its role is one of `roles`.
    pub fn has_role<S: AsRef<str>>(&self, roles: &[S]) -> bool {
        self.user_profile
            .as_ref()
            .is_some_and(|p| roles.iter().any(|r| r.as_ref() == p.role))
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(&["admin"])
    }
}

struct Inner {
    tx: watch::Sender<Session>,
    storage: Arc<dyn TokenStorage>,
}

/// Process-wide handle on the [`Session`].
///
/// Clones share one state. Readers take snapshots or subscribe to changes;
/// only the session store and the HTTP 401 handler write.
#[derive(Clone)]
pub struct SessionState {
    inner: Arc<Inner>,
}

impl SessionState {
    /// Resume whatever session the storage holds. The token is not checked
    /// against the server here; a stale token shows up as the next 401.
    pub fn restore(storage: Arc<dyn TokenStorage>) -> Self {
        let access_token = storage.get(TOKEN_KEY).unwrap_or_default();
        if !access_token.is_empty() {
            info!("Resumed persisted session");
        }

        let (tx, _) = watch::channel(Session {
            access_token,
            user_profile: None,
        });

        Self {
            inner: Arc::new(Inner { tx, storage }),
        }
    }

    pub fn snapshot(&self) -> Session {
        self.inner.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.inner.tx.subscribe()
    }

    pub fn access_token(&self) -> String {
        self.inner.tx.borrow().access_token.clone()
    }

    /// The token to send as a bearer credential, if any.
    pub fn bearer_token(&self) -> Option<String> {
        let session = self.inner.tx.borrow();
        session
            .is_logged_in()
            .then(|| session.access_token.clone())
    }

    /// Persisted refresh token; never held in memory.
    pub fn refresh_token(&self) -> Option<String> {
        self.inner.storage.get(REFRESH_TOKEN_KEY)
    }

    pub fn is_logged_in(&self) -> bool {
        self.inner.tx.borrow().is_logged_in()
    }

    pub fn user_role(&self) -> String {
        self.inner.tx.borrow().user_role().to_string()
    }

    pub fn user_name(&self) -> String {
        self.inner.tx.borrow().user_name().to_string()
    }

    pub fn has_role<S: AsRef<str>>(&self, roles: &[S]) -> bool {
        self.inner.tx.borrow().has_role(roles)
    }

    pub fn is_admin(&self) -> bool {
        self.inner.tx.borrow().is_admin()
    }

    /// Clear the token, the profile and both persisted entries. Idempotent;
    /// subscribers are only woken when something actually changed.
    pub fn reset_state(&self) {
        let changed = self.inner.tx.send_if_modified(|session| {
            if *session == Session::default() {
                return false;
            }
            *session = Session::default();
            true
        });

        for key in [TOKEN_KEY, REFRESH_TOKEN_KEY] {
            if let Err(e) = self.inner.storage.remove(key) {
                warn!("Failed to remove persisted {}: {}", key, e);
            }
        }

        if changed {
            info!("Session cleared");
        }
    }

    /// Install a fresh login. Token and profile change together.
    pub(crate) fn establish(&self, payload: LoginPayload) {
        let LoginPayload {
            access,
            refresh,
            user,
        } = payload;

        for (key, value) in [(TOKEN_KEY, access.as_str()), (REFRESH_TOKEN_KEY, refresh.as_str())] {
            if let Err(e) = self.inner.storage.set(key, value) {
                warn!("Failed to persist {}: {}", key, e);
            }
        }

        info!("Session established for {} ({})", user.username, user.role);
        self.inner.tx.send_replace(Session {
            access_token: access,
            user_profile: Some(user),
        });
    }

    pub(crate) fn set_profile(&self, profile: UserProfile) {
        self.inner.tx.send_modify(|session| {
            session.user_profile = Some(profile);
        });
    }
}
