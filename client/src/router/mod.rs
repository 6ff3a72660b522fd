pub mod guard;
pub mod location;
pub mod progress;
pub mod routes;

pub use self::guard::{GuardDecision, evaluate};
pub use self::location::Location;
pub use self::progress::{ProgressIndicator, ProgressState};
pub use self::routes::{ResolvedRoute, RouteMeta, RouteRecord, RouteTable, ViewHandle, lab_routes};

use std::sync::Arc;

use shared::types::RoutesConfig;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::session::SessionState;

/// Guard redirects followed by one `push` before giving up.
const MAX_GUARD_REDIRECTS: usize = 8;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("no route matches {0}")]
    NoMatch(String),

    #[error("too many redirects while navigating to {0}")]
    RedirectLimit(String),
}

struct RouterInner {
    table: RouteTable,
    routes: RoutesConfig,
    session: SessionState,
    progress: ProgressIndicator,
    current: watch::Sender<Location>,
}

/// Owns the route table and the current location; runs the guard on every
/// transition.
#[derive(Clone)]
pub struct Router {
    inner: Arc<RouterInner>,
}

impl Router {
    pub fn new(
        table: RouteTable,
        routes: RoutesConfig,
        session: SessionState,
        progress: ProgressIndicator,
    ) -> Self {
        let (current, _) = watch::channel(Location::root());
        Self {
            inner: Arc::new(RouterInner {
                table,
                routes,
                session,
                progress,
                current,
            }),
        }
    }

    pub fn table(&self) -> &RouteTable {
        &self.inner.table
    }

    pub fn login_path(&self) -> &str {
        &self.inner.routes.login_path
    }

    pub fn home_path(&self) -> &str {
        &self.inner.routes.home_path
    }

    pub fn current(&self) -> Location {
        self.inner.current.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Location> {
        self.inner.current.subscribe()
    }

    pub fn resolve(&self, target: &str) -> Result<ResolvedRoute, NavigationError> {
        self.inner.table.resolve(&Location::parse(target).path)
    }

    /// Navigate to `target`, honouring guard redirects. Returns where the
    /// router actually ended up.
    pub fn push(&self, target: &str) -> Result<Location, NavigationError> {
        let mut next = Location::parse(target);

        for _ in 0..=MAX_GUARD_REDIRECTS {
            let _progress = self.inner.progress.begin();

            let resolved = self.inner.table.resolve(&next.path)?;
            let to = Location {
                path: resolved.path,
                query: next.query,
            };

            let session = self.inner.session.snapshot();
            match guard::evaluate(&to, &resolved.meta, &session, &self.inner.routes) {
                GuardDecision::Allow => {
                    debug!("Navigated to {}", to);
                    self.inner.current.send_replace(to.clone());
                    return Ok(to);
                }
                GuardDecision::Redirect(redirect) => {
                    info!("Navigation to {} redirected to {}", to, redirect);
                    next = redirect;
                }
            }
        }

        Err(NavigationError::RedirectLimit(target.to_string()))
    }

    /// Where a successful login should continue: the `redirect` query of
    /// the current location, or the root. Only same-origin paths qualify.
    pub fn redirect_target(&self) -> String {
        self.inner
            .current
            .borrow()
            .query_value("redirect")
            .filter(|r| r.starts_with('/') && !r.starts_with("//"))
            .unwrap_or("/")
            .to_string()
    }
}
