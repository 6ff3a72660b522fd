use std::sync::Arc;

use bytes::Bytes;
use hyper::{Request, Response};
use shared::types::AppConfig;
use tower::Service;
use tracing::info;

use crate::http::{HttpClient, HyperTransport, ReqBody, ResponseHooks, TransportError};
use crate::notify::Notifier;
use crate::router::{ProgressIndicator, RouteTable, Router, lab_routes};
use crate::session::{FileStorage, SessionState, SessionStore, StorageError, TokenStorage};

/// Every long-lived handle of the client, built once and passed around.
///
/// Handles are cheap clones over shared state: a 401 seen by any clone of
/// `http` clears the one session every other component reads.
#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub notifier: Notifier,
    pub progress: ProgressIndicator,
    pub session: SessionState,
    pub router: Router,
    pub http: HttpClient,
    pub store: SessionStore,
}

impl AppContext {
    /// Production wiring: file-backed token storage and the hyper transport.
    pub fn new(config: AppConfig) -> Result<Self, StorageError> {
        let storage = FileStorage::open(&config.storage.path)?;
        info!("Token storage at {}", storage.path().display());

        Ok(Self::with_transport(
            config,
            Arc::new(storage),
            HyperTransport::new(),
        ))
    }

    pub fn with_transport<T>(config: AppConfig, storage: Arc<dyn TokenStorage>, transport: T) -> Self
    where
        T: Service<Request<ReqBody>, Response = Response<Bytes>, Error = TransportError>
            + Clone
            + Send
            + Sync
            + 'static,
        T::Future: Send + 'static,
    {
        let notifier = Notifier::new();
        let progress = ProgressIndicator::new();
        let session = SessionState::restore(storage);

        let table = RouteTable::new(lab_routes(
            &config.routes.login_path,
            &config.routes.home_path,
        ));
        let router = Router::new(
            table,
            config.routes.clone(),
            session.clone(),
            progress.clone(),
        );

        let hooks = ResponseHooks::new(session.clone(), router.clone(), notifier.clone());
        let http = HttpClient::with_transport(&config.api, hooks, transport);
        let store = SessionStore::new(session.clone(), http.clone(), router.clone());

        Self {
            config,
            notifier,
            progress,
            session,
            router,
            http,
            store,
        }
    }
}
