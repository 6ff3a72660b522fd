#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use client::AppContext;
use client::http::{ReqBody, TransportError};
use client::notify::Notification;
use client::session::{MemoryStorage, REFRESH_TOKEN_KEY, TOKEN_KEY};
use http_body_util::BodyExt;
use hyper::header::HeaderMap;
use hyper::{Method, Request, Response, StatusCode};
use serde_json::{Value, json};
use shared::types::AppConfig;
use tokio::sync::broadcast;

pub const BASE_URL: &str = "http://lab.test/api/v1";

/// What the mock backend answers for one route.
#[derive(Clone, Debug)]
pub enum Reply {
    Json(StatusCode, Value),
    Empty(StatusCode),
    Raw(StatusCode, &'static str),
    /// Fail before any response, like a refused connection.
    Unreachable,
}

/// A request as the backend saw it.
#[derive(Clone, Debug)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Recorded {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn bearer(&self) -> Option<&str> {
        self.headers
            .get("authorization")
            .map(|v| v.to_str().unwrap())
    }
}

/// In-process stand-in for the REST backend. Unknown routes get an empty
/// 404.
#[derive(Clone, Default)]
pub struct MockServer {
    replies: Arc<Mutex<HashMap<(Method, String), Reply>>>,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl MockServer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&self, method: Method, path: &str, reply: Reply) -> &Self {
        let path = format!("/api/v1{}", path);
        self.replies.lock().unwrap().insert((method, path), reply);
        self
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Recorded {
        self.requests().pop().expect("no request reached the server")
    }

    async fn handle(&self, req: Request<ReqBody>) -> Result<Response<Bytes>, TransportError> {
        let (parts, body) = req.into_parts();
        let body = body
            .collect()
            .await
            .map_err(TransportError::Body)?
            .to_bytes();

        let path = parts.uri.path().to_string();
        self.requests.lock().unwrap().push(Recorded {
            method: parts.method.clone(),
            path: path.clone(),
            query: parts.uri.query().map(str::to_string),
            headers: parts.headers,
            body,
        });

        let reply = self
            .replies
            .lock()
            .unwrap()
            .get(&(parts.method, path))
            .cloned()
            .unwrap_or(Reply::Empty(StatusCode::NOT_FOUND));

        let (status, body) = match reply {
            Reply::Json(status, value) => (status, Bytes::from(value.to_string())),
            Reply::Empty(status) => (status, Bytes::new()),
            Reply::Raw(status, text) => (status, Bytes::from_static(text.as_bytes())),
            Reply::Unreachable => {
                return Err(TransportError::Connect("connection refused".into()));
            }
        };

        let mut response = Response::new(body);
        *response.status_mut() = status;
        Ok(response)
    }
}

pub fn ok(data: Value) -> Reply {
    Reply::Json(StatusCode::OK, json!({"code": 200, "message": "success", "data": data}))
}

pub fn login_payload(role: &str) -> Value {
    json!({
        "access": "access-1",
        "refresh": "refresh-1",
        "user": {"id": 7, "username": "alice", "role": role, "department_name": "Concrete Lab"}
    })
}

pub struct Harness {
    pub server: MockServer,
    pub storage: Arc<MemoryStorage>,
    pub ctx: AppContext,
    pub notifications: broadcast::Receiver<Notification>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_storage(MemoryStorage::new())
    }

    /// A session resumed from storage that already holds both tokens.
    pub fn signed_in() -> Self {
        Self::with_storage(MemoryStorage::with_entries([
            (TOKEN_KEY, "stored-token"),
            (REFRESH_TOKEN_KEY, "stored-refresh"),
        ]))
    }

    pub fn with_storage(storage: MemoryStorage) -> Self {
        let server = MockServer::new();
        let storage = Arc::new(storage);

        let mut config = AppConfig::default();
        config.api.base_url = BASE_URL.to_string();

        let backend = server.clone();
        let transport = tower::service_fn(move |req: Request<ReqBody>| {
            let backend = backend.clone();
            async move { backend.handle(req).await }
        });

        let ctx = AppContext::with_transport(config, storage.clone(), transport);
        let notifications = ctx.notifier.subscribe();

        Self {
            server,
            storage,
            ctx,
            notifications,
        }
    }

    /// Everything notified so far.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        let mut seen = Vec::new();
        while let Ok(n) = self.notifications.try_recv() {
            seen.push(n);
        }
        seen
    }
}
