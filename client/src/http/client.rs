use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use hyper::header::{ACCEPT, CONTENT_LENGTH, CONTENT_TYPE, HeaderMap, HeaderValue};
use hyper::{Method, Request, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::types::{ApiConfig, ApiResponse};
use tower::util::BoxCloneSyncService;
use tower::{Service, ServiceBuilder, ServiceExt};
use tracing::{debug, error};

use crate::http::auth::BearerAuthLayer;
use crate::http::classify::{ResponseHooks, ResponseLayer};
use crate::http::error::{ApiError, TransportError};
use crate::http::transport::{HyperTransport, RequestTimeout, TimeoutLayer};
use crate::http::upload::{self, ProgressCallback, UploadFile};
use crate::http::{ReqBody, empty, full};

const JSON: &str = "application/json";

/// The assembled request pipeline: response classification, bearer auth,
/// timeout, transport.
pub type Pipeline = BoxCloneSyncService<Request<ReqBody>, ApiResponse, ApiError>;

/// Per-call extras on top of method, path and body.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
    /// Replaces the configured timeout for this call only.
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn query(pairs: Vec<(String, String)>) -> Self {
        Self {
            query: pairs,
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// An outgoing body together with the headers that describe it.
pub struct Payload {
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
    pub body: ReqBody,
}

impl Payload {
    pub fn empty() -> Self {
        Self {
            content_type: None,
            content_length: None,
            body: empty(),
        }
    }

    pub fn json<B: Serialize + ?Sized>(value: &B) -> Result<Self, ApiError> {
        let bytes = serde_json::to_vec(value)
            .map_err(|e| ApiError::InvalidRequest(format!("unserializable body: {}", e)))?;

        Ok(Self {
            content_type: Some(JSON.to_string()),
            content_length: Some(bytes.len() as u64),
            body: full(bytes),
        })
    }
}

/// Shared HTTP client. Cheap to clone; every clone sends through the same
/// pipeline.
#[derive(Clone)]
pub struct HttpClient {
    base_url: Arc<str>,
    pipeline: Pipeline,
}

impl HttpClient {
    pub fn new(api: &ApiConfig, hooks: ResponseHooks) -> Self {
        Self::with_transport(api, hooks, HyperTransport::new())
    }

    /// Build the pipeline over any transport that turns requests into
    /// buffered responses.
    pub fn with_transport<T>(api: &ApiConfig, hooks: ResponseHooks, transport: T) -> Self
    where
        T: Service<Request<ReqBody>, Response = Response<Bytes>, Error = TransportError>
            + Clone
            + Send
            + Sync
            + 'static,
        T::Future: Send + 'static,
    {
        let session = hooks.session().clone();
        let pipeline = ServiceBuilder::new()
            .layer(ResponseLayer::new(hooks))
            .layer(BearerAuthLayer::new(session))
            .layer(TimeoutLayer::new(api.timeout()))
            .service(transport);

        Self {
            base_url: Arc::from(api.base_url.trim_end_matches('/')),
            pipeline: BoxCloneSyncService::new(pipeline),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for `path`, including the encoded query.
    pub fn url(&self, path: &str, query: &[(String, String)]) -> String {
        let mut url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        if !query.is_empty() {
            let encoded = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(query)
                .finish();
            url.push(if url.contains('?') { '&' } else { '?' });
            url.push_str(&encoded);
        }
        url
    }

    fn build_request(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
        payload: Payload,
    ) -> Result<Request<ReqBody>, ApiError> {
        let url = self.url(path, &options.query);

        let mut req = Request::builder()
            .method(method)
            .uri(&url)
            .body(payload.body)
            .map_err(|e| ApiError::InvalidRequest(format!("{}: {}", url, e)))?;

        let headers = req.headers_mut();
        headers.insert(ACCEPT, HeaderValue::from_static(JSON));
        if let Some(content_type) = payload.content_type {
            let value = HeaderValue::from_str(&content_type)
                .map_err(|e| ApiError::InvalidRequest(format!("content type: {}", e)))?;
            headers.insert(CONTENT_TYPE, value);
        }
        if let Some(len) = payload.content_length {
            headers.insert(CONTENT_LENGTH, HeaderValue::from(len));
        }
        // Caller headers win over the defaults.
        for (name, value) in options.headers.iter() {
            headers.insert(name.clone(), value.clone());
        }

        if let Some(timeout) = options.timeout {
            req.extensions_mut().insert(RequestTimeout(timeout));
        }

        Ok(req)
    }

    /// Send a request and return the raw envelope.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
        payload: Payload,
    ) -> Result<ApiResponse, ApiError> {
        let req = self.build_request(method, path, options, payload)?;
        debug!("{} {}", req.method(), req.uri());
        self.pipeline.clone().oneshot(req).await
    }

    /// Send a request and read `data` as `T`.
    ///
    /// Only a success `code` has its `data` decoded. Any other envelope comes
    /// back with its `code` and `message` and no `data`, whatever shape the
    /// payload had.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
        payload: Payload,
    ) -> Result<ApiResponse<T>, ApiError> {
        let envelope = self.send(method, path, options, payload).await?;
        if !envelope.is_success() {
            debug!("Envelope code {} from {}, payload left undecoded", envelope.code, path);
            return Ok(ApiResponse {
                code: envelope.code,
                data: None,
                message: envelope.message,
            });
        }

        envelope.decode().map_err(|e| {
            error!("Unexpected payload shape from {}: {}", path, e);
            ApiError::Decode(e)
        })
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> Result<ApiResponse<T>, ApiError> {
        self.request(Method::GET, path, RequestOptions::query(query), Payload::empty())
            .await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<ApiResponse<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, path, RequestOptions::default(), Payload::json(body)?)
            .await
    }

    /// POST without a body, for action endpoints such as `submit/`.
    pub async fn post_empty<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<ApiResponse<T>, ApiError> {
        self.request(Method::POST, path, RequestOptions::default(), Payload::empty())
            .await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<ApiResponse<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PUT, path, RequestOptions::default(), Payload::json(body)?)
            .await
    }

    pub async fn patch<T, B>(&self, path: &str, body: &B) -> Result<ApiResponse<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PATCH, path, RequestOptions::default(), Payload::json(body)?)
            .await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<ApiResponse<T>, ApiError> {
        self.request(Method::DELETE, path, RequestOptions::default(), Payload::empty())
            .await
    }

    /// Multipart upload of a single file, reporting progress while the body
    /// is streamed out.
    pub async fn upload<T: DeserializeOwned>(
        &self,
        path: &str,
        file: &UploadFile,
        on_progress: Option<ProgressCallback>,
    ) -> Result<ApiResponse<T>, ApiError> {
        let multipart = upload::encode_multipart(file);
        let payload = Payload {
            content_type: Some(multipart.content_type),
            content_length: Some(multipart.body.len() as u64),
            body: upload::progress_body(multipart.body, on_progress),
        };

        self.request(Method::POST, path, RequestOptions::default(), payload)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::Notifier;
    use crate::router::{ProgressIndicator, RouteTable, Router, lab_routes};
    use crate::session::{MemoryStorage, SessionState};
    use shared::types::RoutesConfig;

    fn client(base_url: &str) -> HttpClient {
        let session = SessionState::restore(Arc::new(MemoryStorage::new()));
        let routes = RoutesConfig::default();
        let router = Router::new(
            RouteTable::new(lab_routes(&routes.login_path, &routes.home_path)),
            routes,
            session.clone(),
            ProgressIndicator::new(),
        );
        let hooks = ResponseHooks::new(session, router, Notifier::new());
        let transport = tower::service_fn(|_req: Request<ReqBody>| async {
            Ok::<_, TransportError>(Response::new(Bytes::new()))
        });

        let api = ApiConfig {
            base_url: base_url.to_string(),
            ..ApiConfig::default()
        };
        HttpClient::with_transport(&api, hooks, transport)
    }

    #[test]
    fn joins_base_and_path_with_one_slash() {
        let http = client("http://lab.local/api/v1/");
        assert_eq!(http.url("/users/me/", &[]), "http://lab.local/api/v1/users/me/");
        assert_eq!(http.url("users/me/", &[]), "http://lab.local/api/v1/users/me/");
    }

    #[test]
    fn encodes_query_pairs() {
        let http = client("http://lab.local/api/v1");
        let query = vec![
            ("search".to_string(), "acme & co".to_string()),
            ("page".to_string(), "2".to_string()),
        ];
        assert_eq!(
            http.url("/samples/clients/", &query),
            "http://lab.local/api/v1/samples/clients/?search=acme+%26+co&page=2"
        );
    }

    #[test]
    fn json_payload_sets_headers() {
        let http = client("http://lab.local/api/v1");
        let payload = Payload::json(&serde_json::json!({"a": 1})).unwrap();
        let mut options = RequestOptions::default().with_timeout(Duration::from_secs(3));
        options
            .headers
            .insert("x-request-id", HeaderValue::from_static("abc"));

        let req = http
            .build_request(Method::POST, "/workflow/", options, payload)
            .unwrap();

        assert_eq!(req.headers()[CONTENT_TYPE], JSON);
        assert_eq!(req.headers()[ACCEPT], JSON);
        assert_eq!(req.headers()[CONTENT_LENGTH], "7");
        assert_eq!(req.headers()["x-request-id"], "abc");
        assert_eq!(
            req.extensions().get::<RequestTimeout>().map(|t| t.0),
            Some(Duration::from_secs(3))
        );
    }

    #[test]
    fn bad_path_is_an_invalid_request() {
        let http = client("http://lab.local/api/v1");
        let err = http
            .build_request(
                Method::GET,
                "/bad path\n",
                RequestOptions::default(),
                Payload::empty(),
            )
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)));
    }
}
