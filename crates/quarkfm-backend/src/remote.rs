//! Async wrappers over the HTTP endpoints of the classification server.
//!
//! [`RemoteActions`] knows the endpoints and the response shapes; the actual
//! I/O goes through an [`HttpTransport`], which is [`ReqwestTransport`] at
//! runtime.

use std::future::Future;

use quarkfm_bridge::{
    api::{ApiResult, FormFields, FormMethod, FormRequest},
    classification::{ClassificationResults, ClassificationStatus, ScanSummary},
    config::ServerConfig,
};
use reqwest::Url;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

const BROWSE_ENDPOINT: &str = "/api/files/browse";
const SAVE_CONFIG_ENDPOINT: &str = "/api/config/save";
const GET_CONFIG_ENDPOINT: &str = "/api/config/get";
const SCAN_ENDPOINT: &str = "/api/files/scan";
const STATUS_ENDPOINT: &str = "/api/classify/status";
const RESULTS_ENDPOINT: &str = "/api/classify/results";
const ADJUST_ENDPOINT: &str = "/api/classify/adjust";

/// Errors produced while talking to the classification server.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// The endpoint could not be resolved against the server URL.
    #[error("invalid endpoint `{0}`")]
    InvalidEndpoint(String),
    /// The request could not be sent or its body could not be read as JSON.
    #[error("{0}")]
    Http(String),
    /// The JSON body does not have the expected shape.
    #[error("unexpected response: {0}")]
    Decode(#[from] serde_json::Error),
    /// The server answered with `success: false`.
    #[error("{0}")]
    Rejected(String),
}

impl From<reqwest::Error> for RemoteError {
    fn from(error: reqwest::Error) -> Self {
        Self::Http(error.without_url().to_string())
    }
}

/// What a request carries besides its method and endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Empty,
    Json(Value),
    Query(Vec<(String, String)>),
}

/// A single call to the server.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: FormMethod,
    /// Path relative to the server URL, or an absolute URL.
    pub endpoint: String,
    pub payload: Payload,
}

impl ApiRequest {
    pub fn new(method: FormMethod, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            payload: Payload::Empty,
        }
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(FormMethod::Get, endpoint)
    }

    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(FormMethod::Post, endpoint)
    }

    pub fn with_json(mut self, body: Value) -> Self {
        self.payload = Payload::Json(body);
        self
    }

    /// Builds the request for a submitted form. Methods with a body carry the
    /// fields as a JSON object, `GET` carries them in the query string.
    pub fn from_form(form: &FormRequest) -> Result<Self, RemoteError> {
        let request = Self::new(form.method, form.action.clone());
        let payload = if form.method.has_body() {
            Payload::Json(serde_json::to_value(&form.fields)?)
        } else {
            Payload::Query(query_pairs(&form.fields))
        };
        Ok(Self { payload, ..request })
    }
}

fn query_pairs(fields: &FormFields) -> Vec<(String, String)> {
    fields
        .iter()
        .map(|(name, value)| (name.to_owned(), value.to_owned()))
        .collect()
}

/// Sends an [`ApiRequest`] and returns the JSON body of the response.
///
/// The HTTP status is not interpreted: servers report failures through the
/// `success` field of the body.
pub trait HttpTransport: Send + Sync + 'static {
    fn send(&self, request: ApiRequest) -> impl Future<Output = Result<Value, RemoteError>> + Send;
}

/// [`HttpTransport`] backed by a pooled [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client, server_url: &str) -> Result<Self, RemoteError> {
        let base_url = Url::parse(server_url)
            .map_err(|_| RemoteError::InvalidEndpoint(server_url.to_owned()))?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn resolve(&self, endpoint: &str) -> Result<Url, RemoteError> {
        self.base_url
            .join(endpoint)
            .map_err(|_| RemoteError::InvalidEndpoint(endpoint.to_owned()))
    }
}

fn reqwest_method(method: FormMethod) -> reqwest::Method {
    match method {
        FormMethod::Get => reqwest::Method::GET,
        FormMethod::Post => reqwest::Method::POST,
        FormMethod::Put => reqwest::Method::PUT,
        FormMethod::Patch => reqwest::Method::PATCH,
        FormMethod::Delete => reqwest::Method::DELETE,
    }
}

impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value, RemoteError> {
        let url = self.resolve(&request.endpoint)?;
        let builder = self.client.request(reqwest_method(request.method), url);
        let builder = match request.payload {
            Payload::Empty => builder,
            Payload::Json(body) => builder.json(&body),
            Payload::Query(pairs) => builder.query(&pairs),
        };

        let response = builder.send().await?;
        Ok(response.json::<Value>().await?)
    }
}

#[derive(Debug, Deserialize)]
struct ServerConfigEnvelope {
    #[serde(default)]
    config: ServerConfig,
}

#[derive(Debug, Serialize)]
struct AdjustRequest {
    file_id: u32,
    category_index: usize,
}

/// Typed calls to the classification server.
#[derive(Debug, Clone)]
pub struct RemoteActions<T> {
    transport: T,
}

impl<T: HttpTransport> RemoteActions<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn call(&self, request: ApiRequest) -> Result<Value, RemoteError> {
        log::debug!("{} {}", request.method.as_str(), request.endpoint);
        self.transport.send(request).await
    }

    /// Sends the request and decodes the body after checking its `success`
    /// flag.
    async fn call_checked<R: DeserializeOwned>(&self, request: ApiRequest) -> Result<R, RemoteError> {
        let body = self.call(request).await?;
        let envelope: ApiResult = serde_json::from_value(body.clone())?;
        if !envelope.success {
            let reason = envelope.message().unwrap_or("request was rejected");
            return Err(RemoteError::Rejected(reason.to_owned()));
        }
        Ok(serde_json::from_value(body)?)
    }

    /// Asks the server for a folder. Any failure yields an empty string,
    /// which callers treat as "no path chosen".
    pub async fn select_folder(&self) -> String {
        let body = match self.call(ApiRequest::post(BROWSE_ENDPOINT)).await {
            Ok(body) => body,
            Err(e) => {
                log::warn!("Folder browse failed: {e}");
                return String::new();
            }
        };

        match serde_json::from_value::<ApiResult>(body) {
            Ok(result) if result.success => result.path.unwrap_or_default(),
            Ok(_) => String::new(),
            Err(e) => {
                log::warn!("Folder browse returned an unexpected body: {e}");
                String::new()
            }
        }
    }

    /// Posts `config` as JSON to the save endpoint and returns the parsed
    /// response. Application-level failures are left to the caller.
    pub async fn save_config<C: Serialize>(&self, config: &C) -> Result<ApiResult, RemoteError> {
        let request = ApiRequest::post(SAVE_CONFIG_ENDPOINT).with_json(serde_json::to_value(config)?);
        let body = self.call(request).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// Sends a serialized form to its declared action and method.
    pub async fn submit_form(&self, form: &FormRequest) -> Result<ApiResult, RemoteError> {
        let body = self.call(ApiRequest::from_form(form)?).await?;
        Ok(serde_json::from_value(body)?)
    }

    pub async fn fetch_server_config(&self) -> Result<ServerConfig, RemoteError> {
        let envelope: ServerConfigEnvelope =
            self.call_checked(ApiRequest::get(GET_CONFIG_ENDPOINT)).await?;
        Ok(envelope.config)
    }

    pub async fn scan_files(&self) -> Result<ScanSummary, RemoteError> {
        self.call_checked(ApiRequest::get(SCAN_ENDPOINT)).await
    }

    /// The status endpoint has no `success` flag, its body is the status.
    pub async fn classification_status(&self) -> Result<ClassificationStatus, RemoteError> {
        let body = self.call(ApiRequest::get(STATUS_ENDPOINT)).await?;
        Ok(serde_json::from_value(body)?)
    }

    pub async fn classification_results(&self) -> Result<ClassificationResults, RemoteError> {
        self.call_checked(ApiRequest::get(RESULTS_ENDPOINT)).await
    }

    pub async fn adjust_classification(
        &self,
        file_id: u32,
        category_index: usize,
    ) -> Result<ApiResult, RemoteError> {
        let body = serde_json::to_value(AdjustRequest {
            file_id,
            category_index,
        })?;
        let response = self.call(ApiRequest::post(ADJUST_ENDPOINT).with_json(body)).await?;
        Ok(serde_json::from_value(response)?)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;

    use quarkfm_bridge::classification::ClassificationPhase;
    use serde_json::json;

    use super::*;

    /// Transport answering from a table of canned bodies keyed by endpoint.
    /// Several bodies for one endpoint are returned in order, the last one
    /// repeating. Unknown endpoints fail like an unreachable server.
    #[derive(Default)]
    pub(crate) struct FakeTransport {
        responses: Mutex<HashMap<String, VecDeque<Result<Value, String>>>>,
        requests: Mutex<Vec<ApiRequest>>,
    }

    impl FakeTransport {
        pub(crate) fn respond(self, endpoint: &str, body: Value) -> Self {
            self.push(endpoint, Ok(body))
        }

        pub(crate) fn fail(self, endpoint: &str, reason: &str) -> Self {
            self.push(endpoint, Err(reason.to_owned()))
        }

        fn push(self, endpoint: &str, response: Result<Value, String>) -> Self {
            self.responses
                .lock()
                .unwrap()
                .entry(endpoint.to_owned())
                .or_default()
                .push_back(response);
            self
        }

        pub(crate) fn sent(&self) -> Vec<ApiRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl HttpTransport for FakeTransport {
        fn send(&self, request: ApiRequest) -> impl Future<Output = Result<Value, RemoteError>> + Send {
            let response = {
                let mut responses = self.responses.lock().unwrap();
                match responses.get_mut(&request.endpoint) {
                    Some(queue) if queue.len() > 1 => queue.pop_front(),
                    Some(queue) => queue.front().cloned(),
                    None => None,
                }
            };
            let result = match response {
                Some(Ok(body)) => Ok(body),
                Some(Err(reason)) => Err(RemoteError::Http(reason)),
                None => Err(RemoteError::Http("connection refused".to_owned())),
            };
            self.requests.lock().unwrap().push(request);
            std::future::ready(result)
        }
    }

    #[tokio::test]
    async fn select_folder_returns_the_chosen_path() {
        let remote = RemoteActions::new(
            FakeTransport::default().respond(BROWSE_ENDPOINT, json!({"success": true, "path": "/data/in"})),
        );
        assert_eq!(remote.select_folder().await, "/data/in");

        let sent = remote.transport().sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].method, FormMethod::Post);
        assert_eq!(sent[0].payload, Payload::Empty);
    }

    #[tokio::test]
    async fn select_folder_degrades_to_empty() {
        let rejected = RemoteActions::new(
            FakeTransport::default().respond(BROWSE_ENDPOINT, json!({"success": false, "path": "/ignored"})),
        );
        assert_eq!(rejected.select_folder().await, "");

        let unreachable = RemoteActions::new(FakeTransport::default());
        assert_eq!(unreachable.select_folder().await, "");

        let malformed =
            RemoteActions::new(FakeTransport::default().respond(BROWSE_ENDPOINT, json!({"success": "yes"})));
        assert_eq!(malformed.select_folder().await, "");
    }

    #[tokio::test]
    async fn save_config_posts_json_and_returns_the_result() {
        let remote = RemoteActions::new(FakeTransport::default().respond(
            SAVE_CONFIG_ENDPOINT,
            json!({"success": false, "message": "No section: 'API'"}),
        ));
        let mut config = ServerConfig::default();
        config.api.model = "deepseek-chat".into();

        let result = remote.save_config(&config).await.unwrap();
        assert!(!result.success);
        assert_eq!(result.message(), Some("No section: 'API'"));

        let sent = remote.transport().sent();
        match &sent[0].payload {
            Payload::Json(body) => assert_eq!(body["api"]["model"], "deepseek-chat"),
            other => panic!("expected a JSON body, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn save_config_propagates_transport_failures() {
        let remote =
            RemoteActions::new(FakeTransport::default().fail(SAVE_CONFIG_ENDPOINT, "error decoding response body"));
        let error = remote.save_config(&ServerConfig::default()).await.unwrap_err();
        assert_eq!(error.to_string(), "error decoding response body");
    }

    #[tokio::test]
    async fn forms_follow_their_method() {
        let remote = RemoteActions::new(
            FakeTransport::default()
                .respond("/api/check", json!({"success": true, "message": "ok"}))
                .respond("/forms/rename", json!({"success": true, "redirect": "/done"})),
        );

        let fields: FormFields = [("q", "x y")].into_iter().collect();
        let get = FormRequest {
            action: "/api/check".into(),
            method: FormMethod::Get,
            fields: fields.clone(),
        };
        let post = FormRequest {
            action: "/forms/rename".into(),
            method: FormMethod::Post,
            fields,
        };

        assert_eq!(remote.submit_form(&get).await.unwrap().message(), Some("ok"));
        assert_eq!(remote.submit_form(&post).await.unwrap().redirect(), Some("/done"));

        let sent = remote.transport().sent();
        assert_eq!(sent[0].payload, Payload::Query(vec![("q".into(), "x y".into())]));
        assert_eq!(sent[1].payload, Payload::Json(json!({"q": "x y"})));
    }

    #[tokio::test]
    async fn checked_calls_surface_rejections() {
        let remote = RemoteActions::new(
            FakeTransport::default()
                .respond(GET_CONFIG_ENDPOINT, json!({"success": false, "message": "config failed to load"}))
                .respond(RESULTS_ENDPOINT, json!({"success": false})),
        );

        match remote.fetch_server_config().await {
            Err(RemoteError::Rejected(reason)) => assert_eq!(reason, "config failed to load"),
            other => panic!("expected a rejection, got {other:?}"),
        }
        assert!(matches!(
            remote.classification_results().await,
            Err(RemoteError::Rejected(_))
        ));
    }

    #[tokio::test]
    async fn typed_bodies_are_decoded() {
        let remote = RemoteActions::new(
            FakeTransport::default()
                .respond(
                    GET_CONFIG_ENDPOINT,
                    json!({"success": true, "config": {"paths": {"source_folder": "./in"}}}),
                )
                .respond(
                    SCAN_ENDPOINT,
                    json!({"success": true, "files": ["a.pdf", "b.txt"], "count": 2, "batches": 1, "categories": 7}),
                )
                .respond(
                    STATUS_ENDPOINT,
                    json!({"status": "processing", "progress": 50, "current_batch": 1, "total_batches": 2, "current_file": ""}),
                ),
        );

        let config = remote.fetch_server_config().await.unwrap();
        assert_eq!(config.paths.source_folder, "./in");

        let scan = remote.scan_files().await.unwrap();
        assert_eq!(scan.files, vec!["a.pdf", "b.txt"]);
        assert_eq!(scan.categories, 7);

        let status = remote.classification_status().await.unwrap();
        assert_eq!(status.status, ClassificationPhase::Processing);
        assert_eq!(status.progress, 50);
    }

    #[tokio::test]
    async fn adjust_sends_numeric_fields() {
        let remote =
            RemoteActions::new(FakeTransport::default().respond(ADJUST_ENDPOINT, json!({"success": true})));
        assert!(remote.adjust_classification(3, 1).await.unwrap().success);
        assert_eq!(
            remote.transport().sent()[0].payload,
            Payload::Json(json!({"file_id": 3, "category_index": 1}))
        );
    }

    #[test]
    fn endpoints_resolve_against_the_server_url() {
        let transport = ReqwestTransport::new(reqwest::Client::new(), "http://localhost:5180").unwrap();
        assert_eq!(
            transport.resolve("/api/files/browse").unwrap().as_str(),
            "http://localhost:5180/api/files/browse"
        );
        assert_eq!(
            transport.resolve("https://other.host/save").unwrap().as_str(),
            "https://other.host/save"
        );
        assert!(ReqwestTransport::new(reqwest::Client::new(), "not a url").is_err());
    }
}
