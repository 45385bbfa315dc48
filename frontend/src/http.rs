//! HTTP client layer.
//!
//! Every REST call goes through [`HttpClient`], which attaches the JSON and
//! bearer headers, normalises error bodies and reacts to session expiry. The
//! wire itself sits behind the [`Transport`] trait so controllers can run
//! against a scripted transport in tests.

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    config::ClientConfig,
    error::{ApiError, ApiResult},
    router::{Navigator, Route},
    session::SessionStore,
};

/// HTTP verbs the API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
}

impl Method {
    /// Upper-case verb.
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// File selected for upload.
#[derive(Clone, PartialEq, Eq)]
pub struct FilePart {
    /// Name sent in the multipart header.
    pub file_name: String,
    /// Content type of the part.
    pub mime_type: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for FilePart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilePart")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

/// Request body.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// No body.
    Empty,
    /// JSON document.
    Json(Value),
    /// Single-file multipart form; the transport picks the boundary.
    Multipart {
        /// Form field name.
        field: String,
        /// The file.
        file: FilePart,
    },
}

/// Transport-level request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    /// Verb.
    pub method: Method,
    /// Absolute URL including the query string.
    pub url: String,
    /// Header pairs in insertion order.
    pub headers: Vec<(String, String)>,
    /// Payload.
    pub body: Body,
}

impl HttpRequest {
    /// Request without headers or body.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: Body::Empty,
        }
    }

    /// Append a header.
    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.push((key.to_string(), value.to_string()));
        self
    }

    /// Set the body.
    pub fn with_body(mut self, body: Body) -> Self {
        self.body = body;
        self
    }

    /// First header named `key`, compared case-insensitively.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
            .map(|(_, value)| value.as_str())
    }
}

/// Transport-level response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code.
    pub status: u16,
    /// Raw body bytes.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Response with a JSON body.
    pub fn json(status: u16, body: &Value) -> Self {
        Self {
            status,
            body: body.to_string().into_bytes(),
        }
    }

    /// Response with no body.
    pub fn empty(status: u16) -> Self {
        Self {
            status,
            body: Vec::new(),
        }
    }

    /// 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as JSON.
    pub fn parse<T: DeserializeOwned>(&self) -> ApiResult<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// Sends one request and returns whatever status came back. Only failures
/// to obtain a response at all are errors here.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform a single attempt; no retries, no timeout.
    async fn send(&self, request: HttpRequest) -> ApiResult<HttpResponse>;
}

/// Production transport over `reqwest`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Transport with a default `reqwest` client.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> ApiResult<HttpResponse> {
        let mut builder = self
            .client
            .request(request.method.into(), &request.url);
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        builder = match request.body {
            Body::Empty => builder,
            Body::Json(value) => builder.body(value.to_string()),
            Body::Multipart {
                field,
                file,
            } => {
                let part = reqwest::multipart::Part::bytes(file.bytes)
                    .file_name(file.file_name)
                    .mime_str(&file.mime_type)
                    .map_err(|e| ApiError::Network(format!("invalid mime type: {e}")))?;
                builder.multipart(reqwest::multipart::Form::new().part(field, part))
            },
        };

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(HttpResponse {
            status,
            body: body.to_vec(),
        })
    }
}

/// Whether a call carries the stored bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Auth {
    /// Anonymous call.
    None,
    /// Send the stored token as a bearer `Authorization` header, if any.
    Bearer,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<Value>,
}

const GENERIC_FAILURE: &str = "Request failed";

/// Shared request wrapper used by the API facade.
pub struct HttpClient {
    transport: Arc<dyn Transport>,
    api_base: String,
    session: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
}

impl HttpClient {
    /// Client rooted at `config.api_base()`.
    pub fn new(
        config: &ClientConfig,
        transport: Arc<dyn Transport>,
        session: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            transport,
            api_base: config.api_base(),
            session,
            navigator,
        }
    }

    /// Session store consulted for the bearer token.
    pub fn session(&self) -> &Arc<dyn SessionStore> {
        &self.session
    }

    /// Navigator used for redirects.
    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.navigator
    }

    /// Absolute URL for an API path such as `/articles`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    fn authorize(&self, request: HttpRequest, auth: Auth) -> HttpRequest {
        match (auth, self.session.token()) {
            (Auth::Bearer, Some(token)) => {
                request.with_header("Authorization", &format!("Bearer {token}"))
            },
            (Auth::Bearer, None) => {
                tracing::debug!("no stored token for authenticated call to {}", request.url);
                request
            },
            (Auth::None, _) => request,
        }
    }

    /// Issue a JSON request.
    ///
    /// Returns `Ok(None)` for 204 responses and for every DELETE, without
    /// touching the body. A 401 clears the session and redirects to the
    /// login page before failing with [`ApiError::Unauthorized`].
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        auth: Auth,
        body: Option<Value>,
    ) -> ApiResult<Option<T>> {
        let mut request = HttpRequest::new(method, self.url(path))
            .with_header("Content-Type", "application/json");
        if let Some(body) = body {
            request = request.with_body(Body::Json(body));
        }
        let request = self.authorize(request, auth);

        tracing::debug!("{} {}", method.as_str(), request.url);
        let response = self.transport.send(request).await?;

        if response.status == 401 {
            return Err(self.expire_session());
        }
        if !response.is_success() {
            let message = error_message(&response.body);
            tracing::debug!("{} {path} failed with {}: {message}", method.as_str(), response.status);
            return Err(ApiError::RequestFailed(message));
        }
        if response.status == 204 || method == Method::Delete {
            return Ok(None);
        }

        response.parse().map(Some)
    }

    /// Like [`HttpClient::request`] but a missing body is an error.
    pub async fn request_body<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        auth: Auth,
        body: Option<Value>,
    ) -> ApiResult<T> {
        self.request(method, path, auth, body)
            .await?
            .ok_or_else(|| ApiError::RequestFailed("Empty response body".to_string()))
    }

    /// Post a single file as `multipart/form-data` with the bearer token.
    ///
    /// No JSON content type is set. Non-2xx responses other than 401 fail
    /// with [`ApiError::UploadFailed`] without reading the body.
    pub async fn upload<T: DeserializeOwned>(
        &self,
        path: &str,
        field: &str,
        file: FilePart,
    ) -> ApiResult<T> {
        let request = HttpRequest::new(Method::Post, self.url(path)).with_body(Body::Multipart {
            field: field.to_string(),
            file,
        });
        let request = self.authorize(request, Auth::Bearer);

        tracing::debug!("POST {} (multipart)", request.url);
        let response = self.transport.send(request).await?;

        if response.status == 401 {
            return Err(self.expire_session());
        }
        if !response.is_success() {
            return Err(ApiError::UploadFailed);
        }
        response.parse()
    }

    fn expire_session(&self) -> ApiError {
        tracing::warn!("session rejected by the server; signing out");
        if let Err(err) = self.session.end() {
            tracing::error!("failed to clear session: {err}");
        }
        self.navigator.navigate(Route::AdminLogin);
        ApiError::Unauthorized
    }
}

/// Human-readable message from an error body, or the generic fallback.
fn error_message(body: &[u8]) -> String {
    let message = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.message);
    match message {
        Some(Value::String(text)) if !text.is_empty() => text,
        Some(Value::Array(items)) if !items.is_empty() => items
            .iter()
            .map(|item| match item {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(", "),
        _ => GENERIC_FAILURE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn error_message_prefers_server_text() {
        assert_eq!(error_message(br#"{"message":"Slug already exists"}"#), "Slug already exists");
        assert_eq!(
            error_message(br#"{"message":["title should not be empty","read_time must be a number"]}"#),
            "title should not be empty, read_time must be a number"
        );
    }

    #[test]
    fn error_message_falls_back_to_generic() {
        assert_eq!(error_message(b"<html>Bad gateway</html>"), GENERIC_FAILURE);
        assert_eq!(error_message(br#"{"error":"nope"}"#), GENERIC_FAILURE);
        assert_eq!(error_message(br#"{"message":""}"#), GENERIC_FAILURE);
        assert_eq!(error_message(b""), GENERIC_FAILURE);
    }

    #[test]
    fn request_builder_reads_headers_case_insensitively() {
        let request = HttpRequest::new(Method::Get, "http://x/api/a")
            .with_header("Content-Type", "application/json")
            .with_body(Body::Json(json!({"a": 1})));
        assert_eq!(request.header("content-type"), Some("application/json"));
        assert_eq!(request.header("authorization"), None);
    }
}
