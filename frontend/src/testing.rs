//! Scripted transport for exercising controllers without a server.
//!
//! ```rust,ignore
//! let harness = Harness::new();
//! harness.transport.on(Method::Get, "/categories", HttpResponse::json(200, &json!([])));
//! let categories = harness.api.categories().get_all().await?;
//! assert_eq!(harness.transport.count(Method::Get, "/categories"), 1);
//! ```

use std::{
    collections::VecDeque,
    sync::Arc,
    time::Duration,
};

use async_trait::async_trait;
use parking_lot::Mutex;
use sehat_shared::ArticleStatus;
use serde_json::{json, Value};

use crate::{
    api::Api,
    config::ClientConfig,
    error::ApiResult,
    http::{HttpClient, HttpRequest, HttpResponse, Method, Transport},
    router::HistoryNavigator,
    session::MemorySessionStore,
};

const API_PREFIX: &str = "/api";

#[derive(Debug, Clone)]
struct Reply {
    response: HttpResponse,
    delay: Duration,
}

#[derive(Debug)]
struct MockRoute {
    method: Method,
    path: String,
    queued: VecDeque<Reply>,
    fallback: Option<Reply>,
}

/// Transport answering from canned replies keyed by verb and API path.
///
/// Paths are given without the `/api` prefix and matched without the query
/// string. Queued replies (`once*`) are consumed before the standing reply
/// (`on*`). Unmatched requests get a 404 with a JSON message.
#[derive(Debug, Default)]
pub struct MockTransport {
    routes: Mutex<Vec<MockRoute>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    /// Transport with no routes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Standing reply for every matching request.
    pub fn on(&self, method: Method, path: &str, response: HttpResponse) -> &Self {
        self.on_delayed(method, path, response, Duration::ZERO)
    }

    /// Standing reply delivered after `delay`.
    pub fn on_delayed(
        &self,
        method: Method,
        path: &str,
        response: HttpResponse,
        delay: Duration,
    ) -> &Self {
        self.with_route(method, path, |route| {
            route.fallback = Some(Reply {
                response,
                delay,
            });
        });
        self
    }

    /// Reply used once, before any standing reply.
    pub fn once(&self, method: Method, path: &str, response: HttpResponse) -> &Self {
        self.once_delayed(method, path, response, Duration::ZERO)
    }

    /// Queued reply delivered after `delay`.
    pub fn once_delayed(
        &self,
        method: Method,
        path: &str,
        response: HttpResponse,
        delay: Duration,
    ) -> &Self {
        self.with_route(method, path, |route| {
            route.queued.push_back(Reply {
                response,
                delay,
            });
        });
        self
    }

    /// Every request sent so far, oldest first.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    /// Requests sent to `method path`, ignoring the query string.
    pub fn requests_to(&self, method: Method, path: &str) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .iter()
            .filter(|request| request.method == method && api_path(&request.url) == path)
            .cloned()
            .collect()
    }

    /// Number of requests sent to `method path`.
    pub fn count(&self, method: Method, path: &str) -> usize {
        self.requests_to(method, path).len()
    }

    fn with_route(&self, method: Method, path: &str, apply: impl FnOnce(&mut MockRoute)) {
        let mut routes = self.routes.lock();
        let index = match routes
            .iter()
            .position(|route| route.method == method && route.path == path)
        {
            Some(index) => index,
            None => {
                routes.push(MockRoute {
                    method,
                    path: path.to_string(),
                    queued: VecDeque::new(),
                    fallback: None,
                });
                routes.len() - 1
            },
        };
        apply(&mut routes[index]);
    }

    fn next_reply(&self, method: Method, path: &str) -> Option<Reply> {
        let mut routes = self.routes.lock();
        let route = routes
            .iter_mut()
            .find(|route| route.method == method && route.path == path)?;
        route.queued.pop_front().or_else(|| route.fallback.clone())
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> ApiResult<HttpResponse> {
        let method = request.method;
        let path = api_path(&request.url);
        self.requests.lock().push(request);

        match self.next_reply(method, &path) {
            Some(reply) => {
                if !reply.delay.is_zero() {
                    tokio::time::sleep(reply.delay).await;
                }
                Ok(reply.response)
            },
            None => Ok(HttpResponse::json(
                404,
                &json!({ "message": format!("no mock for {} {path}", method.as_str()) }),
            )),
        }
    }
}

/// Path relative to `/api`, without query string.
fn api_path(url: &str) -> String {
    let path = url::Url::parse(url)
        .map(|parsed| parsed.path().to_string())
        .unwrap_or_else(|_| url.to_string());
    path.strip_prefix(API_PREFIX)
        .map(str::to_string)
        .unwrap_or(path)
}

/// An [`Api`] wired to a [`MockTransport`], an in-memory session and a
/// recording navigator.
pub struct Harness {
    /// API under test.
    pub api: Api,
    /// Transport the API sends through.
    pub transport: Arc<MockTransport>,
    /// Session the HTTP layer reads.
    pub session: Arc<MemorySessionStore>,
    /// Navigator that records redirects.
    pub navigator: Arc<HistoryNavigator>,
    /// Configuration the API was built from.
    pub config: ClientConfig,
}

impl Harness {
    /// Logged-out harness against `http://mock.local`.
    pub fn new() -> Self {
        let config = ClientConfig::default().with_api_url("http://mock.local");
        let transport = Arc::new(MockTransport::new());
        let session = Arc::new(MemorySessionStore::new());
        let navigator = Arc::new(HistoryNavigator::default());
        let http = HttpClient::new(&config, transport.clone(), session.clone(), navigator.clone());
        Self {
            api: Api::new(http),
            transport,
            session,
            navigator,
            config,
        }
    }

    /// Harness with a stored session for `token`.
    pub fn logged_in(token: &str) -> Self {
        let harness = Self::new();
        crate::session::SessionStore::begin(harness.session.as_ref(), token)
            .unwrap_or_else(|err| tracing::error!("memory session refused login: {err}"));
        harness
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

/// Article as the API would serialise it.
pub fn article_json(id: i64, title: &str, status: ArticleStatus) -> Value {
    json!({
        "id": id,
        "title": title,
        "content": format!("{title}\n\nIsi artikel."),
        "category_id": null,
        "category": null,
        "image": null,
        "read_time": 5,
        "status": status.as_str(),
        "views": id * 10,
        "created_at": "2025-01-15T08:00:00Z",
    })
}

/// Category as the API would serialise it, with `articles` ids embedded.
pub fn category_json(id: i64, name: &str, articles: &[i64]) -> Value {
    let articles: Vec<Value> = articles.iter().map(|id| json!({ "id": id })).collect();
    json!({
        "id": id,
        "name": name,
        "slug": sehat_shared::slugify(name),
        "articles": articles,
    })
}
