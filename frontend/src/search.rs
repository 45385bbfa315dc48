//! Debounced search-and-refetch loop for article listings.
//!
//! Keystrokes restart a quiet-period timer; when it expires the listing is
//! fetched with the current query on top of the view's base filters and the
//! displayed results are replaced wholesale. Every fetch carries a sequence
//! number and only the most recently issued one may update the view, so a
//! slow response for an old query can never overwrite a newer one.

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use async_trait::async_trait;
use parking_lot::Mutex;
use sehat_shared::{Article, ArticleFilters};
use tokio::sync::watch;

use crate::{api::Api, error::ApiResult, timers::TimerHandle};

/// Where the listing comes from.
#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// Fetch the listing for `filters`.
    async fn fetch_articles(&self, filters: &ArticleFilters) -> ApiResult<Vec<Article>>;
}

#[async_trait]
impl ArticleSource for Api {
    async fn fetch_articles(&self, filters: &ArticleFilters) -> ApiResult<Vec<Article>> {
        self.articles().get_all(filters).await
    }
}

/// `Idle → Debouncing → Fetching → Idle`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchPhase {
    /// Nothing pending.
    #[default]
    Idle,
    /// Waiting for typing to pause.
    Debouncing,
    /// Request in flight.
    Fetching,
}

/// What the view renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchSnapshot {
    /// Current phase.
    pub phase: SearchPhase,
    /// Text currently in the search field.
    pub query: String,
    /// Result set of the latest applied fetch.
    pub results: Vec<Article>,
    /// Message of the latest failed fetch; cleared by the next success.
    pub error: Option<String>,
    /// Set once any fetch has completed.
    pub loaded: bool,
}

struct Shared {
    source: Arc<dyn ArticleSource>,
    filters: Mutex<ArticleFilters>,
    state: watch::Sender<SearchSnapshot>,
    issued: AtomicU64,
}

impl Shared {
    async fn fetch(&self, query: String) {
        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let filters = self.filters.lock().with_search(&query);
        self.state.send_modify(|state| state.phase = SearchPhase::Fetching);

        let result = self.source.fetch_articles(&filters).await;

        if self.issued.load(Ordering::SeqCst) != seq {
            tracing::debug!("discarding stale search response #{seq} for {query:?}");
            return;
        }
        self.state.send_modify(|state| {
            match result {
                Ok(articles) => {
                    state.results = articles;
                    state.error = None;
                },
                Err(err) => {
                    tracing::error!("failed to fetch articles: {err}");
                    state.error = Some(err.to_string());
                },
            }
            state.loaded = true;
            if state.phase == SearchPhase::Fetching {
                state.phase = SearchPhase::Idle;
            }
        });
    }
}

/// Drives one listing view. Dropping it cancels the pending debounce timer.
pub struct SearchController {
    shared: Arc<Shared>,
    debounce: Duration,
    pending: Mutex<Option<TimerHandle>>,
}

impl SearchController {
    /// Controller over `source` with the view's fixed `filters` (the search
    /// term inside them is ignored).
    pub fn new(source: Arc<dyn ArticleSource>, filters: ArticleFilters, debounce: Duration) -> Self {
        let (state, _) = watch::channel(SearchSnapshot::default());
        Self {
            shared: Arc::new(Shared {
                source,
                filters: Mutex::new(filters),
                state,
                issued: AtomicU64::new(0),
            }),
            debounce,
            pending: Mutex::new(None),
        }
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<SearchSnapshot> {
        self.shared.state.subscribe()
    }

    /// Current state.
    pub fn snapshot(&self) -> SearchSnapshot {
        self.shared.state.borrow().clone()
    }

    /// Keystroke in the search field: restart the debounce timer.
    ///
    /// An empty query still fetches, without a `search` filter.
    pub fn input(&self, query: impl Into<String>) {
        let query = query.into();
        self.shared.state.send_modify(|state| {
            state.query = query.clone();
            state.phase = SearchPhase::Debouncing;
        });

        let shared = self.shared.clone();
        let delay = self.debounce;
        let timer = TimerHandle::spawn(async move {
            tokio::time::sleep(delay).await;
            shared.fetch(query).await;
        });
        // Replacing the handle aborts the previous timer.
        *self.pending.lock() = Some(timer);
    }

    /// Fetch now with the current query, skipping the debounce.
    pub async fn refresh(&self) {
        self.pending.lock().take();
        let query = self.shared.state.borrow().query.clone();
        self.shared.fetch(query).await;
    }

    /// Replace the view's fixed filters. Takes effect on the next fetch.
    pub fn set_filters(&self, filters: ArticleFilters) {
        *self.shared.filters.lock() = filters;
    }

    /// Filters applied to every fetch, before the search term.
    pub fn filters(&self) -> ArticleFilters {
        self.shared.filters.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use sehat_shared::ArticleStatus;
    use serde_json::json;

    use super::*;
    use crate::{
        http::{HttpResponse, Method},
        testing::{article_json, Harness},
    };

    const DEBOUNCE: Duration = Duration::from_millis(300);

    fn controller(harness: &Harness, filters: ArticleFilters) -> SearchController {
        SearchController::new(Arc::new(harness.api.clone()), filters, DEBOUNCE)
    }

    fn queries(harness: &Harness) -> Vec<Option<String>> {
        harness
            .transport
            .requests_to(Method::Get, "/articles")
            .iter()
            .map(|request| {
                url::Url::parse(&request.url)
                    .ok()
                    .and_then(|url| url.query().map(str::to_string))
            })
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn burst_of_keystrokes_fetches_once_with_last_value() {
        let harness = Harness::new();
        harness.transport.on(
            Method::Get,
            "/articles",
            HttpResponse::json(200, &json!([article_json(1, "Diet", ArticleStatus::Published)])),
        );
        let search = controller(&harness, ArticleFilters::default());

        for query in ["d", "di", "die", "diet", "diet!"] {
            search.input(query);
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        assert_eq!(search.snapshot().phase, SearchPhase::Debouncing);
        assert_eq!(harness.transport.count(Method::Get, "/articles"), 0);

        tokio::time::sleep(Duration::from_millis(400)).await;

        assert_eq!(queries(&harness), vec![Some("search=diet%21".to_string())]);
        let snapshot = search.snapshot();
        assert_eq!(snapshot.phase, SearchPhase::Idle);
        assert_eq!(snapshot.results.len(), 1);
        assert!(snapshot.loaded);
    }

    #[tokio::test(start_paused = true)]
    async fn cleared_query_fetches_the_unfiltered_listing() {
        let harness = Harness::new();
        harness
            .transport
            .on(Method::Get, "/articles", HttpResponse::json(200, &json!([])));
        let search = controller(&harness, ArticleFilters::published());

        search.input("flu");
        tokio::time::sleep(Duration::from_millis(350)).await;
        search.input("");
        tokio::time::sleep(Duration::from_millis(350)).await;

        assert_eq!(
            queries(&harness),
            vec![
                Some("status=published&search=flu".to_string()),
                Some("status=published".to_string()),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn stale_response_never_overwrites_newer_results() {
        let harness = Harness::new();
        harness.transport.once_delayed(
            Method::Get,
            "/articles",
            HttpResponse::json(200, &json!([article_json(1, "Lama", ArticleStatus::Draft)])),
            Duration::from_millis(2_000),
        );
        harness.transport.on(
            Method::Get,
            "/articles",
            HttpResponse::json(200, &json!([article_json(2, "Baru", ArticleStatus::Draft)])),
        );
        let search = controller(&harness, ArticleFilters::default());

        tokio::join!(search.refresh(), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            search.input("baru");
        });

        let snapshot = search.snapshot();
        assert_eq!(harness.transport.count(Method::Get, "/articles"), 2);
        assert_eq!(snapshot.results.len(), 1);
        assert_eq!(snapshot.results[0].title, "Baru");
        assert_eq!(snapshot.phase, SearchPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_fetch_keeps_previous_results() {
        let harness = Harness::new();
        harness.transport.once(
            Method::Get,
            "/articles",
            HttpResponse::json(200, &json!([article_json(3, "Imun", ArticleStatus::Published)])),
        );
        harness.transport.on(
            Method::Get,
            "/articles",
            HttpResponse::json(500, &json!({ "message": "database unavailable" })),
        );
        let search = controller(&harness, ArticleFilters::default());

        search.refresh().await;
        search.input("imun");
        tokio::time::sleep(Duration::from_millis(350)).await;

        let snapshot = search.snapshot();
        assert_eq!(snapshot.results.len(), 1);
        assert_eq!(snapshot.error.as_deref(), Some("database unavailable"));
        assert_eq!(snapshot.phase, SearchPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_controller_cancels_the_pending_fetch() {
        let harness = Harness::new();
        harness
            .transport
            .on(Method::Get, "/articles", HttpResponse::json(200, &json!([])));
        let search = controller(&harness, ArticleFilters::default());

        search.input("tidur");
        drop(search);
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert_eq!(harness.transport.count(Method::Get, "/articles"), 0);
    }
}
