//! Admin dashboard (`/admin`).

use sehat_shared::{Article, ArticleFilters, Category};
use tokio::sync::watch;

use crate::{api::Api, router::Route};

/// Number of articles listed under "recent".
pub const RECENT_LIMIT: usize = 5;

/// Headline numbers of the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardStats {
    /// Articles in every status.
    pub total_articles: usize,
    /// Categories.
    pub total_categories: usize,
    /// Sum of article views.
    pub total_views: u64,
    /// Articles in the published state.
    pub published_count: usize,
}

impl DashboardStats {
    /// Stats over one fetch of both lists.
    pub fn compute(articles: &[Article], categories: &[Category]) -> Self {
        Self {
            total_articles: articles.len(),
            total_categories: categories.len(),
            total_views: articles.iter().map(|article| article.views).sum(),
            published_count: articles.iter().filter(|article| article.is_published()).count(),
        }
    }
}

/// One stat card with the page it links to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCard {
    /// Caption.
    pub label: &'static str,
    /// Number shown.
    pub value: u64,
    /// Page the card opens, if any.
    pub link: Option<Route>,
}

/// Everything the dashboard renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    /// The fetch is in flight.
    pub loading: bool,
    /// Headline numbers.
    pub stats: DashboardStats,
    /// Newest articles first, at most [`RECENT_LIMIT`].
    pub recent: Vec<Article>,
}

impl DashboardState {
    /// Cards in display order.
    pub fn cards(&self) -> Vec<StatCard> {
        let stats = self.stats;
        vec![
            StatCard {
                label: "Total Artikel",
                value: stats.total_articles as u64,
                link: Some(Route::AdminArticles),
            },
            StatCard {
                label: "Kategori",
                value: stats.total_categories as u64,
                link: Some(Route::AdminCategories),
            },
            StatCard {
                label: "Total Views",
                value: stats.total_views,
                link: None,
            },
            StatCard {
                label: "Dipublikasi",
                value: stats.published_count as u64,
                link: None,
            },
        ]
    }
}

/// Controller behind `/admin`.
pub struct DashboardController {
    api: Api,
    state: watch::Sender<DashboardState>,
}

impl DashboardController {
    /// Dashboard with zeroed stats.
    pub fn new(api: Api) -> Self {
        let (state, _) = watch::channel(DashboardState::default());
        Self {
            api,
            state,
        }
    }

    /// State updates for the view.
    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.state.subscribe()
    }

    /// Current state.
    pub fn state(&self) -> DashboardState {
        self.state.borrow().clone()
    }

    /// Fetch articles and categories together.
    ///
    /// Either failing leaves the zeroed stats in place; the error is only
    /// logged.
    pub async fn load(&self) {
        self.state.send_modify(|state| state.loading = true);

        let filters = ArticleFilters::default();
        let articles = self.api.articles();
        let categories = self.api.categories();
        let fetched = futures::try_join!(articles.get_all(&filters), categories.get_all());

        self.state.send_modify(|state| {
            match fetched {
                Ok((articles, categories)) => {
                    state.stats = DashboardStats::compute(&articles, &categories);
                    state.recent = articles.into_iter().take(RECENT_LIMIT).collect();
                },
                Err(err) => tracing::error!("failed to fetch dashboard data: {err}"),
            }
            state.loading = false;
        });
    }
}
