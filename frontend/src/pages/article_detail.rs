//! Public article page (`/article/:id`).

use sehat_shared::Article;
use tokio::sync::watch;

use crate::{api::Api, config::ClientConfig, utils};

/// What `/article/:id` shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ArticleView {
    /// Fetch in flight.
    #[default]
    Loading,
    /// Article ready to render.
    Loaded(Article),
    /// Missing article or any other load failure; links back home.
    NotFound,
}

/// Display-ready fields of a loaded article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleDisplay<'a> {
    /// Headline.
    pub title: &'a str,
    /// Category name, if any.
    pub category: Option<&'a str>,
    /// Absolute hero image URL.
    pub image_url: Option<String>,
    /// Long Indonesian date.
    pub date: String,
    /// "N menit baca".
    pub read_time: String,
    /// "N views" with grouped digits.
    pub views: String,
    /// Non-blank paragraphs of the body.
    pub paragraphs: Vec<&'a str>,
}

impl<'a> ArticleDisplay<'a> {
    /// Display fields for `article`, with the image resolved against the API origin.
    pub fn new(article: &'a Article, config: &ClientConfig) -> Self {
        Self {
            title: &article.title,
            category: article.category.as_ref().map(|category| category.name.as_str()),
            image_url: article
                .image
                .as_deref()
                .filter(|image| !image.is_empty())
                .map(|image| config.asset_url(image)),
            date: utils::format_long_date(&article.created_at),
            read_time: format!("{} menit baca", article.read_time),
            views: format!("{} views", utils::format_count(article.views)),
            paragraphs: utils::paragraphs(&article.content),
        }
    }
}

/// Controller behind the public article page.
pub struct ArticlePage {
    api: Api,
    config: ClientConfig,
    state: watch::Sender<ArticleView>,
}

impl ArticlePage {
    /// Page in the loading state.
    pub fn new(api: Api, config: ClientConfig) -> Self {
        let (state, _) = watch::channel(ArticleView::default());
        Self {
            api,
            config,
            state,
        }
    }

    /// View updates.
    pub fn subscribe(&self) -> watch::Receiver<ArticleView> {
        self.state.subscribe()
    }

    /// Current view.
    pub fn view(&self) -> ArticleView {
        self.state.borrow().clone()
    }

    /// Configuration used to resolve image URLs.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Load article `id`.
    pub async fn load(&self, id: i64) {
        self.state.send_replace(ArticleView::Loading);
        let view = match self.api.articles().get_one(id).await {
            Ok(article) => ArticleView::Loaded(article),
            Err(err) => {
                tracing::debug!("article {id} unavailable: {err}");
                ArticleView::NotFound
            },
        };
        self.state.send_replace(view);
    }
}
