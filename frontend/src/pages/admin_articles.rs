//! Admin article list (`/admin/articles`).

use std::sync::Arc;

use sehat_shared::ArticleFilters;
use tokio::sync::watch;

use crate::{
    api::Api,
    config::ClientConfig,
    error::ApiResult,
    search::{SearchController, SearchSnapshot},
};

/// Controller behind `/admin/articles`: every status, searchable.
pub struct ArticlesPage {
    api: Api,
    search: SearchController,
}

impl ArticlesPage {
    /// Page over all articles, searched with the configured debounce.
    pub fn new(api: Api, config: &ClientConfig) -> Self {
        let search = SearchController::new(
            Arc::new(api.clone()),
            ArticleFilters::default(),
            config.search_debounce,
        );
        Self {
            api,
            search,
        }
    }

    /// Initial fetch.
    pub async fn load(&self) {
        self.search.refresh().await;
    }

    /// Underlying search controller.
    pub fn search(&self) -> &SearchController {
        &self.search
    }

    /// Listing updates for the view.
    pub fn subscribe(&self) -> watch::Receiver<SearchSnapshot> {
        self.search.subscribe()
    }

    /// Keystroke in the search box.
    pub fn input(&self, query: impl Into<String>) {
        self.search.input(query);
    }

    /// Delete, then reload the listing with the current query.
    ///
    /// Confirmation is the caller's job.
    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        if let Err(err) = self.api.articles().delete(id).await {
            tracing::error!("failed to delete article {id}: {err}");
            return Err(err);
        }
        tracing::info!("deleted article {id}");
        self.search.refresh().await;
        Ok(())
    }
}
