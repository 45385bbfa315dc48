//! Article editor (`/admin/articles/new`, `/admin/articles/:id`).
//!
//! The form keeps a text draft of the article. Picking an image shows a local
//! preview at once while the upload runs in the background; the draft only
//! points at the image once the server has returned its URL, and both submit
//! actions stay disabled until then.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use parking_lot::Mutex;
use sehat_shared::{
    Article, ArticlePayload, ArticleStatus, Category, CategoryPayload, DEFAULT_READ_TIME,
};
use tokio::sync::watch;

use crate::{
    api::Api,
    config::ClientConfig,
    error::{ApiError, ApiResult},
    http::FilePart,
    router::Route,
    timers::TimerHandle,
};

/// Editable text fields, as typed.
///
/// Numeric fields stay strings until submission so half-typed input is kept
/// verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleDraft {
    /// Headline.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Category id as typed; empty means none.
    pub category_id: String,
    /// Read time in minutes as typed.
    pub read_time: String,
    /// URL returned by the upload endpoint.
    pub image: Option<String>,
}

impl ArticleDraft {
    /// Draft prefilled from a stored article.
    pub fn from_article(article: &Article) -> Self {
        Self {
            title: article.title.clone(),
            content: article.content.clone(),
            category_id: article
                .category_id
                .map(|id| id.to_string())
                .unwrap_or_default(),
            read_time: article.read_time.to_string(),
            image: article.image.clone().filter(|image| !image.is_empty()),
        }
    }

    /// Required-field check run before any request.
    pub fn validate(&self) -> ApiResult<()> {
        if self.title.trim().is_empty() || self.content.trim().is_empty() {
            return Err(ApiError::ValidationFailed(
                "Judul dan konten wajib diisi".to_string(),
            ));
        }
        Ok(())
    }

    /// Request body for `status`.
    ///
    /// Both numeric fields accept only a positive leading integer. Anything
    /// else (blank, text, zero or negative) makes read time fall back to
    /// [`DEFAULT_READ_TIME`] and leaves the category unset.
    pub fn payload(&self, status: ArticleStatus) -> ArticlePayload {
        let read_time = positive_int(&self.read_time)
            .and_then(|minutes| u32::try_from(minutes).ok())
            .unwrap_or(DEFAULT_READ_TIME);
        ArticlePayload {
            title: self.title.clone(),
            content: self.content.clone(),
            image: self.image.clone().filter(|image| !image.is_empty()),
            read_time,
            status,
            category_id: positive_int(&self.category_id),
        }
    }
}

fn positive_int(raw: &str) -> Option<i64> {
    leading_int(raw).filter(|value| *value > 0)
}

/// Integer prefix of `raw`: `"12 menit"` is 12, `"abc"` is none.
fn leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (sign, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1, &trimmed[1..]),
        Some(b'+') => (1, &trimmed[1..]),
        _ => (1, trimmed),
    };
    let digits = rest.len() - rest.trim_start_matches(|ch: char| ch.is_ascii_digit()).len();
    if digits == 0 {
        return None;
    }
    rest[..digits].parse::<i64>().ok().map(|value| sign * value)
}

/// New article or edit of an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    /// Blank form, saved with `POST`.
    Create,
    /// Existing article, saved with `PATCH`.
    Edit(i64),
}

impl FormMode {
    /// Route the editor lives at.
    pub fn route(self) -> Route {
        match self {
            FormMode::Create => Route::AdminArticleNew,
            FormMode::Edit(id) => Route::AdminArticleEdit {
                id,
            },
        }
    }
}

/// Everything the editor renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    /// Field values.
    pub draft: ArticleDraft,
    /// `data:` URL of a freshly picked file, or the stored image URL.
    pub preview: Option<String>,
    /// An image upload is in flight.
    pub uploading: bool,
    /// A save request is in flight.
    pub submitting: bool,
    /// Initial load finished.
    pub loaded: bool,
    /// Categories offered by the picker.
    pub categories: Vec<Category>,
    /// Inline "new category" input is shown.
    pub new_category_open: bool,
    /// Text in the inline category input.
    pub new_category_name: String,
    /// Inline category request in flight.
    pub adding_category: bool,
    /// Message shown above the form.
    pub error: Option<String>,
    /// Bumped whenever the file input must be cleared.
    pub file_input_resets: u64,
}

impl FormState {
    /// Whether the submit buttons are enabled.
    pub fn can_submit(&self) -> bool {
        !self.uploading && !self.submitting
    }
}

/// Result of a submit click.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The server accepted the article.
    Saved(Article),
    /// Click arrived while the buttons were disabled.
    Ignored,
}

/// Controller behind the article editor.
pub struct ArticleFormController {
    api: Api,
    config: ClientConfig,
    mode: FormMode,
    state: Arc<watch::Sender<FormState>>,
    upload: Mutex<Option<TimerHandle>>,
    upload_generation: Arc<AtomicU64>,
}

impl ArticleFormController {
    /// Editor in `mode`; call [`load`](Self::load) before showing it.
    pub fn new(api: Api, config: ClientConfig, mode: FormMode) -> Self {
        let (state, _) = watch::channel(FormState::default());
        Self {
            api,
            config,
            mode,
            state: Arc::new(state),
            upload: Mutex::new(None),
            upload_generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Create or edit.
    pub fn mode(&self) -> FormMode {
        self.mode
    }

    /// State updates for the view.
    pub fn subscribe(&self) -> watch::Receiver<FormState> {
        self.state.subscribe()
    }

    /// Current state.
    pub fn state(&self) -> FormState {
        self.state.borrow().clone()
    }

    /// Fetch categories and, when editing, the article.
    ///
    /// A missing article sends the user back to the article list.
    pub async fn load(&self) -> ApiResult<()> {
        self.refresh_categories().await;

        if let FormMode::Edit(id) = self.mode {
            match self.api.articles().get_one(id).await {
                Ok(article) => {
                    let preview = article
                        .image
                        .as_deref()
                        .filter(|image| !image.is_empty())
                        .map(|image| self.config.asset_url(image));
                    self.state.send_modify(|state| {
                        state.draft = ArticleDraft::from_article(&article);
                        state.preview = preview;
                    });
                },
                Err(err) => {
                    tracing::error!("failed to fetch article {id}: {err}");
                    self.state.send_modify(|state| {
                        state.error = Some("Artikel tidak ditemukan".to_string());
                    });
                    self.api.http().navigator().navigate(Route::AdminArticles);
                    return Err(ApiError::NotFound);
                },
            }
        }

        self.state.send_modify(|state| state.loaded = true);
        Ok(())
    }

    /// Apply a text edit to the draft.
    pub fn edit(&self, apply: impl FnOnce(&mut ArticleDraft)) {
        self.state.send_modify(|state| apply(&mut state.draft));
    }

    /// A file was picked: preview now, upload in the background.
    ///
    /// Picking another file or removing the image abandons this upload.
    pub fn select_image(&self, file: FilePart) {
        let preview = format!("data:{};base64,{}", file.mime_type, STANDARD.encode(&file.bytes));
        let generation = self.upload_generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|state| {
            state.preview = Some(preview);
            state.uploading = true;
            state.error = None;
        });

        let api = self.api.clone();
        let state = self.state.clone();
        let current = self.upload_generation.clone();
        let task = TimerHandle::spawn(async move {
            let result = api.upload().image(file).await;
            if current.load(Ordering::SeqCst) != generation {
                return;
            }
            state.send_modify(|state| {
                state.uploading = false;
                match result {
                    Ok(uploaded) => state.draft.image = Some(uploaded.url),
                    Err(err) => {
                        tracing::error!("image upload failed: {err}");
                        state.preview = None;
                        state.error = Some(err.to_string());
                    },
                }
            });
        });
        *self.upload.lock() = Some(task);
    }

    /// Clear the image, its preview and the file input.
    pub fn remove_image(&self) {
        self.upload_generation.fetch_add(1, Ordering::SeqCst);
        self.upload.lock().take();
        self.state.send_modify(|state| {
            state.draft.image = None;
            state.preview = None;
            state.uploading = false;
            state.file_input_resets += 1;
        });
    }

    /// Save with status `published`.
    pub async fn publish(&self) -> ApiResult<SubmitOutcome> {
        self.submit(ArticleStatus::Published).await
    }

    /// Save with status `draft`.
    pub async fn save_draft(&self) -> ApiResult<SubmitOutcome> {
        self.submit(ArticleStatus::Draft).await
    }

    async fn submit(&self, status: ArticleStatus) -> ApiResult<SubmitOutcome> {
        let mut claimed = false;
        self.state.send_if_modified(|state| {
            if state.can_submit() {
                state.submitting = true;
                state.error = None;
                claimed = true;
            }
            claimed
        });
        if !claimed {
            tracing::debug!("submit ignored while the form is busy");
            return Ok(SubmitOutcome::Ignored);
        }

        let draft = self.state.borrow().draft.clone();
        if let Err(err) = draft.validate() {
            self.finish_submit(Some(err.to_string()));
            return Err(err);
        }

        let payload = draft.payload(status);
        let result = match self.mode {
            FormMode::Create => self.api.articles().create(&payload).await,
            FormMode::Edit(id) => self.api.articles().update(id, &payload).await,
        };
        match result {
            Ok(article) => {
                tracing::info!("saved article {} as {status}", article.id);
                self.finish_submit(None);
                self.api.http().navigator().navigate(Route::AdminArticles);
                Ok(SubmitOutcome::Saved(article))
            },
            Err(err) => {
                tracing::error!("failed to save article: {err}");
                self.finish_submit(Some(err.to_string()));
                Err(err)
            },
        }
    }

    fn finish_submit(&self, error: Option<String>) {
        self.state.send_modify(|state| {
            state.submitting = false;
            state.error = error;
        });
    }

    /// Open the inline "new category" input.
    pub fn show_new_category(&self) {
        self.state.send_modify(|state| state.new_category_open = true);
    }

    /// Track the inline category input.
    pub fn set_new_category_name(&self, name: impl Into<String>) {
        let name = name.into();
        self.state.send_modify(|state| state.new_category_name = name);
    }

    /// Close the inline input and forget what was typed.
    pub fn cancel_new_category(&self) {
        self.state.send_modify(|state| {
            state.new_category_open = false;
            state.new_category_name.clear();
        });
    }

    /// Create the typed category, reload the list, then select it.
    ///
    /// Returns the new id, or `None` when a previous add is still running.
    pub async fn add_category(&self) -> ApiResult<Option<i64>> {
        let name = self.state.borrow().new_category_name.trim().to_string();
        if name.is_empty() {
            return Err(ApiError::ValidationFailed(
                "Nama kategori wajib diisi".to_string(),
            ));
        }

        let mut claimed = false;
        self.state.send_if_modified(|state| {
            if !state.adding_category {
                state.adding_category = true;
                claimed = true;
            }
            claimed
        });
        if !claimed {
            return Ok(None);
        }

        let created = match self
            .api
            .categories()
            .create(&CategoryPayload {
                name,
                slug: None,
            })
            .await
        {
            Ok(created) => created,
            Err(err) => {
                tracing::error!("failed to create category: {err}");
                self.state.send_modify(|state| {
                    state.adding_category = false;
                    state.error = Some(err.to_string());
                });
                return Err(err);
            },
        };

        // Select only after the list has been reloaded with the new entry.
        self.refresh_categories().await;
        self.state.send_modify(|state| {
            state.draft.category_id = created.id.to_string();
            state.new_category_name.clear();
            state.new_category_open = false;
            state.adding_category = false;
        });
        Ok(Some(created.id))
    }

    async fn refresh_categories(&self) {
        match self.api.categories().get_all().await {
            Ok(categories) => self.state.send_modify(|state| state.categories = categories),
            Err(err) => tracing::error!("failed to fetch categories: {err}"),
        }
    }
}
