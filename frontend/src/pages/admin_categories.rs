//! Category management (`/admin/categories`).

use sehat_shared::{slugify, Category, CategoryPayload};
use tokio::sync::watch;

use crate::{
    api::Api,
    error::{ApiError, ApiResult},
};

/// Create/edit modal contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryEditor {
    /// Category being edited; `None` when creating.
    pub editing: Option<i64>,
    /// Name field.
    pub name: String,
    /// Slug field; blank lets the server derive it.
    pub slug: String,
}

impl CategoryEditor {
    fn payload(&self) -> CategoryPayload {
        CategoryPayload {
            name: self.name.trim().to_string(),
            slug: Some(self.slug.clone()).filter(|slug| !slug.is_empty()),
        }
    }
}

/// Everything the categories view renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoriesState {
    /// A list fetch is in flight.
    pub loading: bool,
    /// Categories as last fetched.
    pub categories: Vec<Category>,
    /// Open modal, if any.
    pub editor: Option<CategoryEditor>,
    /// A save is in flight.
    pub submitting: bool,
    /// Message shown in the modal.
    pub error: Option<String>,
}

/// Controller behind `/admin/categories`.
pub struct CategoriesPage {
    api: Api,
    state: watch::Sender<CategoriesState>,
}

impl CategoriesPage {
    /// Page with an empty list; call [`load`](Self::load) to fill it.
    pub fn new(api: Api) -> Self {
        let (state, _) = watch::channel(CategoriesState::default());
        Self {
            api,
            state,
        }
    }

    /// State updates for the view.
    pub fn subscribe(&self) -> watch::Receiver<CategoriesState> {
        self.state.subscribe()
    }

    /// Current state.
    pub fn state(&self) -> CategoriesState {
        self.state.borrow().clone()
    }

    /// Reload the list. Failures are logged and the old list stays.
    pub async fn load(&self) {
        self.state.send_modify(|state| state.loading = true);
        let result = self.api.categories().get_all().await;
        self.state.send_modify(|state| {
            match result {
                Ok(categories) => state.categories = categories,
                Err(err) => tracing::error!("failed to fetch categories: {err}"),
            }
            state.loading = false;
        });
    }

    /// Open an empty modal for a new category.
    pub fn open_create(&self) {
        self.state.send_modify(|state| {
            state.editor = Some(CategoryEditor::default());
            state.error = None;
        });
    }

    /// Open the modal prefilled with `category`.
    pub fn open_edit(&self, category: &Category) {
        let editor = CategoryEditor {
            editing: Some(category.id),
            name: category.name.clone(),
            slug: category.slug.clone(),
        };
        self.state.send_modify(|state| {
            state.editor = Some(editor);
            state.error = None;
        });
    }

    /// Dismiss the modal without saving.
    pub fn close(&self) {
        self.state.send_modify(|state| state.editor = None);
    }

    /// Name edit; the slug is replaced by one derived from the new name.
    pub fn set_name(&self, name: impl Into<String>) {
        let name = name.into();
        self.state.send_modify(|state| {
            if let Some(editor) = state.editor.as_mut() {
                editor.slug = slugify(&name);
                editor.name = name;
            }
        });
    }

    /// Manual slug edit; kept until the name changes again.
    pub fn set_slug(&self, slug: impl Into<String>) {
        let slug = slug.into();
        self.state.send_modify(|state| {
            if let Some(editor) = state.editor.as_mut() {
                editor.slug = slug;
            }
        });
    }

    /// Save the modal, reload the list and close the modal.
    ///
    /// Returns `None` when no modal is open or a save is already running.
    pub async fn submit(&self) -> ApiResult<Option<Category>> {
        let mut editor = None;
        self.state.send_if_modified(|state| {
            if state.submitting {
                return false;
            }
            editor = state.editor.clone();
            if editor.is_some() {
                state.submitting = true;
                state.error = None;
            }
            editor.is_some()
        });
        let Some(editor) = editor else {
            return Ok(None);
        };

        let payload = editor.payload();
        if payload.name.is_empty() {
            let err = ApiError::ValidationFailed("Nama kategori wajib diisi".to_string());
            self.fail(err.to_string());
            return Err(err);
        }

        let result = match editor.editing {
            Some(id) => self.api.categories().update(id, &payload).await,
            None => self.api.categories().create(&payload).await,
        };
        match result {
            Ok(saved) => {
                self.load().await;
                self.state.send_modify(|state| {
                    state.submitting = false;
                    state.editor = None;
                });
                Ok(Some(saved))
            },
            Err(err) => {
                tracing::error!("failed to save category: {err}");
                self.fail(err.to_string());
                Err(err)
            },
        }
    }

    /// Delete, then reload. Confirmation is the caller's job.
    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        if let Err(err) = self.api.categories().delete(id).await {
            tracing::error!("failed to delete category {id}: {err}");
            self.state.send_modify(|state| state.error = Some(err.to_string()));
            return Err(err);
        }
        self.load().await;
        Ok(())
    }

    fn fail(&self, message: String) {
        self.state.send_modify(|state| {
            state.submitting = false;
            state.error = Some(message);
        });
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        http::{Body, HttpResponse, Method},
        testing::{category_json, Harness},
    };

    #[test]
    fn blank_slug_is_left_to_the_server() {
        let editor = CategoryEditor {
            editing: None,
            name: " Gizi ".to_string(),
            slug: String::new(),
        };
        assert_eq!(
            editor.payload(),
            CategoryPayload {
                name: "Gizi".to_string(),
                slug: None,
            }
        );
    }

    #[tokio::test]
    async fn name_edits_suggest_a_slug_until_overridden() {
        let harness = Harness::logged_in("tok");
        let page = CategoriesPage::new(harness.api.clone());
        page.open_create();

        page.set_name("Kesehatan Mental");
        assert_eq!(page.state().editor.map(|editor| editor.slug).as_deref(), Some("kesehatan-mental"));

        page.set_slug("mental");
        assert_eq!(page.state().editor.map(|editor| editor.slug).as_deref(), Some("mental"));
    }

    #[tokio::test]
    async fn create_saves_refetches_and_closes() {
        let harness = Harness::logged_in("tok");
        harness.transport.on(
            Method::Post,
            "/categories",
            HttpResponse::json(201, &category_json(4, "Anak", &[])),
        );
        harness.transport.on(
            Method::Get,
            "/categories",
            HttpResponse::json(200, &json!([category_json(4, "Anak", &[9])])),
        );
        let page = CategoriesPage::new(harness.api.clone());
        page.open_create();
        page.set_name("Anak");

        let saved = page.submit().await.expect("submit");

        assert_eq!(saved.map(|category| category.id), Some(4));
        let state = page.state();
        assert!(state.editor.is_none());
        assert!(!state.submitting);
        assert_eq!(state.categories.len(), 1);
        assert_eq!(state.categories[0].article_count, 1);
        let body = &harness.transport.requests_to(Method::Post, "/categories")[0].body;
        assert_eq!(body, &Body::Json(json!({ "name": "Anak", "slug": "anak" })));
    }

    #[tokio::test]
    async fn edit_patches_the_existing_category() {
        let harness = Harness::logged_in("tok");
        harness.transport.on(
            Method::Patch,
            "/categories/2",
            HttpResponse::json(200, &category_json(2, "Gizi Anak", &[])),
        );
        harness
            .transport
            .on(Method::Get, "/categories", HttpResponse::json(200, &json!([])));
        let page = CategoriesPage::new(harness.api.clone());
        let existing: Category =
            serde_json::from_value(category_json(2, "Gizi", &[])).expect("category");
        page.open_edit(&existing);
        page.set_name("Gizi Anak");

        page.submit().await.expect("submit");

        assert_eq!(harness.transport.count(Method::Patch, "/categories/2"), 1);
        assert_eq!(harness.transport.count(Method::Post, "/categories"), 0);
    }

    #[tokio::test]
    async fn failed_save_keeps_the_modal_open() {
        let harness = Harness::logged_in("tok");
        harness.transport.on(
            Method::Post,
            "/categories",
            HttpResponse::json(409, &json!({ "message": ["slug already exists"] })),
        );
        let page = CategoriesPage::new(harness.api.clone());
        page.open_create();
        page.set_name("Gizi");

        page.submit().await.expect_err("conflict");

        let state = page.state();
        assert!(state.editor.is_some());
        assert_eq!(state.error.as_deref(), Some("slug already exists"));
        assert_eq!(harness.transport.count(Method::Get, "/categories"), 0);
    }

    #[tokio::test]
    async fn delete_refetches_the_list() {
        let harness = Harness::logged_in("tok");
        harness
            .transport
            .on(Method::Delete, "/categories/7", HttpResponse::empty(204));
        harness
            .transport
            .on(Method::Get, "/categories", HttpResponse::json(200, &json!([])));
        let page = CategoriesPage::new(harness.api.clone());

        page.delete(7).await.expect("delete");

        assert_eq!(harness.transport.count(Method::Get, "/categories"), 1);
    }
}
