//! Typed facade over the REST API.
//!
//! Each group is a thin adapter: it picks the verb, path and auth mode and
//! shapes parameters. Nothing here keeps state or applies business rules.

use std::sync::Arc;

use sehat_shared::{
    Article, ArticleFilters, ArticlePayload, Category, CategoryPayload, Credentials,
    LoginResponse, UploadResponse,
};
use serde_json::Value;

use crate::{
    error::ApiResult,
    http::{Auth, FilePart, HttpClient, Method},
};

/// Entry point to every API group. Cloning is cheap.
#[derive(Clone)]
pub struct Api {
    http: Arc<HttpClient>,
}

impl Api {
    /// Facade over `http`.
    pub fn new(http: HttpClient) -> Self {
        Self {
            http: Arc::new(http),
        }
    }

    /// Underlying request wrapper.
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// `/auth/*`
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi {
            http: &self.http,
        }
    }

    /// `/categories*`
    pub fn categories(&self) -> CategoriesApi<'_> {
        CategoriesApi {
            http: &self.http,
        }
    }

    /// `/articles*`
    pub fn articles(&self) -> ArticlesApi<'_> {
        ArticlesApi {
            http: &self.http,
        }
    }

    /// `/upload`
    pub fn upload(&self) -> UploadApi<'_> {
        UploadApi {
            http: &self.http,
        }
    }
}

/// Login and registration.
pub struct AuthApi<'a> {
    http: &'a HttpClient,
}

impl AuthApi<'_> {
    /// `POST /auth/login`. Does not touch the session store.
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<LoginResponse> {
        let body = credentials(username, password)?;
        self.http
            .request_body(Method::Post, "/auth/login", Auth::None, Some(body))
            .await
    }

    /// `POST /auth/register`. The response shape is server-defined.
    pub async fn register(&self, username: &str, password: &str) -> ApiResult<Option<Value>> {
        let body = credentials(username, password)?;
        self.http
            .request(Method::Post, "/auth/register", Auth::None, Some(body))
            .await
    }
}

fn credentials(username: &str, password: &str) -> ApiResult<Value> {
    Ok(serde_json::to_value(Credentials {
        username: username.to_string(),
        password: password.to_string(),
    })?)
}

/// Category CRUD.
pub struct CategoriesApi<'a> {
    http: &'a HttpClient,
}

impl CategoriesApi<'_> {
    /// `GET /categories`
    pub async fn get_all(&self) -> ApiResult<Vec<Category>> {
        self.http
            .request_body(Method::Get, "/categories", Auth::None, None)
            .await
    }

    /// `GET /categories/:id`
    pub async fn get_one(&self, id: i64) -> ApiResult<Category> {
        self.http
            .request_body(Method::Get, &format!("/categories/{id}"), Auth::None, None)
            .await
    }

    /// `POST /categories`
    pub async fn create(&self, data: &CategoryPayload) -> ApiResult<Category> {
        self.http
            .request_body(
                Method::Post,
                "/categories",
                Auth::Bearer,
                Some(serde_json::to_value(data)?),
            )
            .await
    }

    /// `PATCH /categories/:id`
    pub async fn update(&self, id: i64, data: &CategoryPayload) -> ApiResult<Category> {
        self.http
            .request_body(
                Method::Patch,
                &format!("/categories/{id}"),
                Auth::Bearer,
                Some(serde_json::to_value(data)?),
            )
            .await
    }

    /// `DELETE /categories/:id`
    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        self.http
            .request::<Value>(Method::Delete, &format!("/categories/{id}"), Auth::Bearer, None)
            .await
            .map(|_| ())
    }
}

/// Article CRUD and listing.
pub struct ArticlesApi<'a> {
    http: &'a HttpClient,
}

impl ArticlesApi<'_> {
    /// `GET /articles` with only the filters that are set.
    pub async fn get_all(&self, filters: &ArticleFilters) -> ApiResult<Vec<Article>> {
        self.http
            .request_body(Method::Get, &articles_path(filters), Auth::None, None)
            .await
    }

    /// `GET /articles/:id`
    pub async fn get_one(&self, id: i64) -> ApiResult<Article> {
        self.http
            .request_body(Method::Get, &format!("/articles/{id}"), Auth::None, None)
            .await
    }

    /// `POST /articles`
    pub async fn create(&self, data: &ArticlePayload) -> ApiResult<Article> {
        self.http
            .request_body(Method::Post, "/articles", Auth::Bearer, Some(serde_json::to_value(data)?))
            .await
    }

    /// `PATCH /articles/:id`
    pub async fn update(&self, id: i64, data: &ArticlePayload) -> ApiResult<Article> {
        self.http
            .request_body(
                Method::Patch,
                &format!("/articles/{id}"),
                Auth::Bearer,
                Some(serde_json::to_value(data)?),
            )
            .await
    }

    /// `DELETE /articles/:id`
    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        self.http
            .request::<Value>(Method::Delete, &format!("/articles/{id}"), Auth::Bearer, None)
            .await
            .map(|_| ())
    }
}

/// `/articles` plus an encoded query string when any filter is set.
pub(crate) fn articles_path(filters: &ArticleFilters) -> String {
    let pairs = filters.query_pairs();
    if pairs.is_empty() {
        return "/articles".to_string();
    }
    let query = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs.iter().map(|(key, value)| (*key, value.as_str())))
        .finish();
    format!("/articles?{query}")
}

/// Image upload.
pub struct UploadApi<'a> {
    http: &'a HttpClient,
}

impl UploadApi<'_> {
    /// `POST /upload` with the file in the `file` field.
    pub async fn image(&self, file: FilePart) -> ApiResult<UploadResponse> {
        self.http.upload("/upload", "file", file).await
    }
}

#[cfg(test)]
mod tests {
    use sehat_shared::ArticleStatus;

    use super::*;

    #[test]
    fn articles_path_omits_unset_filters() {
        assert_eq!(articles_path(&ArticleFilters::default()), "/articles");
        assert_eq!(
            articles_path(&ArticleFilters::published().with_search("")),
            "/articles?status=published"
        );
        assert_eq!(
            articles_path(&ArticleFilters {
                status: Some(ArticleStatus::Draft),
                category_id: Some(7),
                search: Some("gula darah".to_string()),
            }),
            "/articles?status=draft&category_id=7&search=gula+darah"
        );
    }
}
