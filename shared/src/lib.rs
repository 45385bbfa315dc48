//! Domain types shared by the Keluarga Sehat client layer and the admin CLI.
//!
//! Every entity here is owned by the remote API; clients only hold transient
//! copies, so the types mirror the JSON the server speaks.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{de::IgnoredAny, Deserialize, Deserializer, Serialize};

/// Read time used when the form value cannot be coerced to a positive number.
pub const DEFAULT_READ_TIME: u32 = 5;

/// Publication state of an article.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    /// Only visible in the admin back-office.
    #[default]
    Draft,
    /// Visible on the public site.
    Published,
}

impl ArticleStatus {
    /// Wire value used in payloads and query strings.
    pub fn as_str(self) -> &'static str {
        match self {
            ArticleStatus::Draft => "draft",
            ArticleStatus::Published => "published",
        }
    }
}

impl fmt::Display for ArticleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Article category.
// 服务端返回 `articles` 数组，这里只保留数量
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Server id.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// URL slug, server-authoritative.
    #[serde(default)]
    pub slug: String,
    /// Number of articles filed under the category.
    #[serde(
        default,
        rename(serialize = "article_count", deserialize = "articles"),
        deserialize_with = "count_entries"
    )]
    pub article_count: usize,
}

/// Category as embedded inside an article response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    /// Server id.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// URL slug.
    #[serde(default)]
    pub slug: String,
}

/// Full article as returned by `GET /articles` and `GET /articles/:id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    /// Server id.
    pub id: i64,
    /// Headline.
    pub title: String,
    /// Plain text body; paragraphs are separated by newlines.
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    /// Owning category, if any.
    #[serde(default)]
    pub category_id: Option<i64>,
    /// Owning category as expanded by the server.
    #[serde(default)]
    pub category: Option<CategoryRef>,
    /// Absolute URL or server-relative path of the hero image.
    #[serde(default)]
    pub image: Option<String>,
    /// Estimated read time in minutes.
    #[serde(default = "default_read_time", deserialize_with = "read_time_or_default")]
    pub read_time: u32,
    /// Draft or published.
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: ArticleStatus,
    /// View counter maintained by the server.
    #[serde(default, deserialize_with = "null_as_default")]
    pub views: u64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Article {
    /// Name of the owning category, or `-` when uncategorised.
    pub fn category_name(&self) -> &str {
        self.category
            .as_ref()
            .map(|category| category.name.as_str())
            .unwrap_or("-")
    }

    /// Whether the article is visible on the public site.
    pub fn is_published(&self) -> bool {
        self.status == ArticleStatus::Published
    }
}

/// Body of `POST /articles` and `PATCH /articles/:id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticlePayload {
    /// Headline.
    pub title: String,
    /// Plain text body.
    pub content: String,
    /// Uploaded image URL; `null` detaches the image.
    pub image: Option<String>,
    /// Minutes, already coerced.
    pub read_time: u32,
    /// Status chosen by the submit button.
    pub status: ArticleStatus,
    /// Owning category; `null` leaves the article uncategorised.
    pub category_id: Option<i64>,
}

/// Body of `POST /categories` and `PATCH /categories/:id`.
///
/// `slug` is left out of the JSON when absent so the server derives it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CategoryPayload {
    /// Display name.
    pub name: String,
    /// URL slug.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

/// Body of `POST /auth/login` and `POST /auth/register`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Account name.
    pub username: String,
    /// Plain password, sent over the API only.
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Successful login response.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Bearer token for authenticated calls.
    pub access_token: String,
}

impl fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginResponse")
            .field("access_token", &"***")
            .finish()
    }
}

/// Result of `POST /upload`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Absolute URL or server-relative path of the stored file.
    pub url: String,
}

/// Optional filters for `GET /articles`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleFilters {
    /// Only articles in this state.
    pub status: Option<ArticleStatus>,
    /// Only articles filed under this category.
    pub category_id: Option<i64>,
    /// Free-text query matched by the server.
    pub search: Option<String>,
}

impl ArticleFilters {
    /// Public listing: published articles only.
    pub fn published() -> Self {
        Self {
            status: Some(ArticleStatus::Published),
            ..Self::default()
        }
    }

    /// Copy of these filters with `search` replaced; a blank query clears it.
    pub fn with_search(&self, query: &str) -> Self {
        Self {
            search: (!query.is_empty()).then(|| query.to_string()),
            ..self.clone()
        }
    }

    /// Query parameters in wire order. Absent or empty filters are omitted
    /// rather than sent as empty values.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        if let Some(category_id) = self.category_id {
            pairs.push(("category_id", category_id.to_string()));
        }
        if let Some(search) = self.search.as_deref().filter(|value| !value.is_empty()) {
            pairs.push(("search", search.to_string()));
        }
        pairs
    }
}

/// Suggest a URL slug for a category name.
///
/// Lowercases the name, turns every run of characters outside `[a-z0-9]`
/// into a single `-` and trims dashes from both ends.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for ch in name.to_lowercase().chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        } else {
            pending_dash = true;
        }
    }
    slug
}

fn default_read_time() -> u32 {
    DEFAULT_READ_TIME
}

// `null` 与缺省字段同样处理
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn read_time_or_default<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let minutes = Option::<u32>::deserialize(deserializer)?;
    Ok(minutes.filter(|minutes| *minutes > 0).unwrap_or(DEFAULT_READ_TIME))
}

fn count_entries<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Option::<Vec<IgnoredAny>>::deserialize(deserializer)?;
    Ok(entries.map_or(0, |entries| entries.len()))
}
