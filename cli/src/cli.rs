//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use sehat_shared::ArticleStatus;

/// `--status` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    /// Unpublished articles.
    Draft,
    /// Articles on the public site.
    Published,
}

impl From<StatusArg> for ArticleStatus {
    fn from(status: StatusArg) -> Self {
        match status {
            StatusArg::Draft => ArticleStatus::Draft,
            StatusArg::Published => ArticleStatus::Published,
        }
    }
}

/// Top-level arguments.
#[derive(Parser)]
#[command(name = "sehat-cli", version, about = "Keluarga Sehat admin CLI")]
pub struct Cli {
    /// API origin without the `/api` suffix (overrides SEHAT_API_URL).
    #[arg(long, global = true)]
    pub api_url: Option<String>,
    /// File holding the login session.
    #[arg(long, global = true, default_value = "./data/session.json")]
    pub session_file: PathBuf,
    /// Action to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level actions.
#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and store the token in the session file.
    Login {
        /// Account name.
        #[arg(long)]
        username: String,
        /// Account password.
        #[arg(long)]
        password: String,
    },
    /// Forget the stored session.
    Logout,
    /// Create an admin account.
    Register {
        /// Account name.
        #[arg(long)]
        username: String,
        /// Account password.
        #[arg(long)]
        password: String,
    },
    /// Show whether a session is stored and which API is targeted.
    Status,
    /// Headline numbers and the most recent articles.
    Dashboard,
    /// Manage categories.
    Categories {
        /// Category action.
        #[command(subcommand)]
        command: CategoryCommands,
    },
    /// Manage articles.
    Articles {
        /// Article action.
        #[command(subcommand)]
        command: ArticleCommands,
    },
    /// Upload an image and print its URL.
    Upload {
        /// Image file path.
        file: PathBuf,
    },
}

/// `categories` actions.
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// GET /api/categories
    List,
    /// GET /api/categories/:id
    Get {
        /// Server id.
        id: i64,
    },
    /// POST /api/categories
    Create {
        /// Display name.
        #[arg(long)]
        name: String,
        /// Defaults to a slug derived from the name.
        #[arg(long)]
        slug: Option<String>,
    },
    /// PATCH /api/categories/:id
    Update {
        /// Server id.
        id: i64,
        /// Display name.
        #[arg(long)]
        name: String,
        /// Defaults to a slug derived from the name.
        #[arg(long)]
        slug: Option<String>,
    },
    /// DELETE /api/categories/:id
    Delete {
        /// Server id.
        id: i64,
    },
}

/// `articles` actions.
#[derive(Subcommand)]
pub enum ArticleCommands {
    /// GET /api/articles
    List {
        /// Only articles in this state.
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
        /// Only articles in this category.
        #[arg(long)]
        category_id: Option<i64>,
        /// Free-text query.
        #[arg(long)]
        search: Option<String>,
    },
    /// GET /api/articles/:id
    Get {
        /// Server id.
        id: i64,
    },
    /// POST /api/articles
    Create {
        /// Field values.
        #[command(flatten)]
        fields: ArticleFields,
    },
    /// PATCH /api/articles/:id; omitted fields keep their stored value.
    Update {
        /// Server id.
        id: i64,
        /// Field values.
        #[command(flatten)]
        fields: ArticleFields,
    },
    /// DELETE /api/articles/:id
    Delete {
        /// Server id.
        id: i64,
    },
}

/// Editable article fields shared by `create` and `update`.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ArticleFields {
    /// Headline.
    #[arg(long)]
    pub title: Option<String>,
    /// Body text.
    #[arg(long, conflicts_with = "content_file")]
    pub content: Option<String>,
    /// Read the body text from a file.
    #[arg(long)]
    pub content_file: Option<PathBuf>,
    /// Category id; anything that is not a positive number clears it.
    #[arg(long)]
    pub category_id: Option<String>,
    /// Minutes; falls back to 5 when not a positive number.
    #[arg(long)]
    pub read_time: Option<String>,
    /// Upload this image and attach it.
    #[arg(long, conflicts_with = "remove_image")]
    pub image: Option<PathBuf>,
    /// Detach the current image.
    #[arg(long)]
    pub remove_image: bool,
    /// Save as published instead of draft.
    #[arg(long)]
    pub publish: bool,
}
