//! `articles` subcommands.

use std::fs;

use anyhow::{bail, Context as _, Result};
use sehat_frontend::{
    pages::admin_article_form::{ArticleFormController, FormMode, SubmitOutcome},
    router::Route,
};
use sehat_shared::ArticleFilters;
use serde_json::json;

use super::{print_json, upload::read_file_part, Context};
use crate::cli::{ArticleCommands, ArticleFields};

/// Run one `articles` action.
pub async fn run(ctx: &Context, command: ArticleCommands) -> Result<()> {
    match command {
        ArticleCommands::List {
            status,
            category_id,
            search,
        } => {
            let filters = ArticleFilters {
                status: status.map(Into::into),
                category_id,
                search: None,
            }
            .with_search(search.as_deref().unwrap_or_default());
            print_json(&ctx.api.articles().get_all(&filters).await?)
        },
        ArticleCommands::Get {
            id,
        } => print_json(&ctx.api.articles().get_one(id).await?),
        ArticleCommands::Create {
            fields,
        } => {
            ctx.require(Route::AdminArticleNew)?;
            save(ctx, FormMode::Create, fields).await
        },
        ArticleCommands::Update {
            id,
            fields,
        } => {
            ctx.require(Route::AdminArticleEdit {
                id,
            })?;
            save(ctx, FormMode::Edit(id), fields).await
        },
        ArticleCommands::Delete {
            id,
        } => {
            ctx.require(Route::AdminArticles)?;
            ctx.api.articles().delete(id).await?;
            tracing::info!("deleted article {id}");
            print_json(&json!({ "deleted": id }))
        },
    }
}

/// Fill the article editor from flags and submit it.
async fn save(ctx: &Context, mode: FormMode, fields: ArticleFields) -> Result<()> {
    let ArticleFields {
        title,
        content,
        content_file,
        category_id,
        read_time,
        image,
        remove_image,
        publish,
    } = fields;
    let content = match (content, content_file) {
        (Some(content), _) => Some(content),
        (None, Some(path)) => Some(
            fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?,
        ),
        (None, None) => None,
    };

    let form = ArticleFormController::new(ctx.api.clone(), ctx.config.clone(), mode);
    form.load().await.context("failed to open the article")?;
    form.edit(|draft| {
        if let Some(title) = title {
            draft.title = title;
        }
        if let Some(content) = content {
            draft.content = content;
        }
        if let Some(category_id) = category_id {
            draft.category_id = category_id;
        }
        if let Some(read_time) = read_time {
            draft.read_time = read_time;
        }
    });

    if remove_image {
        form.remove_image();
    }
    if let Some(path) = image {
        form.select_image(read_file_part(&path)?);
        let mut state = form.subscribe();
        let settled = state
            .wait_for(|state| !state.uploading)
            .await
            .context("editor closed during upload")?
            .clone();
        if settled.draft.image.is_none() {
            bail!(settled.error.unwrap_or_else(|| "Upload failed".to_string()));
        }
    }

    let outcome = if publish {
        form.publish().await?
    } else {
        form.save_draft().await?
    };
    match outcome {
        SubmitOutcome::Saved(article) => print_json(&article),
        SubmitOutcome::Ignored => bail!("the editor is still busy"),
    }
}
