//! `categories` subcommands.

use anyhow::{bail, Result};
use sehat_frontend::{pages::admin_categories::CategoriesPage, router::Route};
use serde_json::json;

use super::{print_json, Context};
use crate::cli::CategoryCommands;

/// Run one `categories` action.
pub async fn run(ctx: &Context, command: CategoryCommands) -> Result<()> {
    match command {
        CategoryCommands::List => {
            let categories = ctx.api.categories().get_all().await?;
            print_json(&categories)
        },
        CategoryCommands::Get {
            id,
        } => print_json(&ctx.api.categories().get_one(id).await?),
        CategoryCommands::Create {
            name,
            slug,
        } => {
            ctx.require(Route::AdminCategories)?;
            let page = CategoriesPage::new(ctx.api.clone());
            page.open_create();
            save(&page, name, slug).await
        },
        CategoryCommands::Update {
            id,
            name,
            slug,
        } => {
            ctx.require(Route::AdminCategories)?;
            let existing = ctx.api.categories().get_one(id).await?;
            let page = CategoriesPage::new(ctx.api.clone());
            page.open_edit(&existing);
            save(&page, name, slug).await
        },
        CategoryCommands::Delete {
            id,
        } => {
            ctx.require(Route::AdminCategories)?;
            let page = CategoriesPage::new(ctx.api.clone());
            page.delete(id).await?;
            tracing::info!("deleted category {id}");
            print_json(&json!({ "deleted": id }))
        },
    }
}

async fn save(page: &CategoriesPage, name: String, slug: Option<String>) -> Result<()> {
    page.set_name(name);
    if let Some(slug) = slug {
        page.set_slug(slug);
    }
    match page.submit().await? {
        Some(category) => print_json(&category),
        None => bail!("category form was not open"),
    }
}
