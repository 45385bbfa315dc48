//! `dashboard` command.

use anyhow::Result;
use sehat_frontend::{pages::admin_dashboard::DashboardController, router::Route, utils};
use serde::Serialize;

use super::{print_json, Context};

#[derive(Serialize)]
struct Card {
    label: &'static str,
    value: u64,
}

#[derive(Serialize)]
struct Recent {
    id: i64,
    title: String,
    category: String,
    status: String,
    views: u64,
    created: String,
}

#[derive(Serialize)]
struct Dashboard {
    stats: Vec<Card>,
    recent: Vec<Recent>,
}

/// Print the stat cards and the recent articles.
pub async fn run(ctx: &Context) -> Result<()> {
    ctx.require(Route::AdminDashboard)?;

    let dashboard = DashboardController::new(ctx.api.clone());
    dashboard.load().await;
    let state = dashboard.state();

    print_json(&Dashboard {
        stats: state
            .cards()
            .into_iter()
            .map(|card| Card {
                label: card.label,
                value: card.value,
            })
            .collect(),
        recent: state
            .recent
            .iter()
            .map(|article| Recent {
                id: article.id,
                title: article.title.clone(),
                category: article.category_name().to_string(),
                status: article.status.to_string(),
                views: article.views,
                created: utils::format_date(&article.created_at),
            })
            .collect(),
    })
}
