//! Session commands: sign in, sign out, register and status.

use anyhow::{Context as _, Result};
use sehat_frontend::{components::sidebar, pages::admin_login::LoginController, session::SessionStore};
use serde::Serialize;
use serde_json::json;

use super::{print_json, Context};

#[derive(Serialize)]
struct Status {
    api_url: String,
    session_file: String,
    authenticated: bool,
    has_token: bool,
}

/// Sign in through the login page controller and persist the token.
pub async fn login(ctx: &Context, username: String, password: String) -> Result<()> {
    let login = LoginController::new(ctx.api.clone());
    login.set_username(username);
    login.set_password(password);
    login.submit().await.map_err(|err| {
        let message = login.state().error.unwrap_or_else(|| err.to_string());
        anyhow::anyhow!(message)
    })?;
    tracing::info!("session saved to {}", ctx.session.path().display());
    Ok(())
}

/// End the stored session.
pub fn logout(ctx: &Context) -> Result<()> {
    sidebar::logout(ctx.session.as_ref(), ctx.navigator.as_ref())
        .context("failed to clear the session file")?;
    tracing::info!("signed out");
    Ok(())
}

/// Create an admin account.
pub async fn register(ctx: &Context, username: &str, password: &str) -> Result<()> {
    let created = ctx.api.auth().register(username, password).await?;
    print_json(&created.unwrap_or_else(|| json!({ "username": username })))
}

/// Print the stored session state.
pub fn status(ctx: &Context) -> Result<()> {
    print_json(&Status {
        api_url: ctx.config.api_url.clone(),
        session_file: ctx.session.path().display().to_string(),
        authenticated: ctx.session.is_authenticated(),
        has_token: ctx.session.token().is_some(),
    })
}
