//! Command handlers.

pub mod articles;
pub mod auth;
pub mod categories;
pub mod dashboard;
pub mod upload;

use std::{path::Path, sync::Arc};

use anyhow::{bail, Result};
use sehat_frontend::{
    api::Api,
    config::ClientConfig,
    http::{HttpClient, ReqwestTransport},
    router::{Navigator, Route, RouteGuard},
    session::FileSessionStore,
};
use serde::Serialize;

use crate::cli::{Cli, Commands};

/// Navigator for a terminal: there is no view to switch, so redirects are
/// reported instead.
#[derive(Debug, Default)]
pub struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn navigate(&self, route: Route) {
        match route {
            Route::AdminLogin => {
                tracing::warn!("session ended; run `sehat-cli login` to sign in again")
            },
            other => tracing::debug!("navigate -> {other}"),
        }
    }
}

/// Everything a command needs.
pub struct Context {
    /// API over the file session.
    pub api: Api,
    /// Effective client configuration.
    pub config: ClientConfig,
    /// Session persisted between invocations.
    pub session: Arc<FileSessionStore>,
    /// Navigator the API reports session expiry to.
    pub navigator: Arc<TerminalNavigator>,
}

impl Context {
    /// Context for `session_file`; `api_url` overrides the configured origin.
    pub fn new(api_url: Option<String>, session_file: &Path) -> Self {
        let mut config = ClientConfig::from_env();
        if let Some(api_url) = api_url {
            config = config.with_api_url(api_url);
        }
        let session = Arc::new(FileSessionStore::new(session_file));
        let navigator = Arc::new(TerminalNavigator);
        let http = HttpClient::new(
            &config,
            Arc::new(ReqwestTransport::new()),
            session.clone(),
            navigator.clone(),
        );
        Self {
            api: Api::new(http),
            config,
            session,
            navigator,
        }
    }

    /// Refuse admin-only commands when no session is stored.
    pub fn require(&self, route: Route) -> Result<()> {
        let guard = RouteGuard::new(self.session.clone());
        if !guard.can_render(&route) {
            bail!("not signed in; run `sehat-cli login` first");
        }
        Ok(())
    }
}

/// Dispatch parsed arguments.
pub async fn run(cli: Cli) -> Result<()> {
    let ctx = Context::new(cli.api_url, &cli.session_file);
    tracing::debug!("using API at {}", ctx.config.api_base());

    match cli.command {
        Commands::Login {
            username,
            password,
        } => auth::login(&ctx, username, password).await,
        Commands::Logout => auth::logout(&ctx),
        Commands::Register {
            username,
            password,
        } => auth::register(&ctx, &username, &password).await,
        Commands::Status => auth::status(&ctx),
        Commands::Dashboard => dashboard::run(&ctx).await,
        Commands::Categories {
            command,
        } => categories::run(&ctx, command).await,
        Commands::Articles {
            command,
        } => articles::run(&ctx, command).await,
        Commands::Upload {
            file,
        } => upload::run(&ctx, &file).await,
    }
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
