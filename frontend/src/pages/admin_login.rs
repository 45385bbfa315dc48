//! Admin sign-in (`/admin/login`).

use tokio::sync::watch;

use crate::{
    api::Api,
    error::{ApiError, ApiResult},
    router::Route,
};

const BAD_CREDENTIALS: &str = "Username atau password salah";

/// Login form state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginState {
    /// Username field.
    pub username: String,
    /// Password field.
    pub password: String,
    /// Password shown in clear text.
    pub show_password: bool,
    /// A login request is in flight.
    pub loading: bool,
    /// Message shown above the form.
    pub error: Option<String>,
}

/// Controller behind `/admin/login`.
pub struct LoginController {
    api: Api,
    state: watch::Sender<LoginState>,
}

impl LoginController {
    /// Empty form.
    pub fn new(api: Api) -> Self {
        let (state, _) = watch::channel(LoginState::default());
        Self {
            api,
            state,
        }
    }

    /// State updates for the view.
    pub fn subscribe(&self) -> watch::Receiver<LoginState> {
        self.state.subscribe()
    }

    /// Current state.
    pub fn state(&self) -> LoginState {
        self.state.borrow().clone()
    }

    /// Username edit.
    pub fn set_username(&self, username: impl Into<String>) {
        let username = username.into();
        self.state.send_modify(|state| state.username = username);
    }

    /// Password edit.
    pub fn set_password(&self, password: impl Into<String>) {
        let password = password.into();
        self.state.send_modify(|state| state.password = password);
    }

    /// Show or mask the password.
    pub fn toggle_password_visibility(&self) {
        self.state
            .send_modify(|state| state.show_password = !state.show_password);
    }

    /// Exchange the credentials for a token, store it and open the dashboard.
    pub async fn submit(&self) -> ApiResult<()> {
        let (username, password) = {
            let state = self.state.borrow();
            (state.username.trim().to_string(), state.password.clone())
        };
        if username.is_empty() || password.is_empty() {
            let err = ApiError::ValidationFailed("Username dan password wajib diisi".to_string());
            self.state.send_modify(|state| state.error = Some(err.to_string()));
            return Err(err);
        }

        self.state.send_modify(|state| {
            state.loading = true;
            state.error = None;
        });

        let result = self.sign_in(&username, &password).await;
        self.state.send_modify(|state| {
            state.loading = false;
            if let Err(err) = &result {
                state.error = Some(match err {
                    ApiError::Unauthorized => BAD_CREDENTIALS.to_string(),
                    other => other.to_string(),
                });
            }
        });
        result
    }

    async fn sign_in(&self, username: &str, password: &str) -> ApiResult<()> {
        let response = self.api.auth().login(username, password).await?;
        self.api.http().session().begin(&response.access_token)?;
        tracing::info!("signed in as {username}");
        self.api.http().navigator().navigate(Route::AdminDashboard);
        Ok(())
    }
}
