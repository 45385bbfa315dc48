//! Client configuration.

use std::time::Duration;

/// API origin baked in at compile time; override with `SEHAT_API_URL`.
pub const API_URL: &str = match option_env!("SEHAT_API_URL") {
    Some(url) => url,
    None => "http://localhost:3000",
};

/// Quiet period after the last keystroke before a search fetch fires.
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Interval between automatic carousel advances.
pub const DEFAULT_AUTOPLAY_INTERVAL: Duration = Duration::from_millis(5000);

/// Minimum `|offset| * velocity` for a drag release to count as a swipe.
pub const DEFAULT_SWIPE_THRESHOLD: f64 = 10_000.0;

/// Runtime knobs shared by the HTTP layer and the controllers.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Origin of the API server, without the `/api` suffix.
    pub api_url: String,
    /// Quiet period before a search request.
    pub search_debounce: Duration,
    /// Autoplay period of the testimonial carousel.
    pub autoplay_interval: Duration,
    /// Swipe power needed to page a carousel.
    pub swipe_threshold: f64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: API_URL.to_string(),
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
            autoplay_interval: DEFAULT_AUTOPLAY_INTERVAL,
            swipe_threshold: DEFAULT_SWIPE_THRESHOLD,
        }
    }
}

impl ClientConfig {
    /// Defaults with the `SEHAT_*` environment overrides applied.
    ///
    /// Unparseable numbers are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(url) = lookup("SEHAT_API_URL").filter(|value| !value.trim().is_empty()) {
            config.api_url = url.trim().to_string();
        }
        if let Some(ms) = millis_var(&lookup, "SEHAT_SEARCH_DEBOUNCE_MS") {
            config.search_debounce = ms;
        }
        if let Some(ms) = millis_var(&lookup, "SEHAT_AUTOPLAY_INTERVAL_MS") {
            config.autoplay_interval = ms;
        }
        config
    }

    /// Replace the API origin.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Base of every REST call, e.g. `http://localhost:3000/api`.
    pub fn api_base(&self) -> String {
        format!("{}/api", self.api_url.trim_end_matches('/'))
    }

    /// Resolve an image reference returned by the API.
    ///
    /// Absolute URLs pass through; server-relative paths such as
    /// `/uploads/a.png` are prefixed with the API origin.
    pub fn asset_url(&self, path: &str) -> String {
        if path.starts_with("http") {
            path.to_string()
        } else {
            format!("{}{}", self.api_url.trim_end_matches('/'), path)
        }
    }
}

fn millis_var(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<Duration> {
    let raw = lookup(key)?;
    match raw.trim().parse::<u64>() {
        Ok(ms) if ms > 0 => Some(Duration::from_millis(ms)),
        _ => {
            tracing::warn!("ignoring {key}={raw:?}: expected a positive number of milliseconds");
            None
        },
    }
}
