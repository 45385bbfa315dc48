//! Client-side data and session layer of the Keluarga Sehat site.
//!
//! Pages are plain controllers: each one owns its state, publishes it over a
//! [`tokio::sync::watch`] channel and talks to the REST API through
//! [`api::Api`]. A rendering surface (the admin CLI, a web view) observes the
//! channels and forwards user events back to the controllers.

pub mod api;
pub mod components;
pub mod config;
pub mod error;
pub mod http;
pub mod pages;
pub mod router;
pub mod search;
pub mod session;
pub mod testing;
pub mod timers;
pub mod utils;

pub use api::Api;
pub use config::ClientConfig;
pub use error::{ApiError, ApiResult};
