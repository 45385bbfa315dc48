//! Client routes, the navigation seam and the admin route guard.

use std::{fmt, sync::Arc};

use parking_lot::Mutex;
use yew_router::Routable;

use crate::session::SessionStore;

/// Client-facing routes.
#[derive(Routable, Clone, Debug, PartialEq, Eq)]
pub enum Route {
    /// Landing page.
    #[at("/")]
    Home,
    /// Public article page.
    #[at("/article/:id")]
    Article {
        /// Article id.
        id: i64,
    },
    /// Admin sign-in.
    #[at("/admin/login")]
    AdminLogin,
    /// Admin dashboard.
    #[at("/admin")]
    AdminDashboard,
    /// Category management.
    #[at("/admin/categories")]
    AdminCategories,
    /// Article list.
    #[at("/admin/articles")]
    AdminArticles,
    /// Article editor, create mode.
    #[at("/admin/articles/new")]
    AdminArticleNew,
    /// Article editor, edit mode.
    #[at("/admin/articles/:id")]
    AdminArticleEdit {
        /// Article id.
        id: i64,
    },
    /// Anything unrecognised.
    #[not_found]
    #[at("/404")]
    NotFound,
}

impl Route {
    /// Match a path (query string and trailing slash ignored).
    pub fn recognize(path: &str) -> Route {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        let path = if trimmed.is_empty() { "/" } else { trimmed };
        <Route as Routable>::recognize(path).unwrap_or(Route::NotFound)
    }

    /// Canonical path for this route.
    pub fn path(&self) -> String {
        self.to_path()
    }

    /// Admin views other than the login page require a session.
    pub fn is_protected(&self) -> bool {
        matches!(
            self,
            Route::AdminDashboard
                | Route::AdminCategories
                | Route::AdminArticles
                | Route::AdminArticleNew
                | Route::AdminArticleEdit { .. }
        )
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_path())
    }
}

/// Performs full navigations requested by the client layer (login redirect
/// on session expiry, post-save redirects).
pub trait Navigator: Send + Sync {
    /// Leave the current view for `route`.
    fn navigate(&self, route: Route);
}

/// Navigator that records visited routes in memory.
#[derive(Debug)]
pub struct HistoryNavigator {
    history: Mutex<Vec<Route>>,
}

impl HistoryNavigator {
    /// History starting at `initial`.
    pub fn new(initial: Route) -> Self {
        Self {
            history: Mutex::new(vec![initial]),
        }
    }

    /// Route currently displayed.
    pub fn current(&self) -> Route {
        self.history.lock().last().cloned().unwrap_or(Route::Home)
    }

    /// Every route visited, oldest first.
    pub fn history(&self) -> Vec<Route> {
        self.history.lock().clone()
    }
}

impl Default for HistoryNavigator {
    fn default() -> Self {
        Self::new(Route::Home)
    }
}

impl Navigator for HistoryNavigator {
    fn navigate(&self, route: Route) {
        tracing::debug!("navigate -> {route}");
        self.history.lock().push(route);
    }
}

/// Decides whether a route may render, from the stored session flag only.
///
/// This keeps anonymous visitors out of the admin views by accident, nothing
/// more: the flag is never checked against the server, which authorises each
/// call on its own.
#[derive(Clone)]
pub struct RouteGuard {
    session: Arc<dyn SessionStore>,
}

impl RouteGuard {
    /// Guard reading `session`.
    pub fn new(session: Arc<dyn SessionStore>) -> Self {
        Self {
            session,
        }
    }

    /// Public routes always render; protected ones need the flag.
    pub fn can_render(&self, route: &Route) -> bool {
        !route.is_protected() || self.session.is_authenticated()
    }

    /// Route to actually render: `route` itself, or the login page.
    pub fn resolve(&self, route: Route) -> Route {
        if self.can_render(&route) {
            route
        } else {
            tracing::debug!("guard redirected {route} to login");
            Route::AdminLogin
        }
    }

    /// Resolve `route` and hand it to `navigator`.
    pub fn navigate(&self, navigator: &dyn Navigator, route: Route) -> Route {
        let target = self.resolve(route);
        navigator.navigate(target.clone());
        target
    }
}
