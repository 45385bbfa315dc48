//! Admin sidebar: menu entries and sign-out.

use crate::{
    error::ApiResult,
    router::{Navigator, Route},
    session::SessionStore,
};

/// Entry in the admin sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    /// Text shown in the menu.
    pub label: &'static str,
    /// Destination.
    pub route: Route,
}

/// Sidebar entries, top to bottom.
pub fn admin_menu() -> Vec<MenuItem> {
    vec![
        MenuItem {
            label: "Dashboard",
            route: Route::AdminDashboard,
        },
        MenuItem {
            label: "Artikel",
            route: Route::AdminArticles,
        },
        MenuItem {
            label: "Kategori",
            route: Route::AdminCategories,
        },
    ]
}

impl MenuItem {
    /// Highlighted only on an exact path match, so the article editor does
    /// not light up "Artikel".
    pub fn is_active(&self, current: &Route) -> bool {
        self.route == *current
    }
}

/// Sign out: forget the session and show the login page.
pub fn logout(session: &dyn SessionStore, navigator: &dyn Navigator) -> ApiResult<()> {
    let cleared = session.end();
    navigator.navigate(Route::AdminLogin);
    cleared
}
