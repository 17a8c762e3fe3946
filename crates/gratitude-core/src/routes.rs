//! Navigation targets of the view layer.
//!
//! The library never navigates by itself: operations that end a session or
//! finish a sign-in return a `Route`, and the front end decides how to show it.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Landing page with the new-entry form
    Home,
    /// List of all entries
    Entries,
    /// Sign-in page
    Login,
    /// One entry per calendar date
    Dashboard,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Entries => "/home",
            Route::Login => "/login",
            Route::Dashboard => "/dashboard",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        match path {
            "/" => Some(Route::Home),
            "/home" => Some(Route::Entries),
            "/login" => Some(Route::Login),
            "/dashboard" => Some(Route::Dashboard),
            _ => None,
        }
    }

    /// Whether the view needs a signed-in session
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Route::Login)
    }

    /// Where a visit to this route actually lands given the sign-in state.
    ///
    /// Protected views bounce to the login page without a token, and the
    /// login page forwards to home once a token exists.
    pub fn resolve(self, authenticated: bool) -> Route {
        match (self, authenticated) {
            (Route::Login, true) => Route::Home,
            (route, false) if route.requires_auth() => Route::Login,
            (route, _) => route,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
