//! Route table for the client's views.
//!
//! Paths mirror the hosted web frontend so deep links (`--route /about`)
//! and the footer targets stay in sync with it. Every unknown path lands on
//! the not-found view rather than an error.

/// The navigable views of the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Mailbox dashboard with the inbox and the switcher.
    Home,
    PrivacyPolicy,
    Terms,
    About,
    /// Catch-all for unrecognized paths; keeps the requested path for display.
    NotFound(String),
}

impl Route {
    /// Resolves a path to a route. A single trailing slash is ignored,
    /// anything unmatched becomes `NotFound`.
    pub fn from_path(path: &str) -> Self {
        let normalized = if path.len() > 1 {
            path.strip_suffix('/').unwrap_or(path)
        } else {
            path
        };
        match normalized {
            "/" => Route::Home,
            "/privacy-policy" => Route::PrivacyPolicy,
            "/terms" => Route::Terms,
            "/about" => Route::About,
            _ => Route::NotFound(path.to_string()),
        }
    }

    /// The canonical path of the route.
    pub fn path(&self) -> &str {
        match self {
            Route::Home => "/",
            Route::PrivacyPolicy => "/privacy-policy",
            Route::Terms => "/terms",
            Route::About => "/about",
            Route::NotFound(path) => path,
        }
    }

    /// Routes reachable from the footer and the number keys, in order.
    pub fn navigable() -> [Route; 4] {
        [Route::Home, Route::PrivacyPolicy, Route::Terms, Route::About]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_paths_resolve() {
        assert_eq!(Route::from_path("/"), Route::Home);
        assert_eq!(Route::from_path("/privacy-policy"), Route::PrivacyPolicy);
        assert_eq!(Route::from_path("/terms"), Route::Terms);
        assert_eq!(Route::from_path("/about"), Route::About);
    }

    #[test]
    fn trailing_slash_is_ignored() {
        assert_eq!(Route::from_path("/about/"), Route::About);
        assert_eq!(Route::from_path("/"), Route::Home);
    }

    #[test]
    /// Unknown paths fall through to the not-found view.
    fn unknown_path_is_not_found() {
        let route = Route::from_path("/does-not-exist");
        assert_eq!(route, Route::NotFound("/does-not-exist".to_string()));
    }

    #[test]
    fn path_round_trips() {
        for route in Route::navigable() {
            assert_eq!(Route::from_path(route.path()), route);
        }
    }

    #[test]
    fn not_found_keeps_requested_path() {
        let route = Route::from_path("/mailbox/old");
        assert_eq!(route.path(), "/mailbox/old");
    }
}
