//! Route and first-run guards - decide whether a requested view renders
//!
//! Both guards are re-evaluated on every navigation against the current
//! auth state; neither caches a decision.

use serde::Serialize;

use crate::domain::{IdentityStore, Session};

use super::auth::AuthService;

/// Views of the console
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Route {
    Landing,
    Login,
    Register,
    Dashboard,
    ConfigurationItems,
    Reports,
    Categories,
    Settings,
    NotFound,
}

impl Route {
    pub const PROTECTED: &'static [Route] = &[
        Route::Dashboard,
        Route::ConfigurationItems,
        Route::Reports,
        Route::Categories,
        Route::Settings,
    ];

    /// Resolve a location to a view, ignoring query, fragment and a trailing slash
    pub fn from_path(location: &str) -> Self {
        let path = location
            .split(['?', '#'])
            .next()
            .unwrap_or_default();
        let path = if path.len() > 1 {
            path.trim_end_matches('/')
        } else {
            path
        };

        match path {
            "/" | "" => Route::Landing,
            "/login" => Route::Login,
            "/register" => Route::Register,
            "/dashboard" => Route::Dashboard,
            "/configuration-items" => Route::ConfigurationItems,
            "/reports" => Route::Reports,
            "/categories" => Route::Categories,
            "/settings" => Route::Settings,
            _ => Route::NotFound,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Landing => "/",
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Dashboard => "/dashboard",
            Route::ConfigurationItems => "/configuration-items",
            Route::Reports => "/reports",
            Route::Categories => "/categories",
            Route::Settings => "/settings",
            Route::NotFound => "*",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Landing => "Welcome",
            Route::Login => "Login",
            Route::Register => "Register",
            Route::Dashboard => "Dashboard",
            Route::ConfigurationItems => "Configuration Items",
            Route::Reports => "Reports",
            Route::Categories => "Categories",
            Route::Settings => "Settings",
            Route::NotFound => "Not Found",
        }
    }

    pub fn is_protected(&self) -> bool {
        Self::PROTECTED.contains(self)
    }
}

/// Outcome of a navigation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Navigation {
    /// The requested view renders
    Allow { route: Route },
    /// The request is replaced by `to`; `from` carries the original
    /// location for a redirect back after login
    Redirect { to: Route, from: Option<String> },
}

impl Navigation {
    /// The view that ends up rendering
    pub fn rendered(&self) -> Route {
        match self {
            Navigation::Allow { route } => *route,
            Navigation::Redirect { to, .. } => *to,
        }
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, Navigation::Redirect { .. })
    }
}

/// Sends signed-out visitors to the login view
pub struct RouteGuard;

impl RouteGuard {
    pub fn check(session: &Session, location: &str) -> Navigation {
        if !session.is_logged_in() {
            return Navigation::Redirect {
                to: Route::Login,
                from: Some(location.to_string()),
            };
        }
        Navigation::Allow {
            route: Route::from_path(location),
        }
    }
}

/// Sends installations without any registered user to registration
pub struct FirstRunGuard;

impl FirstRunGuard {
    pub fn check(identity: &IdentityStore, location: &str) -> Navigation {
        if identity.is_empty() {
            return Navigation::Redirect {
                to: Route::Register,
                from: None,
            };
        }
        Navigation::Allow {
            route: Route::from_path(location),
        }
    }
}

/// Resolve a navigation the way the console router nests its guards
///
/// Public views and unknown paths render unguarded. Protected views pass
/// the route guard first and the first-run guard second.
pub fn navigate(auth: &AuthService, location: &str) -> Navigation {
    let route = Route::from_path(location);
    if !route.is_protected() {
        return Navigation::Allow { route };
    }

    let decision = RouteGuard::check(auth.session(), location);
    if decision.is_redirect() {
        return decision;
    }
    FirstRunGuard::check(auth.users(), location)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Role, User};

    #[test]
    fn test_route_parsing() {
        assert_eq!(Route::from_path("/"), Route::Landing);
        assert_eq!(Route::from_path("/settings/"), Route::Settings);
        assert_eq!(Route::from_path("/reports?range=30d"), Route::Reports);
        assert_eq!(Route::from_path("/categories#top"), Route::Categories);
        assert_eq!(Route::from_path("/nope"), Route::NotFound);
        assert_eq!(Route::from_path("/Settings"), Route::NotFound);

        for route in Route::PROTECTED {
            assert_eq!(Route::from_path(route.path()), *route);
        }
    }

    #[test]
    fn test_route_guard_carries_requested_location() {
        let nav = RouteGuard::check(&Session::logged_out(), "/reports?range=30d");
        assert_eq!(
            nav,
            Navigation::Redirect {
                to: Route::Login,
                from: Some("/reports?range=30d".to_string()),
            }
        );
    }

    #[test]
    fn test_route_guard_allows_session() {
        let nav = RouteGuard::check(&Session::logged_in("a@x.com"), "/dashboard");
        assert_eq!(nav, Navigation::Allow { route: Route::Dashboard });
    }

    #[test]
    fn test_first_run_guard_redirects_every_protected_path() {
        let empty = IdentityStore::new();
        for route in Route::PROTECTED {
            let nav = FirstRunGuard::check(&empty, route.path());
            assert_eq!(nav, Navigation::Redirect { to: Route::Register, from: None });
        }
    }

    #[test]
    fn test_first_run_guard_allows_with_users() {
        let identity = IdentityStore::from_users(vec![User::new("a@x.com", Role::Admin)]);
        let nav = FirstRunGuard::check(&identity, "/settings");
        assert_eq!(nav.rendered(), Route::Settings);
    }

    #[test]
    fn test_navigation_serializes_with_outcome_tag() {
        let nav = Navigation::Redirect { to: Route::Login, from: Some("/reports".into()) };
        let value = serde_json::to_value(&nav).unwrap();
        assert_eq!(value["outcome"], "redirect");
        assert_eq!(value["to"], "login");
        assert_eq!(value["from"], "/reports");
    }
}
