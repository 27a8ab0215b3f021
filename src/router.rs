//! Route table and the pure decisions hanging off it
//!
//! Paths: `/`, `/about`, `/products`, `/product/:id`, `/login`. Which view a
//! route shows also depends on whether the user is signed in: the login route
//! shows the home view to an authenticated user.

use crate::session::AuthState;
use std::fmt;

pub const HOME_PATH: &str = "/";
pub const LOGIN_PATH: &str = "/login";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    About,
    Products,
    /// `/product/:id`; `id` is `None` when the segment is absent or empty
    ProductDetail { id: Option<String> },
    Login,
    Unknown(String),
}

impl Route {
    /// Parse a path, ignoring any query string, fragment and trailing slash
    pub fn parse(path: &str) -> Self {
        let path = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim();
        let trimmed = path.trim_matches('/');

        let mut segments = trimmed.split('/');
        match (segments.next(), segments.next(), segments.next()) {
            (Some(""), None, None) => Route::Home,
            (Some("about"), None, None) => Route::About,
            (Some("products"), None, None) => Route::Products,
            (Some("product"), id, None) => Route::ProductDetail {
                id: id.filter(|id| !id.is_empty()).map(str::to_string),
            },
            (Some("login"), None, None) => Route::Login,
            _ => Route::Unknown(format!("/{}", trimmed)),
        }
    }

    /// Canonical path for this route
    pub fn path(&self) -> String {
        match self {
            Route::Home => HOME_PATH.to_string(),
            Route::About => "/about".to_string(),
            Route::Products => "/products".to_string(),
            Route::ProductDetail { id: Some(id) } => format!("/product/{}", id),
            Route::ProductDetail { id: None } => "/product".to_string(),
            Route::Login => LOGIN_PATH.to_string(),
            Route::Unknown(path) => path.clone(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// The top-level view rendered for a route
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Home,
    About,
    Products,
    ProductDetail { id: Option<String> },
    Login,
    /// Nothing is mapped to the path
    Blank { path: String },
}

/// Navbar is shown everywhere except the authentication route
pub fn navbar_visible(route: &Route) -> bool {
    !matches!(route, Route::Login)
}

/// View for `route`; signed-in users never see the login view
pub fn resolve_view(route: &Route, auth: AuthState) -> View {
    match (route, auth) {
        (Route::Home, _) => View::Home,
        (Route::About, _) => View::About,
        (Route::Products, _) => View::Products,
        (Route::ProductDetail { id }, _) => View::ProductDetail { id: id.clone() },
        (Route::Login, AuthState::LoggedIn) => View::Home,
        (Route::Login, AuthState::LoggedOut) => View::Login,
        (Route::Unknown(path), _) => View::Blank { path: path.clone() },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_paths() {
        assert_eq!(Route::parse("/"), Route::Home);
        assert_eq!(Route::parse(""), Route::Home);
        assert_eq!(Route::parse("/about"), Route::About);
        assert_eq!(Route::parse("/products/"), Route::Products);
        assert_eq!(Route::parse("/login?next=/products"), Route::Login);
        assert_eq!(
            Route::parse("/product/42"),
            Route::ProductDetail {
                id: Some("42".to_string())
            }
        );
    }

    #[test]
    fn test_parse_product_without_id() {
        assert_eq!(Route::parse("/product"), Route::ProductDetail { id: None });
        assert_eq!(Route::parse("/product/"), Route::ProductDetail { id: None });
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            Route::parse("/product/1/reviews"),
            Route::Unknown("/product/1/reviews".to_string())
        );
        assert_eq!(Route::parse("cart"), Route::Unknown("/cart".to_string()));
    }

    #[test]
    fn test_path_round_trip() {
        for path in ["/", "/about", "/products", "/product/7", "/login"] {
            assert_eq!(Route::parse(path).path(), path);
        }
    }

    #[test]
    fn test_navbar_hidden_only_on_login() {
        assert!(!navbar_visible(&Route::Login));
        assert!(navbar_visible(&Route::Home));
        assert!(navbar_visible(&Route::ProductDetail { id: None }));
        assert!(navbar_visible(&Route::Unknown("/x".to_string())));
    }

    #[test]
    fn test_login_route_redirects_when_signed_in() {
        assert_eq!(resolve_view(&Route::Login, AuthState::LoggedOut), View::Login);
        assert_eq!(resolve_view(&Route::Login, AuthState::LoggedIn), View::Home);
        assert_eq!(
            resolve_view(&Route::Products, AuthState::LoggedOut),
            View::Products
        );
    }
}
