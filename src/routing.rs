//! Hash-route resolution and the summary guard.
//!
//! The configurator is addressed with hash routes (`#/configurator?...`).
//! This module turns a full URL, a fragment or a bare path into a [`Route`]
//! plus its query string, and applies the one navigation guard the app has:
//! the summary page needs a selected product, otherwise the user is sent back
//! to the configurator.

use tracing::{debug, warn};
use url::Url;

use crate::configurator::ConfiguratorState;
use crate::error::Result;

/// Title used when a route has none of its own
pub const DEFAULT_TITLE: &str = "FC Product Configurator";

/// Application routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Configurator,
    Summary,
    NotFound,
}

impl Route {
    /// Resolve a route path such as `/summary`
    pub fn resolve(path: &str) -> Self {
        match path.trim_end_matches('/') {
            "" => Self::Home,
            "/configurator" => Self::Configurator,
            "/summary" => Self::Summary,
            _ => Self::NotFound,
        }
    }

    pub const fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Configurator => "/configurator",
            Self::Summary => "/summary",
            Self::NotFound => "/404",
        }
    }

    /// Page title for this route
    pub const fn title(self) -> &'static str {
        match self {
            Self::Home => "FC Product Configurator - Home",
            Self::Configurator => "Design Your Product",
            Self::Summary => "Configuration Summary",
            Self::NotFound => "Page Not Found",
        }
    }
}

/// A route path with its optional query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub query: Option<String>,
}

impl Location {
    /// Parse a location.
    ///
    /// Accepts a full URL (`http://host/#/configurator?product=suit`), a
    /// fragment (`#/summary`), a bare path (`/configurator?product=suit`) or
    /// a bare query (`product=suit` or `?product=suit`), which addresses the
    /// configurator. For full URLs the hash route wins over the URL path when
    /// present.
    ///
    /// # Errors
    ///
    /// Returns a URL error if a full URL cannot be parsed.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.contains("://") {
            let url = Url::parse(input)?;
            return Ok(match url.fragment().filter(|f| !f.is_empty()) {
                Some(fragment) => Self::from_route(fragment),
                None => Self {
                    path: url.path().to_string(),
                    query: url.query().map(str::to_string),
                },
            });
        }
        if is_bare_query(input) {
            return Ok(Self {
                path: Route::Configurator.path().to_string(),
                query: Some(input.trim_start_matches('?').to_string()),
            });
        }
        Ok(Self::from_route(input.trim_start_matches('#')))
    }

    fn from_route(route: &str) -> Self {
        let (path, query) = match route.split_once('?') {
            Some((path, query)) => (path, Some(query.to_string())),
            None => (route, None),
        };
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };
        Self { path, query }
    }

    pub fn route(&self) -> Route {
        Route::resolve(&self.path)
    }
}

/// A query string with no route in front of it
fn is_bare_query(input: &str) -> bool {
    if input.starts_with('?') {
        return true;
    }
    if input.starts_with('#') || input.starts_with('/') {
        return false;
    }
    input
        .split('?')
        .next()
        .is_some_and(|head| head.contains('='))
}

/// Outcome of a navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    /// Where the user ends up
    pub route: Route,
    /// Query string carried by the requested location
    pub query: Option<String>,
    /// Set when a guard sent the user somewhere else
    pub redirected_from: Option<Route>,
}

impl Navigation {
    pub fn title(&self) -> &'static str {
        self.route.title()
    }
}

/// Navigate to a location, applying the summary guard.
///
/// # Errors
///
/// Returns a URL error if `input` is a malformed full URL.
pub fn navigate(input: &str, state: &ConfiguratorState) -> Result<Navigation> {
    let location = Location::parse(input)?;
    let requested = location.route();
    debug!("Navigating to {:?} ({})", requested, location.path);

    if requested == Route::NotFound {
        warn!("Route not found: {}", location.path);
    }

    if requested == Route::Summary && state.selected_product().is_none() {
        warn!("Attempted to access summary without selecting a product");
        return Ok(Navigation {
            route: Route::Configurator,
            query: None,
            redirected_from: Some(Route::Summary),
        });
    }

    Ok(Navigation {
        route: requested,
        query: location.query,
        redirected_from: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    #[test]
    fn test_resolve_routes() {
        assert_eq!(Route::resolve("/"), Route::Home);
        assert_eq!(Route::resolve(""), Route::Home);
        assert_eq!(Route::resolve("/configurator"), Route::Configurator);
        assert_eq!(Route::resolve("/summary/"), Route::Summary);
        assert_eq!(Route::resolve("/checkout"), Route::NotFound);
    }

    #[test]
    fn test_titles() {
        assert_eq!(Route::Configurator.title(), "Design Your Product");
        assert_eq!(Route::NotFound.title(), "Page Not Found");
    }

    #[test]
    fn test_parse_full_url_with_hash_route() {
        let location =
            Location::parse("http://localhost:8080/app/#/configurator?product=suit&color=grey")
                .unwrap();
        assert_eq!(location.path, "/configurator");
        assert_eq!(location.query.as_deref(), Some("product=suit&color=grey"));
    }

    #[test]
    fn test_parse_full_url_without_fragment() {
        let location = Location::parse("https://shop.example/summary?x=1").unwrap();
        assert_eq!(location.route(), Route::Summary);
        assert_eq!(location.query.as_deref(), Some("x=1"));
    }

    #[test]
    fn test_parse_fragment_and_bare_path() {
        assert_eq!(Location::parse("#/summary").unwrap().route(), Route::Summary);
        let location = Location::parse("configurator?product=shoes").unwrap();
        assert_eq!(location.path, "/configurator");
        assert_eq!(location.query.as_deref(), Some("product=shoes"));
    }

    #[test]
    fn test_parse_bare_query_addresses_configurator() {
        let location = Location::parse("product=suit&color=grey").unwrap();
        assert_eq!(location.route(), Route::Configurator);
        assert_eq!(location.query.as_deref(), Some("product=suit&color=grey"));

        let location = Location::parse("?product=suit").unwrap();
        assert_eq!(location.route(), Route::Configurator);
        assert_eq!(location.query.as_deref(), Some("product=suit"));

        assert_eq!(Location::parse("").unwrap().route(), Route::Home);
    }

    #[test]
    fn test_navigate_bare_query() {
        let state = ConfiguratorState::new();
        let nav = navigate("?product=suit&color=grey", &state).unwrap();
        assert_eq!(nav.route, Route::Configurator);
        assert_eq!(nav.query.as_deref(), Some("product=suit&color=grey"));
        assert!(nav.redirected_from.is_none());
    }

    #[test]
    fn test_parse_malformed_url() {
        assert!(Location::parse("http://[broken").is_err());
    }

    #[test]
    fn test_summary_guard_redirects_without_product() {
        let state = ConfiguratorState::new();
        let nav = navigate("#/summary", &state).unwrap();
        assert_eq!(nav.route, Route::Configurator);
        assert_eq!(nav.redirected_from, Some(Route::Summary));
        assert_eq!(nav.title(), "Design Your Product");
    }

    #[test]
    fn test_summary_guard_allows_with_product() {
        let mut state = ConfiguratorState::new();
        state.set_product(Some(Catalog::builtin().get_product_by_id("suit")));
        let nav = navigate("#/summary", &state).unwrap();
        assert_eq!(nav.route, Route::Summary);
        assert!(nav.redirected_from.is_none());
    }
}
