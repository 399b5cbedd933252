//! Client routes and the authentication guard.

use serde::{Deserialize, Serialize};

pub const LOGIN_PATH: &str = "/login";
pub const OVERVIEW_PATH: &str = "/dashboard/overview";
pub const ENTRIES_PATH: &str = "/dashboard/entries";

/// Dashboard tab, mirrored in the address bar as `/dashboard/{tab}`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DashboardTab {
    #[default]
    Overview,
    Entries,
}

impl DashboardTab {
    /// Resync from the address bar: anything but the entries path is overview
    pub fn from_path(path: &str) -> Self {
        if path.contains(ENTRIES_PATH) {
            Self::Entries
        } else {
            Self::Overview
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Self::Overview => OVERVIEW_PATH,
            Self::Entries => ENTRIES_PATH,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Entries => "Crowd Entries",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Root,
    Dashboard(DashboardTab),
}

impl Route {
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Some(Self::Root),
            LOGIN_PATH => Some(Self::Login),
            p if p == "/dashboard" || p.starts_with("/dashboard/") => {
                Some(Self::Dashboard(DashboardTab::from_path(p)))
            }
            _ => None,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Self::Login => LOGIN_PATH,
            Self::Root => "/",
            Self::Dashboard(tab) => tab.path(),
        }
    }

    pub fn is_protected(&self) -> bool {
        !matches!(self, Self::Login)
    }
}

/// Where a navigation actually lands given the session state
pub fn resolve(route: Route, authenticated: bool) -> Route {
    match route {
        r if r.is_protected() && !authenticated => Route::Login,
        Route::Root => Route::Dashboard(DashboardTab::Overview),
        r => r,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_from_path() {
        assert_eq!(DashboardTab::from_path("/dashboard/entries"), DashboardTab::Entries);
        assert_eq!(DashboardTab::from_path("/dashboard/overview"), DashboardTab::Overview);
        assert_eq!(DashboardTab::from_path("/dashboard/whatever"), DashboardTab::Overview);
    }

    #[test]
    fn test_route_parsing() {
        assert_eq!(Route::from_path("/"), Some(Route::Root));
        assert_eq!(Route::from_path("/login"), Some(Route::Login));
        assert_eq!(
            Route::from_path("/dashboard/entries?page=2"),
            Some(Route::Dashboard(DashboardTab::Entries))
        );
        assert_eq!(Route::from_path("/nowhere"), None);
    }

    #[test]
    fn test_protected_routes_redirect_when_logged_out() {
        for route in [Route::Root, Route::Dashboard(DashboardTab::Entries)] {
            assert_eq!(resolve(route, false), Route::Login);
        }
        assert_eq!(resolve(Route::Login, false), Route::Login);
    }

    #[test]
    fn test_authenticated_root_goes_to_overview() {
        assert_eq!(resolve(Route::Root, true), Route::Dashboard(DashboardTab::Overview));
        assert_eq!(
            resolve(Route::Dashboard(DashboardTab::Entries), true),
            Route::Dashboard(DashboardTab::Entries)
        );
    }
}
