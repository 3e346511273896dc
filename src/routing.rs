//! Page routes
//!
//! Paths follow the hash-router convention of the web client: `#/packages`
//! and `/packages` resolve to the same page.

use std::fmt::Display;

use serde::{Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Packages,
    PackageDetail(String),
    Payment,
    Tracking,
    Dashboard,
}

/// Entry of the site navigation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub href: String,
    pub label: &'static str,
}

impl Route {
    /// Resolve a path, `None` for paths no page is mounted at
    #[must_use]
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.strip_prefix('#').unwrap_or(path);
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_matches('/');
        let segments: Vec<&str> = if trimmed.is_empty() {
            Vec::new()
        } else {
            trimmed.split('/').collect()
        };

        match segments.as_slice() {
            [] => Some(Route::Home),
            ["packages"] => Some(Route::Packages),
            ["package", id] if !id.is_empty() => Some(Route::PackageDetail((*id).to_string())),
            ["payment"] => Some(Route::Payment),
            ["tracking"] => Some(Route::Tracking),
            ["dashboard"] => Some(Route::Dashboard),
            _ => None,
        }
    }

    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Packages => "/packages".to_string(),
            Route::PackageDetail(id) => format!("/package/{id}"),
            Route::Payment => "/payment".to_string(),
            Route::Tracking => "/tracking".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
        }
    }

    /// Links shown in the header
    #[must_use]
    pub fn navigation() -> Vec<NavLink> {
        [
            (Route::Home, "Home"),
            (Route::Packages, "Packages"),
            (Route::Tracking, "Track Vehicle"),
            (Route::Dashboard, "Dashboard"),
        ]
        .into_iter()
        .map(|(route, label)| NavLink {
            href: format!("#{}", route.path()),
            label,
        })
        .collect()
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}

impl Serialize for Route {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.path())
    }
}
