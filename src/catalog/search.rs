//! Free-text package search

use serde::Serialize;

use crate::models::TravelPackage;

pub const NO_RESULTS_MESSAGE: &str = "No packages found for your search.";

/// Result of a catalog search. An empty match set is reported explicitly.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SearchOutcome {
    Matches { packages: Vec<TravelPackage> },
    NoResults { message: String },
}

impl SearchOutcome {
    #[must_use]
    pub fn packages(&self) -> &[TravelPackage] {
        match self {
            SearchOutcome::Matches { packages } => packages,
            SearchOutcome::NoResults { .. } => &[],
        }
    }
}

/// Packages whose name, destination or a tag contains `query`, ignoring case,
/// in catalog order. An empty query keeps everything.
#[must_use]
pub fn filter_packages(packages: &[TravelPackage], query: &str) -> Vec<TravelPackage> {
    let needle = query.to_lowercase();
    packages
        .iter()
        .filter(|pkg| pkg.matches(&needle))
        .cloned()
        .collect()
}

#[must_use]
pub fn search(packages: &[TravelPackage], query: &str) -> SearchOutcome {
    let matches = filter_packages(packages, query);
    if matches.is_empty() {
        SearchOutcome::NoResults {
            message: NO_RESULTS_MESSAGE.to_string(),
        }
    } else {
        SearchOutcome::Matches { packages: matches }
    }
}
