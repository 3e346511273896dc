//! Travel package model

use serde::{Deserialize, Serialize};

/// Number of description characters shown on a package card
const EXCERPT_CHARS: usize = 100;

/// A bookable travel package from the catalog
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TravelPackage {
    pub id: String,
    pub name: String,
    pub destination: String,
    /// Trip length in days
    pub duration: u32,
    /// Price per person in USD
    pub price: f64,
    /// Average rating between 0 and 5
    pub rating: f32,
    pub description: String,
    /// Image URL
    pub image: String,
    pub tags: Vec<String>,
}

impl TravelPackage {
    /// Card text: the first 100 characters of the description followed by `...`
    #[must_use]
    pub fn excerpt(&self) -> String {
        let head: String = self.description.chars().take(EXCERPT_CHARS).collect();
        format!("{head}...")
    }

    /// Whether the lowercase needle appears in the name, destination or a tag
    #[must_use]
    pub fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.destination.to_lowercase().contains(needle)
            || self
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn package(description: &str) -> TravelPackage {
        TravelPackage {
            id: "x".to_string(),
            name: "Fjord Cruise".to_string(),
            destination: "Bergen, Norway".to_string(),
            duration: 4,
            price: 1900.0,
            rating: 4.5,
            description: description.to_string(),
            image: String::new(),
            tags: vec!["Water".to_string(), "nature".to_string()],
        }
    }

    #[test]
    fn test_excerpt_truncates_long_descriptions() {
        let pkg = package(&"a".repeat(150));
        let excerpt = pkg.excerpt();
        assert_eq!(excerpt.len(), 103);
        assert!(excerpt.ends_with("..."));
    }

    #[test]
    fn test_excerpt_is_char_safe() {
        let pkg = package(&"ø".repeat(120));
        assert_eq!(pkg.excerpt().chars().count(), 103);
    }

    #[test]
    fn test_matches_tags_case_insensitively() {
        let pkg = package("");
        assert!(pkg.matches("water"));
        assert!(pkg.matches("bergen"));
        assert!(!pkg.matches("desert"));
    }
}
