//! Wanderlust - travel packages, AI trip planning and a demo booking flow
//!
//! This library provides the mock travel catalog, the itinerary generator
//! client, the checkout and tracking simulations and the HTTP surface that
//! exposes them to the web client.

pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod payment;
pub mod planner;
pub mod routing;
pub mod store;
pub mod theme;
pub mod tracking;
pub mod views;
pub mod web;

// Re-export core types for public API
pub use catalog::TravelService;
pub use config::WanderlustConfig;
pub use error::WanderlustError;
pub use models::{AITripPlan, Booking, TravelPackage, TripRequest, User};
pub use planner::{GeminiClient, ItineraryGenerator};
pub use routing::Route;
pub use theme::{Theme, ThemeController};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, WanderlustError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
