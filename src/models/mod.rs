//! Data models for the Wanderlust service
//!
//! This module contains the core domain models organized by concern:
//! - Package: catalog entries
//! - Account: traveler profile and bookings
//! - Plan: AI generated itineraries

pub mod account;
pub mod package;
pub mod plan;

// Re-export all public types for convenient access
pub use account::{Booking, BookingStatus, User};
pub use package::TravelPackage;
pub use plan::{AITripPlan, ItineraryDay, TripRequest};
