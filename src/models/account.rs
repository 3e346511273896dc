//! Traveler profile and booking records

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Traveler profile
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub loyalty_points: u32,
}

/// Lifecycle bucket of a booking, fixed when the data is seeded
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Upcoming,
    Completed,
    Cancelled,
}

/// A booked trip
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    /// Not checked against the catalog
    pub package_id: String,
    pub package_name: String,
    pub user_id: String,
    pub booking_date: NaiveDate,
    pub trip_date: NaiveDate,
    pub travelers: u32,
    pub status: BookingStatus,
}
