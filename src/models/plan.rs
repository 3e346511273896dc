//! AI generated trip plan

use serde::{Deserialize, Serialize};

use crate::{Result, WanderlustError};

/// One day of an itinerary. Fields the model leaves out take empty values.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct ItineraryDay {
    pub day: i64,
    pub title: String,
    pub activities: Vec<String>,
}

/// Itinerary as returned by the generative model. Not validated: day numbers
/// may skip or repeat, the day count may differ from `duration` and missing
/// fields are left empty.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct AITripPlan {
    pub destination: String,
    pub duration: i64,
    pub itinerary: Vec<ItineraryDay>,
}

/// Parameters of an itinerary request
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TripRequest {
    pub destination: String,
    /// Days, 1 to 30
    pub duration: u32,
    pub interests: String,
}

impl TripRequest {
    pub const MIN_DAYS: u32 = 1;
    pub const MAX_DAYS: u32 = 30;

    /// Reject requests the planner form would never send
    pub fn validate(&self) -> Result<()> {
        if self.destination.trim().is_empty() {
            return Err(WanderlustError::validation("destination must not be empty"));
        }
        if !(Self::MIN_DAYS..=Self::MAX_DAYS).contains(&self.duration) {
            return Err(WanderlustError::validation(format!(
                "duration must be between {} and {} days",
                Self::MIN_DAYS,
                Self::MAX_DAYS
            )));
        }
        Ok(())
    }
}
