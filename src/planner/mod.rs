//! AI trip planner
//!
//! Turns a destination, a trip length and free-text interests into a day by
//! day itinerary using an external generative model. The model's answer is
//! passed through as-is.

pub mod gemini;

use async_trait::async_trait;

use crate::Result;
use crate::models::{AITripPlan, TripRequest};

pub use gemini::GeminiClient;

/// Anything that can produce an itinerary for a trip request
#[async_trait]
pub trait ItineraryGenerator: Send + Sync {
    async fn generate(&self, request: &TripRequest) -> Result<AITripPlan>;
}

/// Natural-language prompt sent to the model
#[must_use]
pub fn build_prompt(request: &TripRequest) -> String {
    format!(
        "Create a {}-day travel itinerary for a trip to {}. The traveler is interested in {}. Provide a title and a few activities for each day.",
        request.duration, request.destination, request.interests
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_all_inputs() {
        let request = TripRequest {
            destination: "Lisbon, Portugal".to_string(),
            duration: 4,
            interests: "tiles, seafood".to_string(),
        };
        assert_eq!(
            build_prompt(&request),
            "Create a 4-day travel itinerary for a trip to Lisbon, Portugal. The traveler is interested in tiles, seafood. Provide a title and a few activities for each day."
        );
    }
}
