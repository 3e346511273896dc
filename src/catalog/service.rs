//! Mock travel data service
//!
//! Serves the seed collections after an artificial delay so callers observe
//! the same latency profile as a remote backend would give them.

use std::time::Duration;

use tracing::{debug, instrument};

use crate::catalog::data::{BOOKINGS, PACKAGES, USER};
use crate::config::LatencyConfig;
use crate::models::{Booking, TravelPackage, User};

/// Read-only facade over the seed data
#[derive(Debug, Clone)]
pub struct TravelService {
    latency: LatencyConfig,
}

impl TravelService {
    #[must_use]
    pub fn new(latency: LatencyConfig) -> Self {
        Self { latency }
    }

    /// All catalog packages in catalog order
    #[instrument(level = "debug", skip(self))]
    pub async fn get_packages(&self) -> Vec<TravelPackage> {
        simulate_latency(self.latency.packages_ms).await;
        PACKAGES.clone()
    }

    /// Package by id, `None` for unknown ids
    #[instrument(level = "debug", skip(self))]
    pub async fn get_package_by_id(&self, id: &str) -> Option<TravelPackage> {
        simulate_latency(self.latency.package_ms).await;
        let found = PACKAGES.iter().find(|p| p.id == id).cloned();
        if found.is_none() {
            debug!("No package with id {}", id);
        }
        found
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn get_user(&self) -> User {
        simulate_latency(self.latency.user_ms).await;
        USER.clone()
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn get_bookings(&self) -> Vec<Booking> {
        simulate_latency(self.latency.bookings_ms).await;
        BOOKINGS.clone()
    }
}

impl Default for TravelService {
    fn default() -> Self {
        Self::new(LatencyConfig::default())
    }
}

async fn simulate_latency(millis: u64) {
    if millis > 0 {
        tokio::time::sleep(Duration::from_millis(millis)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_packages_arrive_after_configured_delay() {
        let service = TravelService::default();
        let start = Instant::now();
        let packages = service.get_packages().await;
        assert_eq!(packages.len(), 6);
        assert!(start.elapsed() >= Duration::from_millis(500));
    }

    #[tokio::test]
    async fn test_package_lookup() {
        let service = TravelService::new(LatencyConfig::none());
        let pkg = service.get_package_by_id("3").await.unwrap();
        assert_eq!(pkg.name, "Machu Picchu Adventure");
        assert!(service.get_package_by_id("42").await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_user_and_bookings_load_concurrently() {
        let service = TravelService::default();
        let start = Instant::now();
        let (user, bookings) = tokio::join!(service.get_user(), service.get_bookings());
        assert_eq!(user.name, "Alex Wanderer");
        assert_eq!(bookings.len(), 3);
        // Bounded by the slower call, not the sum of both
        assert!(start.elapsed() < Duration::from_millis(600));
    }
}
