//! Page view models
//!
//! Each page of the web client is backed by one serializable view. Views are
//! assembled from the travel service plus whatever live state the page shows
//! (checkout progress, vehicle position).

use serde::Serialize;
use tracing::{instrument, warn};

use crate::catalog::{SearchOutcome, TravelService, search};
use crate::models::{Booking, BookingStatus, TravelPackage, User};
use crate::payment::PaymentState;
use crate::routing::Route;
use crate::tracking::{TrackingSnapshot, VehiclePath, Waypoint};

/// Packages featured on the home page
pub const FEATURED_COUNT: usize = 3;
/// Initial value of the planner's trip length field
pub const DEFAULT_PLANNER_DAYS: u32 = 7;
pub const TRACKED_TRIP: &str = "Kyoto's Serene Temples";
pub const TRACKING_STATUS: &str = "En route to your hotel";
pub const NO_UPCOMING_MESSAGE: &str = "No upcoming trips. Time to book a new adventure!";

#[derive(Debug, Clone, Serialize)]
pub struct HomeView {
    pub featured: Vec<TravelPackage>,
    pub planner_default_days: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogView {
    pub query: String,
    pub outcome: SearchOutcome,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DetailView {
    /// Shown while the package is unresolved; unknown ids stay here
    Loading { id: String },
    Ready { package: TravelPackage },
}

#[derive(Debug, Clone, Serialize)]
pub struct TrackingView {
    pub trip: &'static str,
    pub status: &'static str,
    pub progress: u32,
    pub position: Waypoint,
    pub waypoints: Vec<Waypoint>,
    pub outline: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub greeting: String,
    pub user: User,
    pub upcoming: Vec<Booking>,
    pub history: Vec<Booking>,
    /// Set when there is nothing upcoming
    pub empty_message: Option<&'static str>,
}

/// Any page, tagged with its kind
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum PageView {
    Home(HomeView),
    Catalog(CatalogView),
    Detail(DetailView),
    Payment(PaymentState),
    Tracking(TrackingView),
    Dashboard(DashboardView),
}

/// Live state the pages render besides catalog data
#[derive(Debug, Clone, Copy)]
pub struct PageContext<'a> {
    pub service: &'a TravelService,
    pub path: &'a VehiclePath,
    pub tracking: TrackingSnapshot,
}

/// Per-request page parameters
#[derive(Debug, Clone, Default)]
pub struct PageInput {
    /// Catalog search text
    pub query: String,
    /// Checkout shown on the payment page, if any
    pub payment: Option<PaymentState>,
}

pub async fn home_view(service: &TravelService) -> HomeView {
    let mut featured = service.get_packages().await;
    featured.truncate(FEATURED_COUNT);
    HomeView {
        featured,
        planner_default_days: DEFAULT_PLANNER_DAYS,
    }
}

pub async fn catalog_view(service: &TravelService, query: &str) -> CatalogView {
    let packages = service.get_packages().await;
    CatalogView {
        query: query.to_string(),
        outcome: search(&packages, query),
    }
}

pub async fn detail_view(service: &TravelService, id: &str) -> DetailView {
    match service.get_package_by_id(id).await {
        Some(package) => DetailView::Ready { package },
        None => {
            warn!("Package '{}' not found, detail page stays in loading state", id);
            DetailView::Loading { id: id.to_string() }
        }
    }
}

#[must_use]
pub fn tracking_view(path: &VehiclePath, snapshot: TrackingSnapshot) -> TrackingView {
    TrackingView {
        trip: TRACKED_TRIP,
        status: TRACKING_STATUS,
        progress: snapshot.progress,
        position: snapshot.position,
        waypoints: path.waypoints().to_vec(),
        outline: path.outline(),
    }
}

/// Profile and bookings, fetched concurrently
pub async fn dashboard_view(service: &TravelService) -> DashboardView {
    let (user, bookings) = tokio::join!(service.get_user(), service.get_bookings());

    let upcoming: Vec<Booking> = bookings
        .iter()
        .filter(|b| b.status == BookingStatus::Upcoming)
        .cloned()
        .collect();
    let history: Vec<Booking> = bookings
        .into_iter()
        .filter(|b| b.status == BookingStatus::Completed)
        .collect();

    DashboardView {
        greeting: format!("Welcome, {}!", user.name),
        empty_message: upcoming.is_empty().then_some(NO_UPCOMING_MESSAGE),
        user,
        upcoming,
        history,
    }
}

/// Build the view for `route`
#[instrument(level = "debug", skip(ctx, input))]
pub async fn load_page(route: &Route, ctx: PageContext<'_>, input: PageInput) -> PageView {
    match route {
        Route::Home => PageView::Home(home_view(ctx.service).await),
        Route::Packages => PageView::Catalog(catalog_view(ctx.service, &input.query).await),
        Route::PackageDetail(id) => PageView::Detail(detail_view(ctx.service, id).await),
        Route::Payment => PageView::Payment(input.payment.unwrap_or_default()),
        Route::Tracking => PageView::Tracking(tracking_view(ctx.path, ctx.tracking)),
        Route::Dashboard => PageView::Dashboard(dashboard_view(ctx.service).await),
    }
}
