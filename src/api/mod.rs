//! HTTP surface of the web client
//!
//! Everything is mounted under `/api` by [`crate::web`]. Handlers are thin:
//! they pull what they need out of [`AppState`] and serialize the result.

mod error;
mod state;

use axum::{
    Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::catalog::{SearchOutcome, search};
use crate::models::{AITripPlan, Booking, TravelPackage, TripRequest, User};
use crate::payment::{PaymentForm, PaymentState};
use crate::routing::{NavLink, Route};
use crate::store::PreferenceStore;
use crate::theme::Theme;
use crate::views::{PageInput, PageView, TrackingView, load_page, tracking_view};
use crate::{VERSION, WanderlustError};

pub use error::ApiError;
pub use state::AppState;

type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct PageParams {
    /// Search text of the catalog page
    #[serde(default)]
    pub q: String,
    /// Checkout shown on the payment page
    pub payment: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ThemeResponse {
    pub theme: Theme,
}

#[derive(Debug, Serialize)]
pub struct PaymentSession {
    pub id: u64,
    pub state: PaymentState,
}

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub version: &'static str,
}

pub fn router<S: PreferenceStore + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/navigation", get(navigation))
        .route("/packages", get(get_packages::<S>))
        .route("/packages/{id}", get(get_package::<S>))
        .route("/user", get(get_user::<S>))
        .route("/bookings", get(get_bookings::<S>))
        .route("/pages", get(get_home_page::<S>))
        .route("/pages/{*path}", get(get_page::<S>))
        .route("/theme", get(get_theme::<S>))
        .route("/theme/toggle", post(toggle_theme::<S>))
        .route("/payments", post(submit_payment::<S>))
        .route(
            "/payments/{id}",
            get(get_payment::<S>).delete(cancel_payment::<S>),
        )
        .route("/tracking", get(get_tracking::<S>))
        .route("/itinerary", post(generate_itinerary::<S>))
        .with_state(state)
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        version: VERSION,
    })
}

async fn navigation() -> Json<Vec<NavLink>> {
    Json(Route::navigation())
}

async fn get_packages<S: PreferenceStore + 'static>(
    State(state): State<AppState<S>>,
    Query(params): Query<SearchParams>,
) -> Json<SearchOutcome> {
    let packages = state.service.get_packages().await;
    Json(search(&packages, &params.q))
}

async fn get_package<S: PreferenceStore + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> ApiResult<Json<TravelPackage>> {
    state
        .service
        .get_package_by_id(&id)
        .await
        .map(Json)
        .ok_or_else(|| WanderlustError::not_found(format!("No package with id {id}")).into())
}

async fn get_user<S: PreferenceStore + 'static>(State(state): State<AppState<S>>) -> Json<User> {
    Json(state.service.get_user().await)
}

async fn get_bookings<S: PreferenceStore + 'static>(
    State(state): State<AppState<S>>,
) -> Json<Vec<Booking>> {
    Json(state.service.get_bookings().await)
}

async fn get_home_page<S: PreferenceStore + 'static>(
    State(state): State<AppState<S>>,
) -> Json<PageView> {
    Json(load_page(&Route::Home, state.page_context(), PageInput::default()).await)
}

async fn get_page<S: PreferenceStore + 'static>(
    State(state): State<AppState<S>>,
    Path(path): Path<String>,
    Query(params): Query<PageParams>,
) -> ApiResult<Json<PageView>> {
    let route = Route::parse(&path)
        .ok_or_else(|| WanderlustError::not_found(format!("No page at /{path}")))?;
    let payment = match params.payment {
        Some(id) => Some(state.payment_state(id).await?),
        None => None,
    };
    let input = PageInput {
        query: params.q,
        payment,
    };
    Ok(Json(load_page(&route, state.page_context(), input).await))
}

async fn get_theme<S: PreferenceStore + 'static>(
    State(state): State<AppState<S>>,
) -> Json<ThemeResponse> {
    let theme = state.theme.lock().await.current();
    Json(ThemeResponse { theme })
}

async fn toggle_theme<S: PreferenceStore + 'static>(
    State(state): State<AppState<S>>,
) -> ApiResult<Json<ThemeResponse>> {
    let theme = state.theme.lock().await.toggle().await?;
    Ok(Json(ThemeResponse { theme }))
}

async fn submit_payment<S: PreferenceStore + 'static>(
    State(state): State<AppState<S>>,
    Json(form): Json<PaymentForm>,
) -> ApiResult<(StatusCode, Json<PaymentSession>)> {
    let session = state.start_payment(&form).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

async fn get_payment<S: PreferenceStore + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<u64>,
) -> ApiResult<Json<PaymentSession>> {
    let state = state.payment_state(id).await?;
    Ok(Json(PaymentSession { id, state }))
}

async fn cancel_payment<S: PreferenceStore + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<u64>,
) -> ApiResult<StatusCode> {
    state.end_payment(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_tracking<S: PreferenceStore + 'static>(
    State(state): State<AppState<S>>,
) -> Json<TrackingView> {
    Json(tracking_view(&state.path, state.tracking.current()))
}

async fn generate_itinerary<S: PreferenceStore + 'static>(
    State(state): State<AppState<S>>,
    Json(request): Json<TripRequest>,
) -> ApiResult<Json<AITripPlan>> {
    request.validate()?;
    let plan = state.planner.generate(&request).await?;
    Ok(Json(plan))
}
