use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::Router;
use axum::http::StatusCode;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;

use crate::api::{self, AppState};
use crate::catalog::TravelService;
use crate::config::WanderlustConfig;
use crate::payment::PaymentTimings;
use crate::planner::GeminiClient;
use crate::store::{FjallPreferenceStore, PreferenceStore};
use crate::theme::ThemeController;
use crate::tracking::{TrackingSimulation, TrackingTask, VehiclePath};

/// Headroom on top of the AI timeout before the server gives up on a request
const REQUEST_TIMEOUT_SLACK: Duration = Duration::from_secs(10);

/// Full application: the API under `/api` plus CORS and request timeout
pub fn app<S: PreferenceStore + 'static>(state: AppState<S>, request_timeout: Duration) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", api::router(state))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(cors)
}

/// Wire up every component from configuration. Background tasks are bound
/// to `shutdown`.
pub async fn build_state(
    config: &WanderlustConfig,
    shutdown: &CancellationToken,
) -> anyhow::Result<AppState<FjallPreferenceStore>> {
    let store = FjallPreferenceStore::open(&config.storage.path)
        .with_context(|| format!("Failed to open preferences at {}", config.storage.path))?;
    let theme = ThemeController::init(store)
        .await
        .context("Failed to restore theme preference")?;

    let planner = GeminiClient::new(&config.ai).context("Failed to create AI client")?;

    let path = VehiclePath::demo();
    let tracking = TrackingTask::spawn_with_token(
        TrackingSimulation::new(path.clone(), config.tracking.step),
        config.tracking.tick(),
        shutdown.child_token(),
    );

    Ok(AppState::new(
        TravelService::new(config.latency.clone()),
        Arc::new(planner),
        theme,
        path,
        tracking,
        PaymentTimings::from(&config.payment),
    ))
}

/// Serve until `shutdown` is cancelled
pub async fn run(config: &WanderlustConfig, shutdown: CancellationToken) -> anyhow::Result<()> {
    let state = build_state(config, &shutdown).await?;
    let router = app(state, config.ai.timeout() + REQUEST_TIMEOUT_SLACK);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Web server running at http://{}", addr);

    let graceful = {
        let shutdown = shutdown.clone();
        async move {
            shutdown.cancelled().await;
            tracing::info!("Web server shutting down gracefully");
        }
    };

    axum::serve(listener, router)
        .with_graceful_shutdown(graceful)
        .await
        .context("Web server failed")
}
