// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// All endpoints live under `/api/v1/`. Health is public; report endpoints
// require a valid Bearer token checked via the `AuthBearer` extractor.
//
// CORS is permissive; the API only exposes read-only report data and a run
// trigger.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::api::auth::AuthBearer;
use crate::app_state::{AppState, TriggerError};

// =============================================================================
// Router construction
// =============================================================================

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // ── Public ──────────────────────────────────────────────────
        .route("/api/v1/health", get(health))
        // ── Authenticated ───────────────────────────────────────────
        .route("/api/v1/reports/latest", get(latest_reports))
        .route("/api/v1/reports/run", post(run_report))
        // ── Middleware & State ───────────────────────────────────────
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Health (public)
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    runs_completed: u64,
    uptime_secs: u64,
    server_time: i64,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let resp = HealthResponse {
        status: "ok",
        runs_completed: state.runs_completed(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        server_time: chrono::Utc::now().timestamp_millis(),
    };
    Json(resp)
}

// =============================================================================
// Latest reports (authenticated)
// =============================================================================

async fn latest_reports(
    _auth: AuthBearer,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    Json(state.latest_reports())
}

// =============================================================================
// Manual run trigger (authenticated)
// =============================================================================

async fn run_report(_auth: AuthBearer, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.request_run() {
        Ok(run_id) => {
            info!(%run_id, "manual report run queued");
            (
                StatusCode::ACCEPTED,
                Json(serde_json::json!({ "run_id": run_id.to_string() })),
            )
        }
        Err(TriggerError::AlreadyQueued) => {
            warn!("manual report run rejected, one is already queued");
            (
                StatusCode::CONFLICT,
                Json(serde_json::json!({ "error": "A report run is already queued" })),
            )
        }
        Err(TriggerError::SchedulerStopped) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({ "error": "Scheduler is not running" })),
        ),
    }
}
