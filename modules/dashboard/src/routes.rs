//! Dashboard HTTP surface: the live feed read endpoint and a demo
//! emission endpoint that pushes a client-shaped request through the
//! configured transport (the dev interceptor in dev mode).

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};

use event_bus::TrackingEvent;

use crate::{health::health, AppState};

/// Response for GET /api/live-feed
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveFeedResponse {
    pub events: Vec<TrackingEvent>,
}

pub fn dashboard_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/live-feed", get(live_feed))
        .route("/api/demo/emit", post(demo_emit))
        .with_state(state)
}

/// Handler for GET /api/live-feed
pub async fn live_feed(State(state): State<AppState>) -> Json<LiveFeedResponse> {
    Json(LiveFeedResponse {
        events: state.feed.snapshot().await,
    })
}

/// Handler for POST /api/demo/emit
///
/// Relays the body verbatim to the ingest transport and mirrors the
/// transport's response, so callers see exactly what the ingestion
/// endpoint (real or simulated) answered.
pub async fn demo_emit(
    State(state): State<AppState>,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    match state.transport.send(&state.ingest_url, body.to_vec()).await {
        Ok(response) => (
            StatusCode::from_u16(response.status).unwrap_or(StatusCode::BAD_GATEWAY),
            Json(response.body),
        ),
        Err(e) => {
            tracing::error!("Demo emission failed: {}", e);
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({"error": "Ingest transport unreachable"})),
            )
        }
    }
}
