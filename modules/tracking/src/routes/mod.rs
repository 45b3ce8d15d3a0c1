pub mod analytics;
pub mod track;

use axum::{
    routing::{get, post},
    Router,
};
use serde::Serialize;

use crate::{health::health, widget::widget_snippet, AppState};

/// JSON error body every route on this service speaks
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Build the service router. Kept separate from `main` so boundary tests
/// can drive it against the in-memory backends.
pub fn tracking_router(state: AppState) -> Router {
    let analytics = Router::new()
        .route("/page-views-summary", get(analytics::page_views_summary))
        .route("/top-pages", get(analytics::top_pages))
        .route("/click-event-summary", get(analytics::click_event_summary))
        .route("/recent", get(analytics::recent_events))
        .fallback(analytics::unknown_endpoint);

    Router::new()
        .route("/api/health", get(health))
        .route(
            "/api/track",
            post(track::track_event)
                .options(track::track_preflight)
                .fallback(track::method_not_allowed),
        )
        .route("/api/widget-snippet", get(widget_snippet))
        .nest("/api/analytics", analytics)
        .with_state(state)
}
