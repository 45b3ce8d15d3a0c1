//! Analytics read routes
//!
//! Four independent read-only queries over the persisted event store,
//! each recomputed per request from a bounded recent-events scan.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Serialize;

use event_bus::TrackingEvent;

use crate::{
    aggregate::{self, ClickSummary, PageViewsSummary, TopPages, RECENT_LIMIT, SCAN_LIMIT},
    routes::ErrorResponse,
    AppState,
};

/// Response for GET /api/analytics/recent
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentEvents {
    pub events: Vec<TrackingEvent>,
}

/// Handler for GET /api/analytics/page-views-summary
pub async fn page_views_summary(
    State(state): State<AppState>,
) -> Result<Json<PageViewsSummary>, AnalyticsErrorResponse> {
    let events = scan(&state, SCAN_LIMIT).await?;
    Ok(Json(aggregate::page_views_summary(
        &events,
        Utc::now().date_naive(),
    )))
}

/// Handler for GET /api/analytics/top-pages
pub async fn top_pages(
    State(state): State<AppState>,
) -> Result<Json<TopPages>, AnalyticsErrorResponse> {
    let events = scan(&state, SCAN_LIMIT).await?;
    Ok(Json(aggregate::top_pages(&events)))
}

/// Handler for GET /api/analytics/click-event-summary
pub async fn click_event_summary(
    State(state): State<AppState>,
) -> Result<Json<ClickSummary>, AnalyticsErrorResponse> {
    let events = scan(&state, SCAN_LIMIT).await?;
    Ok(Json(aggregate::click_summary(&events)))
}

/// Handler for GET /api/analytics/recent
pub async fn recent_events(
    State(state): State<AppState>,
) -> Result<Json<RecentEvents>, AnalyticsErrorResponse> {
    let events = scan(&state, RECENT_LIMIT).await?;
    Ok(Json(RecentEvents { events }))
}

/// Fallback for any other path under /api/analytics
pub async fn unknown_endpoint() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "Invalid endpoint".to_string(),
        }),
    )
}

async fn scan(state: &AppState, limit: i64) -> Result<Vec<TrackingEvent>, AnalyticsErrorResponse> {
    state.store.recent(limit).await.map_err(|e| {
        tracing::error!("Failed to scan tracking events: {}", e);
        AnalyticsErrorResponse {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Failed to fetch analytics data".to_string(),
        }
    })
}

/// Error response wrapper for proper HTTP error handling
#[derive(Debug)]
pub struct AnalyticsErrorResponse {
    pub status: StatusCode,
    pub message: String,
}

impl IntoResponse for AnalyticsErrorResponse {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}
