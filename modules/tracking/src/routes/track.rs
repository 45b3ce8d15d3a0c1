//! Ingestion route: `POST /api/track`
//!
//! The boundary where client-supplied envelopes are validated, enriched
//! with server-observed metadata, and appended to the store. Invoked
//! cross-origin from arbitrary storefront domains, so the route also
//! answers pre-flight requests and shapes its own method-not-allowed body.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::Serialize;

use event_bus::{validate_track_request, TrackRequest, TrackingEvent};

use crate::{client_meta, routes::ErrorResponse, AppState};

/// Success acknowledgment for a stored event
#[derive(Debug, Serialize)]
pub struct TrackAccepted {
    pub success: bool,
    pub message: String,
}

/// Handler for POST /api/track
///
/// Ingestion is single-pass with no retries: a store failure drops the
/// event. The body is parsed by hand so parse failures surface through
/// the documented error contract rather than the framework's.
pub async fn track_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<TrackAccepted>), (StatusCode, Json<ErrorResponse>)> {
    let request: TrackRequest = serde_json::from_slice(&body).map_err(|e| {
        tracing::debug!("Rejecting unparseable track body: {}", e);
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Invalid JSON body".to_string(),
            }),
        )
    })?;

    validate_track_request(&request).map_err(|message| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse { error: message }),
        )
    })?;

    // Enrichment is server-observed only; anything the client sent for
    // these fields is ignored
    let event = TrackingEvent::from_request(request)
        .with_user_agent(client_meta::user_agent(&headers))
        .with_ip_address(client_meta::forwarded_ip(&headers));

    state.store.append(&event).await.map_err(|e| {
        tracing::error!(store_id = %event.store_id, "Failed to store tracking event: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "Failed to store tracking data".to_string(),
            }),
        )
    })?;

    // Best-effort fan-out to live subscribers; never fails the request
    match serde_json::to_vec(&event) {
        Ok(payload) => {
            if let Err(e) = state.bus.publish(&event.subject(), payload).await {
                tracing::warn!(
                    store_id = %event.store_id,
                    event_id = %event.id,
                    "Failed to publish tracked event: {}",
                    e
                );
            }
        }
        Err(e) => {
            tracing::warn!(event_id = %event.id, "Failed to serialize tracked event: {}", e);
        }
    }

    tracing::info!(
        store_id = %event.store_id,
        event = %event.event,
        event_id = %event.id,
        "Event tracked"
    );

    Ok((
        StatusCode::CREATED,
        Json(TrackAccepted {
            success: true,
            message: "Event tracked successfully".to_string(),
        }),
    ))
}

/// CORS pre-flight for the widget's cross-origin POSTs
pub async fn track_preflight() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}

/// Explicit method guard so the body matches the documented contract
/// instead of an empty framework 405. Runs before any body handling.
pub async fn method_not_allowed() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorResponse {
            error: "Method not allowed".to_string(),
        }),
    )
}
