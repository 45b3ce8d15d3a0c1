//! Boundary tests: HTTP → Router → Store (Ingestion Path)
//!
//! Exercises the full ingestion contract over real HTTP requests: success
//! acknowledgment, server-side enrichment, the fixed error bodies, and
//! the best-effort bus fan-out.

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use event_bus::{EventBus, TrackingEvent};
use futures::StreamExt;
use tower::ServiceExt;
use tracking_rs::store::EventStore;

use common::{post_track, response_json, test_app};

#[tokio::test]
async fn test_valid_envelope_is_stored_and_acknowledged() {
    let app = test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/api/track")
        .header("content-type", "application/json")
        .header("user-agent", "Mozilla/5.0 (Test)")
        .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
        .body(Body::from(
            r#"{"storeId":"demo-1","event":"click","data":{"element":"button","text":"Buy"},"sessionId":"sess-1"}"#,
        ))
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = response_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Event tracked successfully");

    let stored = app.store.recent(10).await.unwrap();
    assert_eq!(stored.len(), 1);

    let event = &stored[0];
    assert_eq!(event.store_id, "demo-1");
    assert_eq!(event.event, "click");
    assert_eq!(event.session_id.as_deref(), Some("sess-1"));
    assert_eq!(event.data["element"], "button");

    // Enrichment is server-observed
    assert_eq!(event.user_agent.as_deref(), Some("Mozilla/5.0 (Test)"));
    assert_eq!(event.ip_address.as_deref(), Some("203.0.113.7"));
}

#[tokio::test]
async fn test_client_cannot_supply_enrichment_fields() {
    let app = test_app();

    // Client tries to smuggle in its own timestamp and ip; the server
    // ignores the unknown fields and assigns its own
    let response = app
        .router
        .clone()
        .oneshot(post_track(
            r#"{"storeId":"demo-1","event":"page_view","timestamp":"1999-01-01T00:00:00Z","ipAddress":"6.6.6.6","userAgent":"spoofed"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let stored = app.store.recent(1).await.unwrap();
    let event = &stored[0];
    assert!(event.timestamp.timestamp() > 1_500_000_000);
    assert!(event.ip_address.is_none());
    assert!(event.user_agent.is_none());
}

#[tokio::test]
async fn test_missing_required_fields_rejected_without_persisting() {
    let app = test_app();

    for body in [
        r#"{"event":"click"}"#,
        r#"{"storeId":"demo-1"}"#,
        r#"{"storeId":"","event":"click"}"#,
        r#"{"storeId":"demo-1","event":""}"#,
        r#"{}"#,
    ] {
        let response = app.router.clone().oneshot(post_track(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {}", body);

        let json = response_json(response).await;
        assert_eq!(json["error"], "Missing required fields: storeId and event");
    }

    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn test_malformed_json_rejected_without_persisting() {
    let app = test_app();

    let response = app
        .router
        .clone()
        .oneshot(post_track("not json at all"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = response_json(response).await;
    assert_eq!(json["error"], "Invalid JSON body");

    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn test_non_post_method_gets_contract_405() {
    let app = test_app();

    let request = Request::builder()
        .method("GET")
        .uri("/api/track")
        .body(Body::empty())
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    let json = response_json(response).await;
    assert_eq!(json["error"], "Method not allowed");
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn test_preflight_answers_ok() {
    let app = test_app();

    let request = Request::builder()
        .method("OPTIONS")
        .uri("/api/track")
        .body(Body::empty())
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"ok");
}

#[tokio::test]
async fn test_successful_ingest_publishes_to_bus() {
    let app = test_app();

    let mut stream = app.bus.subscribe("tracking.events.>").await.unwrap();

    let response = app
        .router
        .clone()
        .oneshot(post_track(r#"{"storeId":"demo-1","event":"page_view"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let msg = tokio::time::timeout(std::time::Duration::from_secs(1), stream.next())
        .await
        .expect("timeout waiting for bus message")
        .expect("stream ended");

    assert_eq!(msg.subject, "tracking.events.page_view");
    let event: TrackingEvent = serde_json::from_slice(&msg.payload).unwrap();
    assert_eq!(event.store_id, "demo-1");
}

#[tokio::test]
async fn test_rejected_ingest_publishes_nothing() {
    let app = test_app();

    let mut stream = app.bus.subscribe("tracking.events.>").await.unwrap();

    let response = app
        .router
        .clone()
        .oneshot(post_track(r#"{"event":"page_view"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let result =
        tokio::time::timeout(std::time::Duration::from_millis(100), stream.next()).await;
    assert!(result.is_err(), "no bus message expected for rejected event");
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = test_app();

    let request = Request::builder()
        .method("GET")
        .uri("/api/health")
        .body(Body::empty())
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = response_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["service"], "tracking-rs");
}
