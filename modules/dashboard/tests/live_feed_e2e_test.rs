//! End-to-end dev flow: emitter → interceptor → bus → live feed → HTTP.
//!
//! This is the whole development loop the dashboard runs on: no network,
//! no database, yet the feed endpoint serves exactly what was emitted.

mod common;

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use event_bus::InMemoryBus;
use serde_json::Value;
use tower::ServiceExt;

use dashboard_rs::{
    emitter::Emitter,
    live_feed::LiveFeed,
    routes::dashboard_router,
    transport::{DevInterceptor, HttpTransport, IngestTransport},
    AppState,
};

use common::wait_for_feed_len;

const INGEST_URL: &str = "http://localhost:8092/api/track";

#[tokio::test]
async fn test_emitted_events_reach_the_feed() {
    let bus = Arc::new(InMemoryBus::new());
    let feed = LiveFeed::new(10);
    feed.subscribe(bus.clone()).await.unwrap();

    let transport: Arc<dyn IngestTransport> = Arc::new(DevInterceptor::new(
        Arc::new(HttpTransport::new()),
        bus.clone(),
    ));

    let mut emitter = Emitter::new("demo-1", INGEST_URL, transport.clone());
    emitter.page_view("https://shop.example/", "Shop", "");
    emitter.click("button", "Subscribe");
    emitter.flush().await;

    wait_for_feed_len(&feed, 2).await;

    let snapshot = feed.snapshot().await;
    // Newest first
    assert_eq!(snapshot[0].event, "click");
    assert_eq!(snapshot[0].data["text"], "Subscribe");
    assert_eq!(snapshot[1].event, "page_view");
    assert_eq!(snapshot[1].data["url"], "https://shop.example/");
}

#[tokio::test]
async fn test_feed_evicts_oldest_when_full() {
    let bus = Arc::new(InMemoryBus::new());
    let feed = LiveFeed::new(3);
    feed.subscribe(bus.clone()).await.unwrap();

    let transport = DevInterceptor::new(Arc::new(HttpTransport::new()), bus.clone());

    for i in 0..5 {
        let body = format!(r#"{{"storeId":"demo-1","event":"event_{}"}}"#, i);
        let response = transport
            .send(INGEST_URL, body.into_bytes())
            .await
            .unwrap();
        assert_eq!(response.status, 201);
    }

    wait_for_feed_len(&feed, 3).await;
    // Give the consumer a beat to process any stragglers past capacity
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let snapshot = feed.snapshot().await;
    assert_eq!(snapshot.len(), 3);
    assert_eq!(snapshot[0].event, "event_4");
    assert_eq!(snapshot[2].event, "event_2");
}

#[tokio::test]
async fn test_demo_emit_round_trip_through_router() {
    let bus = Arc::new(InMemoryBus::new());
    let feed = LiveFeed::new(10);
    feed.subscribe(bus.clone()).await.unwrap();

    let state = AppState {
        feed: feed.clone(),
        transport: Arc::new(DevInterceptor::new(
            Arc::new(HttpTransport::new()),
            bus.clone(),
        )),
        ingest_url: INGEST_URL.to_string(),
    };
    let router = dashboard_router(state);

    // Emit through the HTTP surface
    let request = Request::builder()
        .method("POST")
        .uri("/api/demo/emit")
        .header("content-type", "application/json")
        .body(Body::from(
            r#"{"storeId":"demo-1","event":"page_view","data":{"url":"/"}}"#,
        ))
        .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], true);

    wait_for_feed_len(&feed, 1).await;

    // And read it back from the feed endpoint
    let request = Request::builder()
        .method("GET")
        .uri("/api/live-feed")
        .body(Body::empty())
        .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    let events = body["events"].as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["storeId"], "demo-1");
    assert_eq!(events[0]["event"], "page_view");
}

#[tokio::test]
async fn test_invalid_demo_emit_never_reaches_feed() {
    let bus = Arc::new(InMemoryBus::new());
    let feed = LiveFeed::new(10);
    feed.subscribe(bus.clone()).await.unwrap();

    let state = AppState {
        feed: feed.clone(),
        transport: Arc::new(DevInterceptor::new(
            Arc::new(HttpTransport::new()),
            bus.clone(),
        )),
        ingest_url: INGEST_URL.to_string(),
    };
    let router = dashboard_router(state);

    let request = Request::builder()
        .method("POST")
        .uri("/api/demo/emit")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"event":"page_view"}"#))
        .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert!(feed.snapshot().await.is_empty());
}
