//! Shared helpers for tracking-service boundary tests.
//!
//! Tests drive the real router over the in-memory store and bus, crossing
//! the same HTTP boundary production traffic does without needing Postgres
//! or NATS.
#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, Response},
    Router,
};
use event_bus::InMemoryBus;
use serde_json::Value;
use tracking_rs::{routes::tracking_router, store::InMemoryEventStore, AppState};

pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryEventStore>,
    pub bus: Arc<InMemoryBus>,
}

pub fn test_app() -> TestApp {
    let store = Arc::new(InMemoryEventStore::new());
    let bus = Arc::new(InMemoryBus::new());

    let state = AppState {
        store: store.clone(),
        bus: bus.clone(),
        public_url: "http://localhost:8092".to_string(),
    };

    TestApp {
        router: tracking_router(state),
        store,
        bus,
    }
}

pub fn post_track(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/track")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("Failed to build request")
}

pub async fn response_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    serde_json::from_slice(&bytes).expect("Response body was not JSON")
}
