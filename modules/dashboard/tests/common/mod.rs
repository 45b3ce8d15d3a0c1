//! Shared helpers for dashboard tests.
#![allow(dead_code)]

use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::Mutex;

use dashboard_rs::live_feed::LiveFeed;
use dashboard_rs::transport::{IngestTransport, TransportError, TransportResponse};

/// Transport that records every call and answers like a healthy ingest
/// endpoint. Stands in for the real HTTP client under the interceptor.
#[derive(Default)]
pub struct RecordingTransport {
    pub calls: Mutex<Vec<(String, Vec<u8>)>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }
}

#[async_trait]
impl IngestTransport for RecordingTransport {
    async fn send(&self, url: &str, body: Vec<u8>) -> Result<TransportResponse, TransportError> {
        self.calls.lock().await.push((url.to_string(), body));
        Ok(TransportResponse {
            status: 201,
            body: json!({"success": true, "message": "Event tracked successfully"}),
        })
    }
}

/// Transport whose sends always fail at the HTTP layer.
pub struct FailingTransport;

#[async_trait]
impl IngestTransport for FailingTransport {
    async fn send(&self, _url: &str, _body: Vec<u8>) -> Result<TransportResponse, TransportError> {
        // Force a real reqwest error without any server listening
        let err = reqwest::Client::new()
            .post("http://127.0.0.1:1/unreachable")
            .send()
            .await
            .expect_err("connection to port 1 should fail");
        Err(TransportError::Http(err))
    }
}

/// Poll the feed until it holds `expected` events or the timeout passes.
pub async fn wait_for_feed_len(feed: &LiveFeed, expected: usize) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(1);
    loop {
        if feed.snapshot().await.len() >= expected {
            return;
        }
        if tokio::time::Instant::now() > deadline {
            panic!(
                "feed never reached {} events (got {})",
                expected,
                feed.snapshot().await.len()
            );
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
