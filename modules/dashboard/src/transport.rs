//! The ingest transport seam.
//!
//! Every client-side emission goes through [`IngestTransport`] rather than
//! a hard-wired HTTP call, so development can swap the real transport for
//! an in-process simulation without touching any global state. Production
//! binds [`HttpTransport`]; dev wraps it in [`DevInterceptor`], and
//! unwrapping via [`DevInterceptor::into_inner`] restores the original
//! with nothing left behind.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

use event_bus::{validate_track_request, EventBus, TrackRequest, TrackingEvent};

/// Path suffix the ingestion endpoint lives on. Only requests addressed
/// here are ever simulated; everything else passes through.
pub const TRACK_ROUTE: &str = "/api/track";

/// Status and JSON body of an ingest call, identical in shape whether the
/// real endpoint or the interceptor served it.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Value,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// One logical operation: deliver a serialized envelope to an ingest URL.
#[async_trait]
pub trait IngestTransport: Send + Sync {
    async fn send(&self, url: &str, body: Vec<u8>) -> Result<TransportResponse, TransportError>;
}

/// Real HTTP transport
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IngestTransport for HttpTransport {
    async fn send(&self, url: &str, body: Vec<u8>) -> Result<TransportResponse, TransportError> {
        let response = self
            .client
            .post(url)
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.json::<Value>().await.unwrap_or(Value::Null);

        Ok(TransportResponse { status, body })
    }
}

/// Development substitute for the ingestion endpoint.
///
/// Requests targeting the track route are validated exactly the way the
/// real endpoint validates them, broadcast on the bus as an in-process
/// notification, and answered with a synthetic response matching the real
/// contract, so calling code cannot tell which transport served it. All
/// other requests are delegated to the wrapped transport untouched.
pub struct DevInterceptor {
    inner: Arc<dyn IngestTransport>,
    bus: Arc<dyn EventBus>,
}

impl DevInterceptor {
    pub fn new(inner: Arc<dyn IngestTransport>, bus: Arc<dyn EventBus>) -> Self {
        Self { inner, bus }
    }

    /// Tear down the interception and hand back the original transport.
    pub fn into_inner(self) -> Arc<dyn IngestTransport> {
        self.inner
    }

    fn is_track_route(url: &str) -> bool {
        let path = url.split('?').next().unwrap_or(url);
        path.trim_end_matches('/').ends_with(TRACK_ROUTE)
    }

    async fn simulate(&self, body: &[u8]) -> TransportResponse {
        let request: TrackRequest = match serde_json::from_slice(body) {
            Ok(request) => request,
            Err(e) => {
                tracing::debug!("Interceptor rejecting unparseable body: {}", e);
                return TransportResponse {
                    status: 400,
                    body: json!({"error": "Invalid JSON body"}),
                };
            }
        };

        if let Err(message) = validate_track_request(&request) {
            return TransportResponse {
                status: 400,
                body: json!({ "error": message }),
            };
        }

        // The simulator's clock stands in for the server clock; there is
        // no real request to observe a user agent or address from
        let event = TrackingEvent::from_request(request);

        let payload = match serde_json::to_vec(&event) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(event_id = %event.id, "Interceptor failed to serialize: {}", e);
                return TransportResponse {
                    status: 500,
                    body: json!({"error": "Failed to store tracking data"}),
                };
            }
        };

        match self.bus.publish(&event.subject(), payload).await {
            Ok(()) => {
                tracing::debug!(
                    store_id = %event.store_id,
                    event = %event.event,
                    "Interceptor simulated ingestion"
                );
                TransportResponse {
                    status: 201,
                    body: json!({"success": true, "message": "Event tracked successfully"}),
                }
            }
            Err(e) => {
                tracing::warn!("Interceptor failed to broadcast: {}", e);
                TransportResponse {
                    status: 500,
                    body: json!({"error": "Failed to store tracking data"}),
                }
            }
        }
    }
}

#[async_trait]
impl IngestTransport for DevInterceptor {
    async fn send(&self, url: &str, body: Vec<u8>) -> Result<TransportResponse, TransportError> {
        if Self::is_track_route(url) {
            Ok(self.simulate(&body).await)
        } else {
            self.inner.send(url, body).await
        }
    }
}
