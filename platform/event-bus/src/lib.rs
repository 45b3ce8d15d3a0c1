//! # EventBus Abstraction
//!
//! The pub/sub capability the tracking pipeline fans events out on: the
//! ingestion service publishes every persisted envelope, and the dashboard
//! live feed (or any other same-process subscriber) consumes the stream.
//!
//! ## Why This Lives in `platform/`
//!
//! The bus is a shared runtime capability. Keeping it in a platform crate
//! lets the tracking and dashboard services depend on it without depending
//! on each other, and allows a config-driven swap between NATS (production)
//! and InMemory (dev/test) — the same swap the dev interceptor relies on to
//! simulate ingestion without a network hop.
//!
//! ## Implementations
//!
//! - **NatsBus**: production implementation over a NATS connection
//! - **InMemoryBus**: dev/test implementation over tokio broadcast channels
//!
//! ## Usage
//!
//! ```rust,no_run
//! use event_bus::{EventBus, NatsBus, InMemoryBus, tracking_subject};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Production: NATS
//! let nats_client = async_nats::connect("nats://localhost:4222").await?;
//! let bus: Arc<dyn EventBus> = Arc::new(NatsBus::new(nats_client));
//!
//! // Dev/Test: In-Memory
//! let bus: Arc<dyn EventBus> = Arc::new(InMemoryBus::new());
//!
//! // Publish a tracked event
//! let payload = serde_json::to_vec(&serde_json::json!({
//!     "storeId": "store-42",
//!     "event": "page_view"
//! }))?;
//! bus.publish(&tracking_subject("page_view"), payload).await?;
//!
//! // Subscribe to every tracking event
//! let mut stream = bus.subscribe("tracking.events.>").await?;
//! while let Some(msg) = futures::StreamExt::next(&mut stream).await {
//!     println!("Received: {} bytes on {}", msg.payload.len(), msg.subject);
//! }
//! # Ok(())
//! # }
//! ```

mod envelope;
mod inmemory_bus;
mod nats_bus;

pub use envelope::{
    tracking_subject, validate_track_request, TrackRequest, TrackingEvent,
    TRACKING_SUBJECT_PREFIX, TRACKING_SUBJECT_WILDCARD,
};
pub use inmemory_bus::InMemoryBus;
pub use nats_bus::NatsBus;

use async_trait::async_trait;
use futures::stream::BoxStream;
use std::fmt;

/// A message received from the event bus
#[derive(Debug, Clone)]
pub struct BusMessage {
    /// The subject this message was published to
    pub subject: String,
    /// The message payload (raw bytes, JSON-encoded envelope for tracking subjects)
    pub payload: Vec<u8>,
}

impl BusMessage {
    pub fn new(subject: String, payload: Vec<u8>) -> Self {
        Self { subject, payload }
    }
}

/// Errors that can occur when using the event bus
#[derive(Debug, thiserror::Error)]
pub enum BusError {
    #[error("failed to publish message: {0}")]
    PublishError(String),

    #[error("failed to subscribe to subject: {0}")]
    SubscribeError(String),

    #[error("connection error: {0}")]
    ConnectionError(String),

    #[error("serialization error: {0}")]
    SerializationError(String),
}

/// Result type for event bus operations
pub type BusResult<T> = Result<T, BusError>;

/// Core publish-subscribe abstraction.
///
/// Delivery is best-effort: publishing to a subject nobody listens on is
/// not an error, and the tracking pipeline never blocks an HTTP response
/// on a publish.
#[async_trait]
pub trait EventBus: Send + Sync {
    /// Publish a message to a subject (e.g. `tracking.events.page_view`).
    async fn publish(&self, subject: &str, payload: Vec<u8>) -> BusResult<()>;

    /// Subscribe to messages matching a subject pattern.
    ///
    /// Patterns use NATS-style wildcards:
    /// - `*` matches a single token (`tracking.*.page_view`)
    /// - `>` matches one or more trailing tokens (`tracking.events.>`)
    ///
    /// # Example
    /// ```rust,no_run
    /// # use event_bus::{EventBus, InMemoryBus, TRACKING_SUBJECT_WILDCARD};
    /// # use futures::StreamExt;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let bus = InMemoryBus::new();
    /// let mut stream = bus.subscribe(TRACKING_SUBJECT_WILDCARD).await?;
    /// while let Some(msg) = stream.next().await {
    ///     // Process envelope
    /// }
    /// # Ok(())
    /// # }
    /// ```
    async fn subscribe(&self, subject: &str) -> BusResult<BoxStream<'static, BusMessage>>;
}

impl fmt::Debug for dyn EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventBus")
    }
}
