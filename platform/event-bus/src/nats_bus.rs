//! NATS-based implementation of the EventBus trait

use crate::{BusError, BusMessage, BusResult, EventBus};
use async_nats::Client;
use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};

/// Production EventBus over a NATS connection.
///
/// The tracking service publishes each persisted envelope here; dashboard
/// instances in other processes subscribe to `tracking.events.>` to drive
/// their live feeds.
///
/// # Example
/// ```rust,no_run
/// use event_bus::{EventBus, NatsBus, tracking_subject};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let nats_client = async_nats::connect("nats://localhost:4222").await?;
/// let bus = NatsBus::new(nats_client);
///
/// bus.publish(&tracking_subject("page_view"), b"{}".to_vec()).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct NatsBus {
    client: Client,
}

impl NatsBus {
    /// Wrap an already-connected `async_nats::Client`.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Direct access to the underlying NATS client for features the
    /// EventBus trait does not expose.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl EventBus for NatsBus {
    async fn publish(&self, subject: &str, payload: Vec<u8>) -> BusResult<()> {
        self.client
            .publish(subject.to_string(), payload.into())
            .await
            .map_err(|e| BusError::PublishError(e.to_string()))?;

        Ok(())
    }

    async fn subscribe(&self, subject: &str) -> BusResult<BoxStream<'static, BusMessage>> {
        let subscriber = self
            .client
            .subscribe(subject.to_string())
            .await
            .map_err(|e| BusError::SubscribeError(e.to_string()))?;

        let stream = subscriber
            .map(|nats_msg| BusMessage::new(nats_msg.subject.to_string(), nats_msg.payload.to_vec()));

        Ok(stream.boxed())
    }
}
