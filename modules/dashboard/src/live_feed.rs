//! Bounded most-recent-first buffer of tracking envelopes.

use std::collections::VecDeque;
use std::sync::Arc;

use futures::StreamExt;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use event_bus::{BusResult, EventBus, TrackingEvent, TRACKING_SUBJECT_WILDCARD};

/// Default number of envelopes the feed retains.
pub const DEFAULT_CAPACITY: usize = 50;

/// In-memory feed of the most recently seen envelopes, newest first.
///
/// Adding to a full feed evicts the oldest entry. Nothing is persisted;
/// the feed starts empty on every process start.
#[derive(Clone)]
pub struct LiveFeed {
    events: Arc<RwLock<VecDeque<TrackingEvent>>>,
    capacity: usize,
}

impl LiveFeed {
    pub fn new(capacity: usize) -> Self {
        Self {
            events: Arc::new(RwLock::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub async fn push(&self, event: TrackingEvent) {
        if self.capacity == 0 {
            return;
        }
        let mut events = self.events.write().await;
        if events.len() == self.capacity {
            events.pop_back();
        }
        events.push_front(event);
    }

    /// Current contents, newest first.
    pub async fn snapshot(&self) -> Vec<TrackingEvent> {
        self.events.read().await.iter().cloned().collect()
    }

    /// Subscribe this feed to every tracking event on the bus.
    ///
    /// The returned task runs until the bus stream ends. Messages that do
    /// not decode as envelopes are logged and discarded.
    pub async fn subscribe(&self, bus: Arc<dyn EventBus>) -> BusResult<JoinHandle<()>> {
        let mut stream = bus.subscribe(TRACKING_SUBJECT_WILDCARD).await?;
        let feed = self.clone();

        Ok(tokio::spawn(async move {
            while let Some(msg) = stream.next().await {
                match serde_json::from_slice::<TrackingEvent>(&msg.payload) {
                    Ok(event) => {
                        tracing::debug!(
                            store_id = %event.store_id,
                            event = %event.event,
                            "Live feed received event"
                        );
                        feed.push(event).await;
                    }
                    Err(e) => {
                        tracing::warn!(
                            subject = %msg.subject,
                            "Discarding undecodable feed message: {}",
                            e
                        );
                    }
                }
            }
            tracing::info!("Live feed bus stream ended");
        }))
    }
}

impl Default for LiveFeed {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
