//! Client-side event emitter.
//!
//! The Rust counterpart of the embedded widget's command function: events
//! are queued locally first, so emission order is preserved even before
//! the transport is ready, then flushed in order. Delivery is strictly
//! best-effort — a failed send is logged and dropped, never retried and
//! never surfaced to the caller, because breaking the caller is worse
//! than losing an analytics event.

use std::collections::VecDeque;
use std::sync::Arc;

use serde_json::{json, Map, Value};

use event_bus::TrackRequest;

use crate::transport::IngestTransport;

pub struct Emitter {
    store_id: String,
    session_id: Option<String>,
    ingest_url: String,
    queue: VecDeque<TrackRequest>,
    transport: Arc<dyn IngestTransport>,
}

impl Emitter {
    pub fn new(
        store_id: impl Into<String>,
        ingest_url: impl Into<String>,
        transport: Arc<dyn IngestTransport>,
    ) -> Self {
        Self {
            store_id: store_id.into(),
            session_id: None,
            ingest_url: ingest_url.into(),
            queue: VecDeque::new(),
            transport,
        }
    }

    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Queue an event locally; call order is preserved until [`flush`].
    ///
    /// [`flush`]: Emitter::flush
    pub fn emit(&mut self, event: impl Into<String>, data: Map<String, Value>) {
        let mut request = TrackRequest::new(self.store_id.clone(), event).with_data(data);
        if let Some(session_id) = &self.session_id {
            request = request.with_session_id(session_id.clone());
        }
        self.queue.push_back(request);
    }

    /// Queue a `page_view` with the shape the widget emits on load.
    pub fn page_view(&mut self, url: &str, title: &str, referrer: &str) {
        let data = json!({
            "url": url,
            "title": title,
            "referrer": referrer,
        });
        self.emit("page_view", data.as_object().cloned().unwrap_or_default());
    }

    /// Queue a `click` with the shape the widget's delegated listener emits.
    pub fn click(&mut self, element: &str, text: &str) {
        let data = json!({
            "element": element,
            "text": text,
        });
        self.emit("click", data.as_object().cloned().unwrap_or_default());
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Flush queued events through the transport, oldest first.
    ///
    /// Never returns an error: transport failures and non-2xx responses
    /// are logged and the event dropped. There is no retry and no
    /// persistence across flushes.
    pub async fn flush(&mut self) {
        while let Some(request) = self.queue.pop_front() {
            let body = match serde_json::to_vec(&request) {
                Ok(body) => body,
                Err(e) => {
                    tracing::debug!("Dropping unserializable event: {}", e);
                    continue;
                }
            };

            match self.transport.send(&self.ingest_url, body).await {
                Ok(response) if response.is_success() => {
                    tracing::trace!(event = %request.event, "Event delivered");
                }
                Ok(response) => {
                    tracing::debug!(
                        event = %request.event,
                        status = response.status,
                        "Ingest rejected event, dropping"
                    );
                }
                Err(e) => {
                    tracing::debug!(event = %request.event, "Dropping event: {}", e);
                }
            }
        }
    }
}
