//! # Tracking Event Envelope
//!
//! The single event shape shared by every layer of the tracking pipeline:
//! the embeddable widget, the dev interceptor, the ingestion endpoint, and
//! the dashboard live feed all speak this envelope.
//!
//! ## Envelope Fields
//!
//! - `id`: unique identifier, assigned at ingestion
//! - `store_id`: the storefront (tenant) that emitted the event
//! - `event`: short event-type tag (`page_view`, `click`, `user_interaction`, ...)
//! - `data`: event-specific JSON object, defaults to `{}`
//! - `session_id`: optional session-correlation token
//! - `timestamp`: assigned by the ingesting side, never trusted from the client
//! - `user_agent` / `ip_address`: server-observed enrichment, nullable
//!
//! Persisted envelopes are append-only: once stored they are never updated
//! or deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Subject prefix for all tracking events on the bus.
pub const TRACKING_SUBJECT_PREFIX: &str = "tracking.events";

/// Wildcard subject matching every tracking event.
pub const TRACKING_SUBJECT_WILDCARD: &str = "tracking.events.>";

/// Build the bus subject for an event-type tag (e.g. `tracking.events.page_view`).
pub fn tracking_subject(event: &str) -> String {
    format!("{}.{}", TRACKING_SUBJECT_PREFIX, event)
}

/// The client-supplied subset of an envelope, as POSTed by the widget or
/// handed to the dev interceptor. Wire format is camelCase JSON.
///
/// `store_id` and `event` default to empty strings when absent so that a
/// missing field and an empty field fail validation the same way.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackRequest {
    #[serde(default)]
    pub store_id: String,

    #[serde(default)]
    pub event: String,

    #[serde(default)]
    pub data: Map<String, Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl TrackRequest {
    pub fn new(store_id: impl Into<String>, event: impl Into<String>) -> Self {
        Self {
            store_id: store_id.into(),
            event: event.into(),
            data: Map::new(),
            session_id: None,
        }
    }

    pub fn with_data(mut self, data: Map<String, Value>) -> Self {
        self.data = data;
        self
    }

    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}

/// A fully enriched tracking event, the unit of transport and storage.
///
/// # Examples
///
/// ```rust
/// use event_bus::{TrackRequest, TrackingEvent};
/// use serde_json::json;
///
/// let request = TrackRequest::new("store-42", "click")
///     .with_data(json!({"element": "button", "text": "Buy"}).as_object().unwrap().clone());
///
/// let event = TrackingEvent::from_request(request)
///     .with_user_agent(Some("Mozilla/5.0".to_string()));
///
/// assert_eq!(event.store_id, "store-42");
/// assert_eq!(event.subject(), "tracking.events.click");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingEvent {
    /// Unique event identifier
    pub id: Uuid,

    /// Storefront that emitted the event
    pub store_id: String,

    /// Event-type tag
    pub event: String,

    /// Event-specific payload
    #[serde(default)]
    pub data: Map<String, Value>,

    /// Optional session-correlation token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    /// Assigned by the ingesting side (server clock, or the simulator's
    /// clock in the dev interceptor path)
    pub timestamp: DateTime<Utc>,

    /// User agent observed from request headers, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,

    /// First address of the forwarded-for chain, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
}

impl TrackingEvent {
    /// Promote a client request into an envelope, stamping a fresh id and
    /// the current time. Enrichment fields start out empty.
    pub fn from_request(request: TrackRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            store_id: request.store_id,
            event: request.event,
            data: request.data,
            session_id: request.session_id,
            timestamp: Utc::now(),
            user_agent: None,
            ip_address: None,
        }
    }

    pub fn with_user_agent(mut self, user_agent: Option<String>) -> Self {
        self.user_agent = user_agent;
        self
    }

    pub fn with_ip_address(mut self, ip_address: Option<String>) -> Self {
        self.ip_address = ip_address;
        self
    }

    /// Bus subject this event is published on.
    pub fn subject(&self) -> String {
        tracking_subject(&self.event)
    }
}

/// Validate the client-supplied subset of an envelope.
///
/// # Validation Rules
///
/// - `store_id`: must be non-empty
/// - `event`: must be non-empty
///
/// `data` and `session_id` are optional. The returned error string is the
/// exact message the ingestion endpoint surfaces to callers, so the real
/// endpoint and the dev interceptor reject identically.
pub fn validate_track_request(request: &TrackRequest) -> Result<(), String> {
    if request.store_id.is_empty() || request.event.is_empty() {
        return Err("Missing required fields: storeId and event".to_string());
    }
    Ok(())
}
