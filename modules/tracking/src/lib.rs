pub mod aggregate;
pub mod client_meta;
pub mod config;
pub mod db;
pub mod health;
pub mod routes;
pub mod store;
pub mod widget;

use std::sync::Arc;

use event_bus::EventBus;
use store::EventStore;

/// Shared state handed to every route handler.
#[derive(Clone)]
pub struct AppState {
    /// Append-only event store (Postgres in production, in-memory in dev/test)
    pub store: Arc<dyn EventStore>,
    /// Bus the service fans persisted envelopes out on, best-effort
    pub bus: Arc<dyn EventBus>,
    /// Public base URL embedded into generated widget snippets
    pub public_url: String,
}
