pub mod config;
pub mod emitter;
pub mod health;
pub mod live_feed;
pub mod routes;
pub mod transport;

use std::sync::Arc;

use live_feed::LiveFeed;
use transport::IngestTransport;

/// Shared state handed to every route handler.
#[derive(Clone)]
pub struct AppState {
    /// Bounded most-recent-first buffer of envelopes seen on the bus
    pub feed: LiveFeed,
    /// Transport demo emissions go out on — the dev interceptor in dev
    /// mode, a real HTTP client otherwise
    pub transport: Arc<dyn IngestTransport>,
    /// Ingestion URL demo emissions are addressed to
    pub ingest_url: String,
}
