use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

use dashboard_rs::{
    config::{BusBackend, Config},
    live_feed::LiveFeed,
    routes::dashboard_router,
    transport::{DevInterceptor, HttpTransport, IngestTransport},
    AppState,
};
use event_bus::{EventBus, InMemoryBus, NatsBus};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    tracing::info!("Starting dashboard service...");

    let config = Config::from_env().expect("Failed to load configuration from environment");

    let bus: Arc<dyn EventBus> = match config.bus_backend {
        BusBackend::Nats => {
            let nats_url = config.nats_url.as_ref().expect("NATS_URL required for NATS bus");
            tracing::info!("Connecting to NATS at {}", nats_url);
            let client = async_nats::connect(nats_url)
                .await
                .expect("Failed to connect to NATS");
            Arc::new(NatsBus::new(client))
        }
        BusBackend::InMemory => {
            tracing::info!("Using in-memory event bus");
            Arc::new(InMemoryBus::new())
        }
    };

    let feed = LiveFeed::new(config.feed_capacity);
    feed.subscribe(bus.clone())
        .await
        .expect("Failed to subscribe live feed to bus");

    // With an in-memory bus there is no tracking service on the other end,
    // so demo emissions are intercepted and simulated in-process; the feed
    // receives them over the same bus a real deployment would use.
    let transport: Arc<dyn IngestTransport> = match config.bus_backend {
        BusBackend::InMemory => {
            tracing::info!("Installing dev interceptor for {}", config.ingest_url);
            Arc::new(DevInterceptor::new(
                Arc::new(HttpTransport::new()),
                bus.clone(),
            ))
        }
        BusBackend::Nats => Arc::new(HttpTransport::new()),
    };

    let state = AppState {
        feed,
        transport,
        ingest_url: config.ingest_url.clone(),
    };

    let app = dashboard_router(state).layer(
        CorsLayer::new()
            .allow_origin(tower_http::cors::Any)
            .allow_methods(tower_http::cors::Any)
            .allow_headers(tower_http::cors::Any),
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Dashboard service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app)
        .await
        .expect("Server failed to start");
}
