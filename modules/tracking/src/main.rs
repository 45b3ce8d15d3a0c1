use axum::http::{header, HeaderName};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

use event_bus::{EventBus, InMemoryBus, NatsBus};
use tracking_rs::{
    config::{BusBackend, Config, StoreBackend},
    db::init_pool,
    routes::tracking_router,
    store::{EventStore, InMemoryEventStore, PgEventStore},
    AppState,
};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    tracing::info!("Starting tracking service...");

    let config = Config::from_env().expect("Failed to load configuration from environment");

    let store: Arc<dyn EventStore> = match config.store_backend {
        StoreBackend::Postgres => {
            let database_url = config
                .database_url
                .as_ref()
                .expect("DATABASE_URL required for postgres store");

            tracing::info!("Connecting to database...");
            let pool = init_pool(database_url)
                .await
                .expect("Failed to connect to database");

            tracing::info!("Running migrations...");
            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .expect("Failed to run migrations");

            Arc::new(PgEventStore::new(pool))
        }
        StoreBackend::InMemory => {
            tracing::warn!("Using in-memory event store; tracked events will not survive restart");
            Arc::new(InMemoryEventStore::new())
        }
    };

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

    let state = AppState {
        store,
        bus,
        public_url: config.public_url.clone(),
    };

    // The track route is called from arbitrary storefront origins, so CORS
    // must stay permissive; the header list matches the published contract.
    let app = tracking_router(state).layer(
        CorsLayer::new()
            .allow_origin(tower_http::cors::Any)
            .allow_methods(tower_http::cors::Any)
            .allow_headers([
                header::AUTHORIZATION,
                HeaderName::from_static("x-client-info"),
                HeaderName::from_static("apikey"),
                header::CONTENT_TYPE,
            ]),
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Tracking service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app)
        .await
        .expect("Server failed to start");
}
