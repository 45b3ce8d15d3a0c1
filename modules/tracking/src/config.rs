use std::env;

/// Which event store backend to run against.
#[derive(Debug, Clone)]
pub enum StoreBackend {
    Postgres,
    InMemory,
}

impl StoreBackend {
    pub fn from_env() -> Self {
        match env::var("STORE_TYPE")
            .unwrap_or_else(|_| "inmemory".to_string())
            .to_lowercase()
            .as_str()
        {
            "postgres" => StoreBackend::Postgres,
            "inmemory" => StoreBackend::InMemory,
            _ => {
                tracing::warn!("Unknown STORE_TYPE, defaulting to inmemory");
                StoreBackend::InMemory
            }
        }
    }
}

#[derive(Debug, Clone)]
pub enum BusBackend {
    Nats,
    InMemory,
}

impl BusBackend {
    pub fn from_env() -> Self {
        match env::var("BUS_TYPE")
            .unwrap_or_else(|_| "inmemory".to_string())
            .to_lowercase()
            .as_str()
        {
            "nats" => BusBackend::Nats,
            "inmemory" => BusBackend::InMemory,
            _ => {
                tracing::warn!("Unknown BUS_TYPE, defaulting to inmemory");
                BusBackend::InMemory
            }
        }
    }
}

/// Service configuration parsed from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub store_backend: StoreBackend,
    pub database_url: Option<String>,
    pub bus_backend: BusBackend,
    pub nats_url: Option<String>,
    /// Base URL third-party storefronts reach this service on; embedded
    /// into widget snippets as the ingestion origin.
    pub public_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port: u16 = env::var("PORT")
            .unwrap_or_else(|_| "8092".to_string())
            .parse()
            .map_err(|_| "PORT must be a valid u16".to_string())?;

        let store_backend = StoreBackend::from_env();
        let database_url = match store_backend {
            StoreBackend::Postgres => Some(
                env::var("DATABASE_URL")
                    .map_err(|_| "DATABASE_URL must be set when STORE_TYPE=postgres".to_string())?,
            ),
            StoreBackend::InMemory => None,
        };

        let bus_backend = BusBackend::from_env();
        let nats_url = match bus_backend {
            BusBackend::Nats => Some(
                env::var("NATS_URL").unwrap_or_else(|_| "nats://localhost:4222".to_string()),
            ),
            BusBackend::InMemory => None,
        };

        let public_url =
            env::var("PUBLIC_URL").unwrap_or_else(|_| format!("http://localhost:{}", port));

        Ok(Self {
            host,
            port,
            store_backend,
            database_url,
            bus_backend,
            nats_url,
            public_url,
        })
    }
}
