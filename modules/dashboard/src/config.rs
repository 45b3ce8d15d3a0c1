use std::env;

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
    pub bus_backend: BusBackend,
    pub nats_url: Option<String>,
    /// Ingestion URL demo emissions are addressed to
    pub ingest_url: String,
    /// How many envelopes the live feed retains
    pub feed_capacity: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port: u16 = env::var("PORT")
            .unwrap_or_else(|_| "8093".to_string())
            .parse()
            .map_err(|_| "PORT must be a valid u16".to_string())?;

        let bus_backend = BusBackend::from_env();
        let nats_url = match bus_backend {
            BusBackend::Nats => Some(
                env::var("NATS_URL").unwrap_or_else(|_| "nats://localhost:4222".to_string()),
            ),
            BusBackend::InMemory => None,
        };

        let ingest_url = env::var("INGEST_URL")
            .unwrap_or_else(|_| "http://localhost:8092/api/track".to_string());

        let feed_capacity: usize = env::var("FEED_CAPACITY")
            .unwrap_or_else(|_| "50".to_string())
            .parse()
            .map_err(|_| "FEED_CAPACITY must be a valid usize".to_string())?;

        Ok(Self {
            host,
            port,
            bus_backend,
            nats_url,
            ingest_url,
            feed_capacity,
        })
    }
}
