//! Append-only event store with a config-driven backend swap.
//!
//! `PgEventStore` is the production backend; `InMemoryEventStore` backs
//! local development and tests, the same arrangement the event bus uses
//! for NATS vs in-memory.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use event_bus::TrackingEvent;
use serde_json::{Map, Value};
use sqlx::PgPool;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// The persistence seam of the ingestion pipeline.
///
/// Records are immutable once appended; there is no update or delete.
/// `recent` is the only read shape the pipeline needs: every aggregation
/// is computed over a bounded most-recent-first scan.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Append exactly one record.
    async fn append(&self, event: &TrackingEvent) -> Result<(), StoreError>;

    /// The most recent events, newest first, at most `limit`.
    async fn recent(&self, limit: i64) -> Result<Vec<TrackingEvent>, StoreError>;
}

/// PostgreSQL-backed event store
pub struct PgEventStore {
    pool: PgPool,
}

impl PgEventStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventStore for PgEventStore {
    async fn append(&self, event: &TrackingEvent) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO tracking_events
                (id, store_id, event, data, session_id, user_agent, ip_address, occurred_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(event.id)
        .bind(&event.store_id)
        .bind(&event.event)
        .bind(Value::Object(event.data.clone()))
        .bind(&event.session_id)
        .bind(&event.user_agent)
        .bind(&event.ip_address)
        .bind(event.timestamp)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn recent(&self, limit: i64) -> Result<Vec<TrackingEvent>, StoreError> {
        type Row = (
            Uuid,
            String,
            String,
            Value,
            Option<String>,
            Option<String>,
            Option<String>,
            DateTime<Utc>,
        );

        let rows = sqlx::query_as::<_, Row>(
            r#"
            SELECT id, store_id, event, data, session_id, user_agent, ip_address, occurred_at
            FROM tracking_events
            ORDER BY occurred_at DESC, id
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| TrackingEvent {
                id: row.0,
                store_id: row.1,
                event: row.2,
                data: match row.3 {
                    Value::Object(map) => map,
                    _ => Map::new(),
                },
                session_id: row.4,
                user_agent: row.5,
                ip_address: row.6,
                timestamp: row.7,
            })
            .collect())
    }
}

/// In-memory event store for dev and tests.
///
/// Appends are kept in arrival order, which for this store is also
/// timestamp order since the ingesting side stamps the clock on append.
#[derive(Default)]
pub struct InMemoryEventStore {
    events: RwLock<Vec<TrackingEvent>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn append(&self, event: &TrackingEvent) -> Result<(), StoreError> {
        self.events.write().await.push(event.clone());
        Ok(())
    }

    async fn recent(&self, limit: i64) -> Result<Vec<TrackingEvent>, StoreError> {
        let events = self.events.read().await;
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(events.iter().rev().take(limit).cloned().collect())
    }
}
