//! Outbox repository implementation

use chrono::{DateTime, Utc};
use sqlx::PgConnection;
use uuid::Uuid;

use domain_claims::OutboxEvent;

use crate::error::DatabaseError;

/// Repository for the `outbox_events` table
#[derive(Debug, Clone, Copy, Default)]
pub struct OutboxRepository;

impl OutboxRepository {
    pub async fn insert(conn: &mut PgConnection, event: &OutboxEvent) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO outbox_events (id, event_type, aggregate_id, payload, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(Uuid::from(event.id))
        .bind(event.event_type.as_str())
        .bind(event.aggregate_id)
        .bind(&event.payload)
        .bind(event.status.as_str())
        .bind(event.created_at)
        .execute(conn)
        .await?;

        Ok(())
    }

    pub async fn find_by_aggregate(
        conn: &mut PgConnection,
        aggregate_id: Uuid,
    ) -> Result<Vec<OutboxRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, OutboxRow>(
            r#"
            SELECT id, event_type, aggregate_id, payload, status, created_at
            FROM outbox_events
            WHERE aggregate_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(aggregate_id)
        .fetch_all(conn)
        .await?;

        Ok(rows)
    }
}

/// Database row for outbox event
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OutboxRow {
    pub id: Uuid,
    pub event_type: String,
    pub aggregate_id: Uuid,
    pub payload: serde_json::Value,
    pub status: String,
    pub created_at: DateTime<Utc>,
}
