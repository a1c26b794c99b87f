//! Transactional outbox events
//!
//! A `claim.processed` row is written in the same unit of work as the claim
//! itself, so downstream consumers see exactly the committed claims.
//! Publishing the rows is left to a separate dispatcher.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use core_kernel::OutboxEventId;

use crate::builder::BuiltClaim;

/// Event type written after a claim is fully persisted
pub const CLAIM_PROCESSED_EVENT: &str = "claim.processed";

/// Delivery status of an outbox row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutboxStatus {
    Pending,
    Published,
    Failed,
}

impl OutboxStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutboxStatus::Pending => "pending",
            OutboxStatus::Published => "published",
            OutboxStatus::Failed => "failed",
        }
    }
}

/// An event awaiting publication
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboxEvent {
    pub id: OutboxEventId,
    pub event_type: String,
    pub aggregate_id: Uuid,
    pub payload: serde_json::Value,
    pub status: OutboxStatus,
    pub created_at: DateTime<Utc>,
}

impl OutboxEvent {
    /// Builds the `claim.processed` event for a built claim
    pub fn claim_processed(built: &BuiltClaim) -> Self {
        let provider_deltas: Vec<serde_json::Value> = built
            .provider_deltas
            .iter()
            .map(|(provider_npi, delta_cents)| {
                json!({ "provider_npi": provider_npi, "delta_cents": delta_cents })
            })
            .collect();

        let payload = json!({
            "claim_id": built.claim.id.as_uuid(),
            "claim_reference": built.claim.claim_reference,
            "line_count": built.lines.len(),
            "provider_deltas": provider_deltas,
            "total_net_fee_cents": built.provider_deltas.total().value(),
        });

        Self {
            id: OutboxEventId::new(),
            event_type: CLAIM_PROCESSED_EVENT.to_string(),
            aggregate_id: *built.claim.id.as_uuid(),
            payload,
            status: OutboxStatus::Pending,
            created_at: built.claim.created_at,
        }
    }
}
