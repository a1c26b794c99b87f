//! Claims repository implementation
//!
//! This module provides database access for claim headers.

use chrono::{DateTime, Utc};
use sqlx::PgConnection;
use uuid::Uuid;

use core_kernel::ClaimId;
use domain_claims::ClaimRecord;

use crate::error::DatabaseError;

/// Repository for claim headers
///
/// Statements run on the caller's connection, which is usually a
/// transaction shared with the line and aggregate repositories.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClaimRepository;

impl ClaimRepository {
    /// Inserts a claim header
    pub async fn create(conn: &mut PgConnection, claim: &ClaimRecord) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO claims (id, claim_reference, created_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(Uuid::from(claim.id))
        .bind(claim.claim_reference.as_deref())
        .bind(claim.created_at)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Retrieves a claim by its identifier
    ///
    /// # Returns
    ///
    /// The claim record or NotFound error
    pub async fn get_by_id(conn: &mut PgConnection, claim_id: ClaimId) -> Result<ClaimRow, DatabaseError> {
        sqlx::query_as::<_, ClaimRow>(
            r#"
            SELECT id, claim_reference, created_at
            FROM claims
            WHERE id = $1
            "#,
        )
        .bind(Uuid::from(claim_id))
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Claim", claim_id))
    }

    /// Counts claims carrying a caller reference
    pub async fn count_by_reference(
        conn: &mut PgConnection,
        claim_reference: &str,
    ) -> Result<i64, DatabaseError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM claims WHERE claim_reference = $1")
            .bind(claim_reference)
            .fetch_one(conn)
            .await?;

        Ok(count)
    }
}

/// Database row for claim
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ClaimRow {
    pub id: Uuid,
    pub claim_reference: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<ClaimRow> for ClaimRecord {
    fn from(row: ClaimRow) -> Self {
        ClaimRecord {
            id: ClaimId::from_uuid(row.id),
            claim_reference: row.claim_reference,
            created_at: row.created_at,
        }
    }
}
