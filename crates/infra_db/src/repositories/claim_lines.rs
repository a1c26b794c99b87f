//! Claim line repository implementation
//!
//! Lines are written with one multi-row INSERT per chunk rather than one
//! statement per line.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, Postgres, QueryBuilder};
use uuid::Uuid;

use core_kernel::ClaimId;
use domain_claims::ClaimLineRecord;

use crate::error::DatabaseError;

/// Rows per INSERT statement; 13 bind parameters per row stays well under
/// the PostgreSQL limit of 65535
const INSERT_CHUNK_SIZE: usize = 1000;

/// Repository for claim lines
#[derive(Debug, Clone, Copy, Default)]
pub struct ClaimLineRepository;

impl ClaimLineRepository {
    /// Inserts all lines, returning the generated keys in input order
    pub async fn bulk_create(
        conn: &mut PgConnection,
        lines: &[ClaimLineRecord],
    ) -> Result<Vec<i64>, DatabaseError> {
        let mut ids = Vec::with_capacity(lines.len());

        for chunk in lines.chunks(INSERT_CHUNK_SIZE) {
            let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
                "INSERT INTO claim_lines (\
                    claim_id, service_date, plan_group, subscriber_id, provider_npi, \
                    submitted_procedure, quadrant, provider_fees_cents, allowed_fees_cents, \
                    member_coinsurance_cents, member_copay_cents, net_fee_cents, created_at) ",
            );

            builder.push_values(chunk, |mut row, line| {
                row.push_bind(Uuid::from(line.claim_id))
                    .push_bind(line.service_date)
                    .push_bind(line.plan_group.as_str())
                    .push_bind(line.subscriber_id.as_str())
                    .push_bind(line.provider_npi.as_str())
                    .push_bind(line.submitted_procedure.as_str())
                    .push_bind(line.quadrant.as_deref())
                    .push_bind(line.provider_fees_cents)
                    .push_bind(line.allowed_fees_cents)
                    .push_bind(line.member_coinsurance_cents)
                    .push_bind(line.member_copay_cents)
                    .push_bind(line.net_fee_cents)
                    .push_bind(line.created_at);
            });
            builder.push(" RETURNING id");

            // Multi-row VALUES returns rows in insertion order
            let chunk_ids: Vec<i64> = builder
                .build_query_scalar()
                .fetch_all(&mut *conn)
                .await?;
            ids.extend(chunk_ids);
        }

        Ok(ids)
    }

    /// Retrieves all lines of a claim ordered by key
    pub async fn find_by_claim(
        conn: &mut PgConnection,
        claim_id: ClaimId,
    ) -> Result<Vec<ClaimLineRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, ClaimLineRow>(
            r#"
            SELECT
                id, claim_id, service_date, plan_group, subscriber_id, provider_npi,
                submitted_procedure, quadrant, provider_fees_cents, allowed_fees_cents,
                member_coinsurance_cents, member_copay_cents, net_fee_cents, created_at
            FROM claim_lines
            WHERE claim_id = $1
            ORDER BY id
            "#,
        )
        .bind(Uuid::from(claim_id))
        .fetch_all(conn)
        .await?;

        Ok(rows)
    }

    /// Sums committed net fees for a provider directly from the lines
    ///
    /// Used to check the running aggregate against the line history.
    pub async fn sum_net_fee_for_provider(
        conn: &mut PgConnection,
        provider_npi: &str,
    ) -> Result<i64, DatabaseError> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(net_fee_cents), 0)::BIGINT FROM claim_lines WHERE provider_npi = $1",
        )
        .bind(provider_npi)
        .fetch_one(conn)
        .await?;

        Ok(total)
    }
}

/// Database row for claim line
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ClaimLineRow {
    pub id: i64,
    pub claim_id: Uuid,
    pub service_date: DateTime<Utc>,
    pub plan_group: String,
    pub subscriber_id: String,
    pub provider_npi: String,
    pub submitted_procedure: String,
    pub quadrant: Option<String>,
    pub provider_fees_cents: i64,
    pub allowed_fees_cents: i64,
    pub member_coinsurance_cents: i64,
    pub member_copay_cents: i64,
    pub net_fee_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl From<ClaimLineRow> for ClaimLineRecord {
    fn from(row: ClaimLineRow) -> Self {
        ClaimLineRecord {
            claim_id: ClaimId::from_uuid(row.claim_id),
            service_date: row.service_date,
            submitted_procedure: row.submitted_procedure,
            quadrant: row.quadrant,
            plan_group: row.plan_group,
            subscriber_id: row.subscriber_id,
            provider_npi: row.provider_npi,
            provider_fees_cents: row.provider_fees_cents,
            allowed_fees_cents: row.allowed_fees_cents,
            member_coinsurance_cents: row.member_coinsurance_cents,
            member_copay_cents: row.member_copay_cents,
            net_fee_cents: row.net_fee_cents,
            created_at: row.created_at,
        }
    }
}
