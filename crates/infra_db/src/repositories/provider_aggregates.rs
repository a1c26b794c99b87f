//! Provider net-fee aggregate repository
//!
//! Keeps one running total per provider so ranking queries never scan the
//! line history.

use chrono::{DateTime, Utc};
use sqlx::PgConnection;

use domain_claims::ProviderNetFeeAggregate;

use crate::error::DatabaseError;

/// Repository for the `provider_net_fee_aggregate` table
#[derive(Debug, Clone, Copy, Default)]
pub struct ProviderAggregateRepository;

impl ProviderAggregateRepository {
    /// Adds `delta_cents` to the provider's total in one statement
    ///
    /// The row is created with the delta as its total if it does not exist
    /// yet. On conflict PostgreSQL locks the existing row and re-evaluates
    /// the increment against the latest committed total, so two
    /// transactions adding to the same provider serialize on the row lock
    /// and both deltas land. Zero deltas are applied like any other.
    pub async fn atomic_add(
        conn: &mut PgConnection,
        provider_npi: &str,
        delta_cents: i64,
        updated_at: DateTime<Utc>,
    ) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO provider_net_fee_aggregate (provider_npi, total_net_fee_cents, updated_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (provider_npi) DO UPDATE
            SET total_net_fee_cents = provider_net_fee_aggregate.total_net_fee_cents
                                    + EXCLUDED.total_net_fee_cents,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(provider_npi)
        .bind(delta_cents)
        .bind(updated_at)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Retrieves one provider's aggregate
    pub async fn get(
        conn: &mut PgConnection,
        provider_npi: &str,
    ) -> Result<Option<ProviderAggregateRow>, DatabaseError> {
        let row = sqlx::query_as::<_, ProviderAggregateRow>(
            r#"
            SELECT provider_npi, total_net_fee_cents, updated_at
            FROM provider_net_fee_aggregate
            WHERE provider_npi = $1
            "#,
        )
        .bind(provider_npi)
        .fetch_optional(conn)
        .await?;

        Ok(row)
    }

    /// Highest totals first; ties broken by NPI ascending
    pub async fn top(
        conn: &mut PgConnection,
        limit: i64,
    ) -> Result<Vec<ProviderAggregateRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, ProviderAggregateRow>(
            r#"
            SELECT provider_npi, total_net_fee_cents, updated_at
            FROM provider_net_fee_aggregate
            ORDER BY total_net_fee_cents DESC, provider_npi ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(conn)
        .await?;

        Ok(rows)
    }
}

/// Database row for provider aggregate
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProviderAggregateRow {
    pub provider_npi: String,
    pub total_net_fee_cents: i64,
    pub updated_at: DateTime<Utc>,
}

impl From<ProviderAggregateRow> for ProviderNetFeeAggregate {
    fn from(row: ProviderAggregateRow) -> Self {
        ProviderNetFeeAggregate {
            provider_npi: row.provider_npi,
            total_net_fee_cents: row.total_net_fee_cents,
            updated_at: row.updated_at,
        }
    }
}
