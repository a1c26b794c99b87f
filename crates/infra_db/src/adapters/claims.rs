//! PostgreSQL Claims Adapter
//!
//! This module provides the internal (database) adapter for the claims
//! domain, implementing `ClaimsStore` and `ClaimsUnitOfWork` on top of the
//! repositories.
//!
//! # Overview
//!
//! - `PgClaimsStore` holds the pool, opens transactions and serves reads
//! - `PgClaimsUnitOfWork` owns one `sqlx::Transaction`; every write for a
//!   claim runs on it. Dropping it without commit rolls the transaction back.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::adapters::PgClaimsStore;
//! use domain_claims::{ClaimService, ClaimsStore};
//! use std::sync::Arc;
//!
//! let store: Arc<dyn ClaimsStore> = Arc::new(PgClaimsStore::new(pool));
//! let claim = ClaimService::new().submit(store.as_ref(), submission).await?;
//! ```

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, instrument};

use core_kernel::{DomainPort, PortError};
use domain_claims::{
    ClaimLineRecord, ClaimRecord, ClaimsStore, ClaimsUnitOfWork, OutboxEvent,
    ProviderNetFeeAggregate,
};

use crate::error::DatabaseError;
use crate::repositories::{
    ClaimLineRepository, ClaimRepository, OutboxRepository, ProviderAggregateRepository,
};

/// PostgreSQL-backed implementation of the ClaimsStore trait
#[derive(Debug, Clone)]
pub struct PgClaimsStore {
    pool: PgPool,
}

impl PgClaimsStore {
    /// Creates a new adapter with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns the underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl DomainPort for PgClaimsStore {}

#[async_trait]
impl ClaimsStore for PgClaimsStore {
    #[instrument(skip(self))]
    async fn begin(&self) -> Result<Box<dyn ClaimsUnitOfWork>, PortError> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(DatabaseError::from)?;
        Ok(Box::new(PgClaimsUnitOfWork { tx }))
    }

    #[instrument(skip(self))]
    async fn top_providers(&self, limit: i64) -> Result<Vec<ProviderNetFeeAggregate>, PortError> {
        let mut conn = self.pool.acquire().await.map_err(DatabaseError::from)?;
        let rows = ProviderAggregateRepository::top(&mut *conn, limit).await?;
        debug!(count = rows.len(), "Fetched top providers");
        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn provider_aggregate(
        &self,
        provider_npi: &str,
    ) -> Result<Option<ProviderNetFeeAggregate>, PortError> {
        let mut conn = self.pool.acquire().await.map_err(DatabaseError::from)?;
        let row = ProviderAggregateRepository::get(&mut *conn, provider_npi).await?;
        Ok(row.map(Into::into))
    }

    async fn ping(&self) -> Result<(), PortError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::from)?;
        Ok(())
    }
}

/// A claim transaction on PostgreSQL
pub struct PgClaimsUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

impl PgClaimsUnitOfWork {
    /// Wraps an already-open transaction
    pub fn new(tx: Transaction<'static, Postgres>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl ClaimsUnitOfWork for PgClaimsUnitOfWork {
    #[instrument(skip(self, claim), fields(claim_id = %claim.id))]
    async fn create_claim(&mut self, claim: &ClaimRecord) -> Result<(), PortError> {
        ClaimRepository::create(&mut *self.tx, claim).await?;
        Ok(())
    }

    #[instrument(skip(self, lines), fields(count = lines.len()))]
    async fn bulk_create_lines(&mut self, lines: &[ClaimLineRecord]) -> Result<Vec<i64>, PortError> {
        let ids = ClaimLineRepository::bulk_create(&mut *self.tx, lines).await?;
        Ok(ids)
    }

    #[instrument(skip(self))]
    async fn add_provider_net_fee(
        &mut self,
        provider_npi: &str,
        delta_cents: i64,
    ) -> Result<(), PortError> {
        ProviderAggregateRepository::atomic_add(&mut *self.tx, provider_npi, delta_cents, Utc::now())
            .await?;
        Ok(())
    }

    #[instrument(skip(self, event), fields(event_type = %event.event_type))]
    async fn record_outbox_event(&mut self, event: &OutboxEvent) -> Result<(), PortError> {
        OutboxRepository::insert(&mut *self.tx, event).await?;
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), PortError> {
        let this = *self;
        this.tx.commit().await.map_err(DatabaseError::from)?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), PortError> {
        let this = *self;
        this.tx.rollback().await.map_err(DatabaseError::from)?;
        Ok(())
    }
}
