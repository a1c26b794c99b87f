//! Claims Domain Ports
//!
//! This module defines the storage interfaces the claims domain needs,
//! enabling swappable implementations (PostgreSQL, in-memory mock).
//!
//! # Architecture
//!
//! - [`ClaimsStore`] is the long-lived handle shared by request handlers. It
//!   opens units of work and serves the read-side queries.
//! - [`ClaimsUnitOfWork`] is one all-or-nothing transaction. Every write for
//!   a claim goes through the same unit of work; nothing is visible to other
//!   readers until [`ClaimsUnitOfWork::commit`]. Dropping an uncommitted unit
//!   of work discards its writes.
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_claims::{ClaimService, ClaimsStore};
//!
//! async fn handle(store: &dyn ClaimsStore, service: &ClaimService, submission: ClaimSubmission) {
//!     let mut uow = store.begin().await?;
//!     let claim = service.process(uow.as_mut(), submission).await?;
//!     uow.commit().await?;
//! }
//! ```

use async_trait::async_trait;

use core_kernel::{DomainPort, PortError};

use crate::claim::{ClaimLineRecord, ClaimRecord, ProviderNetFeeAggregate};
use crate::outbox::OutboxEvent;

/// One transaction's worth of claim writes
#[async_trait]
pub trait ClaimsUnitOfWork: Send {
    /// Inserts the claim header
    async fn create_claim(&mut self, claim: &ClaimRecord) -> Result<(), PortError>;

    /// Inserts all lines of a claim, returning their assigned keys in input order
    async fn bulk_create_lines(&mut self, lines: &[ClaimLineRecord]) -> Result<Vec<i64>, PortError>;

    /// Atomically adds `delta_cents` to the provider's running total,
    /// creating the aggregate row on first use
    async fn add_provider_net_fee(
        &mut self,
        provider_npi: &str,
        delta_cents: i64,
    ) -> Result<(), PortError>;

    /// Writes an outbox row
    async fn record_outbox_event(&mut self, event: &OutboxEvent) -> Result<(), PortError>;

    /// Makes every write of this unit of work visible at once
    async fn commit(self: Box<Self>) -> Result<(), PortError>;

    /// Discards every write of this unit of work
    async fn rollback(self: Box<Self>) -> Result<(), PortError>;
}

/// Shared entry point to claims storage
#[async_trait]
pub trait ClaimsStore: DomainPort {
    /// Opens a new unit of work
    async fn begin(&self) -> Result<Box<dyn ClaimsUnitOfWork>, PortError>;

    /// Providers ordered by total net fee descending, ties by NPI ascending
    async fn top_providers(&self, limit: i64) -> Result<Vec<ProviderNetFeeAggregate>, PortError>;

    /// Running total for one provider, if any claim has touched it
    async fn provider_aggregate(
        &self,
        provider_npi: &str,
    ) -> Result<Option<ProviderNetFeeAggregate>, PortError>;

    /// Checks that the backing store is reachable
    async fn ping(&self) -> Result<(), PortError>;
}

/// In-memory implementation for tests
///
/// Writes are staged inside the unit of work and applied under a single lock
/// on commit, so atomicity and concurrent increments behave as they do
/// against PostgreSQL.
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use chrono::Utc;
    use core_kernel::ClaimId;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicI64, Ordering};
    use std::sync::Arc;
    use tokio::sync::Mutex;

    /// Operation at which a mock unit of work reports a storage failure
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum FailurePoint {
        CreateClaim,
        BulkCreateLines,
        AddProviderNetFee,
        RecordOutboxEvent,
        Commit,
    }

    #[derive(Debug, Default)]
    struct StoreState {
        claims: HashMap<ClaimId, ClaimRecord>,
        lines: Vec<(i64, ClaimLineRecord)>,
        aggregates: HashMap<String, ProviderNetFeeAggregate>,
        outbox: Vec<OutboxEvent>,
    }

    /// In-memory mock implementation of ClaimsStore
    #[derive(Debug, Clone, Default)]
    pub struct InMemoryClaimsStore {
        state: Arc<Mutex<StoreState>>,
        line_sequence: Arc<AtomicI64>,
        failure: Option<FailurePoint>,
    }

    impl InMemoryClaimsStore {
        /// Creates a new empty store
        pub fn new() -> Self {
            Self::default()
        }

        /// Creates a store whose units of work fail at the given point
        pub fn failing_at(point: FailurePoint) -> Self {
            Self {
                failure: Some(point),
                ..Self::default()
            }
        }

        /// Pre-populates provider totals for testing
        pub async fn with_provider_totals(totals: &[(&str, i64)]) -> Self {
            let store = Self::new();
            {
                let mut state = store.state.lock().await;
                for (npi, total) in totals {
                    state.aggregates.insert(
                        npi.to_string(),
                        ProviderNetFeeAggregate {
                            provider_npi: npi.to_string(),
                            total_net_fee_cents: *total,
                            updated_at: Utc::now(),
                        },
                    );
                }
            }
            store
        }

        pub async fn claim(&self, id: ClaimId) -> Option<ClaimRecord> {
            self.state.lock().await.claims.get(&id).cloned()
        }

        pub async fn lines_for(&self, id: ClaimId) -> Vec<ClaimLineRecord> {
            self.state
                .lock()
                .await
                .lines
                .iter()
                .filter(|(_, line)| line.claim_id == id)
                .map(|(_, line)| line.clone())
                .collect()
        }

        pub async fn provider_total(&self, provider_npi: &str) -> Option<i64> {
            self.state
                .lock()
                .await
                .aggregates
                .get(provider_npi)
                .map(|agg| agg.total_net_fee_cents)
        }

        pub async fn claim_count(&self) -> usize {
            self.state.lock().await.claims.len()
        }

        pub async fn line_count(&self) -> usize {
            self.state.lock().await.lines.len()
        }

        pub async fn outbox_events(&self) -> Vec<OutboxEvent> {
            self.state.lock().await.outbox.clone()
        }
    }

    impl DomainPort for InMemoryClaimsStore {}

    #[async_trait]
    impl ClaimsStore for InMemoryClaimsStore {
        async fn begin(&self) -> Result<Box<dyn ClaimsUnitOfWork>, PortError> {
            Ok(Box::new(InMemoryUnitOfWork {
                state: Arc::clone(&self.state),
                line_sequence: Arc::clone(&self.line_sequence),
                failure: self.failure,
                claims: Vec::new(),
                lines: Vec::new(),
                deltas: Vec::new(),
                outbox: Vec::new(),
            }))
        }

        async fn top_providers(
            &self,
            limit: i64,
        ) -> Result<Vec<ProviderNetFeeAggregate>, PortError> {
            let state = self.state.lock().await;
            let mut providers: Vec<ProviderNetFeeAggregate> =
                state.aggregates.values().cloned().collect();
            providers.sort_by(|a, b| {
                b.total_net_fee_cents
                    .cmp(&a.total_net_fee_cents)
                    .then_with(|| a.provider_npi.cmp(&b.provider_npi))
            });
            providers.truncate(usize::try_from(limit.max(0)).unwrap_or(usize::MAX));
            Ok(providers)
        }

        async fn provider_aggregate(
            &self,
            provider_npi: &str,
        ) -> Result<Option<ProviderNetFeeAggregate>, PortError> {
            Ok(self.state.lock().await.aggregates.get(provider_npi).cloned())
        }

        async fn ping(&self) -> Result<(), PortError> {
            Ok(())
        }
    }

    /// Unit of work that stages writes until commit
    #[derive(Debug)]
    pub struct InMemoryUnitOfWork {
        state: Arc<Mutex<StoreState>>,
        line_sequence: Arc<AtomicI64>,
        failure: Option<FailurePoint>,
        claims: Vec<ClaimRecord>,
        lines: Vec<(i64, ClaimLineRecord)>,
        deltas: Vec<(String, i64)>,
        outbox: Vec<OutboxEvent>,
    }

    impl InMemoryUnitOfWork {
        fn check(&self, point: FailurePoint) -> Result<(), PortError> {
            if self.failure == Some(point) {
                Err(PortError::unavailable(format!("injected failure at {point:?}")))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl ClaimsUnitOfWork for InMemoryUnitOfWork {
        async fn create_claim(&mut self, claim: &ClaimRecord) -> Result<(), PortError> {
            self.check(FailurePoint::CreateClaim)?;
            self.claims.push(claim.clone());
            Ok(())
        }

        async fn bulk_create_lines(
            &mut self,
            lines: &[ClaimLineRecord],
        ) -> Result<Vec<i64>, PortError> {
            self.check(FailurePoint::BulkCreateLines)?;
            let mut ids = Vec::with_capacity(lines.len());
            for line in lines {
                // Like a database sequence, ids are consumed even on rollback
                let id = self.line_sequence.fetch_add(1, Ordering::SeqCst) + 1;
                self.lines.push((id, line.clone()));
                ids.push(id);
            }
            Ok(ids)
        }

        async fn add_provider_net_fee(
            &mut self,
            provider_npi: &str,
            delta_cents: i64,
        ) -> Result<(), PortError> {
            self.check(FailurePoint::AddProviderNetFee)?;
            self.deltas.push((provider_npi.to_string(), delta_cents));
            Ok(())
        }

        async fn record_outbox_event(&mut self, event: &OutboxEvent) -> Result<(), PortError> {
            self.check(FailurePoint::RecordOutboxEvent)?;
            self.outbox.push(event.clone());
            Ok(())
        }

        async fn commit(self: Box<Self>) -> Result<(), PortError> {
            self.check(FailurePoint::Commit)?;

            let this = *self;
            let shared = Arc::clone(&this.state);
            let mut state = shared.lock().await;
            // Let other tasks run while the lock is held, as a row lock would
            tokio::task::yield_now().await;

            // Compute every new total first so an overflow applies nothing
            let now = Utc::now();
            let mut totals: HashMap<String, i64> = HashMap::new();
            for (npi, delta) in this.deltas {
                let current = match totals.get(&npi) {
                    Some(total) => *total,
                    None => state
                        .aggregates
                        .get(&npi)
                        .map(|agg| agg.total_net_fee_cents)
                        .unwrap_or(0),
                };
                let total = current.checked_add(delta).ok_or_else(|| {
                    PortError::constraint_on("total out of range", "total_net_fee_cents")
                })?;
                totals.insert(npi, total);
            }

            for (npi, total) in totals {
                state.aggregates.insert(
                    npi.clone(),
                    ProviderNetFeeAggregate {
                        provider_npi: npi,
                        total_net_fee_cents: total,
                        updated_at: now,
                    },
                );
            }
            for claim in this.claims {
                state.claims.insert(claim.id, claim);
            }
            state.lines.extend(this.lines);
            state.outbox.extend(this.outbox);
            Ok(())
        }

        async fn rollback(self: Box<Self>) -> Result<(), PortError> {
            Ok(())
        }
    }
}
