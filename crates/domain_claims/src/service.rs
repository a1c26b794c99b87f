//! Claims domain services
//!
//! This module contains the orchestrator that turns a claim submission into
//! persisted records inside one unit of work.

use tracing::{error, info, instrument, warn};

use crate::builder::ClaimAggregateBuilder;
use crate::claim::{ClaimRecord, ClaimSubmission};
use crate::error::ClaimError;
use crate::outbox::OutboxEvent;
use crate::ports::{ClaimsStore, ClaimsUnitOfWork};

/// Service for processing claims
///
/// Holds no per-request state; one instance is shared by all requests.
#[derive(Debug, Clone, Default)]
pub struct ClaimService {
    builder: ClaimAggregateBuilder,
}

impl ClaimService {
    /// Creates a new claim service
    pub fn new() -> Self {
        Self {
            builder: ClaimAggregateBuilder::new(),
        }
    }

    /// Processes a claim inside the caller's unit of work
    ///
    /// This method:
    /// 1. Builds and validates the claim (no writes on failure)
    /// 2. Persists the claim header
    /// 3. Bulk-persists the lines
    /// 4. Adds one net-fee delta per distinct provider, in ascending NPI order
    /// 5. Writes the `claim.processed` outbox row
    ///
    /// The caller owns the unit of work and must commit only on `Ok`. On any
    /// error the unit of work holds partial writes and must be rolled back
    /// (or dropped).
    #[instrument(skip(self, uow, submission), fields(line_count = submission.lines.len()))]
    pub async fn process(
        &self,
        uow: &mut dyn ClaimsUnitOfWork,
        submission: ClaimSubmission,
    ) -> Result<ClaimRecord, ClaimError> {
        let built = self
            .builder
            .build(submission.claim_reference, submission.lines)
            .inspect_err(|e| warn!(error = %e, "Claim rejected"))?;

        let claim_id = built.claim.id;

        uow.create_claim(&built.claim).await?;
        uow.bulk_create_lines(&built.lines).await?;

        for (provider_npi, delta_cents) in built.provider_deltas.iter() {
            uow.add_provider_net_fee(provider_npi, delta_cents).await?;
        }

        uow.record_outbox_event(&OutboxEvent::claim_processed(&built))
            .await?;

        info!(
            %claim_id,
            lines = built.lines.len(),
            providers = built.provider_deltas.len(),
            total_net_fee_cents = built.provider_deltas.total().value(),
            "Claim processed"
        );

        Ok(built.claim)
    }

    /// Opens a unit of work, processes the claim and commits
    ///
    /// Rolls back on any failure; nothing of the claim is persisted unless
    /// the whole claim is.
    pub async fn submit(
        &self,
        store: &dyn ClaimsStore,
        submission: ClaimSubmission,
    ) -> Result<ClaimRecord, ClaimError> {
        let mut uow = store.begin().await?;

        match self.process(uow.as_mut(), submission).await {
            Ok(claim) => {
                uow.commit().await.inspect_err(|e| {
                    error!(claim_id = %claim.id, error = %e, "Failed to commit claim")
                })?;
                Ok(claim)
            }
            Err(e) => {
                if let ClaimError::Storage(port_error) = &e {
                    error!(error = %port_error, "Storage failure while processing claim");
                }
                if let Err(rollback_error) = uow.rollback().await {
                    warn!(error = %rollback_error, "Rollback failed");
                }
                Err(e)
            }
        }
    }
}
