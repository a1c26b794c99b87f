//! Claim, claim line and provider aggregate records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{Cents, ClaimId, MoneyError};

/// One service line as submitted by the caller
///
/// Monetary fields are still raw decimal strings (`"$ 130.00 "`); they are
/// converted to cents by the builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimLineInput {
    pub service_date: DateTime<Utc>,
    pub submitted_procedure: String,
    pub quadrant: Option<String>,
    pub plan_group: String,
    pub subscriber_id: String,
    pub provider_npi: String,
    pub provider_fees: String,
    pub allowed_fees: String,
    pub member_coinsurance: String,
    pub member_copay: String,
}

/// A claim as submitted: an optional caller reference and its lines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimSubmission {
    pub claim_reference: Option<String>,
    pub lines: Vec<ClaimLineInput>,
}

impl ClaimSubmission {
    pub fn new(claim_reference: Option<String>, lines: Vec<ClaimLineInput>) -> Self {
        Self {
            claim_reference,
            lines,
        }
    }
}

/// A persisted claim header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimRecord {
    /// Generated at creation, immutable
    pub id: ClaimId,
    /// Caller-supplied reference, neither unique nor validated
    pub claim_reference: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ClaimRecord {
    /// Creates a claim header with a fresh identifier
    pub fn new(claim_reference: Option<String>) -> Self {
        Self {
            id: ClaimId::new(),
            claim_reference,
            created_at: Utc::now(),
        }
    }
}

/// The four input amounts of a line, in cents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineAmounts {
    pub provider_fees_cents: i64,
    pub allowed_fees_cents: i64,
    pub member_coinsurance_cents: i64,
    pub member_copay_cents: i64,
}

impl LineAmounts {
    /// Net fee = provider fee + coinsurance + copay - allowed fee
    pub fn net_fee(&self) -> Result<Cents, MoneyError> {
        Cents::new(self.provider_fees_cents)
            .checked_add(Cents::new(self.member_coinsurance_cents))?
            .checked_add(Cents::new(self.member_copay_cents))?
            .checked_sub(Cents::new(self.allowed_fees_cents))
    }
}

/// A claim line ready to persist
///
/// The storage key is a sequence assigned by the database on insert, so it
/// is not part of this record. `net_fee_cents` is always derived from the
/// amounts, never caller-supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimLineRecord {
    pub claim_id: ClaimId,
    pub service_date: DateTime<Utc>,
    pub submitted_procedure: String,
    pub quadrant: Option<String>,
    pub plan_group: String,
    pub subscriber_id: String,
    pub provider_npi: String,
    pub provider_fees_cents: i64,
    pub allowed_fees_cents: i64,
    pub member_coinsurance_cents: i64,
    pub member_copay_cents: i64,
    pub net_fee_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl ClaimLineRecord {
    pub fn amounts(&self) -> LineAmounts {
        LineAmounts {
            provider_fees_cents: self.provider_fees_cents,
            allowed_fees_cents: self.allowed_fees_cents,
            member_coinsurance_cents: self.member_coinsurance_cents,
            member_copay_cents: self.member_copay_cents,
        }
    }
}

/// Running net-fee total for one provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderNetFeeAggregate {
    pub provider_npi: String,
    pub total_net_fee_cents: i64,
    pub updated_at: DateTime<Utc>,
}
