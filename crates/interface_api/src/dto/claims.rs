//! Claims DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use domain_claims::{ClaimLineInput, ClaimSubmission};

/// Message returned with every successfully processed claim
pub const CLAIM_PROCESSED_MESSAGE: &str = "Claim processed successfully";

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateClaimRequest {
    pub claim_reference: Option<String>,
    #[validate(length(min = 1, message = "At least one claim line is required"))]
    pub lines: Vec<ClaimLineRequest>,
}

/// One service line; money fields are decimal strings such as `"$130.00"`
#[derive(Debug, Serialize, Deserialize)]
pub struct ClaimLineRequest {
    #[serde(with = "core_kernel::temporal::iso8601")]
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

impl From<ClaimLineRequest> for ClaimLineInput {
    fn from(line: ClaimLineRequest) -> Self {
        ClaimLineInput {
            service_date: line.service_date,
            submitted_procedure: line.submitted_procedure,
            quadrant: line.quadrant,
            plan_group: line.plan_group,
            subscriber_id: line.subscriber_id,
            provider_npi: line.provider_npi,
            provider_fees: line.provider_fees,
            allowed_fees: line.allowed_fees,
            member_coinsurance: line.member_coinsurance,
            member_copay: line.member_copay,
        }
    }
}

impl From<CreateClaimRequest> for ClaimSubmission {
    fn from(request: CreateClaimRequest) -> Self {
        ClaimSubmission::new(
            request.claim_reference,
            request.lines.into_iter().map(Into::into).collect(),
        )
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateClaimResponse {
    pub claim_id: Uuid,
    pub message: String,
}

impl CreateClaimResponse {
    pub fn processed(claim_id: Uuid) -> Self {
        Self {
            claim_id,
            message: CLAIM_PROCESSED_MESSAGE.to_string(),
        }
    }
}
