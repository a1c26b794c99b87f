//! Pre-built Test Fixtures
//!
//! Provides ready-to-use claim data. The reference claim has two lines for
//! one provider whose net fees are 0 and 8125 cents.

use chrono::{DateTime, TimeZone, Utc};
use core_kernel::ClaimId;
use domain_claims::{ClaimLineInput, ClaimSubmission};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

/// Fixture for claim submissions
pub struct ClaimFixtures;

impl ClaimFixtures {
    /// Provider on every line of the reference claim
    pub const PROVIDER_NPI: &'static str = "1497775530";

    /// Net fee of the reference claim in cents
    pub const SAMPLE_NET_FEE_CENTS: i64 = 8125;

    /// Cleaning line: fees fully allowed, net fee 0
    pub fn zero_net_line() -> ClaimLineInput {
        ClaimLineInput {
            service_date: TemporalFixtures::service_date(),
            submitted_procedure: "D0180".to_string(),
            quadrant: None,
            plan_group: StringFixtures::plan_group().to_string(),
            subscriber_id: StringFixtures::subscriber_id().to_string(),
            provider_npi: Self::PROVIDER_NPI.to_string(),
            provider_fees: "$100.00".to_string(),
            allowed_fees: "$100.00".to_string(),
            member_coinsurance: "$0.00".to_string(),
            member_copay: "$0.00".to_string(),
        }
    }

    /// X-ray line: 130.00 + 16.25 + 0 - 65.00 = 81.25
    pub fn xray_line() -> ClaimLineInput {
        ClaimLineInput {
            service_date: TemporalFixtures::service_date(),
            submitted_procedure: "D0210".to_string(),
            quadrant: None,
            plan_group: StringFixtures::plan_group().to_string(),
            subscriber_id: StringFixtures::subscriber_id().to_string(),
            provider_npi: Self::PROVIDER_NPI.to_string(),
            provider_fees: "$130.00".to_string(),
            allowed_fees: "$65.00".to_string(),
            member_coinsurance: "$16.25".to_string(),
            member_copay: "$0.00".to_string(),
        }
    }

    /// The two-line reference claim
    pub fn sample_claim() -> ClaimSubmission {
        ClaimSubmission::new(
            Some(StringFixtures::claim_reference().to_string()),
            vec![Self::zero_net_line(), Self::xray_line()],
        )
    }

    /// Reference claim with the second line's procedure code broken
    pub fn invalid_procedure_claim() -> ClaimSubmission {
        let mut claim = Self::sample_claim();
        claim.lines[1].submitted_procedure = "C0210".to_string();
        claim
    }
}

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// Service date used by the reference claim
    pub fn service_date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2018, 3, 28, 0, 0, 0).unwrap()
    }
}

/// Fixture for identifier test data
pub struct IdFixtures;

impl IdFixtures {
    /// Creates a deterministic claim ID for testing
    pub fn claim_id() -> ClaimId {
        ClaimId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440002").unwrap())
    }
}

/// Fixture for decimal test data
pub struct DecimalFixtures;

impl DecimalFixtures {
    /// Reference claim net fee in dollars
    pub fn sample_net_fee() -> Decimal {
        dec!(81.25)
    }
}

/// Fixture for string test data
pub struct StringFixtures;

impl StringFixtures {
    pub fn claim_reference() -> &'static str {
        "CLM-2018-000001"
    }

    pub fn plan_group() -> &'static str {
        "GRP-1000"
    }

    pub fn subscriber_id() -> &'static str {
        "3730189502"
    }
}
