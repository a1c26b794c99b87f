//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating claim data that passes
//! validation, plus strategies for malformed input.

use chrono::{DateTime, Duration, TimeZone, Utc};
use core_kernel::ClaimId;
use domain_claims::ClaimLineInput;
use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::builders::dollars;

/// Strategy for valid provider NPIs
pub fn npi_strategy() -> impl Strategy<Value = String> {
    "[1-9][0-9]{9}"
}

/// Strategy for a small pool of NPIs, so generated claims repeat providers
pub fn shared_npi_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("1111111111".to_string()),
        Just("2222222222".to_string()),
        Just("3333333333".to_string()),
    ]
}

/// Strategy for valid procedure codes
pub fn procedure_strategy() -> impl Strategy<Value = String> {
    "D[0-9]{4}"
}

/// Strategy for procedure codes that fail validation
pub fn invalid_procedure_strategy() -> impl Strategy<Value = String> {
    "[A-CE-Z][0-9]{4}"
}

/// Strategy for amounts in cents
pub fn amount_cents_strategy() -> impl Strategy<Value = i64> {
    0i64..10_000_000i64
}

/// Strategy for decimal amounts with at most two places
pub fn amount_decimal_strategy() -> impl Strategy<Value = Decimal> {
    amount_cents_strategy().prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for service dates in 2018
pub fn service_date_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..365i64).prop_map(|days| {
        Utc.with_ymd_and_hms(2018, 1, 1, 0, 0, 0).unwrap() + Duration::days(days)
    })
}

/// Strategy for ClaimId
pub fn claim_id_strategy() -> impl Strategy<Value = ClaimId> {
    any::<[u8; 16]>().prop_map(|bytes| ClaimId::from_uuid(uuid::Uuid::from_bytes(bytes)))
}

/// Strategy for a valid line paired with its expected net fee in cents
pub fn claim_line_strategy() -> impl Strategy<Value = (ClaimLineInput, i64)> {
    (
        service_date_strategy(),
        procedure_strategy(),
        shared_npi_strategy(),
        [
            amount_cents_strategy(),
            amount_cents_strategy(),
            amount_cents_strategy(),
            amount_cents_strategy(),
        ],
    )
        .prop_map(|(service_date, procedure, npi, [fees, allowed, coins, copay])| {
            let line = ClaimLineInput {
                service_date,
                submitted_procedure: procedure,
                quadrant: None,
                plan_group: "GRP-1000".to_string(),
                subscriber_id: "3730189502".to_string(),
                provider_npi: npi,
                provider_fees: dollars(fees),
                allowed_fees: dollars(allowed),
                member_coinsurance: dollars(coins),
                member_copay: dollars(copay),
            };
            (line, fees + coins + copay - allowed)
        })
}

/// Strategy for a non-empty list of valid lines
pub fn claim_lines_strategy(max_lines: usize) -> impl Strategy<Value = Vec<(ClaimLineInput, i64)>> {
    proptest::collection::vec(claim_line_strategy(), 1..=max_lines)
}
