//! Claim aggregate builder
//!
//! Pure computation from raw line inputs to persist-ready records plus the
//! per-provider net-fee deltas. Nothing is written here; the only side
//! effects are identifier and timestamp generation.

use std::collections::BTreeMap;

use core_kernel::{to_minor_units, Cents};

use crate::claim::{ClaimLineInput, ClaimLineRecord, ClaimRecord, LineAmounts};
use crate::error::ClaimError;
use crate::validation::{provider_npi_validator, submitted_procedure_validator, FieldValidator};

/// Net-fee delta per distinct provider, summed over a claim's lines
///
/// Iteration is in ascending NPI order so that concurrent claims touching
/// the same providers take row locks in the same order. The claim total is
/// kept alongside and checked on every addition, so it always fits in `i64`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderDeltas {
    by_provider: BTreeMap<String, i64>,
    total: Cents,
}

impl ProviderDeltas {
    /// Adds a line's net fee to its provider's delta and to the claim total
    ///
    /// Nothing changes when either sum would overflow.
    pub fn add(&mut self, provider_npi: &str, net_fee: Cents) -> Result<(), ClaimError> {
        let current = self.get(provider_npi).map(Cents::new).unwrap_or(Cents::ZERO);
        let updated = current
            .checked_add(net_fee)
            .map_err(|_| ClaimError::AmountOverflow { field: "provider_net_fee" })?;
        let total = self
            .total
            .checked_add(net_fee)
            .map_err(|_| ClaimError::AmountOverflow { field: "total_net_fee" })?;

        self.by_provider.insert(provider_npi.to_string(), updated.value());
        self.total = total;
        Ok(())
    }

    pub fn get(&self, provider_npi: &str) -> Option<i64> {
        self.by_provider.get(provider_npi).copied()
    }

    /// Iterates `(provider_npi, delta_cents)` in ascending NPI order
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> + '_ {
        self.by_provider.iter().map(|(npi, delta)| (npi.as_str(), *delta))
    }

    pub fn len(&self) -> usize {
        self.by_provider.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_provider.is_empty()
    }

    /// Sum of all deltas
    pub fn total(&self) -> Cents {
        self.total
    }
}

/// Output of a successful build
#[derive(Debug, Clone)]
pub struct BuiltClaim {
    pub claim: ClaimRecord,
    pub lines: Vec<ClaimLineRecord>,
    pub provider_deltas: ProviderDeltas,
}

/// Validates lines and computes amounts for one claim
#[derive(Debug, Clone)]
pub struct ClaimAggregateBuilder {
    procedure: FieldValidator,
    provider_npi: FieldValidator,
}

impl Default for ClaimAggregateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimAggregateBuilder {
    pub fn new() -> Self {
        Self {
            procedure: submitted_procedure_validator(),
            provider_npi: provider_npi_validator(),
        }
    }

    /// Builds the claim record, its line records and provider deltas
    ///
    /// Lines are processed in order. For each line the procedure code is
    /// validated, then the NPI, then the four amounts are converted. The
    /// first failure aborts the whole build and no partial output is
    /// returned.
    ///
    /// # Errors
    ///
    /// - [`ClaimError::EmptyClaim`] if `lines` is empty
    /// - [`ClaimError::ValidationFailed`] for a bad procedure code or NPI
    /// - [`ClaimError::MalformedAmount`] for an amount that does not parse
    /// - [`ClaimError::AmountOverflow`] when a line net fee, a provider delta
    ///   or the claim total leaves the `i64` cent range
    pub fn build(
        &self,
        claim_reference: Option<String>,
        lines: Vec<ClaimLineInput>,
    ) -> Result<BuiltClaim, ClaimError> {
        if lines.is_empty() {
            return Err(ClaimError::EmptyClaim);
        }

        let claim = ClaimRecord::new(claim_reference);
        let mut records = Vec::with_capacity(lines.len());
        let mut provider_deltas = ProviderDeltas::default();

        for line in lines {
            self.procedure.validate(&line.submitted_procedure)?;
            self.provider_npi.validate(&line.provider_npi)?;

            let amounts = LineAmounts {
                provider_fees_cents: convert("provider_fees", &line.provider_fees)?,
                allowed_fees_cents: convert("allowed_fees", &line.allowed_fees)?,
                member_coinsurance_cents: convert("member_coinsurance", &line.member_coinsurance)?,
                member_copay_cents: convert("member_copay", &line.member_copay)?,
            };
            let net_fee = amounts
                .net_fee()
                .map_err(|_| ClaimError::AmountOverflow { field: "net_fee" })?;

            provider_deltas.add(&line.provider_npi, net_fee)?;

            records.push(ClaimLineRecord {
                claim_id: claim.id,
                service_date: line.service_date,
                submitted_procedure: line.submitted_procedure,
                quadrant: line.quadrant,
                plan_group: line.plan_group,
                subscriber_id: line.subscriber_id,
                provider_npi: line.provider_npi,
                provider_fees_cents: amounts.provider_fees_cents,
                allowed_fees_cents: amounts.allowed_fees_cents,
                member_coinsurance_cents: amounts.member_coinsurance_cents,
                member_copay_cents: amounts.member_copay_cents,
                net_fee_cents: net_fee.value(),
                created_at: claim.created_at,
            });
        }

        Ok(BuiltClaim {
            claim,
            lines: records,
            provider_deltas,
        })
    }
}

fn convert(field: &'static str, raw: &str) -> Result<i64, ClaimError> {
    to_minor_units(raw).map_err(|source| ClaimError::MalformedAmount { field, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn line(npi: &str, procedure: &str, fees: [&str; 4]) -> ClaimLineInput {
        ClaimLineInput {
            service_date: Utc::now(),
            submitted_procedure: procedure.to_string(),
            quadrant: None,
            plan_group: "GRP-1000".to_string(),
            subscriber_id: "3730189502".to_string(),
            provider_npi: npi.to_string(),
            provider_fees: fees[0].to_string(),
            allowed_fees: fees[1].to_string(),
            member_coinsurance: fees[2].to_string(),
            member_copay: fees[3].to_string(),
        }
    }

    #[test]
    fn test_empty_claim_is_rejected() {
        let result = ClaimAggregateBuilder::new().build(None, vec![]);
        assert!(matches!(result, Err(ClaimError::EmptyClaim)));
    }

    #[test]
    fn test_net_fee_per_line() {
        let built = ClaimAggregateBuilder::new()
            .build(
                Some("REF-1".to_string()),
                vec![line("1234567890", "D0180", ["$100.00", "$50.00", "$20.00", "$10.00"])],
            )
            .unwrap();

        assert_eq!(built.lines.len(), 1);
        assert_eq!(built.lines[0].net_fee_cents, 8000);
        assert_eq!(built.lines[0].claim_id, built.claim.id);
        assert_eq!(built.provider_deltas.get("1234567890"), Some(8000));
    }

    #[test]
    fn test_deltas_sum_lines_per_provider() {
        let built = ClaimAggregateBuilder::new()
            .build(
                None,
                vec![
                    line("2222222222", "D0120", ["100", "50", "0", "0"]),
                    line("1111111111", "D0120", ["30", "0", "0", "0"]),
                    line("2222222222", "D0274", ["25.50", "0", "0", "0"]),
                ],
            )
            .unwrap();

        assert_eq!(built.provider_deltas.len(), 2);
        assert_eq!(built.provider_deltas.get("2222222222"), Some(7550));
        assert_eq!(built.provider_deltas.get("1111111111"), Some(3000));
        assert_eq!(built.provider_deltas.total().value(), 10550);

        let order: Vec<&str> = built.provider_deltas.iter().map(|(npi, _)| npi).collect();
        assert_eq!(order, vec!["1111111111", "2222222222"]);
    }

    #[test]
    fn test_procedure_checked_before_npi() {
        let result = ClaimAggregateBuilder::new()
            .build(None, vec![line("bad", "X100", ["1", "1", "1", "1"])]);
        assert_eq!(result.unwrap_err().field(), Some("submitted_procedure"));
    }

    #[test]
    fn test_malformed_amount_names_field() {
        let result = ClaimAggregateBuilder::new()
            .build(None, vec![line("1234567890", "D0180", ["1", "1", "abc", "1"])]);
        match result {
            Err(ClaimError::MalformedAmount { field, .. }) => assert_eq!(field, "member_coinsurance"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_claim_total_overflow_across_providers_is_rejected() {
        let huge = "50000000000000000";
        let result = ClaimAggregateBuilder::new().build(
            None,
            vec![
                line("1000000001", "D0180", [huge, "0", "0", "0"]),
                line("1000000002", "D0180", [huge, "0", "0", "0"]),
            ],
        );
        match result {
            Err(ClaimError::AmountOverflow { field }) => assert_eq!(field, "total_net_fee"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_line_net_fee_overflow_is_not_malformed() {
        let result = ClaimAggregateBuilder::new().build(
            None,
            vec![line("1234567890", "D0180", ["90000000000000000", "0", "90000000000000000", "0"])],
        );
        match result {
            Err(ClaimError::AmountOverflow { field }) => assert_eq!(field, "net_fee"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_overflowing_add_leaves_deltas_unchanged() {
        let mut deltas = ProviderDeltas::default();
        deltas.add("1000000001", Cents::new(i64::MAX)).unwrap();
        let before = deltas.clone();

        assert!(deltas.add("1000000002", Cents::new(1)).is_err());
        assert_eq!(deltas, before);
        assert_eq!(deltas.total(), Cents::new(i64::MAX));
    }

    #[test]
    fn test_first_failing_line_wins() {
        let result = ClaimAggregateBuilder::new().build(
            None,
            vec![
                line("1234567890", "D0180", ["1", "1", "1", "1"]),
                line("123", "D0180", ["1", "1", "1", "1"]),
                line("1234567890", "C0180", ["1", "1", "1", "1"]),
            ],
        );
        assert_eq!(result.unwrap_err().field(), Some("provider_npi"));
    }
}
