//! Test Data Builders
//!
//! Builders for claim lines and submissions. Unset fields are filled with
//! valid random data from `fake`, so a default-built line always passes
//! validation.

use chrono::{DateTime, Utc};
use fake::faker::number::en::NumberWithFormat;
use fake::Fake;
use domain_claims::{ClaimLineInput, ClaimSubmission};

use crate::fixtures::TemporalFixtures;

/// Formats cents as a submitted money string, e.g. `$130.05`
pub fn dollars(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{}${}.{:02}", sign, abs / 100, abs % 100)
}

/// A random valid provider NPI (ten digits, no leading zero)
pub fn random_npi() -> String {
    NumberWithFormat("^#########").fake()
}

/// Builder for constructing claim lines
pub struct ClaimLineInputBuilder {
    service_date: DateTime<Utc>,
    submitted_procedure: String,
    quadrant: Option<String>,
    plan_group: String,
    subscriber_id: String,
    provider_npi: String,
    provider_fees: String,
    allowed_fees: String,
    member_coinsurance: String,
    member_copay: String,
}

impl Default for ClaimLineInputBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimLineInputBuilder {
    /// Creates a builder with random valid values and all amounts at zero
    pub fn new() -> Self {
        Self {
            service_date: TemporalFixtures::service_date(),
            submitted_procedure: NumberWithFormat("D0###").fake(),
            quadrant: None,
            plan_group: NumberWithFormat("GRP-####").fake(),
            subscriber_id: NumberWithFormat("##########").fake(),
            provider_npi: random_npi(),
            provider_fees: dollars(0),
            allowed_fees: dollars(0),
            member_coinsurance: dollars(0),
            member_copay: dollars(0),
        }
    }

    pub fn with_service_date(mut self, date: DateTime<Utc>) -> Self {
        self.service_date = date;
        self
    }

    pub fn with_procedure(mut self, code: impl Into<String>) -> Self {
        self.submitted_procedure = code.into();
        self
    }

    pub fn with_quadrant(mut self, quadrant: impl Into<String>) -> Self {
        self.quadrant = Some(quadrant.into());
        self
    }

    pub fn with_provider_npi(mut self, npi: impl Into<String>) -> Self {
        self.provider_npi = npi.into();
        self
    }

    /// Sets the four amounts from raw strings
    pub fn with_raw_amounts(
        mut self,
        provider_fees: impl Into<String>,
        allowed_fees: impl Into<String>,
        member_coinsurance: impl Into<String>,
        member_copay: impl Into<String>,
    ) -> Self {
        self.provider_fees = provider_fees.into();
        self.allowed_fees = allowed_fees.into();
        self.member_coinsurance = member_coinsurance.into();
        self.member_copay = member_copay.into();
        self
    }

    /// Sets the amounts so the line nets to exactly `cents`
    ///
    /// Provider fees carry the net fee on top of a random allowed amount.
    pub fn with_net_fee_cents(mut self, cents: i64) -> Self {
        let allowed: i64 = (1_000..50_000).fake();
        self.provider_fees = dollars(allowed + cents);
        self.allowed_fees = dollars(allowed);
        self.member_coinsurance = dollars(0);
        self.member_copay = dollars(0);
        self
    }

    pub fn build(self) -> ClaimLineInput {
        ClaimLineInput {
            service_date: self.service_date,
            submitted_procedure: self.submitted_procedure,
            quadrant: self.quadrant,
            plan_group: self.plan_group,
            subscriber_id: self.subscriber_id,
            provider_npi: self.provider_npi,
            provider_fees: self.provider_fees,
            allowed_fees: self.allowed_fees,
            member_coinsurance: self.member_coinsurance,
            member_copay: self.member_copay,
        }
    }
}

/// Builder for claim submissions
#[derive(Default)]
pub struct ClaimSubmissionBuilder {
    claim_reference: Option<String>,
    lines: Vec<ClaimLineInput>,
}

impl ClaimSubmissionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.claim_reference = Some(reference.into());
        self
    }

    pub fn with_line(mut self, line: ClaimLineInput) -> Self {
        self.lines.push(line);
        self
    }

    /// Adds a line for `npi` netting to `cents`
    pub fn with_net_fee(self, npi: &str, cents: i64) -> Self {
        self.with_line(
            ClaimLineInputBuilder::new()
                .with_provider_npi(npi)
                .with_net_fee_cents(cents)
                .build(),
        )
    }

    pub fn build(self) -> ClaimSubmission {
        ClaimSubmission::new(self.claim_reference, self.lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_claims::ClaimAggregateBuilder;

    #[test]
    fn test_dollars_formatting() {
        assert_eq!(dollars(13005), "$130.05");
        assert_eq!(dollars(0), "$0.00");
        assert_eq!(dollars(-1625), "-$16.25");
    }

    #[test]
    fn test_default_line_is_valid() {
        let line = ClaimLineInputBuilder::new().build();
        assert!(line.submitted_procedure.starts_with('D'));
        assert_eq!(line.provider_npi.len(), 10);
        assert!(ClaimAggregateBuilder::new().build(None, vec![line]).is_ok());
    }

    #[test]
    fn test_net_fee_builder_hits_target() {
        let submission = ClaimSubmissionBuilder::new()
            .with_net_fee("1234567890", 1234)
            .with_net_fee("1234567890", 66)
            .with_net_fee("9876543210", -500)
            .build();

        let built = ClaimAggregateBuilder::new()
            .build(submission.claim_reference, submission.lines)
            .unwrap();

        assert_eq!(built.provider_deltas.get("1234567890"), Some(1300));
        assert_eq!(built.provider_deltas.get("9876543210"), Some(-500));
    }
}
