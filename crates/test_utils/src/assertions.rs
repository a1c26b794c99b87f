//! Custom Test Assertions
//!
//! Assertion helpers that give more meaningful failure messages than a bare
//! `assert_eq!` on claims data.

use std::collections::BTreeMap;

use domain_claims::{ClaimLineRecord, ProviderNetFeeAggregate};

/// Asserts that every line's stored net fee matches its amounts
pub fn assert_net_fees_consistent(lines: &[ClaimLineRecord]) {
    for (index, line) in lines.iter().enumerate() {
        let expected = line
            .amounts()
            .net_fee()
            .unwrap_or_else(|e| panic!("Line {} net fee overflowed: {}", index, e));
        assert_eq!(
            line.net_fee_cents,
            expected.value(),
            "Line {} stored net fee {} but amounts give {}",
            index,
            line.net_fee_cents,
            expected.value()
        );
    }
}

/// Sums net fees per provider
pub fn net_fee_by_provider(lines: &[ClaimLineRecord]) -> BTreeMap<String, i64> {
    let mut totals = BTreeMap::new();
    for line in lines {
        *totals.entry(line.provider_npi.clone()).or_insert(0) += line.net_fee_cents;
    }
    totals
}

/// Asserts that a provider's aggregate equals `expected_cents`
pub fn assert_provider_total(aggregate: Option<&ProviderNetFeeAggregate>, npi: &str, expected_cents: i64) {
    match aggregate {
        Some(agg) => {
            assert_eq!(agg.provider_npi, npi, "Aggregate belongs to the wrong provider");
            assert_eq!(
                agg.total_net_fee_cents, expected_cents,
                "Provider {} total is {} cents, expected {}",
                npi, agg.total_net_fee_cents, expected_cents
            );
        }
        None => panic!("No aggregate row for provider {}", npi),
    }
}

/// Asserts that aggregates are sorted by total, highest first
pub fn assert_ranked_descending(aggregates: &[ProviderNetFeeAggregate]) {
    for pair in aggregates.windows(2) {
        assert!(
            pair[0].total_net_fee_cents >= pair[1].total_net_fee_cents,
            "Provider {} ({}) ranked above {} ({})",
            pair[0].provider_npi,
            pair[0].total_net_fee_cents,
            pair[1].provider_npi,
            pair[1].total_net_fee_cents
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn aggregate(npi: &str, total: i64) -> ProviderNetFeeAggregate {
        ProviderNetFeeAggregate {
            provider_npi: npi.to_string(),
            total_net_fee_cents: total,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_ranked_descending_accepts_ties() {
        assert_ranked_descending(&[aggregate("1", 300), aggregate("2", 300), aggregate("3", 10)]);
    }

    #[test]
    #[should_panic(expected = "ranked above")]
    fn test_ranked_descending_rejects_ascending() {
        assert_ranked_descending(&[aggregate("1", 10), aggregate("2", 300)]);
    }

    #[test]
    fn test_assert_provider_total() {
        let agg = aggregate("1497775530", 8125);
        assert_provider_total(Some(&agg), "1497775530", 8125);
    }
}
