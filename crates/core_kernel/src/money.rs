//! Money types with exact integer-cent arithmetic
//!
//! Inbound amounts arrive as currency-formatted strings (`"$ 130.00 "`).
//! They are parsed as base-10 decimals with rust_decimal and converted to
//! integer minor units, so no value ever passes through binary floating point.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Currency symbol accepted (and discarded) in front of an amount
pub const CURRENCY_SYMBOL: char = '$';

/// Minor units per major unit (cents per dollar)
const MINOR_UNITS_PER_MAJOR: i64 = 100;

/// Errors that can occur during money operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Malformed amount '{input}': {reason}")]
    MalformedAmount { input: String, reason: String },

    #[error("Overflow during calculation")]
    Overflow,
}

impl MoneyError {
    fn malformed(input: &str, reason: impl Into<String>) -> Self {
        MoneyError::MalformedAmount {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// Converts a currency-formatted decimal string into integer cents
///
/// The currency symbol and surrounding whitespace are stripped, the rest is
/// parsed as an exact decimal, scaled by 100 and truncated toward zero.
/// Anything with at most two decimal places converts exactly.
///
/// # Example
///
/// ```rust
/// use core_kernel::to_minor_units;
///
/// assert_eq!(to_minor_units("$ 130.00 ").unwrap(), 13000);
/// assert_eq!(to_minor_units("50.5").unwrap(), 5050);
/// assert!(to_minor_units("abc").is_err());
/// ```
pub fn to_minor_units(raw: &str) -> Result<i64, MoneyError> {
    let stripped: String = raw.chars().filter(|c| *c != CURRENCY_SYMBOL).collect();
    let cleaned = stripped.trim();

    if cleaned.is_empty() {
        return Err(MoneyError::malformed(raw, "empty amount"));
    }

    let amount = Decimal::from_str_exact(cleaned)
        .map_err(|e| MoneyError::malformed(raw, e.to_string()))?;

    amount
        .checked_mul(Decimal::from(MINOR_UNITS_PER_MAJOR))
        .map(|scaled| scaled.trunc())
        .and_then(|cents| cents.to_i64())
        .ok_or_else(|| MoneyError::malformed(raw, "amount out of range"))
}

/// A signed amount of minor currency units (cents)
///
/// All persisted money in the system is an `i64` of cents; this newtype
/// keeps arithmetic on those values explicit and overflow-checked.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Cents(i64);

impl Cents {
    pub const ZERO: Cents = Cents(0);

    /// Wraps a raw count of cents
    pub fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Parses a currency-formatted string, see [`to_minor_units`]
    pub fn parse(raw: &str) -> Result<Self, MoneyError> {
        to_minor_units(raw).map(Self)
    }

    /// Returns the raw number of cents
    pub fn value(&self) -> i64 {
        self.0
    }

    /// Returns the amount in major units as an exact decimal
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub fn checked_add(self, other: Cents) -> Result<Cents, MoneyError> {
        self.0.checked_add(other.0).map(Cents).ok_or(MoneyError::Overflow)
    }

    pub fn checked_sub(self, other: Cents) -> Result<Cents, MoneyError> {
        self.0.checked_sub(other.0).map(Cents).ok_or(MoneyError::Overflow)
    }

    pub fn checked_neg(self) -> Result<Cents, MoneyError> {
        self.0.checked_neg().map(Cents).ok_or(MoneyError::Overflow)
    }

    /// Sums amounts, failing on the first step that leaves the `i64` range
    pub fn checked_sum<I>(amounts: I) -> Result<Cents, MoneyError>
    where
        I: IntoIterator<Item = Cents>,
    {
        amounts
            .into_iter()
            .try_fold(Cents::ZERO, |acc, amount| acc.checked_add(amount))
    }
}

impl From<i64> for Cents {
    fn from(cents: i64) -> Self {
        Self(cents)
    }
}

impl From<Cents> for i64 {
    fn from(cents: Cents) -> i64 {
        cents.0
    }
}

impl fmt::Display for Cents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:.2}", CURRENCY_SYMBOL, self.to_decimal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_and_whitespace_are_stripped() {
        assert_eq!(to_minor_units("$130.00 ").unwrap(), 13000);
        assert_eq!(to_minor_units("$ 50.50 ").unwrap(), 5050);
        assert_eq!(to_minor_units(" 100.00 ").unwrap(), 10000);
    }

    #[test]
    fn test_whole_and_single_decimal_amounts() {
        assert_eq!(to_minor_units("50").unwrap(), 5000);
        assert_eq!(to_minor_units("50.5").unwrap(), 5050);
        assert_eq!(to_minor_units("0.00").unwrap(), 0);
        assert_eq!(to_minor_units("0.01").unwrap(), 1);
    }

    #[test]
    fn test_negative_amount() {
        assert_eq!(to_minor_units("-12.34").unwrap(), -1234);
    }

    #[test]
    fn test_sub_cent_precision_truncates_toward_zero() {
        assert_eq!(to_minor_units("1.239").unwrap(), 123);
        assert_eq!(to_minor_units("-1.239").unwrap(), -123);
    }

    #[test]
    fn test_malformed_inputs() {
        for raw in ["abc", "", "   ", "$", "12.3.4", "1,000.00", "ten"] {
            let result = to_minor_units(raw);
            assert!(
                matches!(result, Err(MoneyError::MalformedAmount { .. })),
                "{raw:?} should be malformed, got {result:?}"
            );
        }
    }

    #[test]
    fn test_out_of_range_amount() {
        let result = to_minor_units("99999999999999999999999.00");
        assert!(matches!(result, Err(MoneyError::MalformedAmount { .. })));
    }

    #[test]
    fn test_cents_display() {
        assert_eq!(Cents::new(8125).to_string(), "$81.25");
        assert_eq!(Cents::new(-50).to_string(), "$-0.50");
    }

    #[test]
    fn test_cents_checked_overflow() {
        assert_eq!(Cents::new(i64::MAX).checked_add(Cents::new(1)), Err(MoneyError::Overflow));
        assert_eq!(Cents::new(i64::MIN).checked_sub(Cents::new(1)), Err(MoneyError::Overflow));
        assert_eq!(Cents::new(i64::MIN).checked_neg(), Err(MoneyError::Overflow));
    }

    #[test]
    fn test_checked_sum_overflow() {
        let half = i64::MAX / 2 + 1;
        let result = Cents::checked_sum([Cents::new(half), Cents::new(half)]);
        assert_eq!(result, Err(MoneyError::Overflow));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn two_decimal_strings_convert_exactly(dollars in 0i64..10_000_000i64, cents in 0i64..100i64) {
            let raw = format!("${}.{:02} ", dollars, cents);
            prop_assert_eq!(to_minor_units(&raw).unwrap(), dollars * 100 + cents);
        }

        #[test]
        fn cents_sum_matches_i64_sum(values in proptest::collection::vec(-1_000_000i64..1_000_000i64, 0..50)) {
            let total = Cents::checked_sum(values.iter().copied().map(Cents::new)).unwrap();
            prop_assert_eq!(total.value(), values.iter().sum::<i64>());
        }
    }
}
