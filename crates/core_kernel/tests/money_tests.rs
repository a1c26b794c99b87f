//! Unit tests for the Money module
//!
//! Tests cover currency-string conversion to integer cents, the `Cents`
//! newtype arithmetic, and serialization.

use core_kernel::{to_minor_units, Cents, MoneyError};
use rust_decimal_macros::dec;

mod conversion {
    use super::*;

    #[test]
    fn test_trailing_whitespace_and_symbol() {
        assert_eq!(to_minor_units("$130.00 ").unwrap(), 13000);
    }

    #[test]
    fn test_symbol_followed_by_space() {
        assert_eq!(to_minor_units("$ 130.00 ").unwrap(), 13000);
    }

    #[test]
    fn test_integer_amount() {
        assert_eq!(to_minor_units("50").unwrap(), 5000);
    }

    #[test]
    fn test_single_decimal_place() {
        assert_eq!(to_minor_units("50.5").unwrap(), 5050);
    }

    #[test]
    fn test_zero_amount() {
        assert_eq!(to_minor_units("0.00").unwrap(), 0);
    }

    #[test]
    fn test_fractional_cents_are_exact() {
        // 16.25 and 0.10 are not representable in binary floating point
        assert_eq!(to_minor_units("16.25").unwrap(), 1625);
        assert_eq!(to_minor_units("0.10").unwrap(), 10);
        assert_eq!(to_minor_units("0.29").unwrap(), 29);
    }

    #[test]
    fn test_large_amount() {
        assert_eq!(to_minor_units("$1000000.99").unwrap(), 100_000_099);
    }
}

mod malformed {
    use super::*;

    fn assert_malformed(raw: &str) {
        match to_minor_units(raw) {
            Err(MoneyError::MalformedAmount { input, .. }) => assert_eq!(input, raw),
            other => panic!("expected MalformedAmount for {raw:?}, got {other:?}"),
        }
    }

    #[test]
    fn test_letters_are_rejected() {
        assert_malformed("abc");
    }

    #[test]
    fn test_empty_and_blank_are_rejected() {
        assert_malformed("");
        assert_malformed("  ");
        assert_malformed("$ ");
    }

    #[test]
    fn test_thousands_separator_is_rejected() {
        assert_malformed("1,000.00");
    }

    #[test]
    fn test_error_message_names_the_input() {
        let err = to_minor_units("abc").unwrap_err();
        assert!(err.to_string().contains("abc"));
    }
}

mod cents {
    use super::*;

    #[test]
    fn test_parse_matches_to_minor_units() {
        assert_eq!(Cents::parse("$81.25").unwrap(), Cents::new(8125));
    }

    #[test]
    fn test_to_decimal() {
        assert_eq!(Cents::new(8125).to_decimal(), dec!(81.25));
        assert_eq!(Cents::new(-1).to_decimal(), dec!(-0.01));
    }

    #[test]
    fn test_checked_arithmetic() {
        let a = Cents::new(8125);
        let b = Cents::new(2500);
        assert_eq!(a.checked_add(b).unwrap(), Cents::new(10625));
        assert_eq!(a.checked_sub(b).unwrap(), Cents::new(5625));
        assert_eq!(a.checked_neg().unwrap(), Cents::new(-8125));
    }

    #[test]
    fn test_checked_sum() {
        let total = Cents::checked_sum([5000, 10000, -2000].into_iter().map(Cents::from)).unwrap();
        assert_eq!(i64::from(total), 13000);
        assert_eq!(Cents::checked_sum(Vec::new()).unwrap(), Cents::ZERO);
    }

    #[test]
    fn test_checked_sum_reports_overflow() {
        let result = Cents::checked_sum([Cents::new(i64::MAX), Cents::new(1), Cents::new(-1)]);
        assert_eq!(result, Err(MoneyError::Overflow));
    }

    #[test]
    fn test_predicates() {
        assert!(Cents::ZERO.is_zero());
        assert!(Cents::new(-5).is_negative());
        assert!(!Cents::new(5).is_negative());
    }

    #[test]
    fn test_serializes_as_plain_integer() {
        let json = serde_json::to_string(&Cents::new(8000)).unwrap();
        assert_eq!(json, "8000");
        let back: Cents = serde_json::from_str("-125").unwrap();
        assert_eq!(back, Cents::new(-125));
    }
}
