//! Monetary rounding and parsing helpers.

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

use crate::error::{EngineError, EngineResult};

/// Rounds an amount to cents, half away from zero.
///
/// Every monetary figure the engine reports goes through this function.
///
/// # Example
///
/// ```
/// use nomina_engine::calculation::round_cents;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(round_cents(dec!(315.31965)), dec!(315.32));
/// assert_eq!(round_cents(dec!(0.125)), dec!(0.13));
/// ```
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Parses a monetary amount written in canonical form.
///
/// Accepts an optional leading `-`, one or more ASCII digits and an optional
/// fractional part introduced by `.`. Surrounding whitespace is ignored.
/// Thousands separators, currency symbols, exponents and locale-specific
/// decimal commas are rejected with [`EngineError::InvalidInput`].
///
/// # Example
///
/// ```
/// use nomina_engine::calculation::parse_amount;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(parse_amount(" 1250.50 ").unwrap(), dec!(1250.50));
/// assert!(parse_amount("1,250.50").is_err());
/// assert!(parse_amount("$300").is_err());
/// ```
pub fn parse_amount(raw: &str) -> EngineResult<Decimal> {
    let trimmed = raw.trim();
    let invalid = || {
        EngineError::invalid_input(
            "amount",
            format!("'{}' is not a canonical decimal amount", raw),
        )
    };

    let unsigned = trimmed.strip_prefix('-').unwrap_or(trimmed);
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };

    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(integer) || fraction.is_some_and(|f| !all_digits(f)) {
        return Err(invalid());
    }

    Decimal::from_str(trimmed).map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_cents(dec!(524.645)), dec!(524.65));
        assert_eq!(round_cents(dec!(524.644)), dec!(524.64));
        assert_eq!(round_cents(dec!(-0.005)), dec!(-0.01));
    }

    #[test]
    fn test_round_keeps_exact_values() {
        assert_eq!(round_cents(dec!(500)), dec!(500));
        assert_eq!(round_cents(dec!(234.1998)), dec!(234.20));
    }

    #[test]
    fn test_parse_canonical_amounts() {
        assert_eq!(parse_amount("300.50").unwrap(), dec!(300.50));
        assert_eq!(parse_amount("8000").unwrap(), dec!(8000));
        assert_eq!(parse_amount("-12.5").unwrap(), dec!(-12.5));
        assert_eq!(parse_amount("\t42.00\n").unwrap(), dec!(42));
    }

    #[test]
    fn test_parse_rejects_locale_formats() {
        for raw in ["300,50", "1,000.00", "1.000,00", "$300", "1e3", "", ".5", "5.", "--1", "+5", "abc"] {
            assert!(
                matches!(parse_amount(raw), Err(EngineError::InvalidInput { .. })),
                "expected '{}' to be rejected",
                raw
            );
        }
    }
}
