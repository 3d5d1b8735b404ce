//! Text formatting for money and percentages.

use rust_decimal::{Decimal, RoundingStrategy};

/// Round a money value to cents, halves away from zero.
pub fn round_currency(val: Decimal) -> Decimal {
    val.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Format a decimal amount with thousand separators and 2 decimal places.
/// e.g. `1234567.89` → `"$1,234,567.89"`
pub fn format_amount(val: Decimal) -> String {
    let rounded = round_currency(val);
    let abs = rounded.abs();
    let formatted = format!("{abs:.2}");
    let mut parts = formatted.split('.');
    let int_part = parts.next().unwrap_or("0");
    let dec_part = parts.next().unwrap_or("00");

    let with_commas: String = int_part
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(",");

    if rounded < Decimal::ZERO {
        format!("-${with_commas}.{dec_part}")
    } else {
        format!("${with_commas}.{dec_part}")
    }
}

/// One decimal place, no sign handling beyond what the value carries.
/// e.g. `10` → `"10.0%"`, `-3.25` → `"-3.3%"`
pub fn format_percent(val: Decimal) -> String {
    let mut rounded = val.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        // drop the sign of a negative zero
        rounded = Decimal::ZERO;
    }
    format!("{rounded:.1}%")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use rust_decimal_macros::dec;

    // ── format_amount ─────────────────────────────────────────

    #[test]
    fn test_format_amount_basic() {
        assert_eq!(format_amount(dec!(0)), "$0.00");
        assert_eq!(format_amount(dec!(15)), "$15.00");
        assert_eq!(format_amount(dec!(42.5)), "$42.50");
    }

    #[test]
    fn test_format_amount_thousands() {
        assert_eq!(format_amount(dec!(1234.56)), "$1,234.56");
        assert_eq!(format_amount(dec!(1234567.89)), "$1,234,567.89");
        assert_eq!(format_amount(dec!(100000)), "$100,000.00");
    }

    #[test]
    fn test_format_amount_negative() {
        assert_eq!(format_amount(dec!(-99.99)), "-$99.99");
        assert_eq!(format_amount(dec!(-1000)), "-$1,000.00");
    }

    #[test]
    fn test_format_amount_rounds_half_away_from_zero() {
        assert_eq!(format_amount(dec!(0.005)), "$0.01");
        assert_eq!(format_amount(dec!(2.675)), "$2.68");
        assert_eq!(format_amount(dec!(-0.005)), "-$0.01");
    }

    // ── round_currency ────────────────────────────────────────

    #[test]
    fn test_round_currency() {
        assert_eq!(round_currency(dec!(121.0000)), dec!(121.00));
        assert_eq!(round_currency(dec!(10.125)), dec!(10.13));
        assert_eq!(round_currency(dec!(-10.125)), dec!(-10.13));
        assert_eq!(round_currency(dec!(10.124)), dec!(10.12));
    }

    // ── format_percent ────────────────────────────────────────

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(dec!(10)), "10.0%");
        assert_eq!(format_percent(dec!(33.333333)), "33.3%");
        assert_eq!(format_percent(dec!(12.25)), "12.3%");
        assert_eq!(format_percent(dec!(-3.25)), "-3.3%");
        assert_eq!(format_percent(dec!(0)), "0.0%");
    }
}
