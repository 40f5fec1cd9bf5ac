//! Shared rounding helpers for the calculators.

use rust_decimal::Decimal;

/// Rounds a monetary amount to two decimal places using half-up rounding
/// (midpoints move away from zero), the standard convention for euro
/// amounts.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use irpef_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a rate (a decimal fraction, not a percentage) to four decimal
/// places with the same midpoint strategy.
pub fn round_rate(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(4, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the larger of two decimal values.
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}
