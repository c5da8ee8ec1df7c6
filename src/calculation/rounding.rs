//! Rounding and clamping helpers shared by the calculators.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a dollar amount to cents, half away from zero.
///
/// # Examples
///
/// ```
/// use property_projection::calculation::round_money;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(round_money(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_money(dec!(-123.455)), dec!(-123.46));
/// ```
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Clamps negative values to zero.
pub fn non_negative(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

/// Converts a percentage (e.g., 6.8) to a fraction (0.068).
pub fn percent(value: Decimal) -> Decimal {
    value / Decimal::ONE_HUNDRED
}
