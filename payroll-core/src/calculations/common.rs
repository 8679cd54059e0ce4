//! Common utility functions for tax calculations.
//!
//! Shared rounding policy used by the resolver and the projection. All
//! intermediate arithmetic runs at full `Decimal` precision; rounding happens
//! once, on the value that leaves the calculation.

use rust_decimal::Decimal;

/// Months used to annualise a monthly salary.
pub const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use payroll_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(22500.004)), dec!(22500.00));
/// assert_eq!(round_half_up(dec!(0.075)), dec!(0.08));
/// assert_eq!(round_half_up(dec!(-0.075)), dec!(-0.08));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// True when `value` carries no more than two significant decimal digits.
pub fn is_cent_precise(value: Decimal) -> bool {
    value.normalize().scale() <= 2
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // round_half_up tests
    // =========================================================================

    #[test]
    fn round_half_up_rounds_down_below_midpoint() {
        assert_eq!(round_half_up(dec!(152500.004)), dec!(152500.00));
    }

    #[test]
    fn round_half_up_rounds_up_at_midpoint() {
        assert_eq!(round_half_up(dec!(0.075)), dec!(0.08));
    }

    #[test]
    fn round_half_up_moves_negative_midpoint_away_from_zero() {
        assert_eq!(round_half_up(dec!(-10.125)), dec!(-10.13));
    }

    #[test]
    fn round_half_up_keeps_cent_values() {
        assert_eq!(round_half_up(dec!(22500.20)), dec!(22500.20));
    }

    #[test]
    fn round_half_up_carries_into_whole_units() {
        assert_eq!(round_half_up(dec!(249999.995)), dec!(250000.00));
    }

    // =========================================================================
    // helpers
    // =========================================================================

    #[test]
    fn months_per_year_is_twelve() {
        assert_eq!(MONTHS_PER_YEAR, dec!(12));
    }

    #[test]
    fn cent_precision_ignores_trailing_zeros() {
        assert!(is_cent_precise(dec!(100.10)));
        assert!(is_cent_precise(dec!(100.1000)));
        assert!(is_cent_precise(dec!(7)));
        assert!(!is_cent_precise(dec!(0.075)));
    }
}
