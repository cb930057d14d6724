//! Price display helpers.
//!
//! Amounts are carried as [`Decimal`] everywhere so cart totals never pick up
//! floating point drift. Formatting only happens at the display edge.

use rust_decimal::{Decimal, RoundingStrategy};

/// Format an amount as a display price (e.g., `$139.90`).
///
/// Rounds half away from zero to two decimal places.
#[must_use]
pub fn format_price(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-${:.2}", rounded.abs())
    } else {
        format!("${:.2}", rounded.abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price_pads_to_two_places() {
        assert_eq!(format_price(Decimal::new(1399, 1)), "$139.90");
        assert_eq!(format_price(Decimal::new(5, 0)), "$5.00");
    }

    #[test]
    fn test_format_price_rounds_half_away_from_zero() {
        assert_eq!(format_price(Decimal::new(10_005, 3)), "$10.01");
        assert_eq!(format_price(Decimal::new(10_004, 3)), "$10.00");
    }

    #[test]
    fn test_format_price_zero_and_negative() {
        assert_eq!(format_price(Decimal::ZERO), "$0.00");
        assert_eq!(format_price(Decimal::new(-250, 2)), "-$2.50");
    }
}
