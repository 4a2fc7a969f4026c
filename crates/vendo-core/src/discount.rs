// ============================================================================
// Discount Schedule - Quantity-Tiered Discounts
// ============================================================================
//
// The discount for a sale line depends ONLY on the quantity purchased:
//
// ```
//   quantity 1..=3    →  no discount
//   quantity 4..=9    →  10% of (unit_price × quantity)
//   quantity 10..=20  →  20% of (unit_price × quantity)
//   quantity > 20     →  rejected at construction (see validation.rs)
// ```
//
// Boundaries are inclusive on the lower bound: 4 earns 10%, 10 earns 20%.
//
// The schedule runs ONCE, when the line is built. The resulting amount is
// frozen on the item; later price or schedule changes never touch existing
// sales.
//
// ============================================================================

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::{DISCOUNT_TIER_MID, DISCOUNT_TIER_TOP, MAX_LINE_QUANTITY};

/// A discount rate in basis points (1 bps = 0.01%).
///
/// Stored as an integer so rates compare exactly; converted to `Decimal`
/// only at application time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DiscountRate(u32);

impl DiscountRate {
    /// No discount
    pub const ZERO: DiscountRate = DiscountRate(0);

    pub const fn from_bps(bps: u32) -> Self {
        DiscountRate(bps)
    }

    pub const fn bps(&self) -> u32 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// The rate as an exact decimal fraction (1000 bps → 0.1000)
    pub fn as_decimal(&self) -> Decimal {
        Decimal::new(self.0 as i64, 4)
    }
}

/// The discount rate earned by a given line quantity.
///
/// Quantities outside 1..=20 never reach the schedule; construction
/// rejects them first.
pub fn rate_for_quantity(quantity: i64) -> DiscountRate {
    match quantity {
        q if q >= DISCOUNT_TIER_TOP && q <= MAX_LINE_QUANTITY => DiscountRate::from_bps(2000),
        q if q >= DISCOUNT_TIER_MID => DiscountRate::from_bps(1000),
        _ => DiscountRate::ZERO,
    }
}

/// The frozen discount amount for a line: rate applied to the gross
/// extension (unit_price × quantity).
pub fn discount_amount(unit_price: Money, quantity: i64) -> Money {
    unit_price
        .multiply_quantity(quantity)
        .apply_rate(rate_for_quantity(quantity))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn price(major: i64) -> Money {
        Money::new(Decimal::from(major))
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(rate_for_quantity(1).bps(), 0);
        assert_eq!(rate_for_quantity(3).bps(), 0);
        assert_eq!(rate_for_quantity(4).bps(), 1000);
        assert_eq!(rate_for_quantity(9).bps(), 1000);
        assert_eq!(rate_for_quantity(10).bps(), 2000);
        assert_eq!(rate_for_quantity(20).bps(), 2000);
    }

    #[test]
    fn test_discount_amount_mid_tier() {
        // 5 × $10.00 = $50.00 gross, 10% → $5.00
        assert_eq!(discount_amount(price(10), 5), price(5));
    }

    #[test]
    fn test_discount_amount_top_tier() {
        // 10 × $20.00 = $200.00 gross, 20% → $40.00
        assert_eq!(discount_amount(price(20), 10), price(40));
        // 15 × $20.00 = $300.00 gross, 20% → $60.00
        assert_eq!(discount_amount(price(20), 15), price(60));
    }

    #[test]
    fn test_no_discount_below_four() {
        assert_eq!(discount_amount(price(100), 3), Money::ZERO);
    }

    #[test]
    fn test_rate_as_decimal() {
        assert_eq!(DiscountRate::from_bps(1000).as_decimal(), Decimal::new(1, 1));
        assert_eq!(DiscountRate::from_bps(2000).as_decimal(), Decimal::new(2, 1));
        assert!(DiscountRate::ZERO.as_decimal().is_zero());
    }
}
