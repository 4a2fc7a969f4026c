// ============================================================================
// Money - Exact Decimal Currency Arithmetic
// ============================================================================
//
// All monetary amounts are `rust_decimal::Decimal` wrapped in a newtype.
//
// ## Why Decimal and not floats?
// ```
// Float:    10.00 * 0.10 = 1.0000000000000002  ← drift compounds over lines
// Decimal:  10.00 * 0.10 = 1.00                ← exact, always
// ```
//
// ## Why a newtype and not a bare Decimal?
// - Type safety: can't accidentally add a price to a quantity
// - Single place for display formatting and rate application
//
// Discounts use `DiscountRate` (basis points, see discount.rs), applied with
// exact decimal math and no rounding step.
//
// ============================================================================

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use crate::discount::DiscountRate;

/// Monetary amount in the store currency.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Zero amount
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Create from a raw decimal amount
    pub const fn new(amount: Decimal) -> Self {
        Money(amount)
    }

    /// The underlying decimal amount
    pub fn amount(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Line-level extension: amount × quantity
    pub fn multiply_quantity(&self, quantity: i64) -> Money {
        Money(self.0 * Decimal::from(quantity))
    }

    /// Apply a rate (e.g. a discount) to this amount.
    ///
    /// Exact: 1000 bps on $50.00 is precisely $5.00, no rounding.
    pub fn apply_rate(&self, rate: DiscountRate) -> Money {
        Money(self.0 * rate.as_decimal())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negative() {
            write!(f, "-${}", self.0.abs())
        } else {
            write!(f, "${}", self.0)
        }
    }
}

impl Add for Money {
    type Output = Money;
    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Money;
    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money(amount)
    }
}

// ============================================================================
// Tests
// ============================================================================
