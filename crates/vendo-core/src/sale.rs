// ============================================================================
// Sale Aggregate - Sales with Tiered Discounts and Cascading Cancellation
// ============================================================================
//
// A Sale owns its SaleItems outright. The line set is fixed at construction:
// items are never added or removed afterwards, only cancelled.
//
// ## Cancellation state machine (one-way, both levels)
// ```
//   Active ──cancel()──▶ Cancelled          second cancel → AlreadyCancelled
// ```
//
// ## Cascade
// Cancelling a sale does NOT cancel its items (flags stay independent for
// reporting). Cancelling the LAST active item cancels the sale:
// ```
//   cancel_item(A)  →  item A cancelled, sale still active
//   cancel_item(B)  →  item B cancelled, all items now cancelled
//                      → sale cancelled automatically (cascade)
// ```
//
// ## Discounts
// Each line's discount is computed ONCE at construction from the schedule in
// discount.rs and frozen. `total()` is recomputed on read from the stored
// fields; it is never persisted.
//
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::discount;
use crate::error::{DomainError, DomainResult, ValidationError};
use crate::money::Money;
use crate::validation::{
    validate_line_quantity, validate_price, validate_reference, validate_required_text,
    ValidationResult,
};

// ============================================================================
// SaleItem
// ============================================================================

/// A single line within a sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleItem {
    id: Uuid,
    product_id: Uuid,
    quantity: i64,
    unit_price: Money,
    discount: Money,
    cancelled: bool,
}

impl SaleItem {
    /// Build a line, validating quantity (1..=20) and price (non-negative),
    /// and freezing the discount from the quantity schedule.
    pub fn new(product_id: Uuid, quantity: i64, unit_price: Money) -> ValidationResult<Self> {
        validate_line_quantity(quantity)?;
        validate_price("unit_price", unit_price)?;

        let discount = discount::discount_amount(unit_price, quantity);

        Ok(SaleItem {
            id: Uuid::new_v4(),
            product_id,
            quantity,
            unit_price,
            discount,
            cancelled: false,
        })
    }

    /// Rebuild a line from storage. Skips validation: the fields already
    /// passed it when the line was first constructed.
    pub fn rehydrate(
        id: Uuid,
        product_id: Uuid,
        quantity: i64,
        unit_price: Money,
        discount: Money,
        cancelled: bool,
    ) -> Self {
        SaleItem {
            id,
            product_id,
            quantity,
            unit_price,
            discount,
            cancelled,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn product_id(&self) -> Uuid {
        self.product_id
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    /// The frozen discount amount
    pub fn discount(&self) -> Money {
        self.discount
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Gross extension before discount: unit_price × quantity
    pub fn gross(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }

    /// Net line total: gross − frozen discount. Recomputed on every read.
    pub fn total(&self) -> Money {
        self.gross() - self.discount
    }

    /// Cancel this line. Terminal; quantity, price and discount are left
    /// untouched so reporting still sees the original figures.
    pub fn cancel(&mut self) -> DomainResult<()> {
        if self.cancelled {
            return Err(DomainError::AlreadyCancelled { entity: "sale item" });
        }
        self.cancelled = true;
        Ok(())
    }
}

// ============================================================================
// Sale
// ============================================================================

/// The sale aggregate root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    id: Uuid,
    sale_number: String,
    customer_id: Uuid,
    branch_id: Uuid,
    created_at: DateTime<Utc>,
    cancelled: bool,
    items: Vec<SaleItem>,
}

impl Sale {
    /// Build a sale over a non-empty set of lines.
    ///
    /// `sale_number` must be non-blank (uniqueness is the caller's concern),
    /// customer and branch references must be non-nil. Item rules are
    /// re-checked here so hand-built or rehydrated lines can't smuggle in
    /// invalid figures.
    pub fn new(
        sale_number: impl Into<String>,
        customer_id: Uuid,
        branch_id: Uuid,
        items: Vec<SaleItem>,
    ) -> ValidationResult<Self> {
        let sale_number = sale_number.into();
        validate_required_text("sale_number", &sale_number)?;
        validate_reference("customer_id", customer_id)?;
        validate_reference("branch_id", branch_id)?;

        if items.is_empty() {
            return Err(ValidationError::Empty {
                field: "items".to_string(),
            });
        }
        for item in &items {
            if item.quantity <= 0 {
                return Err(ValidationError::MustBePositive {
                    field: "quantity".to_string(),
                    actual: item.quantity,
                });
            }
            validate_price("unit_price", item.unit_price)?;
        }

        Ok(Sale {
            id: Uuid::new_v4(),
            sale_number,
            customer_id,
            branch_id,
            created_at: Utc::now(),
            cancelled: false,
            items,
        })
    }

    /// Rebuild a sale from storage, skipping validation.
    pub fn rehydrate(
        id: Uuid,
        sale_number: String,
        customer_id: Uuid,
        branch_id: Uuid,
        created_at: DateTime<Utc>,
        cancelled: bool,
        items: Vec<SaleItem>,
    ) -> Self {
        Sale {
            id,
            sale_number,
            customer_id,
            branch_id,
            created_at,
            cancelled,
            items,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn sale_number(&self) -> &str {
        &self.sale_number
    }

    pub fn customer_id(&self) -> Uuid {
        self.customer_id
    }

    pub fn branch_id(&self) -> Uuid {
        self.branch_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Lines in insertion order (display order only, no other meaning)
    pub fn items(&self) -> &[SaleItem] {
        &self.items
    }

    /// Sum of all line totals.
    ///
    /// Cancelled lines still count: cancellation flags a line, it does not
    /// remove it from the sale's figures.
    pub fn total_amount(&self) -> Money {
        self.items.iter().map(SaleItem::total).sum()
    }

    /// Cancel the whole sale. Terminal; does not cascade down to the lines.
    pub fn cancel(&mut self) -> DomainResult<()> {
        if self.cancelled {
            return Err(DomainError::AlreadyCancelled { entity: "sale" });
        }
        self.cancelled = true;
        Ok(())
    }

    /// Cancel the first line matching `product_id`.
    ///
    /// Fails with `ItemNotFound` if no line matches, or `AlreadyCancelled`
    /// if the line is already cancelled (the sale is untouched in both
    /// cases). If this leaves every line cancelled and the sale is still
    /// active, the sale is cancelled too.
    ///
    /// Returns `true` when the cascade fired, so callers can react to the
    /// implicit sale-level transition.
    pub fn cancel_item(&mut self, product_id: Uuid) -> DomainResult<bool> {
        let item = self
            .items
            .iter_mut()
            .find(|i| i.product_id == product_id)
            .ok_or(DomainError::ItemNotFound {
                aggregate: "sale",
                product_id,
            })?;
        item.cancel()?;

        let cascade = !self.cancelled && self.items.iter().all(SaleItem::is_cancelled);
        if cascade {
            self.cancelled = true;
        }
        Ok(cascade)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn price(amount: &str) -> Money {
        Money::new(amount.parse::<Decimal>().unwrap())
    }

    fn item(quantity: i64, unit_price: &str) -> SaleItem {
        SaleItem::new(Uuid::new_v4(), quantity, price(unit_price)).unwrap()
    }

    fn sale(items: Vec<SaleItem>) -> Sale {
        Sale::new("S-0001", Uuid::new_v4(), Uuid::new_v4(), items).unwrap()
    }

    // ------------------------------------------------------------------------
    // SaleItem construction & discounts
    // ------------------------------------------------------------------------

    #[test]
    fn test_no_discount_below_four_units() {
        let line = item(3, "10.00");
        assert_eq!(line.discount(), Money::ZERO);
        assert_eq!(line.total(), price("30.00"));
    }

    #[test]
    fn test_ten_percent_discount_from_four_units() {
        let line = item(4, "10.00");
        assert_eq!(line.discount(), price("4.000"));
        assert_eq!(line.total(), price("36.00"));
    }

    #[test]
    fn test_twenty_percent_discount_from_ten_units() {
        let line = item(10, "20.00");
        assert_eq!(line.discount(), price("40.000"));
        assert_eq!(line.total(), price("160.00"));
    }

    #[test]
    fn test_quantity_above_twenty_rejected() {
        let err = SaleItem::new(Uuid::new_v4(), 21, price("1.00")).unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { .. }));
    }

    #[test]
    fn test_quantity_zero_rejected() {
        assert!(SaleItem::new(Uuid::new_v4(), 0, price("1.00")).is_err());
    }

    #[test]
    fn test_negative_price_rejected() {
        let err = SaleItem::new(Uuid::new_v4(), 1, price("-0.01")).unwrap_err();
        assert!(matches!(err, ValidationError::CannotBeNegative { .. }));
    }

    #[test]
    fn test_zero_price_allowed() {
        let line = SaleItem::new(Uuid::new_v4(), 10, Money::ZERO).unwrap();
        assert_eq!(line.total(), Money::ZERO);
    }

    #[test]
    fn test_discount_frozen_at_construction() {
        let line = item(5, "10.00");
        let frozen = line.discount();
        // cancelling must not touch the stored figures
        let mut line = line;
        line.cancel().unwrap();
        assert_eq!(line.discount(), frozen);
        assert_eq!(line.quantity(), 5);
        assert_eq!(line.unit_price(), price("10.00"));
    }

    // ------------------------------------------------------------------------
    // Sale construction
    // ------------------------------------------------------------------------

    #[test]
    fn test_blank_sale_number_rejected() {
        let err = Sale::new("   ", Uuid::new_v4(), Uuid::new_v4(), vec![item(1, "1.00")])
            .unwrap_err();
        assert!(matches!(err, ValidationError::Required { .. }));
    }

    #[test]
    fn test_nil_references_rejected() {
        let items = vec![item(1, "1.00")];
        assert!(Sale::new("S-1", Uuid::nil(), Uuid::new_v4(), items.clone()).is_err());
        assert!(Sale::new("S-1", Uuid::new_v4(), Uuid::nil(), items).is_err());
    }

    #[test]
    fn test_empty_item_list_rejected() {
        let err = Sale::new("S-1", Uuid::new_v4(), Uuid::new_v4(), vec![]).unwrap_err();
        assert!(matches!(err, ValidationError::Empty { .. }));
    }

    #[test]
    fn test_rehydrated_invalid_item_caught_by_sale() {
        // a line that never went through SaleItem::new
        let bad = SaleItem::rehydrate(
            Uuid::new_v4(),
            Uuid::new_v4(),
            0,
            price("1.00"),
            Money::ZERO,
            false,
        );
        let err = Sale::new("S-1", Uuid::new_v4(), Uuid::new_v4(), vec![bad]).unwrap_err();
        assert!(matches!(err, ValidationError::MustBePositive { .. }));
    }

    // ------------------------------------------------------------------------
    // Totals
    // ------------------------------------------------------------------------

    #[test]
    fn test_total_mixed_tiers() {
        // 5 × $10 → $50 − 10% = $45; 10 × $20 → $200 − 20% = $160
        let s = sale(vec![item(5, "10.00"), item(10, "20.00")]);
        assert_eq!(s.total_amount(), price("205.00"));
    }

    #[test]
    fn test_total_mid_and_top_tier() {
        // 5 × $10 → $45; 15 × $20 → $300 − 20% = $240
        let s = sale(vec![item(5, "10.00"), item(15, "20.00")]);
        assert_eq!(s.total_amount(), price("285.00"));
    }

    #[test]
    fn test_total_amount_includes_cancelled_items() {
        let a = item(5, "10.00");
        let target = a.product_id();
        let mut s = sale(vec![a, item(10, "20.00")]);
        let before = s.total_amount();
        s.cancel_item(target).unwrap();
        assert_eq!(s.total_amount(), before);
    }

    // ------------------------------------------------------------------------
    // Cancellation & cascade
    // ------------------------------------------------------------------------

    #[test]
    fn test_cancel_sale_is_terminal() {
        let mut s = sale(vec![item(1, "1.00")]);
        assert!(!s.is_cancelled());
        s.cancel().unwrap();
        assert!(s.is_cancelled());
        let err = s.cancel().unwrap_err();
        assert!(matches!(err, DomainError::AlreadyCancelled { entity: "sale" }));
    }

    #[test]
    fn test_cancel_sale_leaves_items_active() {
        let mut s = sale(vec![item(1, "1.00"), item(2, "2.00")]);
        s.cancel().unwrap();
        assert!(s.items().iter().all(|i| !i.is_cancelled()));
    }

    #[test]
    fn test_cancel_item_twice_fails() {
        let a = item(1, "1.00");
        let target = a.product_id();
        let mut s = sale(vec![a, item(2, "2.00")]);
        s.cancel_item(target).unwrap();
        let err = s.cancel_item(target).unwrap_err();
        assert!(matches!(
            err,
            DomainError::AlreadyCancelled { entity: "sale item" }
        ));
        // the sale itself is untouched
        assert!(!s.is_cancelled());
    }

    #[test]
    fn test_cancel_item_unknown_product() {
        let mut s = sale(vec![item(1, "1.00")]);
        let missing = Uuid::new_v4();
        let err = s.cancel_item(missing).unwrap_err();
        assert!(matches!(
            err,
            DomainError::ItemNotFound { product_id, .. } if product_id == missing
        ));
    }

    #[test]
    fn test_cascade_fires_on_last_active_item() {
        let a = item(1, "1.00");
        let b = item(2, "2.00");
        let (pa, pb) = (a.product_id(), b.product_id());
        let mut s = sale(vec![a, b]);

        assert!(!s.cancel_item(pa).unwrap());
        assert!(!s.is_cancelled());

        assert!(s.cancel_item(pb).unwrap());
        assert!(s.is_cancelled());
    }

    #[test]
    fn test_cascade_skipped_when_sale_already_cancelled() {
        let a = item(1, "1.00");
        let pa = a.product_id();
        let mut s = sale(vec![a]);
        s.cancel().unwrap();
        // the line can still be cancelled afterwards; no second transition
        let cascaded = s.cancel_item(pa).unwrap();
        assert!(!cascaded);
        assert!(s.is_cancelled());
    }

    #[test]
    fn test_single_item_sale_cascades_immediately() {
        let a = item(1, "1.00");
        let pa = a.product_id();
        let mut s = sale(vec![a]);
        assert!(s.cancel_item(pa).unwrap());
        assert!(s.is_cancelled());
    }

    #[test]
    fn test_cancel_item_matches_first_of_duplicate_products() {
        let product = Uuid::new_v4();
        let a = SaleItem::new(product, 1, price("1.00")).unwrap();
        let b = SaleItem::new(product, 2, price("2.00")).unwrap();
        let mut s = sale(vec![a, b]);
        s.cancel_item(product).unwrap();
        assert!(s.items()[0].is_cancelled());
        assert!(!s.items()[1].is_cancelled());
        assert!(!s.is_cancelled());
    }

    // ------------------------------------------------------------------------
    // Rehydration
    // ------------------------------------------------------------------------

    #[test]
    fn test_rehydrate_round_trip() {
        let original = sale(vec![item(5, "10.00"), item(10, "20.00")]);
        let copy = Sale::rehydrate(
            original.id(),
            original.sale_number().to_string(),
            original.customer_id(),
            original.branch_id(),
            original.created_at(),
            original.is_cancelled(),
            original.items().to_vec(),
        );
        assert_eq!(copy, original);
        assert_eq!(copy.total_amount(), original.total_amount());
    }
}
