// ============================================================================
// Cart Aggregate - Pre-Sale Shopping Carts
// ============================================================================
//
// Carts are unpriced: lines carry only product id + quantity. Pricing and
// discounts happen later, when the cart becomes a sale.
//
// ## Invariant: one line per product
// Adding a product that's already in the cart increases that line's quantity
// instead of appending a duplicate.
//
// ## Asymmetry with Sale (intentional)
// - Cart lines can be REMOVED; sale lines can only be cancelled.
// - A cart may shrink to zero lines and lives on; a sale can never be empty
//   and cancelling its last line cancels the sale.
//
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, DomainResult, ValidationError};
use crate::validation::{validate_positive_quantity, validate_reference, ValidationResult};

// ============================================================================
// CartItem
// ============================================================================

/// A single product line in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    id: Uuid,
    product_id: Uuid,
    quantity: i64,
}

impl CartItem {
    /// Build a line; quantity must be strictly positive (no upper cap here,
    /// the sale-side schedule enforces its own range at checkout).
    pub fn new(product_id: Uuid, quantity: i64) -> ValidationResult<Self> {
        validate_positive_quantity(quantity)?;
        Ok(CartItem {
            id: Uuid::new_v4(),
            product_id,
            quantity,
        })
    }

    /// Rebuild from storage, skipping validation.
    pub fn rehydrate(id: Uuid, product_id: Uuid, quantity: i64) -> Self {
        CartItem {
            id,
            product_id,
            quantity,
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

    /// Merge more units into this line; the increment must be positive.
    pub fn increase_quantity(&mut self, amount: i64) -> ValidationResult<()> {
        validate_positive_quantity(amount)?;
        self.quantity += amount;
        Ok(())
    }
}

// ============================================================================
// Cart
// ============================================================================

/// The cart aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    id: Uuid,
    user_id: Uuid,
    created_at: DateTime<Utc>,
    items: Vec<CartItem>,
}

impl Cart {
    /// Build a cart for a user over a non-empty initial line set.
    ///
    /// Duplicate product ids in the input are merged into a single line so
    /// the one-line-per-product invariant holds from the start.
    pub fn new(user_id: Uuid, items: Vec<CartItem>) -> ValidationResult<Self> {
        validate_reference("user_id", user_id)?;
        if items.is_empty() {
            return Err(ValidationError::Empty {
                field: "items".to_string(),
            });
        }

        let mut merged: Vec<CartItem> = Vec::with_capacity(items.len());
        for item in items {
            match merged.iter_mut().find(|i| i.product_id == item.product_id) {
                Some(existing) => existing.increase_quantity(item.quantity)?,
                None => merged.push(item),
            }
        }

        Ok(Cart {
            id: Uuid::new_v4(),
            user_id,
            created_at: Utc::now(),
            items: merged,
        })
    }

    /// Rebuild from storage, skipping validation.
    pub fn rehydrate(
        id: Uuid,
        user_id: Uuid,
        created_at: DateTime<Utc>,
        items: Vec<CartItem>,
    ) -> Self {
        Cart {
            id,
            user_id,
            created_at,
            items,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total units across all lines
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(CartItem::quantity).sum()
    }

    /// Add units of a product: merges into the existing line if the product
    /// is already in the cart, appends a new line otherwise. Fails for a
    /// non-positive quantity, leaving the cart unchanged.
    pub fn add_item(&mut self, product_id: Uuid, quantity: i64) -> DomainResult<()> {
        match self.items.iter_mut().find(|i| i.product_id == product_id) {
            Some(existing) => existing.increase_quantity(quantity)?,
            None => self.items.push(CartItem::new(product_id, quantity)?),
        }
        Ok(())
    }

    /// Remove a product's line entirely. `ItemNotFound` if it isn't in the
    /// cart. Removing the last line leaves an empty, still-usable cart.
    pub fn remove_item(&mut self, product_id: Uuid) -> DomainResult<()> {
        let before = self.items.len();
        self.items.retain(|i| i.product_id != product_id);
        if self.items.len() == before {
            return Err(DomainError::ItemNotFound {
                aggregate: "cart",
                product_id,
            });
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
