//! # Cart Service
//!
//! Orchestrates cart lifecycle: creation against the catalog, line
//! mutation (merge-on-add, removal), and deletion.
//!
//! Carts publish no domain events; only the sale lifecycle is observable
//! downstream.

use tracing::info;
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use vendo_core::{Cart, CartItem};
use vendo_db::{Database, DbError};

/// One requested line of a new cart.
#[derive(Debug, Clone)]
pub struct NewCartLine {
    pub product_id: Uuid,
    pub quantity: i64,
}

/// Request to create a cart.
#[derive(Debug, Clone)]
pub struct NewCart {
    pub user_id: Uuid,
    pub lines: Vec<NewCartLine>,
}

/// Service for cart operations.
#[derive(Clone)]
pub struct CartService {
    db: Database,
}

impl CartService {
    /// Creates a new CartService.
    pub fn new(db: Database) -> Self {
        CartService { db }
    }

    /// Creates a cart. Every referenced product must exist in the catalog.
    pub async fn create_cart(&self, new: NewCart) -> ServiceResult<Cart> {
        let products = self.db.products();

        let mut items = Vec::with_capacity(new.lines.len());
        for line in &new.lines {
            if products.get_by_id(line.product_id).await?.is_none() {
                return Err(ServiceError::NotFound {
                    entity: "Product",
                    id: line.product_id,
                });
            }
            items.push(CartItem::new(line.product_id, line.quantity)?);
        }

        let cart = Cart::new(new.user_id, items)?;
        self.db.carts().insert(&cart).await?;

        info!(cart_id = %cart.id(), user_id = %cart.user_id(), "Cart created");
        Ok(cart)
    }

    /// Gets a cart by ID.
    pub async fn get_cart(&self, id: Uuid) -> ServiceResult<Cart> {
        self.db
            .carts()
            .get_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound { entity: "Cart", id })
    }

    /// Lists carts, newest first, paged.
    pub async fn list_carts(&self, limit: i64, offset: i64) -> ServiceResult<Vec<Cart>> {
        Ok(self.db.carts().list(limit, offset).await?)
    }

    /// Adds units of a product to a cart, merging into an existing line
    /// when the product is already there.
    pub async fn add_item(
        &self,
        cart_id: Uuid,
        product_id: Uuid,
        quantity: i64,
    ) -> ServiceResult<Cart> {
        if self.db.products().get_by_id(product_id).await?.is_none() {
            return Err(ServiceError::NotFound {
                entity: "Product",
                id: product_id,
            });
        }

        let mut cart = self.get_cart(cart_id).await?;
        cart.add_item(product_id, quantity)?;
        self.db.carts().update_items(&cart).await?;

        info!(cart_id = %cart.id(), product_id = %product_id, quantity, "Cart line added");
        Ok(cart)
    }

    /// Removes a product's line from a cart.
    pub async fn remove_item(&self, cart_id: Uuid, product_id: Uuid) -> ServiceResult<Cart> {
        let mut cart = self.get_cart(cart_id).await?;
        cart.remove_item(product_id)?;
        self.db.carts().update_items(&cart).await?;

        info!(cart_id = %cart.id(), product_id = %product_id, "Cart line removed");
        Ok(cart)
    }

    /// Deletes a cart and its lines.
    pub async fn delete_cart(&self, id: Uuid) -> ServiceResult<()> {
        match self.db.carts().delete(id).await {
            Err(DbError::NotFound { .. }) => {
                Err(ServiceError::NotFound { entity: "Cart", id })
            }
            other => {
                if other.is_ok() {
                    info!(cart_id = %id, "Cart deleted");
                }
                Ok(other?)
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
