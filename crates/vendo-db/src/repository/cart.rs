//! # Cart Repository
//!
//! Database operations for carts and their lines.
//!
//! Cart lines change often (merge-on-add, removal), so `update_items`
//! replaces the full line set transactionally instead of diffing rows.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::parse_uuid;
use vendo_core::{Cart, CartItem};

/// Raw cart row as stored in SQLite.
#[derive(Debug, sqlx::FromRow)]
struct CartRow {
    id: String,
    user_id: String,
    created_at: DateTime<Utc>,
}

/// Raw cart item row as stored in SQLite.
#[derive(Debug, sqlx::FromRow)]
struct CartItemRow {
    id: String,
    product_id: String,
    quantity: i64,
}

impl CartItemRow {
    fn into_item(self) -> DbResult<CartItem> {
        Ok(CartItem::rehydrate(
            parse_uuid("cart_items.id", &self.id)?,
            parse_uuid("cart_items.product_id", &self.product_id)?,
            self.quantity,
        ))
    }
}

/// Repository for cart database operations.
#[derive(Debug, Clone)]
pub struct CartRepository {
    pool: SqlitePool,
}

impl CartRepository {
    /// Creates a new CartRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CartRepository { pool }
    }

    /// Inserts a cart and its lines in one transaction.
    pub async fn insert(&self, cart: &Cart) -> DbResult<()> {
        debug!(id = %cart.id(), user_id = %cart.user_id(), "Inserting cart");

        let mut tx = self.pool.begin().await?;

        sqlx::query("INSERT INTO carts (id, user_id, created_at) VALUES (?1, ?2, ?3)")
            .bind(cart.id().to_string())
            .bind(cart.user_id().to_string())
            .bind(cart.created_at())
            .execute(&mut *tx)
            .await?;

        for (seq, item) in cart.items().iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO cart_items (id, cart_id, seq, product_id, quantity)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )
            .bind(item.id().to_string())
            .bind(cart.id().to_string())
            .bind(seq as i64)
            .bind(item.product_id().to_string())
            .bind(item.quantity())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(())
    }

    /// Gets a cart by ID, rehydrating the full aggregate.
    pub async fn get_by_id(&self, id: Uuid) -> DbResult<Option<Cart>> {
        let row: Option<CartRow> = sqlx::query_as(
            "SELECT id, user_id, created_at FROM carts WHERE id = ?1",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(self.rehydrate(row).await?)),
            None => Ok(None),
        }
    }

    /// Lists carts, newest first, paged.
    pub async fn list(&self, limit: i64, offset: i64) -> DbResult<Vec<Cart>> {
        let rows: Vec<CartRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, created_at
            FROM carts
            ORDER BY created_at DESC
            LIMIT ?1 OFFSET ?2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let mut carts = Vec::with_capacity(rows.len());
        for row in rows {
            carts.push(self.rehydrate(row).await?);
        }
        Ok(carts)
    }

    /// Replaces a cart's full line set in one transaction.
    pub async fn update_items(&self, cart: &Cart) -> DbResult<()> {
        debug!(id = %cart.id(), lines = cart.items().len(), "Replacing cart lines");

        let mut tx = self.pool.begin().await?;

        // Touching carts first doubles as the existence check
        let result = sqlx::query("UPDATE carts SET user_id = user_id WHERE id = ?1")
            .bind(cart.id().to_string())
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Cart", cart.id()));
        }

        sqlx::query("DELETE FROM cart_items WHERE cart_id = ?1")
            .bind(cart.id().to_string())
            .execute(&mut *tx)
            .await?;

        for (seq, item) in cart.items().iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO cart_items (id, cart_id, seq, product_id, quantity)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )
            .bind(item.id().to_string())
            .bind(cart.id().to_string())
            .bind(seq as i64)
            .bind(item.product_id().to_string())
            .bind(item.quantity())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(())
    }

    /// Deletes a cart; its lines go with it (FK cascade).
    pub async fn delete(&self, id: Uuid) -> DbResult<()> {
        debug!(id = %id, "Deleting cart");

        let result = sqlx::query("DELETE FROM carts WHERE id = ?1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Cart", id));
        }

        Ok(())
    }

    /// Loads the lines for a cart row and assembles the aggregate.
    async fn rehydrate(&self, row: CartRow) -> DbResult<Cart> {
        let item_rows: Vec<CartItemRow> = sqlx::query_as(
            r#"
            SELECT id, product_id, quantity
            FROM cart_items
            WHERE cart_id = ?1
            ORDER BY seq
            "#,
        )
        .bind(&row.id)
        .fetch_all(&self.pool)
        .await?;

        let items = item_rows
            .into_iter()
            .map(CartItemRow::into_item)
            .collect::<DbResult<Vec<_>>>()?;

        Ok(Cart::rehydrate(
            parse_uuid("carts.id", &row.id)?,
            parse_uuid("carts.user_id", &row.user_id)?,
            row.created_at,
            items,
        ))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn cart() -> Cart {
        Cart::new(
            Uuid::new_v4(),
            vec![CartItem::new(Uuid::new_v4(), 2).unwrap()],
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_get_round_trip() {
        let db = test_db().await;
        let original = cart();

        db.carts().insert(&original).await.unwrap();
        let loaded = db.carts().get_by_id(original.id()).await.unwrap().unwrap();
        assert_eq!(loaded, original);
    }

    #[tokio::test]
    async fn test_update_items_replaces_lines() {
        let db = test_db().await;
        let mut c = cart();
        let product = c.items()[0].product_id();
        db.carts().insert(&c).await.unwrap();

        c.add_item(product, 3).unwrap();
        c.add_item(Uuid::new_v4(), 1).unwrap();
        db.carts().update_items(&c).await.unwrap();

        let loaded = db.carts().get_by_id(c.id()).await.unwrap().unwrap();
        assert_eq!(loaded.items().len(), 2);
        assert_eq!(loaded.items()[0].quantity(), 5);
    }

    #[tokio::test]
    async fn test_update_items_allows_empty_cart() {
        let db = test_db().await;
        let mut c = cart();
        let product = c.items()[0].product_id();
        db.carts().insert(&c).await.unwrap();

        c.remove_item(product).unwrap();
        db.carts().update_items(&c).await.unwrap();

        let loaded = db.carts().get_by_id(c.id()).await.unwrap().unwrap();
        assert!(loaded.is_empty());
    }

    #[tokio::test]
    async fn test_update_items_missing_cart() {
        let db = test_db().await;
        let err = db.carts().update_items(&cart()).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_removes_cart_and_lines() {
        let db = test_db().await;
        let c = cart();
        db.carts().insert(&c).await.unwrap();

        db.carts().delete(c.id()).await.unwrap();
        assert!(db.carts().get_by_id(c.id()).await.unwrap().is_none());

        let orphans: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cart_items WHERE cart_id = ?1")
            .bind(c.id().to_string())
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(orphans, 0);
    }

    #[tokio::test]
    async fn test_list() {
        let db = test_db().await;
        db.carts().insert(&cart()).await.unwrap();
        db.carts().insert(&cart()).await.unwrap();

        assert_eq!(db.carts().list(10, 0).await.unwrap().len(), 2);
        assert_eq!(db.carts().list(1, 0).await.unwrap().len(), 1);
    }
}
