//! # Sale Repository
//!
//! Database operations for sales and their line items.
//!
//! ## Write Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   One Transaction Per Mutation                          │
//! │                                                                         │
//! │  insert(sale)                                                          │
//! │     └── BEGIN → sales row → sale_items rows → COMMIT                   │
//! │                                                                         │
//! │  update_cancellation(sale)                                             │
//! │     └── BEGIN → sales.cancelled → each sale_items.cancelled → COMMIT   │
//! │         (the persisted image always matches the in-memory aggregate,   │
//! │          including a cascade that cancelled the sale)                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Line items are immutable after insert except for their cancelled flag;
//! quantity, unit price and the frozen discount never change.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::{money_text, parse_money, parse_uuid};
use vendo_core::{Sale, SaleItem};

/// Raw sale row as stored in SQLite.
#[derive(Debug, sqlx::FromRow)]
struct SaleRow {
    id: String,
    sale_number: String,
    customer_id: String,
    branch_id: String,
    created_at: DateTime<Utc>,
    cancelled: bool,
}

/// Raw sale item row as stored in SQLite.
#[derive(Debug, sqlx::FromRow)]
struct SaleItemRow {
    id: String,
    product_id: String,
    quantity: i64,
    unit_price: String,
    discount: String,
    cancelled: bool,
}

impl SaleItemRow {
    fn into_item(self) -> DbResult<SaleItem> {
        Ok(SaleItem::rehydrate(
            parse_uuid("sale_items.id", &self.id)?,
            parse_uuid("sale_items.product_id", &self.product_id)?,
            self.quantity,
            parse_money("sale_items.unit_price", &self.unit_price)?,
            parse_money("sale_items.discount", &self.discount)?,
            self.cancelled,
        ))
    }
}

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Inserts a sale and all of its line items in one transaction.
    pub async fn insert(&self, sale: &Sale) -> DbResult<()> {
        debug!(id = %sale.id(), sale_number = %sale.sale_number(), "Inserting sale");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO sales (id, sale_number, customer_id, branch_id, created_at, cancelled)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(sale.id().to_string())
        .bind(sale.sale_number())
        .bind(sale.customer_id().to_string())
        .bind(sale.branch_id().to_string())
        .bind(sale.created_at())
        .bind(sale.is_cancelled())
        .execute(&mut *tx)
        .await?;

        for (seq, item) in sale.items().iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO sale_items (
                    id, sale_id, seq, product_id,
                    quantity, unit_price, discount, cancelled
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
            )
            .bind(item.id().to_string())
            .bind(sale.id().to_string())
            .bind(seq as i64)
            .bind(item.product_id().to_string())
            .bind(item.quantity())
            .bind(money_text(item.unit_price()))
            .bind(money_text(item.discount()))
            .bind(item.is_cancelled())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(())
    }

    /// Gets a sale by ID, rehydrating the full aggregate.
    pub async fn get_by_id(&self, id: Uuid) -> DbResult<Option<Sale>> {
        let row: Option<SaleRow> = sqlx::query_as(
            r#"
            SELECT id, sale_number, customer_id, branch_id, created_at, cancelled
            FROM sales
            WHERE id = ?1
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(self.rehydrate(row).await?)),
            None => Ok(None),
        }
    }

    /// Lists sales, newest first, paged.
    pub async fn list(&self, limit: i64, offset: i64) -> DbResult<Vec<Sale>> {
        let rows: Vec<SaleRow> = sqlx::query_as(
            r#"
            SELECT id, sale_number, customer_id, branch_id, created_at, cancelled
            FROM sales
            ORDER BY created_at DESC
            LIMIT ?1 OFFSET ?2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let mut sales = Vec::with_capacity(rows.len());
        for row in rows {
            sales.push(self.rehydrate(row).await?);
        }
        Ok(sales)
    }

    /// Persists the cancellation flags of a sale and all of its items.
    ///
    /// The whole flag image is written in one transaction so a cascade
    /// (last item cancelled → sale cancelled) lands atomically.
    pub async fn update_cancellation(&self, sale: &Sale) -> DbResult<()> {
        debug!(id = %sale.id(), cancelled = sale.is_cancelled(), "Persisting cancellation flags");

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("UPDATE sales SET cancelled = ?2 WHERE id = ?1")
            .bind(sale.id().to_string())
            .bind(sale.is_cancelled())
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sale", sale.id()));
        }

        for item in sale.items() {
            sqlx::query("UPDATE sale_items SET cancelled = ?2 WHERE id = ?1")
                .bind(item.id().to_string())
                .bind(item.is_cancelled())
                .execute(&mut *tx)
                .await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(())
    }

    /// Loads the items for a sale row and assembles the aggregate.
    async fn rehydrate(&self, row: SaleRow) -> DbResult<Sale> {
        let item_rows: Vec<SaleItemRow> = sqlx::query_as(
            r#"
            SELECT id, product_id, quantity, unit_price, discount, cancelled
            FROM sale_items
            WHERE sale_id = ?1
            ORDER BY seq
            "#,
        )
        .bind(&row.id)
        .fetch_all(&self.pool)
        .await?;

        let items = item_rows
            .into_iter()
            .map(SaleItemRow::into_item)
            .collect::<DbResult<Vec<_>>>()?;

        Ok(Sale::rehydrate(
            parse_uuid("sales.id", &row.id)?,
            row.sale_number,
            parse_uuid("sales.customer_id", &row.customer_id)?,
            parse_uuid("sales.branch_id", &row.branch_id)?,
            row.created_at,
            row.cancelled,
            items,
        ))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
