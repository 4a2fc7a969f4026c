//! # Product Repository
//!
//! Database operations for the product catalog.

use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::{money_text, parse_money, parse_uuid};
use vendo_core::Product;

/// Raw product row as stored in SQLite.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: String,
    title: String,
    price: String,
    description: String,
    category: String,
    image: String,
}

impl ProductRow {
    fn into_product(self) -> DbResult<Product> {
        Ok(Product::rehydrate(
            parse_uuid("products.id", &self.id)?,
            self.title,
            parse_money("products.price", &self.price)?,
            self.description,
            self.category,
            self.image,
        ))
    }
}

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Inserts a product.
    ///
    /// A duplicate title surfaces as [`DbError::UniqueViolation`].
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id(), title = %product.title(), "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (id, title, price, description, category, image)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(product.id().to_string())
        .bind(product.title())
        .bind(money_text(product.price()))
        .bind(product.description())
        .bind(product.category())
        .bind(product.image())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a product by ID.
    pub async fn get_by_id(&self, id: Uuid) -> DbResult<Option<Product>> {
        let row: Option<ProductRow> = sqlx::query_as(
            r#"
            SELECT id, title, price, description, category, image
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(ProductRow::into_product).transpose()
    }

    /// Gets a product by its (unique) title.
    pub async fn get_by_title(&self, title: &str) -> DbResult<Option<Product>> {
        let row: Option<ProductRow> = sqlx::query_as(
            r#"
            SELECT id, title, price, description, category, image
            FROM products
            WHERE title = ?1
            "#,
        )
        .bind(title)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ProductRow::into_product).transpose()
    }

    /// Lists products ordered by title, paged.
    pub async fn list(&self, limit: i64, offset: i64) -> DbResult<Vec<Product>> {
        let rows: Vec<ProductRow> = sqlx::query_as(
            r#"
            SELECT id, title, price, description, category, image
            FROM products
            ORDER BY title
            LIMIT ?1 OFFSET ?2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ProductRow::into_product).collect()
    }

    /// Updates all catalog fields of an existing product.
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id(), "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products SET
                title = ?2,
                price = ?3,
                description = ?4,
                category = ?5,
                image = ?6
            WHERE id = ?1
            "#,
        )
        .bind(product.id().to_string())
        .bind(product.title())
        .bind(money_text(product.price()))
        .bind(product.description())
        .bind(product.category())
        .bind(product.image())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", product.id()));
        }

        Ok(())
    }

    /// Deletes a product.
    pub async fn delete(&self, id: Uuid) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
