//! # Product Service
//!
//! Catalog CRUD with a duplicate-title guard. Products publish no events.

use tracing::info;
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use vendo_core::{Money, Product, ValidationError};
use vendo_db::{Database, DbError};

/// Request to create or update a product.
#[derive(Debug, Clone)]
pub struct ProductFields {
    pub title: String,
    pub price: Money,
    pub description: String,
    pub category: String,
    pub image: String,
}

/// Service for catalog operations.
#[derive(Clone)]
pub struct ProductService {
    db: Database,
}

impl ProductService {
    /// Creates a new ProductService.
    pub fn new(db: Database) -> Self {
        ProductService { db }
    }

    /// Creates a product. Titles are unique across the catalog; the check
    /// here gives a domain-level error before the UNIQUE index would.
    pub async fn create_product(&self, fields: ProductFields) -> ServiceResult<Product> {
        if self.db.products().get_by_title(&fields.title).await?.is_some() {
            return Err(ValidationError::Duplicate {
                field: "title".to_string(),
                value: fields.title,
            }
            .into());
        }

        let product = Product::new(
            fields.title,
            fields.price,
            fields.description,
            fields.category,
            fields.image,
        )?;
        self.db.products().insert(&product).await?;

        info!(product_id = %product.id(), title = %product.title(), "Product created");
        Ok(product)
    }

    /// Gets a product by ID.
    pub async fn get_product(&self, id: Uuid) -> ServiceResult<Product> {
        self.db
            .products()
            .get_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound {
                entity: "Product",
                id,
            })
    }

    /// Lists products ordered by title, paged.
    pub async fn list_products(&self, limit: i64, offset: i64) -> ServiceResult<Vec<Product>> {
        Ok(self.db.products().list(limit, offset).await?)
    }

    /// Replaces all catalog fields of a product.
    pub async fn update_product(&self, id: Uuid, fields: ProductFields) -> ServiceResult<Product> {
        let mut product = self.get_product(id).await?;

        // a renamed product must not collide with another title
        if let Some(existing) = self.db.products().get_by_title(&fields.title).await? {
            if existing.id() != id {
                return Err(ValidationError::Duplicate {
                    field: "title".to_string(),
                    value: fields.title,
                }
                .into());
            }
        }

        product.update(
            fields.title,
            fields.price,
            fields.description,
            fields.category,
            fields.image,
        )?;
        self.db.products().update(&product).await?;

        info!(product_id = %product.id(), "Product updated");
        Ok(product)
    }

    /// Deletes a product.
    pub async fn delete_product(&self, id: Uuid) -> ServiceResult<()> {
        match self.db.products().delete(id).await {
            Err(DbError::NotFound { .. }) => Err(ServiceError::NotFound {
                entity: "Product",
                id,
            }),
            other => {
                if other.is_ok() {
                    info!(product_id = %id, "Product deleted");
                }
                Ok(other?)
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use vendo_core::DomainError;
    use vendo_db::DbConfig;

    async fn service() -> ProductService {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        ProductService::new(db)
    }

    fn fields(title: &str) -> ProductFields {
        ProductFields {
            title: title.to_string(),
            price: Money::new(Decimal::new(999, 2)),
            description: "A fine widget".to_string(),
            category: "tools".to_string(),
            image: "widget.png".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let service = service().await;
        let product = service.create_product(fields("Widget")).await.unwrap();

        let loaded = service.get_product(product.id()).await.unwrap();
        assert_eq!(loaded, product);
    }

    #[tokio::test]
    async fn test_duplicate_title_rejected_before_insert() {
        let service = service().await;
        service.create_product(fields("Widget")).await.unwrap();

        let err = service.create_product(fields("Widget")).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Domain(DomainError::Validation(ValidationError::Duplicate { .. }))
        ));
    }

    #[tokio::test]
    async fn test_update_product() {
        let service = service().await;
        let product = service.create_product(fields("Widget")).await.unwrap();

        let updated = service
            .update_product(product.id(), fields("Gadget"))
            .await
            .unwrap();
        assert_eq!(updated.title(), "Gadget");
        assert_eq!(service.get_product(product.id()).await.unwrap().title(), "Gadget");
    }

    #[tokio::test]
    async fn test_update_keeping_own_title_is_allowed() {
        let service = service().await;
        let product = service.create_product(fields("Widget")).await.unwrap();

        assert!(service.update_product(product.id(), fields("Widget")).await.is_ok());
    }

    #[tokio::test]
    async fn test_rename_onto_existing_title_rejected() {
        let service = service().await;
        service.create_product(fields("Widget")).await.unwrap();
        let other = service.create_product(fields("Gadget")).await.unwrap();

        let err = service
            .update_product(other.id(), fields("Widget"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Domain(DomainError::Validation(ValidationError::Duplicate { .. }))
        ));
    }

    #[tokio::test]
    async fn test_delete_product() {
        let service = service().await;
        let product = service.create_product(fields("Widget")).await.unwrap();

        service.delete_product(product.id()).await.unwrap();
        let err = service.get_product(product.id()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { entity: "Product", .. }));
    }

    #[tokio::test]
    async fn test_list_products() {
        let service = service().await;
        for title in ["Banana", "Apple"] {
            service.create_product(fields(title)).await.unwrap();
        }

        let products = service.list_products(10, 0).await.unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].title(), "Apple");
    }
}
