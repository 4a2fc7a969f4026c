//! # Sale Service
//!
//! Orchestrates the sale lifecycle: pricing new sales from the catalog,
//! persisting them, and driving the cancellation state machine.
//!
//! ## Operation Shape
//! Every mutation is one load → mutate → save unit:
//! ```text
//! cancel_item(sale_id, product_id)
//!     │
//!     ├── load aggregate        (NotFound if absent)
//!     ├── Sale::cancel_item     (domain rules, cascade)
//!     ├── persist flags         (single transaction)
//!     └── publish events        (item_cancelled, then sale_cancelled
//!                                if the cascade fired)
//! ```

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use crate::events::SaleEventPublisher;
use vendo_core::{Sale, SaleItem};
use vendo_db::Database;

/// One requested line of a new sale: the product and how many units.
/// The unit price comes from the catalog, never from the caller.
#[derive(Debug, Clone)]
pub struct NewSaleLine {
    pub product_id: Uuid,
    pub quantity: i64,
}

/// Request to create a sale.
#[derive(Debug, Clone)]
pub struct NewSale {
    pub sale_number: String,
    pub customer_id: Uuid,
    pub branch_id: Uuid,
    pub lines: Vec<NewSaleLine>,
}

/// Service for sale operations.
#[derive(Clone)]
pub struct SaleService {
    db: Database,
    publisher: Arc<dyn SaleEventPublisher>,
}

impl SaleService {
    /// Creates a new SaleService.
    pub fn new(db: Database, publisher: Arc<dyn SaleEventPublisher>) -> Self {
        SaleService { db, publisher }
    }

    /// Creates a sale.
    ///
    /// Each line is priced from the catalog (`NotFound` for an unknown
    /// product), which also computes and freezes the line's discount. The
    /// aggregate validates itself; nothing is persisted on failure.
    pub async fn create_sale(&self, new: NewSale) -> ServiceResult<Sale> {
        let products = self.db.products();

        let mut items = Vec::with_capacity(new.lines.len());
        for line in &new.lines {
            let product = products.get_by_id(line.product_id).await?.ok_or(
                ServiceError::NotFound {
                    entity: "Product",
                    id: line.product_id,
                },
            )?;
            items.push(SaleItem::new(line.product_id, line.quantity, product.price())?);
        }

        let sale = Sale::new(new.sale_number, new.customer_id, new.branch_id, items)?;
        self.db.sales().insert(&sale).await?;

        info!(
            sale_id = %sale.id(),
            sale_number = %sale.sale_number(),
            total = %sale.total_amount(),
            "Sale created"
        );
        self.publisher.sale_created(sale.id());

        Ok(sale)
    }

    /// Gets a sale by ID.
    pub async fn get_sale(&self, id: Uuid) -> ServiceResult<Sale> {
        self.db
            .sales()
            .get_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound {
                entity: "Sale",
                id,
            })
    }

    /// Lists sales, newest first, paged.
    pub async fn list_sales(&self, limit: i64, offset: i64) -> ServiceResult<Vec<Sale>> {
        Ok(self.db.sales().list(limit, offset).await?)
    }

    /// Cancels a whole sale.
    pub async fn cancel_sale(&self, id: Uuid) -> ServiceResult<Sale> {
        let mut sale = self.get_sale(id).await?;
        sale.cancel()?;
        self.db.sales().update_cancellation(&sale).await?;

        info!(sale_id = %sale.id(), "Sale cancelled");
        self.publisher.sale_cancelled(sale.id());

        Ok(sale)
    }

    /// Cancels one line of a sale.
    ///
    /// If that was the last active line, the aggregate cancels the sale too
    /// and both transitions are announced.
    pub async fn cancel_item(&self, sale_id: Uuid, product_id: Uuid) -> ServiceResult<Sale> {
        let mut sale = self.get_sale(sale_id).await?;
        let cascaded = sale.cancel_item(product_id)?;
        self.db.sales().update_cancellation(&sale).await?;

        info!(
            sale_id = %sale.id(),
            product_id = %product_id,
            cascaded,
            "Sale item cancelled"
        );
        self.publisher.item_cancelled(sale.id(), product_id);
        if cascaded {
            self.publisher.sale_cancelled(sale.id());
        }

        Ok(sale)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::NoopEventPublisher;
    use rust_decimal::Decimal;
    use std::sync::Mutex;
    use vendo_core::{DomainError, Money, Product};
    use vendo_db::DbConfig;

    /// Records published events as labels, in order.
    #[derive(Default)]
    struct RecordingPublisher {
        events: Mutex<Vec<String>>,
    }

    impl RecordingPublisher {
        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }
    }

    impl SaleEventPublisher for RecordingPublisher {
        fn sale_created(&self, _: Uuid) {
            self.events.lock().unwrap().push("sale_created".into());
        }
        fn sale_modified(&self, _: Uuid) {
            self.events.lock().unwrap().push("sale_modified".into());
        }
        fn sale_cancelled(&self, _: Uuid) {
            self.events.lock().unwrap().push("sale_cancelled".into());
        }
        fn item_cancelled(&self, _: Uuid, _: Uuid) {
            self.events.lock().unwrap().push("item_cancelled".into());
        }
    }

    async fn service_with(publisher: Arc<dyn SaleEventPublisher>) -> (SaleService, Database) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        (SaleService::new(db.clone(), publisher), db)
    }

    async fn seed_product(db: &Database, title: &str, dollars: i64) -> Uuid {
        let product = Product::new(
            title,
            Money::new(Decimal::from(dollars)),
            "test product",
            "",
            "",
        )
        .unwrap();
        db.products().insert(&product).await.unwrap();
        product.id()
    }

    fn new_sale(lines: Vec<NewSaleLine>) -> NewSale {
        NewSale {
            sale_number: "S-0001".to_string(),
            customer_id: Uuid::new_v4(),
            branch_id: Uuid::new_v4(),
            lines,
        }
    }

    #[tokio::test]
    async fn test_create_sale_prices_from_catalog() {
        let publisher = Arc::new(RecordingPublisher::default());
        let (service, db) = service_with(publisher.clone()).await;
        let p1 = seed_product(&db, "A", 10).await;
        let p2 = seed_product(&db, "B", 20).await;

        let sale = service
            .create_sale(new_sale(vec![
                NewSaleLine { product_id: p1, quantity: 5 },
                NewSaleLine { product_id: p2, quantity: 10 },
            ]))
            .await
            .unwrap();

        // 5×$10 −10% = $45; 10×$20 −20% = $160
        assert_eq!(sale.total_amount(), Money::new(Decimal::from(205)));
        assert_eq!(publisher.events(), vec!["sale_created"]);

        // persisted
        let loaded = service.get_sale(sale.id()).await.unwrap();
        assert_eq!(loaded, sale);
    }

    #[tokio::test]
    async fn test_create_sale_unknown_product() {
        let (service, _db) = service_with(Arc::new(NoopEventPublisher)).await;
        let missing = Uuid::new_v4();

        let err = service
            .create_sale(new_sale(vec![NewSaleLine {
                product_id: missing,
                quantity: 1,
            }]))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::NotFound { entity: "Product", id } if id == missing
        ));
    }

    #[tokio::test]
    async fn test_create_sale_rejects_oversized_quantity() {
        let (service, db) = service_with(Arc::new(NoopEventPublisher)).await;
        let p = seed_product(&db, "A", 10).await;

        let err = service
            .create_sale(new_sale(vec![NewSaleLine {
                product_id: p,
                quantity: 21,
            }]))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::Validation(_))));

        // nothing persisted
        assert!(service.list_sales(10, 0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_sale_publishes_and_persists() {
        let publisher = Arc::new(RecordingPublisher::default());
        let (service, db) = service_with(publisher.clone()).await;
        let p = seed_product(&db, "A", 10).await;
        let sale = service
            .create_sale(new_sale(vec![NewSaleLine { product_id: p, quantity: 1 }]))
            .await
            .unwrap();

        service.cancel_sale(sale.id()).await.unwrap();
        assert!(service.get_sale(sale.id()).await.unwrap().is_cancelled());
        assert_eq!(publisher.events(), vec!["sale_created", "sale_cancelled"]);

        // second cancellation fails
        let err = service.cancel_sale(sale.id()).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Domain(DomainError::AlreadyCancelled { .. })
        ));
    }

    #[tokio::test]
    async fn test_cancel_last_item_cascades_and_publishes_both_events() {
        let publisher = Arc::new(RecordingPublisher::default());
        let (service, db) = service_with(publisher.clone()).await;
        let p1 = seed_product(&db, "A", 10).await;
        let p2 = seed_product(&db, "B", 20).await;
        let sale = service
            .create_sale(new_sale(vec![
                NewSaleLine { product_id: p1, quantity: 1 },
                NewSaleLine { product_id: p2, quantity: 1 },
            ]))
            .await
            .unwrap();

        service.cancel_item(sale.id(), p1).await.unwrap();
        let mid = service.get_sale(sale.id()).await.unwrap();
        assert!(!mid.is_cancelled());

        service.cancel_item(sale.id(), p2).await.unwrap();
        let done = service.get_sale(sale.id()).await.unwrap();
        assert!(done.is_cancelled());
        assert!(done.items().iter().all(|i| i.is_cancelled()));

        assert_eq!(
            publisher.events(),
            vec![
                "sale_created",
                "item_cancelled",
                "item_cancelled",
                "sale_cancelled",
            ]
        );
    }

    #[tokio::test]
    async fn test_cancel_item_unknown_product() {
        let (service, db) = service_with(Arc::new(NoopEventPublisher)).await;
        let p = seed_product(&db, "A", 10).await;
        let sale = service
            .create_sale(new_sale(vec![NewSaleLine { product_id: p, quantity: 1 }]))
            .await
            .unwrap();

        let err = service
            .cancel_item(sale.id(), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Domain(DomainError::ItemNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_get_missing_sale() {
        let (service, _db) = service_with(Arc::new(NoopEventPublisher)).await;
        let err = service.get_sale(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { entity: "Sale", .. }));
    }
}
