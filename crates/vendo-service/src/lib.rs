//! # vendo-service: Orchestration Layer for Vendo
//!
//! The outer surface of the workspace. Services wire the pure domain model
//! (vendo-core) to persistence (vendo-db) and announce completed sale
//! transitions through a fire-and-forget event publisher.
//!
//! ## Operation Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Load → Mutate → Save → Notify                        │
//! │                                                                         │
//! │  SaleService::cancel_item(sale_id, product_id)                         │
//! │       │                                                                 │
//! │       ├── db.sales().get_by_id()        load aggregate                 │
//! │       ├── sale.cancel_item()            domain rules + cascade         │
//! │       ├── db.sales().update_cancellation()   one transaction           │
//! │       └── publisher.item_cancelled()    after commit, can't fail       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use vendo_db::{Database, DbConfig};
//! use vendo_service::{LogEventPublisher, SaleService};
//!
//! let db = Database::new(DbConfig::new("./vendo.db")).await?;
//! let sales = SaleService::new(db.clone(), Arc::new(LogEventPublisher::new()));
//! let sale = sales.create_sale(request).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod events;
pub mod product;
pub mod sale;

// =============================================================================
// Re-exports
// =============================================================================

pub use cart::{CartService, NewCart, NewCartLine};
pub use error::{ServiceError, ServiceResult};
pub use events::{LogEventPublisher, NoopEventPublisher, SaleEventPublisher};
pub use product::{ProductFields, ProductService};
pub use sale::{NewSale, NewSaleLine, SaleService};
