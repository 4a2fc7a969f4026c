//! # vendo-core: Pure Business Logic for Vendo
//!
//! This crate is the **heart** of Vendo. It contains all business logic
//! as pure functions and aggregates with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Vendo Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 vendo-service (Orchestration)                   │   │
//! │  │     SaleService ──► CartService ──► ProductService              │   │
//! │  │          load ─► mutate ─► save ─► publish event                │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ vendo-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   money   │  │ discount  │  │   sale    │  │   cart    │  │   │
//! │  │   │   Money   │  │  schedule │  │   Sale    │  │   Cart    │  │   │
//! │  │   │   rates   │  │  tiers    │  │ SaleItem  │  │ CartItem  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE LOGIC               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    vendo-db (Database Layer)                    │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money over exact decimals (no floating point!)
//! - [`discount`] - The quantity-tiered discount schedule
//! - [`sale`] - Sale/SaleItem aggregate with cascading cancellation
//! - [`cart`] - Cart/CartItem aggregate
//! - [`product`] - Catalog products
//! - [`error`] - Domain error types
//! - [`validation`] - Field-level validation rules
//!
//! ## Design Principles
//!
//! 1. **Pure Logic**: Aggregates are plain in-memory values; no locking, no async
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Decimal Money**: All monetary values are exact decimals, never floats
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//! 5. **Validate First**: A returned error always means nothing was mutated
//!
//! ## Example Usage
//!
//! ```rust
//! use rust_decimal::Decimal;
//! use uuid::Uuid;
//! use vendo_core::{Money, Sale, SaleItem};
//!
//! // 5 units at $10.00 lands in the 10% tier: $50.00 − $5.00 = $45.00
//! let price = Money::new(Decimal::new(1000, 2));
//! let item = SaleItem::new(Uuid::new_v4(), 5, price).unwrap();
//! assert_eq!(item.total(), Money::new(Decimal::new(4500, 2)));
//!
//! let sale = Sale::new("S-0001", Uuid::new_v4(), Uuid::new_v4(), vec![item]).unwrap();
//! assert_eq!(sale.total_amount(), Money::new(Decimal::new(4500, 2)));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod discount;
pub mod error;
pub mod money;
pub mod product;
pub mod sale;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use vendo_core::Sale` instead of
// `use vendo_core::sale::Sale`

pub use cart::{Cart, CartItem};
pub use discount::DiscountRate;
pub use error::{DomainError, DomainResult, ValidationError};
pub use money::Money;
pub use product::Product;
pub use sale::{Sale, SaleItem};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Minimum quantity for a sale line
pub const MIN_LINE_QUANTITY: i64 = 1;

/// Maximum quantity for a sale line
///
/// ## Business Reason
/// The discount schedule tops out at 20 units; larger orders need a quote,
/// not a walk-in sale. Quantities above this are rejected at construction.
pub const MAX_LINE_QUANTITY: i64 = 20;

/// First quantity earning the 10% discount tier
pub const DISCOUNT_TIER_MID: i64 = 4;

/// First quantity earning the 20% discount tier
pub const DISCOUNT_TIER_TOP: i64 = 10;
