//! # Domain Event Publishing
//!
//! Services announce completed state changes through [`SaleEventPublisher`].
//! Publishing is fire-and-forget: it happens AFTER the transaction commits,
//! cannot fail, and cannot roll the operation back.
//!
//! ## Event Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │   SaleService::cancel_item                                              │
//! │        │                                                                │
//! │        ├── load aggregate ── mutate ── persist (COMMIT)                 │
//! │        │                                                                │
//! │        └── publisher.item_cancelled(sale_id, product_id)                │
//! │                 │                                                       │
//! │                 └── cascade fired? also publisher.sale_cancelled(id)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Two implementations ship with the crate: [`LogEventPublisher`] writes
//! structured payloads to the log, [`NoopEventPublisher`] swallows events
//! (tests, batch tools).

use serde_json::json;
use tracing::info;
use uuid::Uuid;

/// Receiver for sale lifecycle notifications.
///
/// Implementations must not block and must not fail; a publisher is told
/// about a change that has already been committed.
pub trait SaleEventPublisher: Send + Sync {
    /// A sale was created and persisted.
    fn sale_created(&self, sale_id: Uuid);

    /// A sale's content changed (catalog-facing modification).
    fn sale_modified(&self, sale_id: Uuid);

    /// A sale transitioned to Cancelled, explicitly or via cascade.
    fn sale_cancelled(&self, sale_id: Uuid);

    /// A single line item was cancelled.
    fn item_cancelled(&self, sale_id: Uuid, product_id: Uuid);
}

// =============================================================================
// Log Publisher
// =============================================================================

/// Publishes events as structured log records.
#[derive(Debug, Clone, Default)]
pub struct LogEventPublisher;

impl LogEventPublisher {
    pub fn new() -> Self {
        LogEventPublisher
    }

    fn publish(&self, payload: serde_json::Value) {
        info!(target: "vendo::events", %payload, "Domain event published");
    }
}

impl SaleEventPublisher for LogEventPublisher {
    fn sale_created(&self, sale_id: Uuid) {
        self.publish(json!({ "event": "SaleCreated", "sale_id": sale_id }));
    }

    fn sale_modified(&self, sale_id: Uuid) {
        self.publish(json!({ "event": "SaleModified", "sale_id": sale_id }));
    }

    fn sale_cancelled(&self, sale_id: Uuid) {
        self.publish(json!({ "event": "SaleCancelled", "sale_id": sale_id }));
    }

    fn item_cancelled(&self, sale_id: Uuid, product_id: Uuid) {
        self.publish(json!({
            "event": "ItemCancelled",
            "sale_id": sale_id,
            "product_id": product_id,
        }));
    }
}

// =============================================================================
// Noop Publisher
// =============================================================================

/// Swallows all events. For tests and offline tooling.
#[derive(Debug, Clone, Default)]
pub struct NoopEventPublisher;

impl NoopEventPublisher {
    pub fn new() -> Self {
        NoopEventPublisher
    }
}

impl SaleEventPublisher for NoopEventPublisher {
    fn sale_created(&self, _sale_id: Uuid) {}
    fn sale_modified(&self, _sale_id: Uuid) {}
    fn sale_cancelled(&self, _sale_id: Uuid) {}
    fn item_cancelled(&self, _sale_id: Uuid, _product_id: Uuid) {}
}
