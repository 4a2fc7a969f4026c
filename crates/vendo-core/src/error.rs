// ============================================================================
// Error Types - Domain Error Handling
// ============================================================================
//
// Two layers of errors, raised synchronously at the point of violation:
//
//   ValidationError  - a constructor or mutator was handed bad input
//                      (out-of-range quantity, negative price, blank field)
//   DomainError      - a state rule was violated on otherwise-valid input
//                      (cancelling twice, targeting a missing line item)
//
// Every constructor validates BEFORE mutating, so a returned error always
// means "nothing changed".
//
// ============================================================================

use thiserror::Error;
use uuid::Uuid;

/// Errors from validating raw input against field-level rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required text field was empty or whitespace-only
    #[error("{field} is required")]
    Required { field: String },

    /// A numeric field fell outside its allowed range
    #[error("{field} must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: String,
        min: i64,
        max: i64,
        actual: i64,
    },

    /// A numeric field must be strictly positive
    #[error("{field} must be positive, got {actual}")]
    MustBePositive { field: String, actual: i64 },

    /// A monetary field must not be negative
    #[error("{field} cannot be negative")]
    CannotBeNegative { field: String },

    /// A collection that must hold at least one element was empty
    #[error("{field} must contain at least one item")]
    Empty { field: String },

    /// A UUID reference was the nil UUID
    #[error("{field} must reference an existing entity")]
    NilReference { field: String },

    /// A value that must be unique already exists
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

/// Errors from violating an aggregate's state rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// The entity was already in the Cancelled state (terminal, one-way)
    #[error("{entity} is already cancelled")]
    AlreadyCancelled { entity: &'static str },

    /// No line item with the given product id exists in the aggregate
    #[error("product {product_id} not found in {aggregate}")]
    ItemNotFound {
        aggregate: &'static str,
        product_id: Uuid,
    },

    /// Input validation failed
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Result alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

// ============================================================================
// Tests
// ============================================================================
