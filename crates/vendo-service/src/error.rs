//! # Service Error Types
//!
//! The service layer adds exactly one error of its own: `NotFound`, raised
//! when a referenced aggregate doesn't exist. Domain and storage errors pass
//! through transparently so callers see the original failure.

use thiserror::Error;
use uuid::Uuid;

use vendo_core::{DomainError, ValidationError};
use vendo_db::DbError;

/// Errors from service operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A referenced aggregate doesn't exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: Uuid },

    /// A domain rule was violated. Passed through unchanged.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// A storage operation failed. Passed through unchanged.
    #[error(transparent)]
    Storage(#[from] DbError),
}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        ServiceError::Domain(DomainError::Validation(err))
    }
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;
