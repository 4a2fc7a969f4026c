// ============================================================================
// Validation - Shared Field-Level Validators
// ============================================================================
//
// Small pure functions used by the aggregate constructors. Each returns
// `Ok(())` or the ValidationError describing exactly which rule broke.
//
// ============================================================================

use uuid::Uuid;

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_LINE_QUANTITY, MIN_LINE_QUANTITY};

/// Result alias for validation functions
pub type ValidationResult<T> = Result<T, ValidationError>;

/// A sale line quantity must sit inside the discountable range 1..=20.
pub fn validate_line_quantity(quantity: i64) -> ValidationResult<()> {
    if !(MIN_LINE_QUANTITY..=MAX_LINE_QUANTITY).contains(&quantity) {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: MIN_LINE_QUANTITY,
            max: MAX_LINE_QUANTITY,
            actual: quantity,
        });
    }
    Ok(())
}

/// Cart quantities are uncapped but must be strictly positive.
pub fn validate_positive_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
            actual: quantity,
        });
    }
    Ok(())
}

/// Prices may be zero (free items) but never negative.
pub fn validate_price(field: &str, price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::CannotBeNegative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// A required text field must contain at least one non-whitespace character.
pub fn validate_required_text(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// A foreign reference must not be the nil UUID.
pub fn validate_reference(field: &str, id: Uuid) -> ValidationResult<()> {
    if id.is_nil() {
        return Err(ValidationError::NilReference {
            field: field.to_string(),
        });
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
