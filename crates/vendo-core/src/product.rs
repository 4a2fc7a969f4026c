// ============================================================================
// Product - Catalog Entity
// ============================================================================
//
// Products are the price source for sale creation and the existence check
// for cart lines. Plain entity, no state machine.
//
// ============================================================================

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::money::Money;
use crate::validation::{validate_price, validate_required_text, ValidationResult};

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    id: Uuid,
    title: String,
    price: Money,
    description: String,
    category: String,
    image: String,
}

impl Product {
    /// Build a product. Title and description must be non-blank, price
    /// non-negative. Category and image are free-form.
    pub fn new(
        title: impl Into<String>,
        price: Money,
        description: impl Into<String>,
        category: impl Into<String>,
        image: impl Into<String>,
    ) -> ValidationResult<Self> {
        let title = title.into();
        let description = description.into();
        validate_required_text("title", &title)?;
        validate_price("price", price)?;
        validate_required_text("description", &description)?;

        Ok(Product {
            id: Uuid::new_v4(),
            title,
            price,
            description,
            category: category.into(),
            image: image.into(),
        })
    }

    /// Rebuild from storage, skipping validation.
    pub fn rehydrate(
        id: Uuid,
        title: String,
        price: Money,
        description: String,
        category: String,
        image: String,
    ) -> Self {
        Product {
            id,
            title,
            price,
            description,
            category,
            image,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn price(&self) -> Money {
        self.price
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn image(&self) -> &str {
        &self.image
    }

    /// Replace all fields, re-validating the same rules as construction.
    /// Nothing changes if any rule fails.
    pub fn update(
        &mut self,
        title: impl Into<String>,
        price: Money,
        description: impl Into<String>,
        category: impl Into<String>,
        image: impl Into<String>,
    ) -> ValidationResult<()> {
        let title = title.into();
        let description = description.into();
        validate_required_text("title", &title)?;
        validate_price("price", price)?;
        validate_required_text("description", &description)?;

        self.title = title;
        self.price = price;
        self.description = description;
        self.category = category.into();
        self.image = image.into();
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use rust_decimal::Decimal;

    fn price(amount: &str) -> Money {
        Money::new(amount.parse::<Decimal>().unwrap())
    }

    fn widget() -> Product {
        Product::new("Widget", price("9.99"), "A fine widget", "tools", "widget.png").unwrap()
    }

    #[test]
    fn test_new_validates_fields() {
        assert!(matches!(
            Product::new("", price("1.00"), "desc", "", "").unwrap_err(),
            ValidationError::Required { .. }
        ));
        assert!(matches!(
            Product::new("Widget", price("-1.00"), "desc", "", "").unwrap_err(),
            ValidationError::CannotBeNegative { .. }
        ));
        assert!(matches!(
            Product::new("Widget", price("1.00"), "  ", "", "").unwrap_err(),
            ValidationError::Required { .. }
        ));
    }

    #[test]
    fn test_category_and_image_are_free_form() {
        assert!(Product::new("Widget", price("1.00"), "desc", "", "").is_ok());
    }

    #[test]
    fn test_update_keeps_old_values_on_failure() {
        let mut p = widget();
        let err = p.update("", price("5.00"), "new desc", "c", "i");
        assert!(err.is_err());
        assert_eq!(p.title(), "Widget");
        assert_eq!(p.price(), price("9.99"));
    }

    #[test]
    fn test_update_replaces_fields() {
        let mut p = widget();
        let id = p.id();
        p.update("Gadget", price("19.99"), "A gadget", "gear", "gadget.png")
            .unwrap();
        assert_eq!(p.id(), id);
        assert_eq!(p.title(), "Gadget");
        assert_eq!(p.price(), price("19.99"));
    }
}
