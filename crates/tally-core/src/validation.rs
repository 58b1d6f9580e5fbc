//! # Validation Module
//!
//! Input validation for catalog edits and checkout fields. Runs before
//! business logic so bad input never reaches a repository.
//!
//! ## Usage
//! ```rust
//! use tally_core::validation::{validate_product_name, validate_quantity};
//!
//! validate_product_name("Trail Mix").unwrap();
//! validate_quantity(5).unwrap();
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::MAX_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - Must be at most 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a category name.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - Must be at most 50 characters
pub fn validate_category(category: &str) -> ValidationResult<()> {
    let category = category.trim();

    if category.is_empty() {
        return Err(ValidationError::Required {
            field: "category".to_string(),
        });
    }

    if category.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "category".to_string(),
            max: 50,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a price in cents.
///
/// ## Rules
/// - Must be non-negative (free items are allowed, refund prices are not)
pub fn validate_price(price_cents: i64) -> ValidationResult<()> {
    if price_cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }
    Ok(())
}

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed [`MAX_ITEM_QUANTITY`]
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity < 1 || quantity > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }
    Ok(())
}

/// Validates a tip already expressed in cents.
///
/// ## Rules
/// - Must be non-negative (a zero tip is fine)
pub fn validate_tip_cents(tip_cents: i64) -> ValidationResult<()> {
    if tip_cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "tip".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }
    Ok(())
}

/// Validates a tip entered as free text, returning it as Money.
///
/// Blank input is a zero tip; anything else must parse as a non-negative
/// dollar amount with at most cent precision.
pub fn validate_tip(input: &str) -> ValidationResult<Money> {
    Money::parse(input).map_err(|e| ValidationError::InvalidFormat {
        field: "tip".to_string(),
        reason: e.to_string(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_name() {
        assert!(validate_product_name("Trail Mix").is_ok());
        assert!(validate_product_name("  ").is_err());
        assert!(validate_product_name(&"x".repeat(201)).is_err());
    }

    #[test]
    fn test_category() {
        assert!(validate_category("beverages").is_ok());
        assert!(validate_category("").is_err());
    }

    #[test]
    fn test_price() {
        assert!(validate_price(0).is_ok());
        assert!(validate_price(575).is_ok());
        assert!(validate_price(-1).is_err());
    }

    #[test]
    fn test_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_tip_cents() {
        assert!(validate_tip_cents(0).is_ok());
        assert!(validate_tip_cents(150).is_ok());
        assert!(validate_tip_cents(-1).is_err());
    }

    #[test]
    fn test_tip() {
        assert_eq!(validate_tip("1.50").unwrap().cents(), 150);
        assert_eq!(validate_tip("").unwrap().cents(), 0);
        assert!(validate_tip("abc").is_err());
        assert!(validate_tip("-2").is_err());
    }
}
