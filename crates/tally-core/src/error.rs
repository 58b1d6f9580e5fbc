//! # Error Types
//!
//! Domain-specific error types for tally-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          Error Types                                │
//! │                                                                     │
//! │  tally-core errors (this file)                                      │
//! │  ├── CoreError        - General domain errors                       │
//! │  ├── ValidationError  - Input validation failures                   │
//! │  └── MoneyParseError  - Malformed monetary input                    │
//! │                                                                     │
//! │  tally-db errors (separate crate)                                   │
//! │  └── DbError          - Database operation failures                 │
//! │                                                                     │
//! │  tally-sales errors (separate crate)                                │
//! │  └── ServiceError     - Checkout/import/backup failures             │
//! │                                                                     │
//! │  Flow: ValidationError → CoreError → ServiceError → caller          │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product name, id, etc.)
//! 3. Errors are enum variants, never String

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These represent business rule violations. They should be caught and
/// translated to user-facing messages by the caller.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A product with the same name already exists in the category.
    ///
    /// ## When This Occurs
    /// Adding a catalog product whose name collides (case-insensitively)
    /// with an existing product in the same category. The caller offers to
    /// edit the existing record instead of creating a duplicate.
    #[error("Product '{name}' already exists in category '{category}'")]
    DuplicateProduct { name: String, category: String },

    /// Product cannot be found in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Cart line item cannot be found.
    #[error("Cart item not found: {0}")]
    CartItemNotFound(String),

    /// Checkout was attempted with nothing in the cart.
    #[error("Cannot check out an empty cart")]
    EmptyCart,

    /// Cart has exceeded maximum allowed distinct items.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Item quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Monetary input could not be parsed.
    #[error("Invalid amount: {0}")]
    MoneyParse(#[from] MoneyParseError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when user input doesn't meet requirements. Used for early
/// validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("Field '{field}' is required")]
    Required { field: String },

    /// A field exceeds its maximum length.
    #[error("Field '{field}' exceeds maximum length of {max}")]
    TooLong { field: String, max: usize },

    /// A numeric field is out of its allowed range.
    #[error("Field '{field}' must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// A field has an invalid format.
    #[error("Field '{field}' is invalid: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Money Parse Error
// =============================================================================

/// Errors from parsing decimal dollar strings (tip entry, price entry).
#[derive(Debug, Error)]
pub enum MoneyParseError {
    /// The input is not a decimal number.
    #[error("'{input}' is not a valid dollar amount")]
    Malformed { input: String },

    /// More than two decimal places.
    #[error("'{input}' has sub-cent precision")]
    TooPrecise { input: String },

    /// Negative amounts are not accepted from user entry.
    #[error("'{input}' is negative")]
    Negative { input: String },
}
