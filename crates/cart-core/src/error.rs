//! # Error Types
//!
//! Domain-specific error types for cart-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  cart-core errors (this file)                                          │
//! │  ├── ValidationError  - Rejected input on any write path               │
//! │  └── ConfigError      - Invalid pricing configuration                  │
//! │                                                                         │
//! │  Flow: ValidationError ──► ConfigError (via #[from]) ──► host app      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field, product id, bounds)
//! 3. Errors are enum variants, never String
//! 4. A failed operation leaves its target untouched

use rust_decimal::Decimal;
use thiserror::Error;

use crate::product::ProductId;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised synchronously by the operation that detects the violation.
/// None of these are transient: the caller passed bad input and must fix it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required text field is empty.
    #[error("{field} cannot be empty")]
    Required { field: &'static str },

    /// A monetary value is below zero.
    #[error("{field} cannot be negative")]
    Negative { field: &'static str },

    /// A rate is outside its closed interval.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: Decimal,
        max: Decimal,
    },

    /// A count must be strictly greater than zero.
    #[error("{field} must be positive")]
    MustBePositive { field: &'static str },

    /// The cart does not track the given product.
    ///
    /// ## When This Occurs
    /// ```text
    /// remove_product(P)   (P never added, or already removed)
    ///      │
    ///      ▼
    /// NotInCart { product_id: 7 }
    ///      │
    ///      ▼
    /// "Product 7 not in cart"
    /// ```
    #[error("Product {product_id} not in cart")]
    NotInCart { product_id: ProductId },

    /// Adding would push the tracked quantity past `i64::MAX`.
    #[error("Quantity for product {product_id} would overflow")]
    QuantityOverflow { product_id: ProductId },

    /// An aggregate (line total, cart total, total quantity) does not fit.
    ///
    /// Quantities have no upper bound, so `price × quantity` summed over a
    /// cart can exceed what a `Decimal` or `i64` holds.
    #[error("{what} is too large to represent")]
    Overflow { what: &'static str },
}

// =============================================================================
// Config Error
// =============================================================================

/// Pricing configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable could not be parsed.
    #[error("Invalid value for {var}: '{value}'")]
    InvalidValue { var: &'static str, value: String },

    /// The parsed value failed domain validation.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with ValidationError.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Convenience type alias for Results with ConfigError.
pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Unit Tests
// =============================================================================
