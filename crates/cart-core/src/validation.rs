//! # Validation Module
//!
//! Input validation shared by every write path.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      One Rule, Every Write Path                         │
//! │                                                                         │
//! │  Product::new ──────┐                                                   │
//! │  Product::set_name ─┼──► validate_text("name", ..)                      │
//! │  Deserialize ───────┘                                                   │
//! │                                                                         │
//! │  Product::new ──────┐                                                   │
//! │  Product::set_price ┼──► validate_price(..)                             │
//! │  Deserialize ───────┘                                                   │
//! │                                                                         │
//! │  Cart::add_product ─┬──► validate_quantity(..)                          │
//! │  Cart::remove_product┘                                                  │
//! │                                                                         │
//! │  Checks run BEFORE any mutation, so a failure changes nothing.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use cart_core::validation::{validate_price, validate_quantity};
//! use rust_decimal_macros::dec;
//!
//! assert!(validate_price(dec!(10.00)).is_ok());
//! assert!(validate_quantity(0).is_err());
//! ```

use rust_decimal::Decimal;

use crate::error::{ValidationError, ValidationResult};
use crate::MAX_PRICE;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required text field (product name, description).
///
/// ## Rules
/// - Must not be empty
/// - Whitespace is content: `" "` is accepted
pub fn validate_text(field: &'static str, value: &str) -> ValidationResult<()> {
    if value.is_empty() {
        return Err(ValidationError::Required { field });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a product price.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items)
/// - Must not exceed `MAX_PRICE`
///
/// ## Example
/// ```rust
/// use cart_core::validation::validate_price;
/// use rust_decimal_macros::dec;
///
/// assert!(validate_price(dec!(10.99)).is_ok());
/// assert!(validate_price(dec!(0)).is_ok());
/// assert!(validate_price(dec!(-1.00)).is_err());
/// assert!(validate_price(rust_decimal::Decimal::MAX).is_err());
/// ```
pub fn validate_price(price: Decimal) -> ValidationResult<()> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(ValidationError::Negative { field: "price" });
    }

    if price > MAX_PRICE {
        return Err(ValidationError::OutOfRange {
            field: "price",
            min: Decimal::ZERO,
            max: MAX_PRICE,
        });
    }

    Ok(())
}

/// Validates a fraction used as a tax or discount rate.
///
/// ## Rules
/// - Must be within `[0, 1]`, both ends inclusive
pub fn validate_rate(field: &'static str, rate: Decimal) -> ValidationResult<()> {
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(ValidationError::OutOfRange {
            field,
            min: Decimal::ZERO,
            max: Decimal::ONE,
        });
    }

    Ok(())
}

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - No upper bound
///
/// ## User Workflow
/// ```text
/// add_product(P, qty)
///       │
///       ▼
/// validate_quantity(qty) ← THIS FUNCTION
///       │
///       ├── qty <= 0? → Error: "quantity must be positive"
///       │
///       └── OK → merge into cart
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive { field: "quantity" });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
