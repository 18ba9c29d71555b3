//! # Product
//!
//! A catalog item with validated attributes and derived prices.
//!
//! ## Price Composition
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Price Composition                                │
//! │                                                                         │
//! │  price ──► × (1 + tax_rate) ──► price_with_tax                          │
//! │                                       │                                 │
//! │                                       ▼                                 │
//! │                           × (1 − discount_rate) ──► final_price         │
//! │                                                                         │
//! │  Tax is applied first, the discount comes off the taxed amount.         │
//! │  10.00 → 11.00 → 8.80   (10% tax, 20% discount)                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! `id` is fixed at construction. Carts key their entries by it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::error::{ValidationError, ValidationResult};
use crate::money::{Money, Rate};
use crate::validation::{validate_price, validate_text};

// =============================================================================
// Product Id
// =============================================================================

/// Business identifier of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(u64);

impl ProductId {
    #[inline]
    pub const fn new(id: u64) -> Self {
        ProductId(id)
    }

    #[inline]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl From<u64> for ProductId {
    fn from(id: u64) -> Self {
        ProductId(id)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
///
/// ## Invariants
/// - `0 <= price <= MAX_PRICE`
/// - `name` and `description` are never empty
/// - `0 <= discount_rate <= 1`
/// - `tax_rate` never changes after construction
///
/// Fields are private; every write goes through a validating method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ProductRecord")]
pub struct Product {
    id: ProductId,
    name: String,
    price: Money,
    description: String,
    tax_rate: Rate,
    discount_rate: Rate,
}

impl Product {
    /// Creates a product with the standard 10% tax rate and no discount.
    ///
    /// ## Example
    /// ```rust
    /// use cart_core::{Money, Product, ProductId};
    /// use rust_decimal_macros::dec;
    ///
    /// let p = Product::new(ProductId::new(1), "Tea", Money::new(dec!(10.00)), "Green tea").unwrap();
    /// assert_eq!(p.price_with_tax(), Money::new(dec!(11.00)));
    ///
    /// assert!(Product::new(ProductId::new(2), "", Money::zero(), "x").is_err());
    /// ```
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        price: Money,
        description: impl Into<String>,
    ) -> ValidationResult<Self> {
        Self::with_tax_rate(id, name, price, description, Rate::STANDARD_TAX)
    }

    /// Creates a product with a caller-chosen tax rate.
    ///
    /// The rate is fixed for the lifetime of the product.
    pub fn with_tax_rate(
        id: ProductId,
        name: impl Into<String>,
        price: Money,
        description: impl Into<String>,
        tax_rate: Rate,
    ) -> ValidationResult<Self> {
        let name = name.into();
        let description = description.into();

        validate_text("name", &name)?;
        validate_price(price.amount())?;
        validate_text("description", &description)?;

        Ok(Product {
            id,
            name,
            price,
            description,
            tax_rate,
            discount_rate: Rate::ZERO,
        })
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    #[inline]
    pub fn id(&self) -> ProductId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn price(&self) -> Money {
        self.price
    }

    #[inline]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[inline]
    pub fn tax_rate(&self) -> Rate {
        self.tax_rate
    }

    #[inline]
    pub fn discount_rate(&self) -> Rate {
        self.discount_rate
    }

    // -------------------------------------------------------------------------
    // Validated Mutators
    // -------------------------------------------------------------------------

    /// Replaces the name. Empty names are rejected and the old name kept.
    pub fn set_name(&mut self, value: impl Into<String>) -> ValidationResult<()> {
        let value = value.into();
        validate_text("name", &value)?;
        debug!(product_id = %self.id, name = %value, "Product renamed");
        self.name = value;
        Ok(())
    }

    /// Replaces the price. Negative prices and prices above `MAX_PRICE` are
    /// rejected and the old price kept.
    pub fn set_price(&mut self, value: Money) -> ValidationResult<()> {
        validate_price(value.amount())?;
        debug!(product_id = %self.id, price = %value, "Product price changed");
        self.price = value;
        Ok(())
    }

    /// Replaces the description. Empty descriptions are rejected.
    pub fn set_description(&mut self, value: impl Into<String>) -> ValidationResult<()> {
        let value = value.into();
        validate_text("description", &value)?;
        debug!(product_id = %self.id, "Product description changed");
        self.description = value;
        Ok(())
    }

    /// Sets the discount rate, a fraction in `[0, 1]`.
    ///
    /// ## Example
    /// ```rust
    /// use cart_core::{Money, Product, ProductId};
    /// use rust_decimal_macros::dec;
    ///
    /// let mut p = Product::new(ProductId::new(1), "Tea", Money::new(dec!(10.00)), "Green tea").unwrap();
    /// p.set_discount(dec!(0.20)).unwrap();
    /// assert_eq!(p.final_price(), Money::new(dec!(8.80)));
    ///
    /// assert!(p.set_discount(dec!(1.5)).is_err());
    /// ```
    pub fn set_discount(&mut self, rate: Decimal) -> ValidationResult<()> {
        let rate = Rate::for_field("discount rate", rate)?;
        debug!(product_id = %self.id, discount = %rate, "Product discount set");
        self.discount_rate = rate;
        Ok(())
    }

    /// Removes any discount.
    pub fn clear_discount(&mut self) {
        debug!(product_id = %self.id, "Product discount cleared");
        self.discount_rate = Rate::ZERO;
    }

    // -------------------------------------------------------------------------
    // Derived Prices
    // -------------------------------------------------------------------------

    /// `price × (1 + tax_rate)`.
    #[inline]
    pub fn price_with_tax(&self) -> Money {
        self.price.apply_tax(self.tax_rate)
    }

    /// `price_with_tax × (1 − discount_rate)`.
    #[inline]
    pub fn final_price(&self) -> Money {
        self.price_with_tax().apply_discount(self.discount_rate)
    }
}

// =============================================================================
// Serialized Form
// =============================================================================

/// Unvalidated wire shape of a product.
///
/// `Product` deserializes through this type so that stored or transmitted
/// records obey the same rules as the constructor.
#[derive(Debug, Deserialize)]
struct ProductRecord {
    id: ProductId,
    name: String,
    price: Money,
    description: String,
    #[serde(default = "standard_tax")]
    tax_rate: Rate,
    #[serde(default)]
    discount_rate: Rate,
}

fn standard_tax() -> Rate {
    Rate::STANDARD_TAX
}

impl TryFrom<ProductRecord> for Product {
    type Error = ValidationError;

    fn try_from(record: ProductRecord) -> Result<Self, Self::Error> {
        let mut product = Product::with_tax_rate(
            record.id,
            record.name,
            record.price,
            record.description,
            record.tax_rate,
        )?;
        product.discount_rate = record.discount_rate;
        Ok(product)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
