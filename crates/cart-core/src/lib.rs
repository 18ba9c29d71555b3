//! # cart-core: Pure Pricing Logic for Products and Carts
//!
//! This crate models catalog products and shopping carts, with exact
//! decimal price, tax and discount arithmetic and zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cart Pricing Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Host (cart-demo, test harness, service)            │   │
//! │  │      builds Products ──► drives Cart ──► reads totals           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ in-process calls                       │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ cart-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  product  │  │   money   │  │   cart    │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │   Cart    │  │   rules   │  │   │
//! │  │   │ ProductId │  │   Rate    │  │ CartEntry │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`product`] - Product with validated attributes and derived prices
//! - [`cart`] - Cart mapping products to quantities
//! - [`money`] - Money and Rate over exact decimals (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Rules shared by every write path
//! - [`config`] - Pricing settings supplied by the host
//!
//! ## Example Usage
//!
//! ```rust
//! use cart_core::{Cart, Money, Product, ProductId};
//! use rust_decimal_macros::dec;
//!
//! let mut tea = Product::new(ProductId::new(1), "Tea", Money::new(dec!(10.00)), "Green tea")?;
//! tea.set_discount(dec!(0.20))?;
//!
//! let mut cart = Cart::new();
//! cart.add_product(&tea, 2)?;
//!
//! // 2 × ((10.00 + 10% tax) − 20%)
//! assert_eq!(cart.total()?, Money::new(dec!(17.60)));
//! # Ok::<(), cart_core::ValidationError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod config;
pub mod error;
pub mod money;
pub mod product;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartEntry, CartItems, CartSummary};
pub use config::PricingConfig;
pub use error::{ConfigError, ValidationError, ValidationResult};
pub use money::{Money, Rate};
pub use product::{Product, ProductId};

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Tax rate every product gets unless built with `Product::with_tax_rate`.
pub const DEFAULT_TAX_RATE: Rate = Rate::STANDARD_TAX;

/// Highest accepted product price (one trillion).
///
/// ## Business Reason
/// Catches runaway input, and keeps `price × (1 + tax_rate)` well inside
/// `Decimal` range for any rate up to 100%.
pub const MAX_PRICE: Decimal = dec!(1000000000000);
