//! # Cart Demo Entry Point
//!
//! A thin host around `cart-core`.
//!
//! ## Startup Sequence
//! 1. Initialize tracing (logging)
//! 2. Load pricing configuration from the environment
//! 3. Build a small sample catalog
//! 4. Fill a cart, remove a unit, log the totals
//!
//! ## Usage
//! ```bash
//! cargo run -p cart-demo
//! RUST_LOG=debug CART_TAX_RATE=0.0825 CART_CURRENCY_SYMBOL=€ cargo run -p cart-demo
//! ```

use cart_core::{Cart, Money, PricingConfig, Product, ProductId};
use rust_decimal_macros::dec;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = PricingConfig::from_env()?;
    info!(tax_rate = %config.tax_rate, "Starting cart demo");

    let catalog = sample_catalog(&config)?;

    let mut cart = Cart::new();
    cart.add_product(&catalog[0], 2)?;
    cart.add_product(&catalog[1], 1)?;
    cart.add_product(&catalog[2], 3)?;
    cart.remove_product(&catalog[2], Some(1))?;

    for entry in cart.iter() {
        let product = entry.product();
        info!(
            product_id = %product.id(),
            name = product.name(),
            quantity = entry.quantity(),
            unit = %config.format(product.final_price()),
            line = %config.format(entry.line_total()?),
            "Cart line"
        );
    }

    let summary = cart.summary()?;
    info!(
        items = summary.item_count,
        quantity = summary.total_quantity,
        subtotal = %config.format(summary.subtotal),
        savings = %config.format(summary.savings),
        total = %config.format(summary.total),
        "Cart total"
    );
    info!(summary = %serde_json::to_string(&summary)?, "Cart summary");

    Ok(())
}

/// Builds three products at the configured tax rate, one of them discounted.
fn sample_catalog(config: &PricingConfig) -> Result<Vec<Product>, cart_core::ValidationError> {
    let notebook = config.product(
        ProductId::new(1),
        "Notebook",
        Money::new(dec!(10.00)),
        "A5 dotted notebook",
    )?;

    let mut pen = config.product(
        ProductId::new(2),
        "Fountain Pen",
        Money::new(dec!(20.00)),
        "Steel nib, medium",
    )?;
    pen.set_discount(dec!(0.20))?;

    let ink = config.product(
        ProductId::new(3),
        "Ink Bottle",
        Money::new(dec!(7.50)),
        "50ml blue-black",
    )?;

    Ok(vec![notebook, pen, ink])
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show every cart mutation
/// - Default: INFO, with debug for cart_core
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,cart_core=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();
}
