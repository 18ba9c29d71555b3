//! # Pricing Configuration
//!
//! Host-supplied settings for building and displaying prices.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     CART_TAX_RATE=0.0825                                               │
//! │     CART_CURRENCY_SYMBOL=€                                             │
//! │                                                                         │
//! │  2. Default Values (lowest priority)                                   │
//! │     10% tax, "$"                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The tax rate here is only the rate new products are built with. Each
//! product keeps the rate it was created with.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{debug, warn};

use crate::error::{ConfigError, ConfigResult, ValidationResult};
use crate::money::{Money, Rate};
use crate::product::{Product, ProductId};

/// Environment variable overriding the tax rate for new products.
pub const ENV_TAX_RATE: &str = "CART_TAX_RATE";

/// Environment variable overriding the display currency symbol.
pub const ENV_CURRENCY_SYMBOL: &str = "CART_CURRENCY_SYMBOL";

/// Pricing settings shared by a host application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PricingConfig {
    /// Tax rate given to products built through this config.
    pub tax_rate: Rate,

    /// Symbol prefixed to formatted amounts.
    pub currency_symbol: String,
}

impl Default for PricingConfig {
    fn default() -> Self {
        PricingConfig {
            tax_rate: Rate::STANDARD_TAX,
            currency_symbol: "$".to_string(),
        }
    }
}

impl PricingConfig {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration from any key lookup (environment, test fixtures).
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = PricingConfig::default();

        if let Some(raw) = lookup(ENV_TAX_RATE) {
            let value = Decimal::from_str(raw.trim()).map_err(|_| {
                warn!(var = ENV_TAX_RATE, value = %raw, "Unparseable tax rate");
                ConfigError::InvalidValue {
                    var: ENV_TAX_RATE,
                    value: raw.clone(),
                }
            })?;
            config.tax_rate = Rate::for_field("tax rate", value)?;
        }

        if let Some(symbol) = lookup(ENV_CURRENCY_SYMBOL) {
            if symbol.is_empty() {
                return Err(ConfigError::InvalidValue {
                    var: ENV_CURRENCY_SYMBOL,
                    value: symbol,
                });
            }
            config.currency_symbol = symbol;
        }

        debug!(
            tax_rate = %config.tax_rate,
            currency_symbol = %config.currency_symbol,
            "Pricing config loaded"
        );
        Ok(config)
    }

    /// Builds a product taxed at the configured rate.
    pub fn product(
        &self,
        id: ProductId,
        name: impl Into<String>,
        price: Money,
        description: impl Into<String>,
    ) -> ValidationResult<Product> {
        Product::with_tax_rate(id, name, price, description, self.tax_rate)
    }

    /// Formats an amount with the configured currency symbol.
    pub fn format(&self, amount: Money) -> String {
        amount.format_with(&self.currency_symbol)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = PricingConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, PricingConfig::default());
        assert_eq!(config.tax_rate.value(), dec!(0.10));
    }

    #[test]
    fn test_overrides() {
        let config = PricingConfig::from_lookup(lookup_from(&[
            (ENV_TAX_RATE, " 0.0825 "),
            (ENV_CURRENCY_SYMBOL, "€"),
        ]))
        .unwrap();
        assert_eq!(config.tax_rate.value(), dec!(0.0825));
        assert_eq!(config.format(Money::new(dec!(3.5))), "€3.50");
    }

    #[test]
    fn test_invalid_tax_rate() {
        let err = PricingConfig::from_lookup(lookup_from(&[(ENV_TAX_RATE, "ten")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));

        let err = PricingConfig::from_lookup(lookup_from(&[(ENV_TAX_RATE, "1.5")])).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_empty_symbol_rejected() {
        let err =
            PricingConfig::from_lookup(lookup_from(&[(ENV_CURRENCY_SYMBOL, "")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_product_uses_configured_rate() {
        let config = PricingConfig {
            tax_rate: Rate::from_bps(2000).unwrap(),
            ..PricingConfig::default()
        };
        let product = config
            .product(ProductId::new(1), "Lamp", Money::new(dec!(50.00)), "Desk lamp")
            .unwrap();
        assert_eq!(product.price_with_tax(), Money::new(dec!(60.00)));
    }

    #[test]
    fn test_deserialize_partial() {
        let config: PricingConfig = serde_json::from_str(r#"{"currencySymbol":"£"}"#).unwrap();
        assert_eq!(config.tax_rate, Rate::STANDARD_TAX);
        assert_eq!(config.currency_symbol, "£");
    }
}
