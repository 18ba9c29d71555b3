//! # Money Module
//!
//! Provides the `Money` and `Rate` types for handling monetary values safely.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In binary floating point:                                              │
//! │    10.00 × 1.10 = 11.000000000000002  ❌ WRONG!                         │
//! │                                                                         │
//! │  OUR SOLUTION: base-10 fixed point (rust_decimal)                       │
//! │    10.00 × 1.10 = 11.0000             ✅ exact                          │
//! │    11.0000 × 0.80 = 8.800000          ✅ exact                          │
//! │                                                                         │
//! │  Nothing is rounded until the value is displayed.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use cart_core::money::{Money, Rate};
//! use rust_decimal_macros::dec;
//!
//! let price = Money::new(dec!(10.00));
//! let with_tax = price.apply_tax(Rate::new(dec!(0.10)).unwrap());
//! assert_eq!(with_tax, Money::new(dec!(11.00)));
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub};

use crate::error::ValidationResult;
use crate::validation::validate_rate;

/// Decimal places used when an amount is shown to a person.
pub const DISPLAY_SCALE: u32 = 2;

// =============================================================================
// Money Type
// =============================================================================

/// An exact monetary amount.
///
/// ## Design Decisions
/// - **Decimal, not f64**: every intermediate value is exact
/// - **Signed**: differences (savings, refunds) can go below zero, product
///   prices cannot (enforced by `Product`, not here)
/// - **Unrounded**: `11.0000` and `11.00` compare equal; rounding happens in
///   `rounded()` and `Display` only
///
/// ## Where Money is Used
/// ```text
/// Product.price ──► price_with_tax() ──► final_price() ──┐
///                                                        │ × quantity
///                                                        ▼
///                                     Cart.total() = Σ line totals
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Wraps a decimal amount.
    #[inline]
    pub const fn new(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Returns the underlying decimal.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Returns `amount × (1 + rate)`.
    ///
    /// Saturates at `Decimal::MAX`/`Decimal::MIN`. Product prices are capped
    /// at `MAX_PRICE`, so a taxed product price never gets there.
    ///
    /// ## Example
    /// ```rust
    /// use cart_core::money::{Money, Rate};
    /// use rust_decimal_macros::dec;
    ///
    /// let price = Money::new(dec!(20.00));
    /// let rate = Rate::new(dec!(0.10)).unwrap();
    /// assert_eq!(price.apply_tax(rate), Money::new(dec!(22.00)));
    /// ```
    #[inline]
    pub fn apply_tax(&self, rate: Rate) -> Money {
        Money(self.0.saturating_mul(Decimal::ONE + rate.value()))
    }

    /// Returns `amount × (1 − rate)`.
    ///
    /// The factor is at most 1, so the result never outgrows the input.
    ///
    /// ## Example
    /// ```rust
    /// use cart_core::money::{Money, Rate};
    /// use rust_decimal_macros::dec;
    ///
    /// let price = Money::new(dec!(11.00));
    /// let off = Rate::new(dec!(0.20)).unwrap();
    /// assert_eq!(price.apply_discount(off), Money::new(dec!(8.80)));
    /// ```
    #[inline]
    pub fn apply_discount(&self, rate: Rate) -> Money {
        Money(self.0.saturating_mul(Decimal::ONE - rate.value()))
    }

    /// Multiplies money by a quantity, `None` if the result does not fit.
    ///
    /// ## Example
    /// ```rust
    /// use cart_core::money::Money;
    /// use rust_decimal::Decimal;
    /// use rust_decimal_macros::dec;
    ///
    /// let unit = Money::new(dec!(2.99));
    /// assert_eq!(unit.checked_multiply_quantity(3), Some(Money::new(dec!(8.97))));
    /// assert_eq!(Money::new(Decimal::MAX).checked_multiply_quantity(2), None);
    /// ```
    #[inline]
    pub fn checked_multiply_quantity(&self, qty: i64) -> Option<Money> {
        self.0.checked_mul(Decimal::from(qty)).map(Money)
    }

    /// Adds two amounts, `None` if the result does not fit.
    #[inline]
    pub fn checked_add(&self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Rounds to cents using Bankers Rounding (round half to even).
    ///
    /// Display-only. Totals are accumulated unrounded.
    pub fn rounded(&self) -> Money {
        Money(
            self.0
                .round_dp_with_strategy(DISPLAY_SCALE, RoundingStrategy::MidpointNearestEven),
        )
    }

    /// Renders the amount with a currency symbol, e.g. `€10.00`.
    pub fn format_with(&self, symbol: &str) -> String {
        let mut value = self.rounded().0.abs();
        value.rescale(DISPLAY_SCALE);
        let sign = if self.rounded().is_negative() { "-" } else { "" };
        format!("{}{}{}", sign, symbol, value)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows money rounded to cents with a dollar sign.
///
/// ## Note
/// For debugging and logs. Hosts with another currency use `format_with`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with("$"))
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

// =============================================================================
// Rate
// =============================================================================

/// A fraction in `[0, 1]`, used for tax and discount rates.
///
/// ## Why a Newtype?
/// A bare `Decimal` could hold `1.5` or `-0.2`. Every `Rate` in the system
/// has passed `validate_rate`, so price math never has to re-check bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Rate(Decimal);

impl Rate {
    /// No tax, no discount.
    pub const ZERO: Rate = Rate(Decimal::ZERO);

    /// Standard 10% tax applied to every product unless told otherwise.
    pub const STANDARD_TAX: Rate = Rate(dec!(0.10));

    /// Creates a rate, rejecting values outside `[0, 1]`.
    pub fn new(value: Decimal) -> ValidationResult<Self> {
        Self::for_field("rate", value)
    }

    /// Creates a rate from basis points (1000 bps = 0.10).
    ///
    /// ## Example
    /// ```rust
    /// use cart_core::money::Rate;
    /// use rust_decimal_macros::dec;
    ///
    /// assert_eq!(Rate::from_bps(825).unwrap().value(), dec!(0.0825));
    /// assert!(Rate::from_bps(10_001).is_err());
    /// ```
    pub fn from_bps(bps: u32) -> ValidationResult<Self> {
        Self::new(Decimal::new(i64::from(bps), 4))
    }

    /// Same as `new`, but names `field` in the error message.
    pub(crate) fn for_field(field: &'static str, value: Decimal) -> ValidationResult<Self> {
        validate_rate(field, value)?;
        Ok(Rate(value))
    }

    /// Returns the rate as a fraction.
    #[inline]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    /// Checks if the rate is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

/// Shows the rate as a percentage, e.g. `8.25%`.
impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", (self.0 * Decimal::ONE_HUNDRED).normalize())
    }
}

/// Deserialisation runs the same bounds check as `Rate::new`.
impl<'de> Deserialize<'de> for Rate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = <Decimal as Deserialize>::deserialize(deserializer)?;
        Rate::new(value).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
