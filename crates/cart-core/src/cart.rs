//! # Cart
//!
//! A shopping cart: products mapped to positive quantities.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Caller Action            Method                  Cart State Change     │
//! │  ─────────────            ──────                  ─────────────────     │
//! │                                                                         │
//! │  Add product ────────────► add_product(P, n) ───► qty[P] += n          │
//! │                                                                         │
//! │  Remove some ────────────► remove_product(P, k) ► qty[P] -= k          │
//! │                                                   (entry gone if k≥qty) │
//! │                                                                         │
//! │  Remove all ─────────────► remove_product(P,None)► entry gone          │
//! │                                                                         │
//! │  Checkout ───────────────► total() ─────────────► (read only)          │
//! │                                                                         │
//! │  Inspect ────────────────► items() ─────────────► (independent copy)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ownership
//! The cart borrows each `Product` it tracks. Products outlive every cart
//! that references them, any number of carts may share a product, and a
//! product cannot be mutated while a cart holds it.
//!
//! ## Overflow
//! Quantities have no upper bound, so every aggregate (`line_total`,
//! `total`, `total_quantity`, `summary`) uses checked arithmetic and returns
//! `ValidationError::Overflow` instead of panicking.
//!
//! ## Thread Safety
//! None. A host that shares a cart across threads wraps it in a `Mutex`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::btree_map::{self, BTreeMap};
use std::ptr;
use tracing::{debug, warn};

use crate::error::{ValidationError, ValidationResult};
use crate::money::Money;
use crate::product::{Product, ProductId};
use crate::validation::validate_quantity;

/// Products mapped to their entries, ordered by product id.
///
/// The cart stores one of these; `Cart::items` hands out a clone.
pub type CartItems<'a> = BTreeMap<ProductId, CartEntry<'a>>;

// =============================================================================
// Cart Entry
// =============================================================================

/// One tracked product and its quantity (always > 0).
#[derive(Debug, Clone, Copy)]
pub struct CartEntry<'a> {
    product: &'a Product,
    quantity: i64,
}

impl<'a> CartEntry<'a> {
    #[inline]
    pub fn product(&self) -> &'a Product {
        self.product
    }

    #[inline]
    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    /// `final_price × quantity`.
    pub fn line_total(&self) -> ValidationResult<Money> {
        self.times_quantity(self.product.final_price(), "line total")
    }

    /// `price × quantity`, before tax and discount.
    pub fn line_subtotal(&self) -> ValidationResult<Money> {
        self.times_quantity(self.product.price(), "line subtotal")
    }

    /// Discount taken off the tax-inclusive line amount.
    pub fn line_savings(&self) -> ValidationResult<Money> {
        let unit_savings = self.product.price_with_tax() - self.product.final_price();
        self.times_quantity(unit_savings, "line savings")
    }

    fn times_quantity(&self, unit: Money, what: &'static str) -> ValidationResult<Money> {
        unit.checked_multiply_quantity(self.quantity)
            .ok_or(ValidationError::Overflow { what })
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart.
///
/// ## Invariants
/// - Entries are unique by `ProductId` (adding the same product sums quantity)
/// - Every stored quantity is > 0 (a removal that would reach 0 drops the entry)
/// - A failed operation leaves the cart unchanged
#[derive(Debug, Clone)]
pub struct Cart<'a> {
    items: CartItems<'a>,
    created_at: DateTime<Utc>,
}

impl<'a> Cart<'a> {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart {
            items: BTreeMap::new(),
            created_at: Utc::now(),
        }
    }

    /// Adds `quantity` units of a product, merging with an existing entry.
    ///
    /// ## Behavior
    /// - `quantity <= 0`: `MustBePositive`, nothing changes
    /// - product already tracked: quantities are summed
    /// - product not tracked: a new entry is created
    ///
    /// A different `Product` value carrying an already-tracked id merges into
    /// the existing entry, and the first-tracked product keeps pricing it.
    pub fn add_product(&mut self, product: &'a Product, quantity: i64) -> ValidationResult<()> {
        validate_quantity(quantity)?;

        match self.items.entry(product.id()) {
            btree_map::Entry::Occupied(mut occupied) => {
                let entry = occupied.get_mut();
                if !ptr::eq(entry.product, product) {
                    warn!(
                        product_id = %product.id(),
                        "Different product instance with tracked id, merging into existing entry"
                    );
                }
                entry.quantity = entry.quantity.checked_add(quantity).ok_or(
                    ValidationError::QuantityOverflow {
                        product_id: product.id(),
                    },
                )?;
                debug!(product_id = %product.id(), quantity = entry.quantity, "Cart quantity increased");
            }
            btree_map::Entry::Vacant(vacant) => {
                vacant.insert(CartEntry { product, quantity });
                debug!(product_id = %product.id(), quantity, "Product added to cart");
            }
        }

        Ok(())
    }

    /// Adds a single unit of a product.
    pub fn add_one(&mut self, product: &'a Product) -> ValidationResult<()> {
        self.add_product(product, 1)
    }

    /// Removes some or all units of a tracked product.
    ///
    /// ## Behavior
    /// - product not tracked: `NotInCart`
    /// - `quantity` is `None`, or `>=` the tracked quantity: entry deleted
    /// - otherwise: tracked quantity decremented (stays > 0)
    /// - `Some(q)` with `q <= 0`: `MustBePositive`
    pub fn remove_product(
        &mut self,
        product: &Product,
        quantity: Option<i64>,
    ) -> ValidationResult<()> {
        let btree_map::Entry::Occupied(mut occupied) = self.items.entry(product.id()) else {
            return Err(ValidationError::NotInCart {
                product_id: product.id(),
            });
        };

        match quantity {
            Some(qty) => {
                validate_quantity(qty)?;
                if qty >= occupied.get().quantity {
                    occupied.remove();
                    debug!(product_id = %product.id(), "Product removed from cart");
                } else {
                    let entry = occupied.get_mut();
                    entry.quantity -= qty;
                    debug!(product_id = %product.id(), quantity = entry.quantity, "Cart quantity decreased");
                }
            }
            None => {
                occupied.remove();
                debug!(product_id = %product.id(), "Product removed from cart");
            }
        }

        Ok(())
    }

    /// Sum of `final_price × quantity` over all entries.
    ///
    /// Exact: nothing is rounded. An empty cart totals zero.
    ///
    /// ## Errors
    /// `Overflow` when a line or the running sum leaves `Decimal` range.
    pub fn total(&self) -> ValidationResult<Money> {
        self.sum_lines(CartEntry::line_total, "cart total")
    }

    /// Sum of `price × quantity`, before tax and discount.
    pub fn subtotal(&self) -> ValidationResult<Money> {
        self.sum_lines(CartEntry::line_subtotal, "cart subtotal")
    }

    /// Total discount given across all entries.
    pub fn savings(&self) -> ValidationResult<Money> {
        self.sum_lines(CartEntry::line_savings, "cart savings")
    }

    /// Folds one per-line amount over the cart, starting from an exact zero.
    fn sum_lines<F>(&self, line: F, what: &'static str) -> ValidationResult<Money>
    where
        F: Fn(&CartEntry<'a>) -> ValidationResult<Money>,
    {
        self.items.values().try_fold(Money::zero(), |acc, entry| {
            acc.checked_add(line(entry)?)
                .ok_or(ValidationError::Overflow { what })
        })
    }

    /// Returns an independent snapshot of the cart's contents.
    ///
    /// Changing the snapshot never affects the cart.
    pub fn items(&self) -> CartItems<'a> {
        self.items.clone()
    }

    /// Iterates over entries in product id order.
    pub fn iter(&self) -> impl Iterator<Item = &CartEntry<'a>> + '_ {
        self.items.values()
    }

    /// Returns the tracked quantity of a product, if present.
    pub fn quantity_of(&self, product: &Product) -> Option<i64> {
        self.items.get(&product.id()).map(CartEntry::quantity)
    }

    /// Checks whether a product is tracked.
    pub fn contains(&self, product: &Product) -> bool {
        self.items.contains_key(&product.id())
    }

    /// Returns the number of distinct products in the cart.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the total quantity of all items.
    ///
    /// Each entry fits in `i64`, their sum may not.
    pub fn total_quantity(&self) -> ValidationResult<i64> {
        self.items.values().try_fold(0i64, |acc, entry| {
            acc.checked_add(entry.quantity)
                .ok_or(ValidationError::Overflow {
                    what: "total quantity",
                })
        })
    }

    /// Clears all items from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
        self.created_at = Utc::now();
        debug!("Cart cleared");
    }

    /// When the cart was created or last cleared.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Collects counts and totals into a serializable summary.
    pub fn summary(&self) -> ValidationResult<CartSummary> {
        CartSummary::try_from(self)
    }
}

impl Default for Cart<'_> {
    fn default() -> Self {
        Cart::new()
    }
}

// =============================================================================
// Cart Summary
// =============================================================================

/// Cart totals summary for hosts that report or serialize a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    pub item_count: usize,
    pub total_quantity: i64,
    pub subtotal: Money,
    pub savings: Money,
    pub total: Money,
}

impl TryFrom<&Cart<'_>> for CartSummary {
    type Error = ValidationError;

    fn try_from(cart: &Cart<'_>) -> Result<Self, Self::Error> {
        Ok(CartSummary {
            item_count: cart.len(),
            total_quantity: cart.total_quantity()?,
            subtotal: cart.subtotal()?,
            savings: cart.savings()?,
            total: cart.total()?,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MAX_PRICE;
    use rust_decimal_macros::dec;

    fn product(id: u64, price: rust_decimal::Decimal) -> Product {
        Product::new(
            ProductId::new(id),
            format!("Product {}", id),
            Money::new(price),
            format!("Description {}", id),
        )
        .unwrap()
    }

    #[test]
    fn test_add_product() {
        let p1 = product(1, dec!(10.00));
        let mut cart = Cart::new();
        cart.add_product(&p1, 2).unwrap();
        assert_eq!(cart.items()[&p1.id()].quantity(), 2);
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_add_same_product_accumulates() {
        let p1 = product(1, dec!(10.00));
        let mut cart = Cart::new();
        cart.add_product(&p1, 2).unwrap();
        cart.add_one(&p1).unwrap();
        assert_eq!(cart.quantity_of(&p1), Some(3));
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_add_rejects_non_positive_quantity() {
        let p1 = product(1, dec!(10.00));
        let mut cart = Cart::new();
        cart.add_product(&p1, 1).unwrap();

        assert_eq!(
            cart.add_product(&p1, 0),
            Err(ValidationError::MustBePositive { field: "quantity" })
        );
        assert!(cart.add_product(&p1, -3).is_err());
        assert_eq!(cart.quantity_of(&p1), Some(1));
    }

    #[test]
    fn test_add_overflow_leaves_cart_unchanged() {
        let p1 = product(1, dec!(1.00));
        let mut cart = Cart::new();
        cart.add_product(&p1, i64::MAX).unwrap();
        assert_eq!(
            cart.add_product(&p1, 1),
            Err(ValidationError::QuantityOverflow {
                product_id: p1.id()
            })
        );
        assert_eq!(cart.quantity_of(&p1), Some(i64::MAX));
    }

    #[test]
    fn test_same_id_different_instance_merges() {
        let first = product(1, dec!(10.00));
        let twin = product(1, dec!(99.00));
        let mut cart = Cart::new();
        cart.add_product(&first, 1).unwrap();
        cart.add_product(&twin, 1).unwrap();

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.quantity_of(&twin), Some(2));
        // first-tracked product keeps pricing the entry
        assert_eq!(cart.total().unwrap(), Money::new(dec!(22.00)));
    }

    #[test]
    fn test_remove_product_partial() {
        let p1 = product(1, dec!(10.00));
        let mut cart = Cart::new();
        cart.add_product(&p1, 2).unwrap();
        cart.remove_product(&p1, Some(1)).unwrap();
        assert_eq!(cart.items()[&p1.id()].quantity(), 1);
    }

    #[test]
    fn test_remove_product_all() {
        let p1 = product(1, dec!(10.00));
        let mut cart = Cart::new();
        cart.add_product(&p1, 2).unwrap();
        cart.remove_product(&p1, None).unwrap();
        assert!(!cart.items().contains_key(&p1.id()));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_at_or_above_quantity_deletes_entry() {
        let p1 = product(1, dec!(10.00));
        let p2 = product(2, dec!(20.00));
        let mut cart = Cart::new();
        cart.add_product(&p1, 2).unwrap();
        cart.add_product(&p2, 2).unwrap();

        cart.remove_product(&p1, Some(2)).unwrap();
        cart.remove_product(&p2, Some(50)).unwrap();
        assert!(!cart.contains(&p1));
        assert!(!cart.contains(&p2));
    }

    #[test]
    fn test_remove_untracked_product_fails() {
        let p1 = product(1, dec!(10.00));
        let p2 = product(2, dec!(20.00));
        let mut cart = Cart::new();
        cart.add_product(&p1, 1).unwrap();

        assert_eq!(
            cart.remove_product(&p2, None),
            Err(ValidationError::NotInCart {
                product_id: p2.id()
            })
        );
        assert_eq!(cart.quantity_of(&p1), Some(1));

        cart.remove_product(&p1, None).unwrap();
        assert!(cart.remove_product(&p1, Some(1)).is_err());
    }

    #[test]
    fn test_remove_rejects_non_positive_quantity() {
        let p1 = product(1, dec!(10.00));
        let mut cart = Cart::new();
        cart.add_product(&p1, 2).unwrap();

        assert!(cart.remove_product(&p1, Some(0)).is_err());
        assert!(cart.remove_product(&p1, Some(-1)).is_err());
        assert_eq!(cart.quantity_of(&p1), Some(2));
    }

    #[test]
    fn test_empty_cart_total_is_zero() {
        let cart = Cart::new();
        assert_eq!(cart.total().unwrap(), Money::new(dec!(0.00)));
        assert!(cart.total().unwrap().is_zero());
    }

    #[test]
    fn test_cart_total() {
        let p1 = product(1, dec!(10.00));
        let p2 = product(2, dec!(20.00));
        let mut cart = Cart::new();
        cart.add_product(&p1, 2).unwrap(); // 2 × 11.00
        cart.add_product(&p2, 1).unwrap(); // 1 × 22.00
        assert_eq!(cart.total().unwrap(), Money::new(dec!(44.00)));
    }

    #[test]
    fn test_items_returns_independent_copy() {
        let p1 = product(1, dec!(10.00));
        let p2 = product(2, dec!(20.00));
        let mut cart = Cart::new();
        cart.add_product(&p1, 2).unwrap();

        let mut snapshot = cart.items();
        snapshot.remove(&p1.id());
        snapshot.insert(
            p2.id(),
            CartEntry {
                product: &p2,
                quantity: 5,
            },
        );

        let fresh = cart.items();
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[&p1.id()].quantity(), 2);
        assert!(!fresh.contains_key(&p2.id()));
    }

    #[test]
    fn test_shared_product_across_carts() {
        let p1 = product(1, dec!(10.00));
        let mut a = Cart::new();
        let mut b = Cart::new();
        a.add_product(&p1, 1).unwrap();
        b.add_product(&p1, 3).unwrap();

        a.remove_product(&p1, None).unwrap();
        assert!(a.is_empty());
        assert_eq!(b.quantity_of(&p1), Some(3));
    }

    #[test]
    fn test_iteration_is_ordered_by_id() {
        let p3 = product(3, dec!(1.00));
        let p1 = product(1, dec!(1.00));
        let p2 = product(2, dec!(1.00));
        let mut cart = Cart::new();
        cart.add_one(&p3).unwrap();
        cart.add_one(&p1).unwrap();
        cart.add_one(&p2).unwrap();

        let ids: Vec<u64> = cart.iter().map(|e| e.product().id().get()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_summary() {
        let mut p1 = product(1, dec!(10.00));
        p1.set_discount(dec!(0.20)).unwrap();
        let p2 = product(2, dec!(20.00));

        let mut cart = Cart::new();
        cart.add_product(&p1, 2).unwrap();
        cart.add_product(&p2, 1).unwrap();

        let summary = cart.summary().unwrap();
        assert_eq!(summary.item_count, 2);
        assert_eq!(summary.total_quantity, 3);
        assert_eq!(summary.subtotal, Money::new(dec!(40.00)));
        assert_eq!(summary.savings, Money::new(dec!(4.40)));
        assert_eq!(summary.total, Money::new(dec!(39.60)));

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["itemCount"], 2);
        assert_eq!(json["totalQuantity"], 3);
    }

    #[test]
    fn test_total_quantity_overflow_is_an_error() {
        let a = product(1, dec!(1.00));
        let b = product(2, dec!(1.00));
        let mut cart = Cart::new();
        cart.add_product(&a, i64::MAX).unwrap();
        cart.add_product(&b, i64::MAX).unwrap();

        assert_eq!(
            cart.total_quantity(),
            Err(ValidationError::Overflow {
                what: "total quantity"
            })
        );
        assert!(cart.summary().is_err());
        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn test_line_total_overflow_is_an_error() {
        let big = product(1, dec!(10000000000));
        let mut cart = Cart::new();
        cart.add_product(&big, i64::MAX).unwrap();

        assert_eq!(
            cart.iter().next().unwrap().line_total(),
            Err(ValidationError::Overflow { what: "line total" })
        );
        assert!(cart.total().is_err());
        assert!(cart.summary().is_err());
    }

    #[test]
    fn test_running_total_overflow_is_an_error() {
        // each line fits on its own, their sum does not
        let a = product(1, MAX_PRICE);
        let b = product(2, MAX_PRICE);
        let qty = 40_000_000_000_000_000;
        let mut cart = Cart::new();
        cart.add_product(&a, qty).unwrap();
        cart.add_product(&b, qty).unwrap();

        for entry in cart.iter() {
            assert!(entry.line_total().is_ok());
        }
        assert_eq!(
            cart.total(),
            Err(ValidationError::Overflow { what: "cart total" })
        );
    }

    #[test]
    fn test_large_but_representable_cart() {
        let p = product(1, MAX_PRICE);
        let mut cart = Cart::new();
        cart.add_product(&p, 1_000_000).unwrap();
        assert_eq!(
            cart.total().unwrap(),
            Money::new(MAX_PRICE * dec!(1.10) * dec!(1000000))
        );
    }

    #[test]
    fn test_clear() {
        let p1 = product(1, dec!(10.00));
        let mut cart = Cart::new();
        cart.add_product(&p1, 4).unwrap();
        let created = cart.created_at();

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total_quantity(), Ok(0));
        assert!(cart.created_at() >= created);
    }

    // -------------------------------------------------------------------------
    // Product + Cart together
    // -------------------------------------------------------------------------

    #[test]
    fn test_add_discounted_and_calculate() {
        let mut p = product(1, dec!(10.00));
        p.set_discount(dec!(0.20)).unwrap();

        let mut cart = Cart::new();
        cart.add_product(&p, 2).unwrap();
        // 2 × ((10.00 + 10% tax) − 20%)
        assert_eq!(cart.total().unwrap(), Money::new(dec!(17.60)));
        assert_eq!(cart.total().unwrap().to_string(), "$17.60");
    }

    #[test]
    fn test_remove_then_remove_remaining() {
        let p = product(1, dec!(10.00));
        let mut cart = Cart::new();
        cart.add_product(&p, 2).unwrap();

        cart.remove_product(&p, Some(1)).unwrap();
        assert_eq!(cart.items()[&p.id()].quantity(), 1);

        cart.remove_product(&p, None).unwrap();
        assert!(!cart.items().contains_key(&p.id()));
    }

    #[test]
    fn test_total_reflects_product_changes_between_carts() {
        let mut p = product(1, dec!(10.00));
        {
            let mut cart = Cart::new();
            cart.add_product(&p, 1).unwrap();
            assert_eq!(cart.total().unwrap(), Money::new(dec!(11.00)));
        }

        p.set_price(Money::new(dec!(20.00))).unwrap();
        let mut cart = Cart::new();
        cart.add_product(&p, 1).unwrap();
        assert_eq!(cart.total().unwrap(), Money::new(dec!(22.00)));
    }
}
