//! # Cart Module
//!
//! The cart and its lines.
//!
//! ## Invariants
//! - Lines are unique by normalized product name (trimmed, lowercased);
//!   adding the same product again merges quantities
//! - Quantity is `> 0` while a line exists; a line whose quantity reaches 0
//!   is removed, never retained
//! - A line's `base` never changes; its `current` representation is
//!   replaced wholesale whenever a discount is stacked or cleared
//!
//! ## Addressing
//! Operations come in name-addressed and 1-based-position-addressed forms.
//! Both soft-fail: no match means a `false` return, never an error. Invalid
//! arguments (non-positive quantities) reject before any state changes.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::discount::{Discount, ItemPrice};
use crate::error::CoreResult;
use crate::pricing::round2;
use crate::validation::validate_quantity;

/// Merge/lookup key: trimmed, lowercased product name.
fn normalized(name: &str) -> String {
    name.trim().to_lowercase()
}

// =============================================================================
// Cart Line
// =============================================================================

/// One cart entry: the base item, its current (possibly discounted) price
/// representation, and a quantity.
#[derive(Debug, Clone)]
pub struct CartLine {
    /// The catalog entry this line was created from. Never changes.
    base: Arc<Product>,

    /// Current price representation. Starts as the bare base item and is
    /// replaced each time a discount is stacked.
    current: ItemPrice,

    /// Units on this line. Always `> 0`.
    quantity: i64,

    /// When this line was first added.
    added_at: DateTime<Utc>,
}

impl CartLine {
    fn new(base: Arc<Product>, quantity: i64) -> Self {
        let current = ItemPrice::base(Arc::clone(&base));
        CartLine {
            base,
            current,
            quantity,
            added_at: Utc::now(),
        }
    }

    /// The base catalog entry (undiscounted).
    pub fn base(&self) -> &Arc<Product> {
        &self.base
    }

    /// The current price representation, discounts included.
    pub fn current(&self) -> &ItemPrice {
        &self.current
    }

    /// Units on this line.
    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    /// When this line was first added.
    pub fn added_at(&self) -> DateTime<Utc> {
        self.added_at
    }

    /// Effective unit price, rounded to 2 decimals.
    pub fn unit_price(&self) -> f64 {
        round2(self.current.price())
    }

    /// Line total: rounded unit price times quantity, rounded.
    pub fn line_total(&self) -> f64 {
        round2(self.unit_price() * self.quantity as f64)
    }

    fn increase(&mut self, extra: i64) {
        self.quantity += extra;
    }

    /// Clamps at 0; the cart removes the line when it gets there.
    fn decrease(&mut self, amount: i64) {
        self.quantity = (self.quantity - amount).max(0);
    }

    /// Stacks one more rule onto the current representation.
    fn stack(&mut self, rule: Discount) {
        let inner = std::mem::replace(&mut self.current, ItemPrice::base(Arc::clone(&self.base)));
        self.current = inner.discounted(rule);
    }

    /// Drops every stacked rule, back to the base item.
    fn reset(&mut self) {
        self.current = ItemPrice::base(Arc::clone(&self.base));
    }
}

// =============================================================================
// Cart
// =============================================================================

/// An ordered collection of cart lines.
///
/// Insertion order is preserved; positions shown to callers are 1-based.
#[derive(Debug, Clone)]
pub struct Cart {
    lines: Vec<CartLine>,
    created_at: DateTime<Utc>,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Cart {
            lines: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Adds a product, merging into an existing line by normalized name.
    ///
    /// ## Behavior
    /// - Same product already in the cart: quantity increases; the line's
    ///   current representation (stacked discounts included) is untouched
    /// - Otherwise: a new undiscounted line is appended
    ///
    /// ## Errors
    /// Rejects `quantity <= 0` before any state changes.
    pub fn add(&mut self, item: Arc<Product>, quantity: i64) -> CoreResult<()> {
        validate_quantity(quantity)?;

        let target = normalized(&item.name);
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| normalized(&line.base.name) == target)
        {
            line.increase(quantity);
            return Ok(());
        }

        self.lines.push(CartLine::new(item, quantity));
        Ok(())
    }

    /// Removes the first line matching the normalized name.
    ///
    /// Returns whether a removal occurred.
    pub fn remove_by_name(&mut self, name: &str) -> bool {
        let target = normalized(name);
        match self
            .lines
            .iter()
            .position(|line| normalized(&line.base.name) == target)
        {
            Some(idx) => {
                self.lines.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Decreases the matching line's quantity, removing the line when it
    /// reaches 0.
    ///
    /// Returns whether a match was found. Rejects `amount <= 0`.
    pub fn decrease_by_name(&mut self, name: &str, amount: i64) -> CoreResult<bool> {
        validate_quantity(amount)?;

        let target = normalized(name);
        match self
            .lines
            .iter()
            .position(|line| normalized(&line.base.name) == target)
        {
            Some(idx) => {
                self.lines[idx].decrease(amount);
                if self.lines[idx].quantity == 0 {
                    self.lines.remove(idx);
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Removes the line at a 1-based position.
    ///
    /// Out-of-range positions return `false` and leave the cart untouched.
    pub fn remove_at_index(&mut self, position: usize) -> bool {
        if position == 0 || position > self.lines.len() {
            return false;
        }
        self.lines.remove(position - 1);
        true
    }

    /// Decreases the quantity of the line at a 1-based position, removing
    /// the line when it reaches 0.
    ///
    /// Out-of-range positions return `Ok(false)` and leave the cart
    /// untouched. Rejects `amount <= 0`.
    pub fn decrease_at_index(&mut self, position: usize, amount: i64) -> CoreResult<bool> {
        validate_quantity(amount)?;

        if position == 0 || position > self.lines.len() {
            return Ok(false);
        }

        let idx = position - 1;
        self.lines[idx].decrease(amount);
        if self.lines[idx].quantity == 0 {
            self.lines.remove(idx);
        }
        Ok(true)
    }

    /// Stacks a discount onto every line's current representation.
    ///
    /// The rule's configuration was fixed when `discount` was built; each
    /// line gets its own chain node.
    pub fn apply_to_all(&mut self, discount: &Discount) {
        for line in &mut self.lines {
            line.stack(discount.clone());
        }
    }

    /// Restores every line to its base item, discarding all stacked rules.
    pub fn reset_all(&mut self) {
        for line in &mut self.lines {
            line.reset();
        }
    }

    /// Cart total with the fixed two-stage rounding contract: each line's
    /// unit price is rounded to 2 decimals, multiplied by its quantity and
    /// summed, then the sum is rounded once more.
    pub fn total(&self) -> f64 {
        round2(
            self.lines
                .iter()
                .map(|line| line.unit_price() * line.quantity as f64)
                .sum::<f64>(),
        )
    }

    /// The cart lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Number of lines (not units).
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Total units across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Checks if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// When the cart was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Default for Cart {
    fn default() -> Self {
        Cart::new()
    }
}

// =============================================================================
// Read Models
// =============================================================================

/// One cart line flattened for the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineSnapshot {
    /// 1-based position in the cart.
    pub position: usize,
    pub name: String,
    pub category: String,
    pub base_price: f64,
    /// Effective unit price, discounts applied, rounded to 2 decimals.
    pub unit_price: f64,
    pub quantity: i64,
    pub line_total: f64,
}

/// Full cart view: ordered line rows plus the grand total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartSnapshot {
    pub lines: Vec<LineSnapshot>,
    pub total: f64,
}

impl From<&Cart> for CartSnapshot {
    fn from(cart: &Cart) -> Self {
        let lines = cart
            .lines
            .iter()
            .enumerate()
            .map(|(i, line)| LineSnapshot {
                position: i + 1,
                name: line.base.name.clone(),
                category: line.base.category.clone(),
                base_price: line.base.base_price,
                unit_price: line.unit_price(),
                quantity: line.quantity,
                line_total: line.line_total(),
            })
            .collect();

        CartSnapshot {
            lines,
            total: cart.total(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str, category: &str, price: f64) -> Arc<Product> {
        Arc::new(Product::new(name, category, price).unwrap())
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_add_merges_by_normalized_name() {
        let mut cart = Cart::new();
        cart.add(product("Polera básica", "BASICO", 14990.0), 2).unwrap();
        cart.add(product("  POLERA BÁSICA ", "BASICO", 14990.0), 3)
            .unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total_quantity(), 5);
    }

    #[test]
    fn test_add_rejects_non_positive_quantity() {
        let mut cart = Cart::new();
        assert!(cart.add(product("Polera", "BASICO", 14990.0), 0).is_err());
        assert!(cart.add(product("Polera", "BASICO", 14990.0), -2).is_err());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_merge_keeps_existing_discounts() {
        let mut cart = Cart::new();
        cart.add(product("Polera", "BASICO", 10000.0), 1).unwrap();
        cart.apply_to_all(&Discount::percent_off(0.10).unwrap());

        cart.add(product("Polera", "BASICO", 10000.0), 1).unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.lines()[0].quantity(), 2);
        // The discounted representation survived the merge
        assert!(close(cart.lines()[0].unit_price(), 9000.0));
    }

    #[test]
    fn test_remove_by_name() {
        let mut cart = Cart::new();
        cart.add(product("Polera", "BASICO", 10000.0), 1).unwrap();
        cart.add(product("Jeans", "BASICO", 20000.0), 1).unwrap();

        assert!(cart.remove_by_name(" POLERA "));
        assert_eq!(cart.line_count(), 1);

        assert!(!cart.remove_by_name("Polera"));
        assert_eq!(cart.line_count(), 1);
    }

    #[test]
    fn test_decrease_by_name_clamps_and_removes_at_zero() {
        let mut cart = Cart::new();
        cart.add(product("Polera", "BASICO", 10000.0), 2).unwrap();

        assert!(cart.decrease_by_name("Polera", 1).unwrap());
        assert_eq!(cart.lines()[0].quantity(), 1);

        // Decreasing past zero clamps and drops the line
        cart.add(product("Jeans", "BASICO", 20000.0), 1).unwrap();
        assert!(cart.decrease_by_name("Polera", 5).unwrap());
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.lines()[0].base().name, "Jeans");

        assert!(!cart.decrease_by_name("Polera", 1).unwrap());
        assert!(cart.decrease_by_name("Jeans", 0).is_err());
    }

    #[test]
    fn test_index_operations_are_one_based() {
        let mut cart = Cart::new();
        cart.add(product("Polera", "BASICO", 10000.0), 1).unwrap();
        cart.add(product("Jeans", "BASICO", 20000.0), 3).unwrap();

        assert!(cart.remove_at_index(1));
        assert_eq!(cart.lines()[0].base().name, "Jeans");

        assert!(cart.decrease_at_index(1, 2).unwrap());
        assert_eq!(cart.lines()[0].quantity(), 1);

        assert!(cart.decrease_at_index(1, 1).unwrap());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_out_of_range_index_leaves_cart_unchanged() {
        let mut cart = Cart::new();
        cart.add(product("Polera", "BASICO", 10000.0), 2).unwrap();
        let total_before = cart.total();

        assert!(!cart.remove_at_index(0));
        assert!(!cart.remove_at_index(2));
        assert!(!cart.decrease_at_index(0, 1).unwrap());
        assert!(!cart.decrease_at_index(5, 1).unwrap());

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.lines()[0].quantity(), 2);
        assert_eq!(cart.total(), total_before);
    }

    #[test]
    fn test_reset_all_restores_base_prices() {
        let mut cart = Cart::new();
        cart.add(product("Polera", "BASICO", 14990.0), 1).unwrap();
        cart.add(product("Zapatilla", "CALZADO", 49990.0), 1).unwrap();

        cart.apply_to_all(&Discount::percent_off(0.10).unwrap());
        cart.apply_to_all(&Discount::category_percent_off(0.20, "BASICO").unwrap());
        cart.apply_to_all(&Discount::flat_amount_off(2000.0).unwrap());

        cart.reset_all();

        assert_eq!(cart.lines()[0].unit_price(), 14990.0);
        assert_eq!(cart.lines()[1].unit_price(), 49990.0);
        assert!(close(cart.total(), 64980.0));
    }

    #[test]
    fn test_total_rounds_per_line_before_summing() {
        let mut cart = Cart::new();
        // Unit 1.125 rounds to 1.13 per line BEFORE multiplying by quantity;
        // rounding the raw sum instead would give 2.25
        cart.add(product("Chicle", "SNACK", 1.125), 2).unwrap();

        assert_eq!(cart.total(), 2.26);
    }

    #[test]
    fn test_total_on_empty_cart_is_zero() {
        assert_eq!(Cart::new().total(), 0.0);
    }

    #[test]
    fn test_snapshot_reflects_cart_state() {
        let mut cart = Cart::new();
        cart.add(product("Polera básica", "BASICO", 14990.0), 2).unwrap();
        cart.add(product("Zapatilla running", "CALZADO", 49990.0), 1)
            .unwrap();
        cart.apply_to_all(&Discount::percent_off(0.10).unwrap());

        let snapshot = CartSnapshot::from(&cart);

        assert_eq!(snapshot.lines.len(), 2);
        assert_eq!(snapshot.lines[0].position, 1);
        assert_eq!(snapshot.lines[0].name, "Polera básica");
        assert_eq!(snapshot.lines[0].base_price, 14990.0);
        assert!(close(snapshot.lines[0].unit_price, 13491.0));
        assert!(close(snapshot.lines[0].line_total, 26982.0));
        assert_eq!(snapshot.lines[1].position, 2);
        assert!(close(snapshot.total, cart.total()));
    }
}
