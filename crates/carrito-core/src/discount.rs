//! # Discount Module
//!
//! Discount rules and the price-modifier chain.
//!
//! ## Stacking Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  ItemPrice chain (outermost rule applied last)                      │
//! │                                                                     │
//! │  FlatAmountOff(2000) ── PercentOff(0.10) ── Base(Polera, 14990)     │
//! │                                                                     │
//! │  price()    = max(0, 14990 * 0.90 - 2000) = 11491                   │
//! │  name()     = "Polera básica"   (delegated unchanged)               │
//! │  category() = "BASICO"          (delegated unchanged)               │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Applying a rule wraps the current chain in a new node; the inner chain
//! is never mutated. Only a full reset back to the base item undoes
//! stacked rules.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::error::CoreResult;
use crate::validation::{validate_amount, validate_category, validate_rate};

// =============================================================================
// Discount Rules
// =============================================================================

/// A price-modification rule. Configuration is fixed at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Discount {
    /// Percentage off any product: `price * (1 - rate)`.
    PercentOff { rate: f64 },

    /// Percentage off only when the product's category matches
    /// (case-insensitive); otherwise the price passes through.
    CategoryPercentOff { rate: f64, category: String },

    /// Flat amount off per unit, clamped at zero.
    FlatAmountOff { amount: f64 },
}

impl Discount {
    /// Percentage discount for every product.
    ///
    /// ## Rules
    /// - `rate` must be finite and within `[0, 1]`
    pub fn percent_off(rate: f64) -> CoreResult<Self> {
        validate_rate(rate)?;
        Ok(Discount::PercentOff { rate })
    }

    /// Percentage discount restricted to one category.
    ///
    /// ## Rules
    /// - `rate` must be finite and within `[0, 1]`
    /// - `category` must not be blank
    pub fn category_percent_off(rate: f64, category: impl Into<String>) -> CoreResult<Self> {
        let category = category.into();
        validate_rate(rate)?;
        validate_category(&category)?;
        Ok(Discount::CategoryPercentOff { rate, category })
    }

    /// Flat amount off per unit.
    ///
    /// ## Rules
    /// - `amount` must be finite and `>= 0`
    pub fn flat_amount_off(amount: f64) -> CoreResult<Self> {
        validate_amount(amount)?;
        Ok(Discount::FlatAmountOff { amount })
    }

    /// Applies the rule to an inner price.
    ///
    /// `category` is the category the inner chain reports; only
    /// [`Discount::CategoryPercentOff`] looks at it.
    pub fn apply(&self, price: f64, category: &str) -> f64 {
        match self {
            Discount::PercentOff { rate } => price * (1.0 - rate),
            Discount::CategoryPercentOff {
                rate,
                category: target,
            } => {
                if eq_ignore_case(category, target) {
                    price * (1.0 - rate)
                } else {
                    price
                }
            }
            Discount::FlatAmountOff { amount } => (price - amount).max(0.0),
        }
    }
}

impl fmt::Display for Discount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Discount::PercentOff { rate } => write!(f, "{:.0}% off", rate * 100.0),
            Discount::CategoryPercentOff { rate, category } => {
                write!(f, "{:.0}% off {}", rate * 100.0, category)
            }
            Discount::FlatAmountOff { amount } => write!(f, "{amount:.2} off"),
        }
    }
}

/// Case-insensitive comparison, Unicode-aware.
fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

// =============================================================================
// Price-Modifier Chain
// =============================================================================

/// The current price representation of a cart line: the base item wrapped
/// in zero or more discount nodes.
///
/// Name and category delegate unchanged through the whole chain; only the
/// price is recomputed, innermost first, outermost rule last.
///
/// ## Example
/// ```rust
/// use std::sync::Arc;
/// use carrito_core::{Discount, ItemPrice, Product};
///
/// let polera = Arc::new(Product::new("Polera básica", "BASICO", 14990.0).unwrap());
/// let price = ItemPrice::base(polera)
///     .discounted(Discount::percent_off(0.10).unwrap())
///     .discounted(Discount::flat_amount_off(2000.0).unwrap());
///
/// assert_eq!(price.name(), "Polera básica");
/// assert!((price.price() - 11491.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub enum ItemPrice {
    /// The undiscounted base item.
    Base(Arc<Product>),

    /// One applied rule wrapping the rest of the chain.
    Discounted {
        rule: Discount,
        inner: Box<ItemPrice>,
    },
}

impl ItemPrice {
    /// Starts a chain with no discounts applied.
    pub fn base(item: Arc<Product>) -> Self {
        ItemPrice::Base(item)
    }

    /// The base item's name, regardless of stacked rules.
    pub fn name(&self) -> &str {
        match self {
            ItemPrice::Base(item) => &item.name,
            ItemPrice::Discounted { inner, .. } => inner.name(),
        }
    }

    /// The base item's category, regardless of stacked rules.
    pub fn category(&self) -> &str {
        match self {
            ItemPrice::Base(item) => &item.category,
            ItemPrice::Discounted { inner, .. } => inner.category(),
        }
    }

    /// The effective unit price, unrounded.
    ///
    /// Each node applies its rule to the price the inner chain reports,
    /// so the outermost rule acts on the result of everything below it.
    pub fn price(&self) -> f64 {
        match self {
            ItemPrice::Base(item) => item.base_price,
            ItemPrice::Discounted { rule, inner } => rule.apply(inner.price(), inner.category()),
        }
    }

    /// Stacks one more rule on top of the chain.
    pub fn discounted(self, rule: Discount) -> Self {
        ItemPrice::Discounted {
            rule,
            inner: Box::new(self),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, category: &str, price: f64) -> Arc<Product> {
        Arc::new(Product::new(name, category, price).unwrap())
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_percent_off_reduces_price() {
        let price = ItemPrice::base(item("Polera básica", "BASICO", 14990.0))
            .discounted(Discount::percent_off(0.10).unwrap());

        assert!(close(price.price(), 13491.0));
    }

    #[test]
    fn test_stacking_applies_outermost_last() {
        // 10% off first, then 2000 flat: max(0, 14990 * 0.90 - 2000) = 11491
        let price = ItemPrice::base(item("Polera básica", "BASICO", 14990.0))
            .discounted(Discount::percent_off(0.10).unwrap())
            .discounted(Discount::flat_amount_off(2000.0).unwrap());

        assert!(close(price.price(), 11491.0));
    }

    #[test]
    fn test_category_match_is_case_insensitive() {
        let price = ItemPrice::base(item("Polera básica", "basico", 10000.0))
            .discounted(Discount::category_percent_off(0.20, "BASICO").unwrap());

        assert!(close(price.price(), 8000.0));
    }

    #[test]
    fn test_category_mismatch_passes_price_through() {
        let price = ItemPrice::base(item("Zapatilla running", "CALZADO", 49990.0))
            .discounted(Discount::category_percent_off(0.20, "BASICO").unwrap());

        assert!(close(price.price(), 49990.0));
    }

    #[test]
    fn test_flat_amount_never_goes_negative() {
        let price = ItemPrice::base(item("Calcetines", "BASICO", 1500.0))
            .discounted(Discount::flat_amount_off(2000.0).unwrap());

        assert_eq!(price.price(), 0.0);

        // Still clamped after further stacking
        let price = price.discounted(Discount::flat_amount_off(100.0).unwrap());
        assert_eq!(price.price(), 0.0);
    }

    #[test]
    fn test_name_and_category_delegate_through_chain() {
        let price = ItemPrice::base(item("Polera básica", "BASICO", 14990.0))
            .discounted(Discount::percent_off(0.10).unwrap())
            .discounted(Discount::category_percent_off(0.20, "BASICO").unwrap())
            .discounted(Discount::flat_amount_off(2000.0).unwrap());

        assert_eq!(price.name(), "Polera básica");
        assert_eq!(price.category(), "BASICO");
    }

    #[test]
    fn test_constructors_reject_invalid_configuration() {
        assert!(Discount::percent_off(-0.1).is_err());
        assert!(Discount::percent_off(1.5).is_err());
        assert!(Discount::percent_off(f64::NAN).is_err());

        assert!(Discount::category_percent_off(0.20, "").is_err());
        assert!(Discount::category_percent_off(0.20, "  ").is_err());
        assert!(Discount::category_percent_off(2.0, "BASICO").is_err());

        assert!(Discount::flat_amount_off(-1.0).is_err());
        assert!(Discount::flat_amount_off(0.0).is_ok());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Discount::percent_off(0.10).unwrap().to_string(),
            "10% off"
        );
        assert_eq!(
            Discount::category_percent_off(0.20, "BASICO")
                .unwrap()
                .to_string(),
            "20% off BASICO"
        );
        assert_eq!(
            Discount::flat_amount_off(2000.0).unwrap().to_string(),
            "2000.00 off"
        );
    }
}
