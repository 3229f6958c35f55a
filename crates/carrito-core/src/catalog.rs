//! # Catalog Module
//!
//! Catalog entries and the ordered product catalog.
//!
//! Products are immutable once created and shared by reference
//! (`Arc<Product>`) across every cart line that mentions them. The catalog
//! is built once at startup, either from code or from a JSON array.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::CoreResult;
use crate::validation::{validate_base_price, validate_category, validate_name};

// =============================================================================
// Product
// =============================================================================

/// A catalog entry: name, category and base price.
///
/// Immutable after creation. The base price is the undiscounted unit price;
/// discounts never touch it, they wrap it (see [`crate::discount::ItemPrice`]).
///
/// ## Example
/// ```rust
/// use carrito_core::Product;
///
/// let polera = Product::new("Polera básica", "BASICO", 14990.0).unwrap();
/// assert_eq!(polera.category, "BASICO");
///
/// // Blank names are rejected
/// assert!(Product::new("  ", "BASICO", 14990.0).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Display name, also the key cart lines merge on (normalized).
    pub name: String,

    /// Category, matched case-insensitively by category discounts.
    pub category: String,

    /// Undiscounted unit price. Finite, never negative.
    pub base_price: f64,
}

impl Product {
    /// Creates a validated product.
    ///
    /// ## Rules
    /// - `name` and `category` must not be blank
    /// - `base_price` must be finite and `>= 0`
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        base_price: f64,
    ) -> CoreResult<Self> {
        let name = name.into();
        let category = category.into();

        validate_name(&name)?;
        validate_category(&category)?;
        validate_base_price(base_price)?;

        Ok(Product {
            name,
            category,
            base_price,
        })
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// An ordered list of products, constructed once at startup.
///
/// Positions are 1-based to match how the menu layer displays them.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Arc<Product>>,
}

impl Catalog {
    /// Builds a catalog, re-validating every entry.
    ///
    /// Validation is repeated here so that catalogs assembled from struct
    /// literals or deserialized data meet the same preconditions as
    /// [`Product::new`].
    pub fn new(products: Vec<Product>) -> CoreResult<Self> {
        for product in &products {
            validate_name(&product.name)?;
            validate_category(&product.category)?;
            validate_base_price(product.base_price)?;
        }

        Ok(Catalog {
            products: products.into_iter().map(Arc::new).collect(),
        })
    }

    /// Parses a catalog from a JSON array of products.
    ///
    /// ## Example
    /// ```rust
    /// use carrito_core::Catalog;
    ///
    /// let catalog = Catalog::from_json(
    ///     r#"[{"name": "Polera básica", "category": "BASICO", "base_price": 14990.0}]"#,
    /// )
    /// .unwrap();
    /// assert_eq!(catalog.len(), 1);
    /// ```
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Catalog::new(products)
    }

    /// Returns the product at a 1-based position, if any.
    pub fn get(&self, position: usize) -> Option<&Arc<Product>> {
        if position == 0 {
            return None;
        }
        self.products.get(position - 1)
    }

    /// All products in catalog order.
    pub fn products(&self) -> &[Arc<Product>] {
        &self.products
    }

    /// Number of catalog entries.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Checks if the catalog has no entries.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
