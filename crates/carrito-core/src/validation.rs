//! # Validation Module
//!
//! Input validation utilities shared by products, discounts, cart
//! operations and command constructors.
//!
//! ## Usage
//! ```rust
//! use carrito_core::validation::{validate_name, validate_quantity};
//!
//! assert!(validate_name("Polera básica").is_ok());
//! assert!(validate_quantity(5).is_ok());
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be blank (whitespace-only counts as blank)
pub fn validate_name(name: &str) -> ValidationResult<()> {
    if name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    Ok(())
}

/// Validates a category, either on a product or as a discount target.
///
/// ## Rules
/// - Must not be blank (whitespace-only counts as blank)
pub fn validate_category(category: &str) -> ValidationResult<()> {
    if category.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "category".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a base price.
///
/// ## Rules
/// - Must be finite
/// - Must be non-negative (zero is allowed: free items)
pub fn validate_base_price(price: f64) -> ValidationResult<()> {
    if !price.is_finite() {
        return Err(ValidationError::NotFinite {
            field: "base price".to_string(),
        });
    }

    if price < 0.0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "base price".to_string(),
        });
    }

    Ok(())
}

/// Validates a unit count: a quantity being added or removed from a line.
///
/// ## Rules
/// - Must be strictly positive
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a percentage discount rate.
///
/// ## Rules
/// - Must be finite
/// - Must be within `[0, 1]` (0.10 means 10% off)
pub fn validate_rate(rate: f64) -> ValidationResult<()> {
    if !rate.is_finite() {
        return Err(ValidationError::NotFinite {
            field: "rate".to_string(),
        });
    }

    if !(0.0..=1.0).contains(&rate) {
        return Err(ValidationError::RateOutOfRange { rate });
    }

    Ok(())
}

/// Validates a flat discount amount.
///
/// ## Rules
/// - Must be finite
/// - Must be non-negative
pub fn validate_amount(amount: f64) -> ValidationResult<()> {
    if !amount.is_finite() {
        return Err(ValidationError::NotFinite {
            field: "amount".to_string(),
        });
    }

    if amount < 0.0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "amount".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
