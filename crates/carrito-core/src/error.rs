//! # Error Types
//!
//! Domain-specific error types for carrito-core.
//!
//! ## Two-Tier Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Tier 1: construction-time rejection                                │
//! │  Invalid arguments (blank name, non-positive quantity, negative     │
//! │  amount, out-of-range rate) fail fast with Err(CoreError).          │
//! │                                                                     │
//! │  Tier 2: runtime soft-fail                                          │
//! │  Lookups by name or 1-based position that find no match return a    │
//! │  boolean, never an error, so a queued batch keeps running.          │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Errors are enum variants, never bare strings
//! 3. Each message names the violated precondition

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Validation error (wraps ValidationError).
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A catalog file could not be parsed.
    #[error("invalid catalog: {0}")]
    InvalidCatalog(#[from] serde_json::Error),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when an argument does not meet a precondition. Used for
/// early validation before any cart state changes.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must be zero or greater.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Value is NaN or infinite.
    #[error("{field} must be a finite number")]
    NotFinite { field: String },

    /// Discount rate outside the unit interval.
    #[error("discount rate {rate} must be between 0 and 1")]
    RateOutOfRange { rate: f64 },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
