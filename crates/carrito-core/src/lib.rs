//! # carrito-core: Pure Business Logic for Carrito
//!
//! An in-memory shopping-cart engine: a product catalog, a cart of
//! quantity-bearing lines, stackable discount rules, and a FIFO command
//! queue that batches cart mutations. No I/O lives here; the interactive
//! console in `apps/console` is a thin layer over this crate.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  caller ──► Command constructors ──► CommandQueue ──► run_all()     │
//! │                                                          │          │
//! │                                                          ▼          │
//! │  Catalog ──► Arc<Product> ──► Cart ──► CartLine.current             │
//! │                                │         (ItemPrice chain)          │
//! │                                ▼                                    │
//! │                        totals / CartSnapshot                        │
//! │                        (pricing::round2 on every derived price)     │
//! │                                                                     │
//! │  NO I/O • NO PERSISTENCE • SINGLE-THREADED • PURE FUNCTIONS         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`catalog`] - Immutable products and the ordered catalog
//! - [`discount`] - Discount rules and the stacking price chain
//! - [`cart`] - Cart lines, mutation operations, totals, snapshots
//! - [`command`] - Deferred mutations and the FIFO batch queue
//! - [`pricing`] - The 2-decimal rounding contract
//! - [`error`] - Domain error types
//! - [`validation`] - Argument preconditions
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use carrito_core::{Cart, CartContext, Command, CommandQueue, Discount, Product};
//!
//! let polera = Arc::new(Product::new("Polera básica", "BASICO", 14990.0)?);
//!
//! let ctx = CartContext::new(Cart::new());
//! let mut queue = CommandQueue::new();
//! queue.enqueue(Command::add_item(&ctx, Arc::clone(&polera), 2)?);
//! queue.enqueue(Command::apply_discount(&ctx, Discount::percent_off(0.10)?));
//! queue.run_all();
//!
//! assert_eq!(ctx.with_cart(|cart| cart.total()), 26982.0);
//! # Ok::<(), carrito_core::CoreError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod command;
pub mod discount;
pub mod error;
pub mod pricing;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use carrito_core::Cart` instead of
// `use carrito_core::cart::Cart`

pub use cart::{Cart, CartLine, CartSnapshot, LineSnapshot};
pub use catalog::{Catalog, Product};
pub use command::{CartContext, Command, CommandOutcome, CommandQueue};
pub use discount::{Discount, ItemPrice};
pub use error::{CoreError, CoreResult, ValidationError};
