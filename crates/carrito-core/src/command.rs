//! # Command Module
//!
//! Deferred cart mutations and the FIFO queue that runs them.
//!
//! ## Batch Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  caller ──► Command::add_item(...) ──► queue.enqueue(cmd)           │
//! │                                              │                      │
//! │                                              ▼                      │
//! │                          queue.run_all()  (insertion order)         │
//! │                                              │                      │
//! │                            ┌─────────────────┴────────────────┐     │
//! │                            │ each command executes against    │     │
//! │                            │ the CartContext it was built on; │     │
//! │                            │ soft-fails are logged, the batch │     │
//! │                            │ keeps going; queue ends empty    │     │
//! │                            └──────────────────────────────────┘     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Commands capture their parameters at construction time and validate
//! them eagerly, so a queued batch never aborts mid-run: the only runtime
//! outcomes are "applied" and "no matching line".

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::cart::Cart;
use crate::catalog::Product;
use crate::discount::Discount;
use crate::error::CoreResult;
use crate::validation::validate_quantity;

// =============================================================================
// Cart Context
// =============================================================================

/// Shared handle over one cart, cloned into every command bound to it.
///
/// The engine is single-threaded and lock-free; `Rc<RefCell<_>>` gives
/// commands shared access without internal synchronization. A concurrent
/// host must wrap the whole context behind its own exclusive lock or a
/// single owning task.
#[derive(Debug, Clone)]
pub struct CartContext {
    cart: Rc<RefCell<Cart>>,
}

impl CartContext {
    /// Wraps a cart in a shareable context.
    pub fn new(cart: Cart) -> Self {
        CartContext {
            cart: Rc::new(RefCell::new(cart)),
        }
    }

    /// Runs a closure with read access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let total = ctx.with_cart(|cart| cart.total());
    /// ```
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        f(&self.cart.borrow())
    }

    /// Runs a closure with write access to the cart.
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        f(&mut self.cart.borrow_mut())
    }
}

// =============================================================================
// Commands
// =============================================================================

/// The operation a command performs, parameters captured at construction.
#[derive(Debug, Clone)]
enum CartOp {
    AddItem { item: Arc<Product>, quantity: i64 },
    RemoveLine { position: usize },
    DecreaseLine { position: usize, amount: i64 },
    RemoveByName { name: String },
    ApplyDiscount { discount: Discount },
    ResetDiscounts,
}

/// What a command did when executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The cart changed.
    Applied,
    /// No line matched the name or position; the cart is untouched.
    NoMatch,
}

/// A deferred cart mutation: an operation bound to a [`CartContext`].
#[derive(Debug, Clone)]
pub struct Command {
    ctx: CartContext,
    op: CartOp,
}

impl Command {
    /// Add `quantity` units of a product. Rejects `quantity <= 0`.
    pub fn add_item(ctx: &CartContext, item: Arc<Product>, quantity: i64) -> CoreResult<Self> {
        validate_quantity(quantity)?;
        Ok(Command {
            ctx: ctx.clone(),
            op: CartOp::AddItem { item, quantity },
        })
    }

    /// Remove the cart line at a 1-based position.
    pub fn remove_line(ctx: &CartContext, position: usize) -> Self {
        Command {
            ctx: ctx.clone(),
            op: CartOp::RemoveLine { position },
        }
    }

    /// Decrease the quantity of the line at a 1-based position.
    /// Rejects `amount <= 0`.
    pub fn decrease_line(ctx: &CartContext, position: usize, amount: i64) -> CoreResult<Self> {
        validate_quantity(amount)?;
        Ok(Command {
            ctx: ctx.clone(),
            op: CartOp::DecreaseLine { position, amount },
        })
    }

    /// Remove the first line matching a product name.
    pub fn remove_by_name(ctx: &CartContext, name: impl Into<String>) -> Self {
        Command {
            ctx: ctx.clone(),
            op: CartOp::RemoveByName { name: name.into() },
        }
    }

    /// Stack an already-validated discount onto every cart line.
    pub fn apply_discount(ctx: &CartContext, discount: Discount) -> Self {
        Command {
            ctx: ctx.clone(),
            op: CartOp::ApplyDiscount { discount },
        }
    }

    /// Restore every line to its base price.
    pub fn reset_discounts(ctx: &CartContext) -> Self {
        Command {
            ctx: ctx.clone(),
            op: CartOp::ResetDiscounts,
        }
    }

    /// Short human-readable summary, for menus and batch logs.
    pub fn describe(&self) -> String {
        match &self.op {
            CartOp::AddItem { item, quantity } => format!("add {}x {}", quantity, item.name),
            CartOp::RemoveLine { position } => format!("remove line #{position}"),
            CartOp::DecreaseLine { position, amount } => {
                format!("decrease line #{position} by {amount}")
            }
            CartOp::RemoveByName { name } => format!("remove {name}"),
            CartOp::ApplyDiscount { discount } => format!("apply {discount} to all lines"),
            CartOp::ResetDiscounts => "clear all discounts".to_string(),
        }
    }

    /// Executes the operation against the bound cart.
    ///
    /// Stale positions and unknown names report [`CommandOutcome::NoMatch`]
    /// rather than failing; constructor validation keeps everything else
    /// from erroring at execute time.
    pub fn execute(&self) -> CoreResult<CommandOutcome> {
        let outcome = match &self.op {
            CartOp::AddItem { item, quantity } => {
                self.ctx
                    .with_cart_mut(|cart| cart.add(Arc::clone(item), *quantity))?;
                CommandOutcome::Applied
            }
            CartOp::RemoveLine { position } => {
                if self.ctx.with_cart_mut(|cart| cart.remove_at_index(*position)) {
                    CommandOutcome::Applied
                } else {
                    CommandOutcome::NoMatch
                }
            }
            CartOp::DecreaseLine { position, amount } => {
                if self
                    .ctx
                    .with_cart_mut(|cart| cart.decrease_at_index(*position, *amount))?
                {
                    CommandOutcome::Applied
                } else {
                    CommandOutcome::NoMatch
                }
            }
            CartOp::RemoveByName { name } => {
                if self.ctx.with_cart_mut(|cart| cart.remove_by_name(name)) {
                    CommandOutcome::Applied
                } else {
                    CommandOutcome::NoMatch
                }
            }
            CartOp::ApplyDiscount { discount } => {
                self.ctx.with_cart_mut(|cart| cart.apply_to_all(discount));
                CommandOutcome::Applied
            }
            CartOp::ResetDiscounts => {
                self.ctx.with_cart_mut(|cart| cart.reset_all());
                CommandOutcome::Applied
            }
        };

        Ok(outcome)
    }
}

// =============================================================================
// Command Queue
// =============================================================================

/// FIFO buffer of commands, executed as one batch.
#[derive(Debug, Default)]
pub struct CommandQueue {
    pending: VecDeque<Command>,
}

impl CommandQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        CommandQueue {
            pending: VecDeque::new(),
        }
    }

    /// Appends a command to the batch.
    pub fn enqueue(&mut self, command: Command) {
        debug!(command = %command.describe(), "command queued");
        self.pending.push_back(command);
    }

    /// Number of queued commands.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Checks if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Executes every queued command in insertion order, then clears the
    /// queue. Commands that find nothing to act on no-op and the batch
    /// keeps going; nothing is retried or rolled back.
    ///
    /// Returns how many commands reported an effect.
    pub fn run_all(&mut self) -> usize {
        let mut applied = 0;
        for command in self.pending.drain(..) {
            match command.execute() {
                Ok(CommandOutcome::Applied) => {
                    debug!(command = %command.describe(), "command applied");
                    applied += 1;
                }
                Ok(CommandOutcome::NoMatch) => {
                    debug!(command = %command.describe(), "no matching line, skipped");
                }
                Err(err) => {
                    warn!(command = %command.describe(), %err, "command rejected, batch continues");
                }
            }
        }
        applied
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
    fn test_constructors_validate_eagerly() {
        let ctx = CartContext::new(Cart::new());
        let polera = product("Polera básica", "BASICO", 14990.0);

        assert!(Command::add_item(&ctx, Arc::clone(&polera), 0).is_err());
        assert!(Command::add_item(&ctx, Arc::clone(&polera), 2).is_ok());
        assert!(Command::decrease_line(&ctx, 1, 0).is_err());
        assert!(Command::decrease_line(&ctx, 1, 1).is_ok());
    }

    #[test]
    fn test_describe() {
        let ctx = CartContext::new(Cart::new());
        let polera = product("Polera básica", "BASICO", 14990.0);

        assert_eq!(
            Command::add_item(&ctx, polera, 2).unwrap().describe(),
            "add 2x Polera básica"
        );
        assert_eq!(Command::remove_line(&ctx, 3).describe(), "remove line #3");
        assert_eq!(
            Command::decrease_line(&ctx, 2, 1).unwrap().describe(),
            "decrease line #2 by 1"
        );
        assert_eq!(
            Command::remove_by_name(&ctx, "Jeans slim").describe(),
            "remove Jeans slim"
        );
        assert_eq!(
            Command::apply_discount(&ctx, Discount::percent_off(0.10).unwrap()).describe(),
            "apply 10% off to all lines"
        );
        assert_eq!(
            Command::reset_discounts(&ctx).describe(),
            "clear all discounts"
        );
    }

    #[test]
    fn test_run_all_is_fifo_and_clears_queue() {
        let ctx = CartContext::new(Cart::new());
        let mut queue = CommandQueue::new();
        let polera = product("Polera básica", "BASICO", 14990.0);

        // Add first, remove second: FIFO order leaves the cart empty.
        // The reverse order would leave one line behind.
        queue.enqueue(Command::add_item(&ctx, polera, 2).unwrap());
        queue.enqueue(Command::remove_line(&ctx, 1));
        assert_eq!(queue.len(), 2);

        let applied = queue.run_all();

        assert_eq!(applied, 2);
        assert!(queue.is_empty());
        assert!(ctx.with_cart(|cart| cart.is_empty()));
    }

    #[test]
    fn test_soft_failed_command_does_not_stop_the_batch() {
        let ctx = CartContext::new(Cart::new());
        let mut queue = CommandQueue::new();

        queue.enqueue(Command::remove_line(&ctx, 7));
        queue.enqueue(Command::remove_by_name(&ctx, "missing"));
        queue.enqueue(Command::add_item(&ctx, product("Polera", "BASICO", 14990.0), 1).unwrap());

        let applied = queue.run_all();

        assert_eq!(applied, 1);
        assert_eq!(ctx.with_cart(|cart| cart.line_count()), 1);
    }

    #[test]
    fn test_execute_reports_no_match() {
        let ctx = CartContext::new(Cart::new());

        let outcome = Command::remove_line(&ctx, 1).execute().unwrap();
        assert_eq!(outcome, CommandOutcome::NoMatch);

        let outcome = Command::remove_by_name(&ctx, "Polera").execute().unwrap();
        assert_eq!(outcome, CommandOutcome::NoMatch);
    }

    /// The full reference scenario, batch by batch.
    #[test]
    fn test_end_to_end_discount_scenario() {
        let ctx = CartContext::new(Cart::new());
        let mut queue = CommandQueue::new();

        let polera = product("Polera básica", "BASICO", 14990.0);
        let zapatilla = product("Zapatilla running", "CALZADO", 49990.0);
        let jeans = product("Jeans slim", "BASICO", 29990.0);

        queue.enqueue(Command::add_item(&ctx, polera, 2).unwrap());
        queue.enqueue(Command::add_item(&ctx, zapatilla, 1).unwrap());
        queue.enqueue(Command::add_item(&ctx, jeans, 1).unwrap());
        queue.run_all();
        assert!(close(ctx.with_cart(|cart| cart.total()), 109960.0));

        // 10% everywhere, then 20% on BASICO, stacking on top
        queue.enqueue(Command::apply_discount(
            &ctx,
            Discount::percent_off(0.10).unwrap(),
        ));
        queue.enqueue(Command::apply_discount(
            &ctx,
            Discount::category_percent_off(0.20, "BASICO").unwrap(),
        ));
        queue.run_all();
        assert!(close(ctx.with_cart(|cart| cart.total()), 88169.4));

        // Flat 2000 off every line
        queue.enqueue(Command::apply_discount(
            &ctx,
            Discount::flat_amount_off(2000.0).unwrap(),
        ));
        queue.run_all();
        assert!(close(ctx.with_cart(|cart| cart.total()), 80169.4));

        // Drop the jeans line by name
        queue.enqueue(Command::remove_by_name(&ctx, "Jeans slim"));
        queue.run_all();
        assert!(close(ctx.with_cart(|cart| cart.total()), 60576.6));

        // And a reset puts every surviving line back at its base price
        queue.enqueue(Command::reset_discounts(&ctx));
        queue.run_all();
        assert!(close(ctx.with_cart(|cart| cart.total()), 79970.0));
    }
}
