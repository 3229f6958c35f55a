//! # Carrito Console
//!
//! Interactive menu over the cart engine. Every mutation is queued as a
//! command and run as a batch; this layer only prompts, parses and renders.

mod input;
mod table;

use std::sync::Arc;

use carrito_core::{
    Cart, CartContext, CartSnapshot, Catalog, Command, CommandQueue, CoreResult, Discount, Product,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let catalog = load_catalog()?;
    info!(products = catalog.len(), "catalog ready");

    let ctx = CartContext::new(Cart::new());
    let mut queue = CommandQueue::new();

    loop {
        print_menu();
        let Some(choice) = input::read_i64("Option: ") else {
            break;
        };

        match choice {
            1 => {
                table::print_catalog(&catalog);
                input::pause();
            }
            2 => {
                add_flow(&catalog, &ctx, &mut queue);
                input::pause();
            }
            3 => {
                remove_flow(&ctx, &mut queue);
                input::pause();
            }
            4 => {
                decrease_flow(&ctx, &mut queue);
                input::pause();
            }
            5 => {
                show_cart(&ctx);
                input::pause();
            }
            6 => {
                // Stacks on top of whatever each line already carries
                queue.enqueue(Command::apply_discount(&ctx, Discount::percent_off(0.10)?));
                queue.run_all();
                show_cart(&ctx);
                input::pause();
            }
            7 => {
                category_flow(&ctx, &mut queue);
                input::pause();
            }
            8 => {
                flat_amount_flow(&ctx, &mut queue);
                input::pause();
            }
            9 => {
                queue.enqueue(Command::reset_discounts(&ctx));
                queue.run_all();
                println!("Discounts cleared: every line is back to its base price.");
                show_cart(&ctx);
                input::pause();
            }
            0 => {
                println!("Bye.");
                break;
            }
            _ => println!("Invalid option."),
        }
    }

    Ok(())
}

/// Loads the catalog from the JSON file given as the first CLI argument,
/// or falls back to the built-in demo catalog.
fn load_catalog() -> Result<Catalog, Box<dyn std::error::Error>> {
    match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)?;
            let catalog = Catalog::from_json(&json)?;
            info!(%path, "catalog loaded from file");
            Ok(catalog)
        }
        None => Ok(demo_catalog()?),
    }
}

fn demo_catalog() -> CoreResult<Catalog> {
    Catalog::new(vec![
        Product::new("Polera básica", "BASICO", 14990.0)?,
        Product::new("Zapatilla running", "CALZADO", 49990.0)?,
        Product::new("Jeans slim", "BASICO", 29990.0)?,
        Product::new("Chaqueta liviana", "ABRIGO", 39990.0)?,
    ])
}

fn print_menu() {
    println!("\n===== MENU =====");
    println!("1) List catalog");
    println!("2) Add to cart");
    println!("3) Remove a cart line");
    println!("4) Decrease a line's quantity");
    println!("5) View cart");
    println!("6) Apply 10% to the whole cart");
    println!("7) Apply 20% by category to the whole cart");
    println!("8) Apply a flat amount per line to the whole cart");
    println!("9) Clear cart discounts");
    println!("0) Exit");
}

fn show_cart(ctx: &CartContext) {
    table::print_cart(&ctx.with_cart(|cart| CartSnapshot::from(cart)));
}

fn add_flow(catalog: &Catalog, ctx: &CartContext, queue: &mut CommandQueue) {
    table::print_catalog(catalog);

    let Some(position) = input::read_i64("Product number to add: ") else {
        return;
    };
    let item = if position >= 1 {
        catalog.get(position as usize)
    } else {
        None
    };
    let Some(item) = item else {
        println!("Invalid product number.");
        return;
    };

    let Some(quantity) = input::read_i64("Quantity: ") else {
        return;
    };
    match Command::add_item(ctx, Arc::clone(item), quantity) {
        Ok(command) => {
            queue.enqueue(command);
            queue.run_all();
            show_cart(ctx);
        }
        Err(err) => println!("{err}"),
    }
}

fn remove_flow(ctx: &CartContext, queue: &mut CommandQueue) {
    if ctx.with_cart(|cart| cart.is_empty()) {
        println!("Cart is empty.");
        return;
    }
    show_cart(ctx);

    let Some(position) = input::read_i64("Line number to remove (# column): ") else {
        return;
    };
    if position < 1 {
        println!("Invalid line number.");
        return;
    }

    queue.enqueue(Command::remove_line(ctx, position as usize));
    queue.run_all();
    show_cart(ctx);
}

fn decrease_flow(ctx: &CartContext, queue: &mut CommandQueue) {
    if ctx.with_cart(|cart| cart.is_empty()) {
        println!("Cart is empty.");
        return;
    }
    show_cart(ctx);

    let Some(position) = input::read_i64("Line number to decrease (# column): ") else {
        return;
    };
    if position < 1 {
        println!("Invalid line number.");
        return;
    }
    let Some(amount) = input::read_i64("Quantity to remove: ") else {
        return;
    };

    match Command::decrease_line(ctx, position as usize, amount) {
        Ok(command) => {
            queue.enqueue(command);
            queue.run_all();
            show_cart(ctx);
        }
        Err(err) => println!("{err}"),
    }
}

fn category_flow(ctx: &CartContext, queue: &mut CommandQueue) {
    let Some(category) = input::read_line("Target category (e.g. BASICO): ") else {
        return;
    };

    match Discount::category_percent_off(0.20, category) {
        Ok(discount) => {
            queue.enqueue(Command::apply_discount(ctx, discount));
            queue.run_all();
            show_cart(ctx);
        }
        Err(err) => println!("{err}"),
    }
}

fn flat_amount_flow(ctx: &CartContext, queue: &mut CommandQueue) {
    let Some(amount) = input::read_f64("Amount to subtract per line: ") else {
        return;
    };

    match Discount::flat_amount_off(amount) {
        Ok(discount) => {
            queue.enqueue(Command::apply_discount(ctx, discount));
            queue.run_all();
            show_cart(ctx);
        }
        Err(err) => println!("{err}"),
    }
}
