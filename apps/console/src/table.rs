//! Table rendering for the catalog and the cart.

use carrito_core::{CartSnapshot, Catalog};

/// Prints the catalog with 1-based positions.
pub fn print_catalog(catalog: &Catalog) {
    println!("\n=== Product catalog ===");
    println!(
        "{:>3} | {:<18} | {:<10} | {:>10}",
        "#", "Product", "Category", "Price"
    );
    println!("{}", "-".repeat(51));
    for (i, product) in catalog.products().iter().enumerate() {
        println!(
            "{:>3} | {:<18} | {:<10} | {:>10.2}",
            i + 1,
            product.name,
            product.category,
            product.base_price
        );
    }
}

/// Prints the cart: one row per line plus the grand total.
pub fn print_cart(snapshot: &CartSnapshot) {
    println!("\n=== Shopping cart ===");
    if snapshot.lines.is_empty() {
        println!("(empty)");
        return;
    }

    println!(
        "{:>3} | {:<18} | {:<10} | {:>10} | {:>10} | {:>4} | {:>10}",
        "#", "Product", "Category", "Base", "Unit", "Qty", "Total"
    );
    println!("{}", "-".repeat(84));
    for line in &snapshot.lines {
        println!(
            "{:>3} | {:<18} | {:<10} | {:>10.2} | {:>10.2} | {:>4} | {:>10.2}",
            line.position,
            line.name,
            line.category,
            line.base_price,
            line.unit_price,
            line.quantity,
            line.line_total
        );
    }
    println!("{}", "-".repeat(84));
    println!("Cart subtotal: {:.2}", snapshot.total);
}
