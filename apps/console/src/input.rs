//! Prompted stdin readers with retry on unparsable input.
//!
//! Retry-on-bad-input lives here, never in the core: the engine rejects
//! invalid arguments, this layer keeps asking until it has valid ones.

use std::io::{self, Write};

/// Reads one trimmed line. Returns `None` once stdin is closed.
pub fn read_line(prompt: &str) -> Option<String> {
    print!("{prompt}");
    let _ = io::stdout().flush();

    let mut buf = String::new();
    match io::stdin().read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

/// Reads a whole number, retrying until one parses.
pub fn read_i64(prompt: &str) -> Option<i64> {
    loop {
        let line = read_line(prompt)?;
        match line.parse() {
            Ok(value) => return Some(value),
            Err(_) => println!("Enter a valid whole number."),
        }
    }
}

/// Reads a number, retrying until one parses.
pub fn read_f64(prompt: &str) -> Option<f64> {
    loop {
        let line = read_line(prompt)?;
        match line.parse() {
            Ok(value) => return Some(value),
            Err(_) => println!("Enter a valid number."),
        }
    }
}

/// Simple pause so tables can be read before the menu redraws.
pub fn pause() {
    println!("Press ENTER to continue...");
    let mut buf = String::new();
    let _ = io::stdin().read_line(&mut buf);
}
