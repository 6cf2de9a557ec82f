//! qlayer Demo Suite
//!
//! Driver programs for the qlayer circuit simulator:
//!
//! - **Deutsch's algorithm**: decide whether a one-bit oracle is constant or
//!   balanced with a single query
//!
//! ```rust
//! use qlayer_demos::circuits::{Oracle, deutsch_circuit, is_constant_outcome};
//! use qlayer_sim::SimConfig;
//!
//! let mut circuit = deutsch_circuit(Oracle::BalancedNot, SimConfig::default()).unwrap();
//! let output = circuit.run().unwrap();
//! assert!(!is_constant_outcome(output.as_sample().unwrap()));
//! ```

pub mod circuits;

use console::style;

/// Print a demo header.
pub fn print_header(title: &str) {
    println!();
    println!("{}", style("═".repeat(60)).cyan());
    println!("{}", style(format!("  {title}")).cyan().bold());
    println!("{}", style("═".repeat(60)).cyan());
    println!();
}

/// Print a demo section.
pub fn print_section(title: &str) {
    println!();
    println!("{}", style(format!("▶ {title}")).green().bold());
    println!("{}", style("─".repeat(40)).dim());
}

/// Print a result line.
pub fn print_result(label: &str, value: impl std::fmt::Display) {
    println!("  {} {}", style(format!("{label}:")).dim(), value);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("ℹ").blue(), message);
}
