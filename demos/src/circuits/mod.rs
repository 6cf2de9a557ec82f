//! Quantum circuit generators for demos.

pub mod deutsch;

pub use deutsch::{Oracle, deutsch_circuit, is_constant_outcome};
