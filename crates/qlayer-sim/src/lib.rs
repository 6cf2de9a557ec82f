//! `qlayer-sim`: compile and run layered quantum circuits.
//!
//! A [`Circuit`] is a list of input qubits, an ordered list of
//! [`Layer`]s and an optional terminal [`Measure`]. Compiling validates the
//! widths, checks every gate for unitarity and caches each layer's composite
//! operator; running pushes the input state through the layers and either
//! returns the final [`StateVector`] or a sampled bit string.
//!
//! # Quick start
//!
//! ```rust
//! use qlayer_sim::{Circuit, Gate, Matrix, StateVector};
//!
//! // Deutsch's algorithm with a constant oracle f(x) = 1.
//! let uf = Matrix::from_real_rows(&[
//!     [0.0, 1.0, 0.0, 0.0],
//!     [1.0, 0.0, 0.0, 0.0],
//!     [0.0, 0.0, 0.0, 1.0],
//!     [0.0, 0.0, 1.0, 0.0],
//! ])
//! .unwrap();
//!
//! let mut circuit = Circuit::new();
//! circuit.add_inputs([StateVector::zero(), StateVector::zero()]);
//! circuit
//!     .add_layer([Gate::id(), Gate::not()]).unwrap()
//!     .add_layer([Gate::hadamard(2).unwrap()]).unwrap()
//!     .add_layer([Gate::oracle(uf).unwrap()]).unwrap()
//!     .add_layer([Gate::hadamard(1).unwrap(), Gate::id()]).unwrap()
//!     .add_measure();
//!
//! let output = circuit.run().unwrap();
//! let sample = output.as_sample().unwrap();
//! assert!(sample.starts_with('0'), "constant oracle measures 0 on the first qubit");
//! ```

pub mod circuit;
pub mod config;
pub mod counts;
pub mod error;
pub mod input;
pub mod measure;

pub use circuit::{Circuit, RunOutput};
pub use config::SimConfig;
pub use counts::Counts;
pub use error::{SimError, SimResult};
pub use input::{FeedDict, QubitInput};
pub use measure::{Measure, outcome_to_bitstring};
pub use qlayer_ir::{Gate, GateKind, IrError, Layer, Matrix, StateVector};
