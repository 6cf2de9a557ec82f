//! qlayer Gate and Layer Model
//!
//! This crate provides the operator data structures that qlayer circuits are
//! compiled from. It has no notion of execution; see `qlayer-sim` for the
//! circuit engine.
//!
//! # Core Components
//!
//! - **Operators**: [`Matrix`], a dense row-major complex matrix with the
//!   Kronecker product, matrix products and unitarity checks
//! - **States**: [`StateVector`] for qubit inputs and intermediate states
//! - **Gates**: [`Gate`] wrapping a fixed operator and a display name, with the
//!   [`GateKind`] families `Id`, `Not`, `Hadamard(n)`, `Oracle` and `Custom`
//! - **Layers**: [`Layer`], an ordered group of gates applied in one time step
//!
//! # Example: a two-qubit layer
//!
//! ```rust
//! use qlayer_ir::{Gate, Layer, StateVector};
//!
//! // Identity on the first qubit, NOT on the second.
//! let layer = Layer::new([Gate::id(), Gate::not()]).unwrap();
//! assert_eq!(layer.num_qubits(), 2);
//!
//! // |00⟩ → |01⟩
//! let input = StateVector::zero().kron(&StateVector::zero());
//! let output = layer.eval().apply(&input).unwrap();
//! assert_eq!(output, StateVector::basis(2, 0b01).unwrap());
//! ```
//!
//! # Qubit ordering
//!
//! Index `i` of a state vector is read as a bit string with the first qubit as
//! the most significant bit. In a layer the first gate acts on the most
//! significant block, so `Layer::new([a, b])` evaluates to `a ⊗ b`.

pub mod error;
pub mod gate;
pub mod layer;
pub mod matrix;
pub mod state;

pub use error::{IrError, IrResult};
pub use gate::{Gate, GateKind};
pub use layer::Layer;
pub use matrix::{DEFAULT_TOLERANCE, Matrix};
pub use state::StateVector;
