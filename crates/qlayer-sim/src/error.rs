//! Error types for the sim crate.

use thiserror::Error;

/// Errors produced while compiling, running or measuring a circuit.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimError {
    /// Widths or vector sizes do not line up.
    #[error("Dimension mismatch in {context}: expected {expected}, got {got}")]
    DimensionMismatch {
        /// What was being checked.
        context: String,
        /// Expected size.
        expected: usize,
        /// Actual size.
        got: usize,
    },

    /// A gate in a layer is not unitary within the configured tolerance.
    #[error("Gate '{gate_name}' in layer {layer} is not unitary (max deviation {deviation:.3e})")]
    NonUnitaryGate {
        /// Index of the layer holding the gate.
        layer: usize,
        /// Name of the gate.
        gate_name: String,
        /// Largest entry of |U†U - I|.
        deviation: f64,
    },

    /// Measurement was asked to sample from a state whose probabilities do
    /// not sum to 1.
    #[error("State is not normalised: probabilities sum to {norm}")]
    UnnormalizedState {
        /// Sum of squared magnitudes.
        norm: f64,
    },

    /// A placeholder qubit has no value in the feed dict.
    #[error("Unbound qubit: no value fed for placeholder '{0}'")]
    MissingInputBinding(String),

    /// The circuit has no input qubits.
    #[error("Circuit has no inputs")]
    NoInputs,

    /// Shot count must be at least 1.
    #[error("shots must be at least 1, got {0}")]
    InvalidShots(u32),

    /// Circuit is wider than the configured limit.
    #[error("Circuit has {num_qubits} qubits but the limit is {max_qubits}")]
    CircuitTooLarge {
        /// Qubits in the circuit.
        num_qubits: usize,
        /// Configured maximum.
        max_qubits: usize,
    },

    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Gate or layer construction failed.
    #[error("Circuit IR error: {0}")]
    Ir(#[from] qlayer_ir::IrError),
}

/// Result type for circuit operations.
pub type SimResult<T> = Result<T, SimError>;
