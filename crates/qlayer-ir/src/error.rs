//! Error types for the IR crate.

use thiserror::Error;

/// Errors that can occur while building gates, layers and operators.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum IrError {
    /// A matrix row does not match the number of rows.
    #[error("Matrix is not square: {rows} rows but a row of length {cols}")]
    NotSquare {
        /// Number of rows supplied.
        rows: usize,
        /// Length of the offending row.
        cols: usize,
    },

    /// An operator or vector dimension is not a power of two (>= 2).
    #[error("Dimension {dim} is not a power of two of at least 2")]
    NotPowerOfTwo {
        /// The offending dimension.
        dim: usize,
    },

    /// A gate matrix is not unitary within tolerance.
    #[error("Gate '{gate_name}' is not unitary (max deviation from identity {deviation:.3e})")]
    NonUnitaryGate {
        /// Name of the gate.
        gate_name: String,
        /// Largest entry of |U†U - I|.
        deviation: f64,
    },

    /// A layer was built from zero gates.
    #[error("Layer must contain at least one gate")]
    EmptyLayer,

    /// A Hadamard gate was requested over zero bits.
    #[error("Hadamard gate requires at least one bit")]
    ZeroWidthHadamard,

    /// Two operands have incompatible sizes.
    #[error("Dimension mismatch in {context}: expected {expected}, got {got}")]
    DimensionMismatch {
        /// What was being combined.
        context: String,
        /// Expected size.
        expected: usize,
        /// Actual size.
        got: usize,
    },

    /// A state vector was built from no amplitudes.
    #[error("State vector has no amplitudes")]
    EmptyState,
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
