//! Quantum gate types.

use std::fmt;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::matrix::{DEFAULT_TOLERANCE, Matrix};

/// The built-in gate families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateKind {
    /// Single-qubit identity.
    Id,
    /// Single-qubit bit flip.
    Not,
    /// n-fold tensor power of the single-qubit Hadamard.
    Hadamard(u32),
    /// Caller-supplied operator checked for unitarity on construction.
    Oracle,
    /// Caller-supplied operator stored verbatim; unitarity is left to compile.
    Custom,
}

impl GateKind {
    /// Default display name.
    pub fn default_name(&self) -> String {
        match self {
            GateKind::Id => "Id".into(),
            GateKind::Not => "Not".into(),
            GateKind::Hadamard(1) => "H".into(),
            GateKind::Hadamard(n) => format!("H^{n}"),
            GateKind::Oracle => "Oracle".into(),
            GateKind::Custom => "Custom".into(),
        }
    }
}

/// A fixed operator on one or more qubits.
///
/// The matrix is square with a power-of-two side; that is checked at
/// construction. Unitarity is checked by [`Gate::oracle`] and again when a
/// circuit compiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGate")]
pub struct Gate {
    kind: GateKind,
    name: String,
    num_qubits: u32,
    matrix: Matrix,
}

#[derive(Deserialize)]
struct RawGate {
    kind: GateKind,
    name: String,
    num_qubits: u32,
    matrix: Matrix,
}

impl TryFrom<RawGate> for Gate {
    type Error = IrError;

    /// Rebuild through [`Gate::new`] so the stored width always matches the
    /// matrix.
    fn try_from(raw: RawGate) -> IrResult<Self> {
        let gate = Gate::new(raw.matrix, raw.name)?;
        if raw.num_qubits != gate.num_qubits {
            return Err(IrError::DimensionMismatch {
                context: format!("qubit width of gate '{}'", gate.name),
                expected: gate.num_qubits as usize,
                got: raw.num_qubits as usize,
            });
        }
        Ok(Self {
            kind: raw.kind,
            ..gate
        })
    }
}

impl Gate {
    /// Wrap an arbitrary operator.
    ///
    /// Only the shape is validated. Use [`Gate::oracle`] to also require
    /// unitarity up front.
    pub fn new(matrix: Matrix, name: impl Into<String>) -> IrResult<Self> {
        let num_qubits = matrix.num_qubits()?;
        Ok(Self {
            kind: GateKind::Custom,
            name: name.into(),
            num_qubits,
            matrix,
        })
    }

    /// Single-qubit identity.
    pub fn id() -> Self {
        Self::builtin(GateKind::Id, Matrix::identity(2), 1)
    }

    /// Single-qubit NOT, `[[0, 1], [1, 0]]`.
    pub fn not() -> Self {
        let mut matrix = Matrix::zeros(2);
        matrix[(0, 1)] = Complex64::new(1.0, 0.0);
        matrix[(1, 0)] = Complex64::new(1.0, 0.0);
        Self::builtin(GateKind::Not, matrix, 1)
    }

    /// `H^{⊗n}`, built by repeated Kronecker products of the single-qubit
    /// Hadamard `1/√2 · [[1, 1], [1, -1]]`.
    pub fn hadamard(n_bits: u32) -> IrResult<Self> {
        if n_bits == 0 {
            return Err(IrError::ZeroWidthHadamard);
        }
        let s = 1.0 / 2.0_f64.sqrt();
        let mut h = Matrix::zeros(2);
        h[(0, 0)] = Complex64::new(s, 0.0);
        h[(0, 1)] = Complex64::new(s, 0.0);
        h[(1, 0)] = Complex64::new(s, 0.0);
        h[(1, 1)] = Complex64::new(-s, 0.0);

        let mut matrix = h.clone();
        for _ in 1..n_bits {
            matrix = matrix.kron(&h);
        }
        Ok(Self::builtin(GateKind::Hadamard(n_bits), matrix, n_bits))
    }

    /// A caller-supplied unitary, named `Oracle` unless renamed with
    /// [`Gate::with_name`].
    ///
    /// # Errors
    ///
    /// Fails if the matrix is not square with a power-of-two side, or if
    /// `U†U` deviates from the identity by more than `1e-9`.
    pub fn oracle(matrix: Matrix) -> IrResult<Self> {
        let gate = Self::new(matrix, GateKind::Oracle.default_name())?;
        let deviation = gate.unitarity_deviation();
        if deviation > DEFAULT_TOLERANCE {
            return Err(IrError::NonUnitaryGate {
                gate_name: gate.name,
                deviation,
            });
        }
        Ok(Self {
            kind: GateKind::Oracle,
            ..gate
        })
    }

    fn builtin(kind: GateKind, matrix: Matrix, num_qubits: u32) -> Self {
        Self {
            kind,
            name: kind.default_name(),
            num_qubits,
            matrix,
        }
    }

    /// Replace the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// The gate family.
    #[inline]
    pub fn kind(&self) -> GateKind {
        self.kind
    }

    /// Display name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The operator.
    #[inline]
    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    /// Side length of the operator.
    #[inline]
    pub fn dim(&self) -> usize {
        self.matrix.dim()
    }

    /// Number of qubits the gate acts on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Largest entry of `|U†U - I|`.
    pub fn unitarity_deviation(&self) -> f64 {
        self.matrix.unitarity_deviation()
    }

    /// Check unitarity within `tolerance`.
    pub fn is_unitary(&self, tolerance: f64) -> bool {
        self.matrix.is_unitary(tolerance)
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}q]", self.name, self.num_qubits)
    }
}
