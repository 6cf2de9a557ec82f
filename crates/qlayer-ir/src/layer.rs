//! Time-step layers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::Gate;
use crate::matrix::Matrix;

/// Gates applied simultaneously to disjoint qubit blocks in one time step.
///
/// The first gate acts on the most significant block of qubits. Because the
/// Kronecker product is not commutative, reordering gates changes which
/// qubits each gate touches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLayer")]
pub struct Layer {
    gates: Vec<Gate>,
    /// Composite operator, filled in by [`Layer::compile`].
    #[serde(skip)]
    matrix: Option<Matrix>,
}

#[derive(Deserialize)]
struct RawLayer {
    gates: Vec<Gate>,
}

impl TryFrom<RawLayer> for Layer {
    type Error = IrError;

    fn try_from(raw: RawLayer) -> IrResult<Self> {
        Layer::new(raw.gates)
    }
}

impl Layer {
    /// Create a layer from gates in qubit order.
    pub fn new(gates: impl IntoIterator<Item = Gate>) -> IrResult<Self> {
        let gates: Vec<Gate> = gates.into_iter().collect();
        if gates.is_empty() {
            return Err(IrError::EmptyLayer);
        }
        Ok(Self {
            gates,
            matrix: None,
        })
    }

    /// The gates, in qubit order.
    #[inline]
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Total qubit width (sum of gate widths).
    pub fn num_qubits(&self) -> u32 {
        self.gates.iter().map(Gate::num_qubits).sum()
    }

    /// Left fold of the Kronecker product over the gate matrices.
    pub fn eval(&self) -> Matrix {
        kron_fold(&self.gates)
    }

    /// Evaluate and cache the composite operator. Later calls reuse the cache.
    pub fn compile(&mut self) -> &Matrix {
        self.matrix.get_or_insert_with(|| kron_fold(&self.gates))
    }

    /// The cached operator, if [`Layer::compile`] has run.
    #[inline]
    pub fn matrix(&self) -> Option<&Matrix> {
        self.matrix.as_ref()
    }

    /// Whether the operator is cached.
    #[inline]
    pub fn is_compiled(&self) -> bool {
        self.matrix.is_some()
    }
}

fn kron_fold(gates: &[Gate]) -> Matrix {
    match gates.split_first() {
        Some((first, rest)) => rest
            .iter()
            .fold(first.matrix().clone(), |acc, gate| acc.kron(gate.matrix())),
        // Unreachable through `Layer::new`; the 1x1 identity is the fold's unit.
        None => Matrix::identity(1),
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.gates.iter().map(Gate::name).collect();
        write!(f, "{}", names.join(" ⊗ "))
    }
}
