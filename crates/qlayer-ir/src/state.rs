//! Amplitude vectors.

use std::fmt;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::matrix::{format_complex, qubits_for_dim};

/// A state vector over `2^n` classical basis states.
///
/// Index `i` is the basis state whose binary expansion (most significant bit
/// first) gives the value of each qubit in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawStateVector")]
pub struct StateVector {
    amplitudes: Vec<Complex64>,
}

#[derive(Deserialize)]
struct RawStateVector {
    amplitudes: Vec<Complex64>,
}

impl TryFrom<RawStateVector> for StateVector {
    type Error = IrError;

    fn try_from(raw: RawStateVector) -> IrResult<Self> {
        StateVector::from_amplitudes(raw.amplitudes)
    }
}

impl StateVector {
    /// Create a state from complex amplitudes.
    ///
    /// The length must be a power of two of at least 2. Normalisation is not
    /// checked here; measurement does that.
    pub fn from_amplitudes(amplitudes: Vec<Complex64>) -> IrResult<Self> {
        if amplitudes.is_empty() {
            return Err(IrError::EmptyState);
        }
        qubits_for_dim(amplitudes.len())?;
        Ok(Self { amplitudes })
    }

    /// Create a state from real amplitudes.
    pub fn from_real(amplitudes: &[f64]) -> IrResult<Self> {
        Self::from_amplitudes(
            amplitudes
                .iter()
                .map(|&x| Complex64::new(x, 0.0))
                .collect(),
        )
    }

    /// Wrap amplitudes whose length is already known to be valid.
    pub(crate) fn from_raw(amplitudes: Vec<Complex64>) -> Self {
        Self { amplitudes }
    }

    /// The classical `0` qubit, `[1, 0]`.
    pub fn zero() -> Self {
        Self::from_raw(vec![Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)])
    }

    /// The classical `1` qubit, `[0, 1]`.
    pub fn one() -> Self {
        Self::from_raw(vec![Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0)])
    }

    /// Computational basis state `|index⟩` over `num_qubits` qubits.
    pub fn basis(num_qubits: u32, index: usize) -> IrResult<Self> {
        let dim = 1usize
            .checked_shl(num_qubits)
            .ok_or(IrError::NotPowerOfTwo { dim: 0 })?;
        qubits_for_dim(dim)?;
        if index >= dim {
            return Err(IrError::DimensionMismatch {
                context: "basis index".into(),
                expected: dim,
                got: index,
            });
        }
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); dim];
        amplitudes[index] = Complex64::new(1.0, 0.0);
        Ok(Self { amplitudes })
    }

    /// Dimension (`2^n`).
    #[inline]
    pub fn dim(&self) -> usize {
        self.amplitudes.len()
    }

    /// Number of qubits.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        self.amplitudes.len().trailing_zeros()
    }

    /// The amplitudes.
    #[inline]
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Tensor product `self ⊗ other`.
    pub fn kron(&self, other: &Self) -> Self {
        let amplitudes = self
            .amplitudes
            .iter()
            .flat_map(|a| other.amplitudes.iter().map(move |b| a * b))
            .collect();
        Self { amplitudes }
    }

    /// Probability of each basis state (squared magnitude of each amplitude).
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(Complex64::norm_sqr).collect()
    }

    /// Sum of the probabilities.
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(Complex64::norm_sqr).sum()
    }

    /// Element-wise comparison within `tolerance`.
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        self.dim() == other.dim()
            && self
                .amplitudes
                .iter()
                .zip(&other.amplitudes)
                .all(|(a, b)| (a - b).norm() <= tolerance)
    }
}

impl fmt::Display for StateVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<String> = self
            .amplitudes
            .iter()
            .map(|c| format_complex(*c))
            .collect();
        write!(f, "[{}]", cells.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classical_qubits() {
        assert_eq!(StateVector::zero(), StateVector::from_real(&[1.0, 0.0]).unwrap());
        assert_eq!(StateVector::one(), StateVector::from_real(&[0.0, 1.0]).unwrap());
        assert_eq!(StateVector::zero().num_qubits(), 1);
    }

    #[test]
    fn test_rejects_bad_lengths() {
        assert_eq!(StateVector::from_real(&[]), Err(IrError::EmptyState));
        assert_eq!(
            StateVector::from_real(&[1.0]),
            Err(IrError::NotPowerOfTwo { dim: 1 })
        );
        assert_eq!(
            StateVector::from_real(&[1.0, 0.0, 0.0]),
            Err(IrError::NotPowerOfTwo { dim: 3 })
        );
    }

    #[test]
    fn test_kron_orders_first_operand_high() {
        // |1⟩ ⊗ |0⟩ = |10⟩ = index 2
        let s = StateVector::one().kron(&StateVector::zero());
        assert_eq!(s, StateVector::basis(2, 2).unwrap());
        assert_eq!(s.num_qubits(), 2);
    }

    #[test]
    fn test_basis_out_of_range() {
        assert!(StateVector::basis(2, 4).is_err());
        assert!(StateVector::basis(0, 0).is_err());
    }

    #[test]
    fn test_probabilities_use_squared_magnitude() {
        let h = 1.0 / 2.0_f64.sqrt();
        let s = StateVector::from_amplitudes(vec![
            Complex64::new(h, 0.0),
            Complex64::new(0.0, -h),
        ])
        .unwrap();
        let p = s.probabilities();
        assert!((p[0] - 0.5).abs() < 1e-12);
        assert!((p[1] - 0.5).abs() < 1e-12);
        assert!((s.norm_sqr() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_display() {
        assert_eq!(StateVector::one().to_string(), "[0.0000, 1.0000]");
    }

    #[test]
    fn test_deserialize_validates_length() {
        assert!(serde_json::from_str::<StateVector>(r#"{"amplitudes":[]}"#).is_err());
        assert!(serde_json::from_str::<StateVector>(r#"{"amplitudes":[[1.0,0.0]]}"#).is_err());

        let json = serde_json::to_string(&StateVector::one()).unwrap();
        assert_eq!(serde_json::from_str::<StateVector>(&json).unwrap(), StateVector::one());
    }
}
