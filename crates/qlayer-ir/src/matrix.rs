//! Dense complex operators.
//!
//! Circuits in qlayer are small (a handful of qubits), so every operator is a
//! dense `2^n × 2^n` matrix stored row-major. The two operations everything
//! else is built from are the Kronecker product (combining operators on
//! disjoint qubit blocks) and the matrix-vector product (applying a layer).

use std::fmt;
use std::ops::{Index, IndexMut};

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::state::StateVector;

/// Default tolerance for unitarity checks and approximate comparisons.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);

/// A dense square complex matrix in row-major order.
///
/// Deserialization goes through [`Matrix::from_row_major`], so the data length
/// always matches the dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMatrix")]
pub struct Matrix {
    /// Side length.
    dim: usize,
    /// Elements, row-major, `dim * dim` long.
    data: Vec<Complex64>,
}

#[derive(Deserialize)]
struct RawMatrix {
    dim: usize,
    data: Vec<Complex64>,
}

impl TryFrom<RawMatrix> for Matrix {
    type Error = IrError;

    fn try_from(raw: RawMatrix) -> IrResult<Self> {
        Matrix::from_row_major(raw.dim, raw.data)
    }
}

impl Matrix {
    /// Create a `dim × dim` zero matrix.
    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            data: vec![ZERO; dim * dim],
        }
    }

    /// Create the `dim × dim` identity.
    pub fn identity(dim: usize) -> Self {
        let mut matrix = Self::zeros(dim);
        for i in 0..dim {
            matrix.data[i * dim + i] = ONE;
        }
        matrix
    }

    /// Build a matrix from row-major data.
    pub fn from_row_major(dim: usize, data: Vec<Complex64>) -> IrResult<Self> {
        if data.len() != dim * dim {
            return Err(IrError::DimensionMismatch {
                context: "row-major matrix data".into(),
                expected: dim * dim,
                got: data.len(),
            });
        }
        Ok(Self { dim, data })
    }

    /// Build a matrix from a list of rows.
    pub fn from_rows(rows: Vec<Vec<Complex64>>) -> IrResult<Self> {
        let dim = rows.len();
        let mut data = Vec::with_capacity(dim * dim);
        for row in rows {
            if row.len() != dim {
                return Err(IrError::NotSquare {
                    rows: dim,
                    cols: row.len(),
                });
            }
            data.extend(row);
        }
        Ok(Self { dim, data })
    }

    /// Build a matrix from rows of real entries.
    ///
    /// ```rust
    /// use qlayer_ir::Matrix;
    ///
    /// let swap = Matrix::from_real_rows(&[
    ///     [1.0, 0.0, 0.0, 0.0],
    ///     [0.0, 0.0, 1.0, 0.0],
    ///     [0.0, 1.0, 0.0, 0.0],
    ///     [0.0, 0.0, 0.0, 1.0],
    /// ])
    /// .unwrap();
    /// assert_eq!(swap.dim(), 4);
    /// assert!(swap.is_unitary(1e-9));
    /// ```
    pub fn from_real_rows<R: AsRef<[f64]>>(rows: &[R]) -> IrResult<Self> {
        let rows = rows
            .iter()
            .map(|row| {
                row.as_ref()
                    .iter()
                    .map(|&x| Complex64::new(x, 0.0))
                    .collect()
            })
            .collect();
        Self::from_rows(rows)
    }

    /// Side length of the matrix.
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of qubits this operator acts on (log2 of the dimension).
    pub fn num_qubits(&self) -> IrResult<u32> {
        qubits_for_dim(self.dim)
    }

    /// Row-major view of the elements.
    #[inline]
    pub fn as_slice(&self) -> &[Complex64] {
        &self.data
    }

    /// Element at `(row, col)`, if in range.
    pub fn get(&self, row: usize, col: usize) -> Option<Complex64> {
        if row < self.dim && col < self.dim {
            Some(self.data[row * self.dim + col])
        } else {
            None
        }
    }

    /// Kronecker product `self ⊗ other`.
    ///
    /// `self` occupies the most significant block of the result.
    pub fn kron(&self, other: &Self) -> Self {
        let dim = self.dim * other.dim;
        let mut data = vec![ZERO; dim * dim];
        for i in 0..self.dim {
            for j in 0..self.dim {
                let a = self.data[i * self.dim + j];
                for k in 0..other.dim {
                    let row = (i * other.dim + k) * dim;
                    for l in 0..other.dim {
                        data[row + j * other.dim + l] = a * other.data[k * other.dim + l];
                    }
                }
            }
        }
        Self { dim, data }
    }

    /// Matrix product `self · other`.
    pub fn matmul(&self, other: &Self) -> IrResult<Self> {
        if self.dim != other.dim {
            return Err(IrError::DimensionMismatch {
                context: "matrix product".into(),
                expected: self.dim,
                got: other.dim,
            });
        }
        let n = self.dim;
        let mut data = vec![ZERO; n * n];
        for i in 0..n {
            for k in 0..n {
                let a = self.data[i * n + k];
                for j in 0..n {
                    data[i * n + j] += a * other.data[k * n + j];
                }
            }
        }
        Ok(Self { dim: n, data })
    }

    /// Matrix-vector product `self · state`.
    pub fn apply(&self, state: &StateVector) -> IrResult<StateVector> {
        if state.dim() != self.dim {
            return Err(IrError::DimensionMismatch {
                context: "matrix-vector product".into(),
                expected: self.dim,
                got: state.dim(),
            });
        }
        let amplitudes = state.amplitudes();
        let out: Vec<Complex64> = self
            .data
            .chunks_exact(self.dim)
            .map(|row| {
                row.iter()
                    .zip(amplitudes)
                    .map(|(m, a)| m * a)
                    .sum::<Complex64>()
            })
            .collect();
        Ok(StateVector::from_raw(out))
    }

    /// Conjugate transpose.
    pub fn dagger(&self) -> Self {
        let n = self.dim;
        let mut data = vec![ZERO; n * n];
        for i in 0..n {
            for j in 0..n {
                data[j * n + i] = self.data[i * n + j].conj();
            }
        }
        Self { dim: n, data }
    }

    /// Largest entry of `|U†U - I|`.
    ///
    /// Non-finite entries report `f64::INFINITY`, so they fail every
    /// tolerance check.
    pub fn unitarity_deviation(&self) -> f64 {
        let n = self.dim;
        let mut worst = 0.0_f64;
        for i in 0..n {
            for j in 0..n {
                let mut acc = ZERO;
                for k in 0..n {
                    acc += self.data[k * n + i].conj() * self.data[k * n + j];
                }
                let expected = if i == j { ONE } else { ZERO };
                let deviation = (acc - expected).norm();
                if !deviation.is_finite() {
                    return f64::INFINITY;
                }
                worst = worst.max(deviation);
            }
        }
        worst
    }

    /// Check `U†U = I` within `tolerance`.
    pub fn is_unitary(&self, tolerance: f64) -> bool {
        self.unitarity_deviation() <= tolerance
    }

    /// Element-wise comparison within `tolerance`.
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        self.dim == other.dim
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(a, b)| (a - b).norm() <= tolerance)
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = Complex64;

    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        &self.data[row * self.dim + col]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Self::Output {
        &mut self.data[row * self.dim + col]
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.data.chunks(self.dim.max(1)).enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let cells: Vec<String> = row.iter().map(|c| format_complex(*c)).collect();
            write!(f, "[{}]", cells.join(", "))?;
        }
        Ok(())
    }
}

/// Number of qubits spanned by a power-of-two dimension.
pub(crate) fn qubits_for_dim(dim: usize) -> IrResult<u32> {
    if dim >= 2 && dim.is_power_of_two() {
        Ok(dim.trailing_zeros())
    } else {
        Err(IrError::NotPowerOfTwo { dim })
    }
}

/// Compact rendering of a complex number for diagnostics.
pub(crate) fn format_complex(c: Complex64) -> String {
    // -0.0 prints as "-0.0000"
    let re = if c.re == 0.0 { 0.0 } else { c.re };
    let im = if c.im == 0.0 { 0.0 } else { c.im };
    if !re.is_finite() || !im.is_finite() {
        let sign = if im.is_sign_negative() { '-' } else { '+' };
        return if im == 0.0 {
            format_part(re)
        } else {
            format!("{}{sign}{}i", format_part(re), format_part(im.abs()))
        };
    }
    if im.abs() < 1e-12 {
        format!("{re:.4}")
    } else if re.abs() < 1e-12 {
        format!("{im:.4}i")
    } else {
        format!("{re:.4}{im:+.4}i")
    }
}

fn format_part(x: f64) -> String {
    if x.is_finite() {
        format!("{x:.4}")
    } else {
        format!("{x}")
    }
}
