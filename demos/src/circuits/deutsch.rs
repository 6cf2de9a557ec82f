//! Deutsch's algorithm circuit generator.
//!
//! Deutsch's algorithm decides whether a one-bit function
//! f: {0, 1} → {0, 1} is constant or balanced with a single query to its
//! reversible oracle `Uf: |x, y⟩ → |x, y ⊕ f(x)⟩`.

use std::fmt;
use std::str::FromStr;

use num_complex::Complex64;
use qlayer_sim::{Circuit, Gate, Matrix, SimConfig, SimResult, StateVector};

/// The four one-bit functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Oracle {
    /// f(x) = 0
    ConstantZero,
    /// f(x) = 1
    ConstantOne,
    /// f(x) = x
    BalancedIdentity,
    /// f(x) = ¬x
    BalancedNot,
}

impl Oracle {
    /// All oracles, constants first.
    pub const ALL: [Oracle; 4] = [
        Oracle::ConstantZero,
        Oracle::ConstantOne,
        Oracle::BalancedIdentity,
        Oracle::BalancedNot,
    ];

    /// Evaluate f classically.
    pub fn eval(self, x: bool) -> bool {
        match self {
            Oracle::ConstantZero => false,
            Oracle::ConstantOne => true,
            Oracle::BalancedIdentity => x,
            Oracle::BalancedNot => !x,
        }
    }

    /// Whether f is constant.
    pub fn is_constant(self) -> bool {
        self.eval(false) == self.eval(true)
    }

    /// The 4x4 permutation matrix of `Uf`, basis order |x y⟩ with x as the
    /// most significant bit.
    pub fn matrix(self) -> Matrix {
        let mut uf = Matrix::zeros(4);
        for x in 0..2_usize {
            for y in 0..2_usize {
                let fx = usize::from(self.eval(x == 1));
                uf[((x << 1) | (y ^ fx), (x << 1) | y)] = Complex64::new(1.0, 0.0);
            }
        }
        uf
    }

    /// `Uf` as a gate.
    pub fn gate(self) -> SimResult<Gate> {
        Ok(Gate::oracle(self.matrix())?.with_name(format!("U[{self}]")))
    }
}

impl fmt::Display for Oracle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Oracle::ConstantZero => "constant-zero",
            Oracle::ConstantOne => "constant-one",
            Oracle::BalancedIdentity => "balanced-identity",
            Oracle::BalancedNot => "balanced-not",
        };
        f.write_str(name)
    }
}

impl FromStr for Oracle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Oracle::ALL
            .into_iter()
            .find(|oracle| oracle.to_string() == s)
            .ok_or_else(|| format!("unknown oracle '{s}'"))
    }
}

/// Build the Deutsch circuit for `oracle`.
///
/// Both qubits start in |0⟩; the second is flipped to |1⟩, both pass
/// through H^{⊗2}, then `Uf`, then H on the first qubit, and both are
/// measured. The first bit reads 0 for a constant f and 1 for a balanced one.
pub fn deutsch_circuit(oracle: Oracle, config: SimConfig) -> SimResult<Circuit> {
    let mut circuit = Circuit::with_config(config);
    circuit.add_inputs([StateVector::zero(), StateVector::zero()]);
    circuit
        .add_layer([Gate::id(), Gate::not()])?
        .add_layer([Gate::hadamard(2)?])?
        .add_layer([oracle.gate()?])?
        .add_layer([Gate::hadamard(1)?, Gate::id()])?
        .add_measure();
    Ok(circuit)
}

/// Read the verdict off a sampled bit string: `true` if constant.
pub fn is_constant_outcome(sample: &str) -> bool {
    sample.starts_with('0')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oracle_matrices_are_unitary() {
        for oracle in Oracle::ALL {
            assert!(oracle.matrix().is_unitary(1e-12), "{oracle}");
        }
    }

    #[test]
    fn test_constant_one_matrix() {
        let expected = Matrix::from_real_rows(&[
            [0.0, 1.0, 0.0, 0.0],
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
            [0.0, 0.0, 1.0, 0.0],
        ])
        .unwrap();
        assert_eq!(Oracle::ConstantOne.matrix(), expected);
    }

    #[test]
    fn test_oracle_parse() {
        assert_eq!("balanced-not".parse::<Oracle>(), Ok(Oracle::BalancedNot));
        assert!("random".parse::<Oracle>().is_err());
    }

    #[test]
    fn test_circuit_shape() {
        let circuit = deutsch_circuit(Oracle::ConstantOne, SimConfig::default()).unwrap();
        assert_eq!(circuit.num_qubits(), 2);
        assert_eq!(circuit.num_layers(), 4);
        assert!(circuit.has_measure());
    }
}
