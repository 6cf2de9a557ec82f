//! Measurement sampling.

use qlayer_ir::StateVector;
use rand::Rng;
use tracing::trace;

use crate::counts::Counts;
use crate::error::{SimError, SimResult};

/// Default tolerance on `|Σ p - 1|` accepted by [`Measure`].
pub const DEFAULT_NORMALIZATION_TOLERANCE: f64 = 1e-9;

/// Terminal step that samples a classical bit string from a state.
///
/// Probabilities are the squared magnitudes of the amplitudes. The state must
/// already be normalised; a state that is not is rejected rather than
/// renormalised, since it usually means an upstream operator was not unitary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measure {
    tolerance: f64,
}

impl Default for Measure {
    fn default() -> Self {
        Self::new(DEFAULT_NORMALIZATION_TOLERANCE)
    }
}

impl Measure {
    /// Create a measurement accepting states whose probabilities sum to 1
    /// within `tolerance`.
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    /// The normalisation tolerance.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Probability of each basis state, after checking normalisation.
    pub fn probabilities(&self, state: &StateVector) -> SimResult<Vec<f64>> {
        let probabilities = state.probabilities();
        let norm: f64 = probabilities.iter().sum();
        // NaN norms and NaN tolerances both fail this comparison
        let normalized = (norm - 1.0).abs() <= self.tolerance;
        if !normalized {
            return Err(SimError::UnnormalizedState { norm });
        }
        Ok(probabilities)
    }

    /// Draw one outcome and format it as an n-bit string, first qubit leftmost.
    pub fn sample<R: Rng + ?Sized>(&self, state: &StateVector, rng: &mut R) -> SimResult<String> {
        let probabilities = self.probabilities(state)?;
        let outcome = draw(&probabilities, rng);
        trace!(outcome, "sampled measurement outcome");
        Ok(outcome_to_bitstring(outcome, state.num_qubits()))
    }

    /// Draw `shots` outcomes into a histogram.
    pub fn sample_counts<R: Rng + ?Sized>(
        &self,
        state: &StateVector,
        shots: u32,
        rng: &mut R,
    ) -> SimResult<Counts> {
        if shots == 0 {
            return Err(SimError::InvalidShots(shots));
        }
        let probabilities = self.probabilities(state)?;
        let num_qubits = state.num_qubits();
        let mut counts = Counts::new();
        for _ in 0..shots {
            let outcome = draw(&probabilities, rng);
            counts.insert(outcome_to_bitstring(outcome, num_qubits), 1);
        }
        Ok(counts)
    }
}

/// Format a basis index as a zero-padded bit string, most significant bit first.
pub fn outcome_to_bitstring(outcome: usize, num_qubits: u32) -> String {
    format!("{:0width$b}", outcome, width = num_qubits as usize)
}

/// Inverse-CDF draw. Zero-probability outcomes are never returned.
fn draw<R: Rng + ?Sized>(probabilities: &[f64], rng: &mut R) -> usize {
    let r: f64 = rng.r#gen();

    let mut cumulative = 0.0;
    let mut last_possible = 0;
    for (i, &p) in probabilities.iter().enumerate() {
        if p > 0.0 {
            last_possible = i;
        }
        cumulative += p;
        if r < cumulative {
            return i;
        }
    }

    // r fell past the accumulated mass through rounding
    last_possible
}
