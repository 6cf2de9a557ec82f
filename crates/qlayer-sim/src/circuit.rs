//! Layered circuit: compilation and execution.

use std::fmt;

use qlayer_ir::{Gate, Layer, StateVector};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, instrument};

use crate::config::SimConfig;
use crate::counts::Counts;
use crate::error::{SimError, SimResult};
use crate::input::{FeedDict, QubitInput};
use crate::measure::Measure;

/// What a run produced.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutput {
    /// Final state vector (no measurement registered).
    State(StateVector),
    /// Sampled bit string (measurement registered).
    Sample(String),
}

impl RunOutput {
    /// The state, if no measurement was registered.
    pub fn as_state(&self) -> Option<&StateVector> {
        match self {
            RunOutput::State(state) => Some(state),
            RunOutput::Sample(_) => None,
        }
    }

    /// The sample, if a measurement was registered.
    pub fn as_sample(&self) -> Option<&str> {
        match self {
            RunOutput::State(_) => None,
            RunOutput::Sample(sample) => Some(sample),
        }
    }
}

impl fmt::Display for RunOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutput::State(state) => write!(f, "{state}"),
            RunOutput::Sample(sample) => write!(f, "{sample}"),
        }
    }
}

/// A quantum circuit: input qubits passed through an ordered list of layers,
/// optionally followed by a measurement.
///
/// ```rust
/// use qlayer_sim::{Circuit, Gate, StateVector};
///
/// let mut circuit = Circuit::new();
/// circuit.add_inputs([StateVector::one()]);
/// circuit.add_layer([Gate::not()]).unwrap();
///
/// let output = circuit.run().unwrap();
/// assert_eq!(output.as_state(), Some(&StateVector::zero()));
/// ```
///
/// Compilation builds the input state and caches each layer's composite
/// operator. It runs once, on the first [`Circuit::run`] or an explicit
/// [`Circuit::compile`]; later runs reuse the cache. Adding inputs or layers
/// drops the compiled flag so the next run recompiles.
pub struct Circuit {
    inputs: Vec<QubitInput>,
    layers: Vec<Layer>,
    measure: Option<Measure>,
    /// Tensor product of the inputs, when all of them are constants.
    input_state: Option<StateVector>,
    compiled: bool,
    state: Option<StateVector>,
    sample: Option<String>,
    config: SimConfig,
    /// Seeded sampler; `None` draws from the thread RNG.
    rng: Option<StdRng>,
}

impl Circuit {
    /// Create an empty circuit with default settings.
    pub fn new() -> Self {
        Self::with_config(SimConfig::default())
    }

    /// Create an empty circuit with the given settings.
    pub fn with_config(config: SimConfig) -> Self {
        let rng = config.seed.map(StdRng::seed_from_u64);
        Self {
            inputs: vec![],
            layers: vec![],
            measure: None,
            input_state: None,
            compiled: false,
            state: None,
            sample: None,
            config,
            rng,
        }
    }

    /// Set the input qubits, in order. Replaces any earlier inputs.
    pub fn add_inputs<I, Q>(&mut self, inputs: I) -> &mut Self
    where
        I: IntoIterator<Item = Q>,
        Q: Into<QubitInput>,
    {
        self.inputs = inputs.into_iter().map(Into::into).collect();
        self.invalidate();
        self
    }

    /// Append one time step built from `gates`, first gate on the most
    /// significant qubits.
    pub fn add_layer(&mut self, gates: impl IntoIterator<Item = Gate>) -> SimResult<&mut Self> {
        let layer = Layer::new(gates)?;
        self.layers.push(layer);
        self.invalidate();
        Ok(self)
    }

    /// Attach a terminal measurement.
    pub fn add_measure(&mut self) -> &mut Self {
        self.measure = Some(Measure::new(self.config.normalization_tolerance));
        self
    }

    fn invalidate(&mut self) {
        self.compiled = false;
        self.input_state = None;
    }

    /// Validate the settings and the circuit, build the input state and cache
    /// every layer's operator. Does nothing if already compiled.
    #[instrument(skip(self), fields(num_qubits = self.inputs.len(), num_layers = self.layers.len()))]
    pub fn compile(&mut self) -> SimResult<()> {
        if self.compiled {
            return Ok(());
        }
        self.config.validate()?;

        let num_qubits = self.inputs.len();
        if num_qubits == 0 {
            return Err(SimError::NoInputs);
        }
        if num_qubits > self.config.max_qubits {
            return Err(SimError::CircuitTooLarge {
                num_qubits,
                max_qubits: self.config.max_qubits,
            });
        }

        for (i, input) in self.inputs.iter().enumerate() {
            if let QubitInput::Constant(state) = input {
                check_qubit_vector(state, || format!("input {i}"))?;
            }
        }

        for (i, layer) in self.layers.iter().enumerate() {
            let width = layer.num_qubits() as usize;
            if width != num_qubits {
                return Err(SimError::DimensionMismatch {
                    context: format!("layer {i} ({layer}) qubit width"),
                    expected: num_qubits,
                    got: width,
                });
            }
            if self.config.check_unitarity {
                for gate in layer.gates() {
                    let deviation = gate.unitarity_deviation();
                    if deviation > self.config.unitarity_tolerance {
                        return Err(SimError::NonUnitaryGate {
                            layer: i,
                            gate_name: gate.name().to_string(),
                            deviation,
                        });
                    }
                }
            }
        }

        self.input_state = if self.inputs.iter().all(QubitInput::is_constant) {
            Some(self.build_input_state(&FeedDict::new())?)
        } else {
            None
        };

        for (i, layer) in self.layers.iter_mut().enumerate() {
            let dim = layer.compile().dim();
            debug!(layer = i, dim, "cached layer operator");
        }

        self.compiled = true;
        debug!("circuit compiled");
        Ok(())
    }

    /// Tensor product of the inputs, binding placeholders from `feed`.
    fn build_input_state(&self, feed: &FeedDict) -> SimResult<StateVector> {
        let mut state: Option<StateVector> = None;
        for (i, input) in self.inputs.iter().enumerate() {
            let qubit = match input {
                QubitInput::Constant(value) => value,
                QubitInput::Placeholder(name) => {
                    let value = feed
                        .get(name)
                        .ok_or_else(|| SimError::MissingInputBinding(name.clone()))?;
                    check_qubit_vector(value, || format!("fed value for placeholder '{name}' (input {i})"))?;
                    value
                }
            };
            state = Some(match state {
                Some(acc) => acc.kron(qubit),
                None => qubit.clone(),
            });
        }
        state.ok_or(SimError::NoInputs)
    }

    /// Run with no placeholder bindings.
    pub fn run(&mut self) -> SimResult<RunOutput> {
        self.run_with(&FeedDict::new())
    }

    /// Compile if needed, bind placeholders from `feed`, apply every layer in
    /// order and measure if a measurement is registered.
    ///
    /// Returns the sample when measuring, otherwise the final state.
    #[instrument(skip(self, feed))]
    pub fn run_with(&mut self, feed: &FeedDict) -> SimResult<RunOutput> {
        self.sample = None;
        let state = self.evolve(feed)?;

        let Some(measure) = self.measure else {
            return Ok(RunOutput::State(state));
        };
        let sample = match self.rng.as_mut() {
            Some(rng) => measure.sample(&state, rng)?,
            None => measure.sample(&state, &mut rand::thread_rng())?,
        };
        debug!(%sample, "measured");
        self.sample = Some(sample.clone());
        Ok(RunOutput::Sample(sample))
    }

    /// Run once and draw `shots` samples from the final state.
    pub fn run_shots(&mut self, shots: u32) -> SimResult<Counts> {
        self.run_shots_with(&FeedDict::new(), shots)
    }

    /// Run once with `feed` and draw `shots` samples from the final state.
    ///
    /// Uses the registered measurement if there is one, otherwise one with
    /// the configured tolerance.
    #[instrument(skip(self, feed))]
    pub fn run_shots_with(&mut self, feed: &FeedDict, shots: u32) -> SimResult<Counts> {
        if shots == 0 {
            return Err(SimError::InvalidShots(shots));
        }
        let state = self.evolve(feed)?;
        let measure = self
            .measure
            .unwrap_or_else(|| Measure::new(self.config.normalization_tolerance));
        let counts = match self.rng.as_mut() {
            Some(rng) => measure.sample_counts(&state, shots, rng)?,
            None => measure.sample_counts(&state, shots, &mut rand::thread_rng())?,
        };
        debug!(shots, outcomes = counts.len(), "sampled shots");
        Ok(counts)
    }

    /// Compile, then push the input state through every layer and record the
    /// final state.
    fn evolve(&mut self, feed: &FeedDict) -> SimResult<StateVector> {
        self.compile()?;

        let mut state = match &self.input_state {
            Some(state) => state.clone(),
            None => self.build_input_state(feed)?,
        };

        for layer in &self.layers {
            state = match layer.matrix() {
                Some(matrix) => matrix.apply(&state)?,
                None => layer.eval().apply(&state)?,
            };
        }

        self.state = Some(state.clone());
        Ok(state)
    }

    /// Number of input qubits.
    pub fn num_qubits(&self) -> usize {
        self.inputs.len()
    }

    /// Number of layers.
    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    /// The input qubits.
    pub fn inputs(&self) -> &[QubitInput] {
        &self.inputs
    }

    /// The layers, in application order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Whether a measurement is registered.
    pub fn has_measure(&self) -> bool {
        self.measure.is_some()
    }

    /// Whether the circuit is compiled.
    pub fn is_compiled(&self) -> bool {
        self.compiled
    }

    /// Tensor product of the inputs, once compiled with constant inputs.
    pub fn input_state(&self) -> Option<&StateVector> {
        self.input_state.as_ref()
    }

    /// Final state of the last run.
    pub fn state(&self) -> Option<&StateVector> {
        self.state.as_ref()
    }

    /// Sample drawn by the last measured run.
    pub fn sample(&self) -> Option<&str> {
        self.sample.as_deref()
    }

    /// The settings this circuit was built with.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }
}

impl Default for Circuit {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Quantum circuit:")?;
        let inputs: Vec<String> = self.inputs.iter().map(ToString::to_string).collect();
        writeln!(f, "\tInputs: [{}]", inputs.join(", "))?;
        writeln!(f, "\tLayers:")?;
        for (i, layer) in self.layers.iter().enumerate() {
            writeln!(f, "\t  {i}: {layer}")?;
        }
        write!(
            f,
            "\tMeasure: {}",
            if self.measure.is_some() { "yes" } else { "no" }
        )
    }
}

fn check_qubit_vector(state: &StateVector, context: impl FnOnce() -> String) -> SimResult<()> {
    if state.dim() != 2 {
        return Err(SimError::DimensionMismatch {
            context: context(),
            expected: 2,
            got: state.dim(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_circuit() {
        let circuit = Circuit::new();
        assert_eq!(circuit.num_qubits(), 0);
        assert_eq!(circuit.num_layers(), 0);
        assert!(!circuit.is_compiled());
        assert!(!circuit.has_measure());
    }

    #[test]
    fn test_compile_without_inputs() {
        let mut circuit = Circuit::new();
        assert!(matches!(circuit.compile(), Err(SimError::NoInputs)));
    }

    #[test]
    fn test_empty_layer_rejected() {
        let mut circuit = Circuit::new();
        let result = circuit.add_layer(Vec::new());
        assert!(matches!(
            result,
            Err(SimError::Ir(qlayer_ir::IrError::EmptyLayer))
        ));
    }

    #[test]
    fn test_no_layers_returns_input_state() {
        let mut circuit = Circuit::new();
        circuit.add_inputs([StateVector::one(), StateVector::zero()]);
        let output = circuit.run().unwrap();
        assert_eq!(output.as_state(), Some(&StateVector::basis(2, 0b10).unwrap()));
    }

    #[test]
    fn test_builder_invalidates_compile() {
        let mut circuit = Circuit::new();
        circuit.add_inputs([StateVector::zero()]);
        circuit.add_layer([Gate::not()]).unwrap();
        circuit.compile().unwrap();
        assert!(circuit.is_compiled());

        circuit.add_layer([Gate::not()]).unwrap();
        assert!(!circuit.is_compiled());
        let output = circuit.run().unwrap();
        assert_eq!(output.as_state(), Some(&StateVector::zero()));
    }

    #[test]
    fn test_invalid_input_vector() {
        let mut circuit = Circuit::new();
        circuit.add_inputs([StateVector::basis(2, 0).unwrap()]);
        assert!(matches!(
            circuit.compile(),
            Err(SimError::DimensionMismatch { expected: 2, got: 4, .. })
        ));
    }

    #[test]
    fn test_invalid_config_rejected_at_compile() {
        let config = SimConfig {
            unitarity_tolerance: f64::NAN,
            ..SimConfig::default()
        };
        let mut circuit = Circuit::with_config(config);
        circuit.add_inputs([StateVector::zero()]);
        assert!(matches!(circuit.compile(), Err(SimError::Config(_))));
        assert!(!circuit.is_compiled());
    }

    #[test]
    fn test_too_many_qubits() {
        let config = SimConfig {
            max_qubits: 2,
            ..SimConfig::default()
        };
        let mut circuit = Circuit::with_config(config);
        circuit.add_inputs(vec![StateVector::zero(); 3]);
        assert!(matches!(
            circuit.compile(),
            Err(SimError::CircuitTooLarge { num_qubits: 3, max_qubits: 2 })
        ));
    }

    #[test]
    fn test_circuit_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<Circuit>();
    }

    #[test]
    fn test_display() {
        let mut circuit = Circuit::new();
        circuit.add_inputs([
            QubitInput::constant(StateVector::zero()),
            QubitInput::placeholder("y"),
        ]);
        circuit
            .add_layer([Gate::id(), Gate::not()])
            .unwrap()
            .add_measure();
        let text = circuit.to_string();
        assert!(text.starts_with("Quantum circuit:"));
        assert!(text.contains("q(y)"));
        assert!(text.contains("0: Id ⊗ Not"));
        assert!(text.ends_with("Measure: yes"));
    }
}
