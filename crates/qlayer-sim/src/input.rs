//! Circuit inputs and run-time bindings.

use std::fmt;

use qlayer_ir::StateVector;
use rustc_hash::FxHashMap;

/// One input qubit of a circuit.
#[derive(Debug, Clone, PartialEq)]
pub enum QubitInput {
    /// A fixed 2-dimensional vector, e.g. `[1, 0]` for classical 0.
    Constant(StateVector),
    /// A named qubit whose value is supplied at run time.
    Placeholder(String),
}

impl QubitInput {
    /// A fixed input.
    pub fn constant(state: StateVector) -> Self {
        QubitInput::Constant(state)
    }

    /// A run-time bound input.
    pub fn placeholder(name: impl Into<String>) -> Self {
        QubitInput::Placeholder(name.into())
    }

    /// Whether this input is known before run time.
    pub fn is_constant(&self) -> bool {
        matches!(self, QubitInput::Constant(_))
    }
}

impl From<StateVector> for QubitInput {
    fn from(state: StateVector) -> Self {
        QubitInput::Constant(state)
    }
}

impl fmt::Display for QubitInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QubitInput::Constant(state) => write!(f, "c{state}"),
            QubitInput::Placeholder(name) => write!(f, "q({name})"),
        }
    }
}

/// Values for placeholder inputs, keyed by placeholder name.
#[derive(Debug, Clone, Default)]
pub struct FeedDict {
    values: FxHashMap<String, StateVector>,
}

impl FeedDict {
    /// Create an empty feed dict.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `value`.
    #[must_use]
    pub fn bind(mut self, name: impl Into<String>, value: StateVector) -> Self {
        self.insert(name, value);
        self
    }

    /// Bind `name` to `value`, replacing any previous binding.
    pub fn insert(&mut self, name: impl Into<String>, value: StateVector) -> Option<StateVector> {
        self.values.insert(name.into(), value)
    }

    /// Value bound to `name`.
    pub fn get(&self, name: &str) -> Option<&StateVector> {
        self.values.get(name)
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether there are no bindings.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
