//! Simulator configuration.
//!
//! Supports loading configuration from:
//! 1. A YAML file
//! 2. Environment variables (with `QLAYER_` prefix)
//!
//! Precedence (highest to lowest): environment, file, defaults.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{SimError, SimResult};
use crate::measure::DEFAULT_NORMALIZATION_TOLERANCE;

/// Settings shared by every circuit built with them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Max entry of |U†U - I| accepted when compiling.
    #[serde(default = "default_unitarity_tolerance")]
    pub unitarity_tolerance: f64,

    /// Max |Σ p - 1| accepted when measuring.
    #[serde(default = "default_normalization_tolerance")]
    pub normalization_tolerance: f64,

    /// Check every gate for unitarity at compile time.
    #[serde(default = "default_true")]
    pub check_unitarity: bool,

    /// Seed for measurement sampling; `None` uses the thread RNG.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Widest circuit (in qubits) that may be compiled.
    #[serde(default = "default_max_qubits")]
    pub max_qubits: usize,

    /// Log level for binaries: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_unitarity_tolerance() -> f64 {
    qlayer_ir::DEFAULT_TOLERANCE
}

fn default_normalization_tolerance() -> f64 {
    DEFAULT_NORMALIZATION_TOLERANCE
}

fn default_true() -> bool {
    true
}

fn default_max_qubits() -> usize {
    // a 12-qubit layer is a 4096x4096 dense matrix
    12
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            unitarity_tolerance: default_unitarity_tolerance(),
            normalization_tolerance: default_normalization_tolerance(),
            check_unitarity: default_true(),
            seed: None,
            max_qubits: default_max_qubits(),
            log_level: default_log_level(),
        }
    }
}

impl SimConfig {
    /// Parse configuration from YAML text.
    pub fn from_yaml_str(contents: &str) -> SimResult<Self> {
        let config: SimConfig =
            serde_yaml_ng::from_str(contents).map_err(|e| SimError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> SimResult<Self> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            SimError::Config(format!("{}: {e}", path.as_ref().display()))
        })?;
        Self::from_yaml_str(&contents)
    }

    /// Load configuration with the following precedence:
    /// 1. Load from file if provided, defaults otherwise
    /// 2. Apply environment variable overrides
    pub fn load(config_file: Option<&Path>) -> SimResult<Self> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = config.merge_env();
        config.validate()?;
        Ok(config)
    }

    /// Override fields from `QLAYER_*` environment variables.
    #[must_use]
    pub fn merge_env(self) -> Self {
        self.merge_vars(|key| std::env::var(key).ok())
    }

    /// Override fields from `QLAYER_*` variables resolved by `lookup`.
    ///
    /// Only variables that are present override; values that fail to parse
    /// are logged and ignored.
    #[must_use]
    pub fn merge_vars(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(v) = parse_var::<u64>(&lookup, "QLAYER_SEED") {
            self.seed = Some(v);
        }
        if let Some(v) = parse_var(&lookup, "QLAYER_UNITARITY_TOL") {
            self.unitarity_tolerance = v;
        }
        if let Some(v) = parse_var(&lookup, "QLAYER_NORMALIZATION_TOL") {
            self.normalization_tolerance = v;
        }
        if let Some(v) = parse_var(&lookup, "QLAYER_CHECK_UNITARITY") {
            self.check_unitarity = v;
        }
        if let Some(v) = parse_var(&lookup, "QLAYER_MAX_QUBITS") {
            self.max_qubits = v;
        }
        if let Some(v) = lookup("QLAYER_LOG_LEVEL") {
            self.log_level = v;
        }
        self
    }

    /// Reject settings no circuit could run with.
    pub fn validate(&self) -> SimResult<()> {
        if !self.unitarity_tolerance.is_finite() || self.unitarity_tolerance <= 0.0 {
            return Err(SimError::Config(format!(
                "unitarity_tolerance must be positive, got {}",
                self.unitarity_tolerance
            )));
        }
        if !self.normalization_tolerance.is_finite() || self.normalization_tolerance <= 0.0 {
            return Err(SimError::Config(format!(
                "normalization_tolerance must be positive, got {}",
                self.normalization_tolerance
            )));
        }
        if self.max_qubits == 0 {
            return Err(SimError::Config("max_qubits must be at least 1".into()));
        }
        Ok(())
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "ignoring unparsable environment override");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = SimConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.check_unitarity);
        assert_eq!(config.seed, None);
        assert_eq!(config.max_qubits, 12);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config = SimConfig::from_yaml_str("seed: 42\nmax_qubits: 4\n").unwrap();
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.max_qubits, 4);
        assert_eq!(config.unitarity_tolerance, qlayer_ir::DEFAULT_TOLERANCE);
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_yaml_validation() {
        let err = SimConfig::from_yaml_str("unitarity_tolerance: -1.0\n").unwrap_err();
        assert!(matches!(err, SimError::Config(_)));
        let err = SimConfig::from_yaml_str("max_qubits: [1, 2]\n").unwrap_err();
        assert!(matches!(err, SimError::Config(_)));
    }

    #[test]
    fn test_env_overrides() {
        let config = SimConfig::default().merge_vars(vars(&[
            ("QLAYER_SEED", "9"),
            ("QLAYER_CHECK_UNITARITY", "false"),
            ("QLAYER_LOG_LEVEL", "debug"),
        ]));
        assert_eq!(config.seed, Some(9));
        assert!(!config.check_unitarity);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_unparsable_env_ignored() {
        let config = SimConfig::default().merge_vars(vars(&[("QLAYER_MAX_QUBITS", "lots")]));
        assert_eq!(config.max_qubits, 12);
    }

    #[test]
    fn test_missing_file() {
        let err = SimConfig::from_file("/nonexistent/qlayer.yaml").unwrap_err();
        assert!(matches!(err, SimError::Config(_)));
    }
}
