//! Measurement histograms.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Number of times each bit string was observed across shots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    counts: FxHashMap<String, u64>,
}

impl Counts {
    /// Create an empty histogram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `n` observations of `bitstring`.
    pub fn insert(&mut self, bitstring: impl Into<String>, n: u64) {
        *self.counts.entry(bitstring.into()).or_insert(0) += n;
    }

    /// Observations of `bitstring` (0 if never seen).
    pub fn get(&self, bitstring: &str) -> u64 {
        self.counts.get(bitstring).copied().unwrap_or(0)
    }

    /// Total observations.
    pub fn total_shots(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Observed fraction of shots that produced `bitstring`.
    pub fn frequency(&self, bitstring: &str) -> f64 {
        let total = self.total_shots();
        if total == 0 {
            0.0
        } else {
            self.get(bitstring) as f64 / total as f64
        }
    }

    /// Number of distinct outcomes.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether nothing was observed.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterate over `(bitstring, count)` in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Outcomes by descending count, ties broken by bit string.
    pub fn sorted(&self) -> Vec<(&str, u64)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }

    /// The most frequent outcome.
    pub fn most_frequent(&self) -> Option<(&str, u64)> {
        self.sorted().into_iter().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_accumulates() {
        let mut counts = Counts::new();
        counts.insert("01", 1);
        counts.insert("01", 2);
        counts.insert("10", 1);
        assert_eq!(counts.get("01"), 3);
        assert_eq!(counts.get("11"), 0);
        assert_eq!(counts.total_shots(), 4);
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn test_sorted_and_most_frequent() {
        let mut counts = Counts::new();
        counts.insert("00", 5);
        counts.insert("11", 5);
        counts.insert("01", 9);
        assert_eq!(counts.sorted(), vec![("01", 9), ("00", 5), ("11", 5)]);
        assert_eq!(counts.most_frequent(), Some(("01", 9)));
        assert!((counts.frequency("01") - 9.0 / 19.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty() {
        let counts = Counts::new();
        assert!(counts.is_empty());
        assert_eq!(counts.most_frequent(), None);
        assert_eq!(counts.frequency("0"), 0.0);
    }
}
