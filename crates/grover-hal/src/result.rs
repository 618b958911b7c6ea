//! Execution result types.
//!
//! Bit ordering: a [`TrialOutcome`] lists the requested classical bits in
//! the order they were requested, and its bitstring is written in the same
//! order. `"10"` means the first requested bit read `1` and the second `0`.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{HalError, HalResult};

/// Measured bits of one trial.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TrialOutcome {
    bits: Vec<bool>,
}

impl TrialOutcome {
    /// Create an outcome from boolean bits.
    pub fn new(bits: Vec<bool>) -> Self {
        Self { bits }
    }

    /// Create an outcome from `0`/`1` integers.
    pub fn from_bits(bits: impl IntoIterator<Item = u8>) -> HalResult<Self> {
        bits.into_iter()
            .map(|bit| match bit {
                0 => Ok(false),
                1 => Ok(true),
                other => Err(HalError::InvalidOutcome(format!(
                    "bit value {other} is not 0 or 1"
                ))),
            })
            .collect::<HalResult<Vec<_>>>()
            .map(Self::new)
    }

    /// The measured bits.
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    /// Number of bits.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Whether no bits were read.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Render as a `0`/`1` string in bit order.
    pub fn bitstring(&self) -> String {
        self.bits.iter().map(|&b| if b { '1' } else { '0' }).collect()
    }
}

impl std::fmt::Display for TrialOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.bitstring())
    }
}

/// Measurement counts: bitstring to number of occurrences.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Counts {
    counts: FxHashMap<String, u64>,
}

impl Counts {
    /// Create empty counts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a count for a bitstring. Repeated keys accumulate.
    pub fn insert(&mut self, bitstring: impl Into<String>, count: u64) {
        *self.counts.entry(bitstring.into()).or_default() += count;
    }

    /// Get the count for a bitstring.
    pub fn get(&self, bitstring: &str) -> u64 {
        self.counts.get(bitstring).copied().unwrap_or(0)
    }

    /// Iterate over (bitstring, count) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &u64)> {
        self.counts.iter()
    }

    /// Total number of trials counted.
    pub fn total_shots(&self) -> u64 {
        self.counts.values().sum()
    }

    /// The most frequent bitstring. Ties go to the lexicographically
    /// smallest bitstring.
    pub fn most_frequent(&self) -> Option<(&String, &u64)> {
        self.counts
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
    }

    /// Probability of each bitstring.
    #[allow(clippy::cast_precision_loss)]
    pub fn probabilities(&self) -> FxHashMap<String, f64> {
        let total = self.total_shots() as f64;
        if total == 0.0 {
            return FxHashMap::default();
        }
        self.counts
            .iter()
            .map(|(k, &v)| (k.clone(), v as f64 / total))
            .collect()
    }

    /// Number of distinct bitstrings.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Check if counts are empty.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl<'a> FromIterator<&'a TrialOutcome> for Counts {
    fn from_iter<I: IntoIterator<Item = &'a TrialOutcome>>(iter: I) -> Self {
        let mut counts = Self::new();
        for outcome in iter {
            counts.insert(outcome.bitstring(), 1);
        }
        counts
    }
}

/// Result of circuit execution: one outcome per trial, in execution order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Per-trial outcomes.
    pub outcomes: Vec<TrialOutcome>,
    /// Number of trials executed.
    pub shots: u32,
    /// Execution time in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_time_ms: Option<u64>,
    /// Additional metadata.
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl ExecutionResult {
    /// Create a new execution result.
    pub fn new(outcomes: Vec<TrialOutcome>) -> Self {
        let shots = outcomes.len() as u32;
        Self {
            outcomes,
            shots,
            execution_time_ms: None,
            metadata: serde_json::Value::Null,
        }
    }

    /// Set the execution time.
    pub fn with_execution_time(mut self, time_ms: u64) -> Self {
        self.execution_time_ms = Some(time_ms);
        self
    }

    /// Set metadata.
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }

    /// Histogram of the outcomes.
    pub fn counts(&self) -> Counts {
        self.outcomes.iter().collect()
    }

    /// The most frequent outcome and its relative frequency.
    #[allow(clippy::cast_precision_loss)]
    pub fn most_frequent(&self) -> Option<(String, f64)> {
        let counts = self.counts();
        let total = counts.total_shots() as f64;
        counts
            .most_frequent()
            .map(|(s, &c)| (s.clone(), c as f64 / total))
    }

    /// Width shared by every outcome, `None` if empty or ragged.
    pub fn width(&self) -> Option<usize> {
        let first = self.outcomes.first()?.len();
        self.outcomes
            .iter()
            .all(|o| o.len() == first)
            .then_some(first)
    }
}
