//! Outcome decoding and accuracy.

use std::fmt;

use grover_hal::{ExecutionResult, TrialOutcome};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{GroverError, GroverResult};

/// Read bits as a big-endian integer: the first bit is the most significant.
pub fn decode(bits: &[bool]) -> GroverResult<u64> {
    if bits.len() > 64 {
        return Err(GroverError::QubitRange {
            requested: bits.len(),
            available: 64,
        });
    }
    Ok(bits
        .iter()
        .fold(0_u64, |acc, &bit| (acc << 1) | u64::from(bit)))
}

/// Decode one trial.
pub fn decode_outcome(outcome: &TrialOutcome) -> GroverResult<u64> {
    decode(outcome.bits())
}

/// Fraction of trials that found the marked index.
///
/// Always holds `0 <= hits <= total` with `total > 0`, including when
/// deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawAccuracy")]
pub struct Accuracy {
    hits: u64,
    total: u64,
}

#[derive(Deserialize)]
struct RawAccuracy {
    hits: u64,
    total: u64,
}

impl TryFrom<RawAccuracy> for Accuracy {
    type Error = GroverError;

    fn try_from(raw: RawAccuracy) -> GroverResult<Self> {
        Self::new(raw.hits, raw.total)
    }
}

impl Accuracy {
    /// `hits` out of `total` trials. Fails with `NoTrials` when `total` is
    /// zero and `InvalidAccuracy` when `hits > total`.
    pub fn new(hits: u64, total: u64) -> GroverResult<Self> {
        if total == 0 {
            return Err(GroverError::NoTrials);
        }
        if hits > total {
            return Err(GroverError::InvalidAccuracy { hits, total });
        }
        Ok(Self { hits, total })
    }

    /// Trials whose outcome decoded to the marked index.
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Trials evaluated.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// `hits / total` as a float.
    #[allow(clippy::cast_precision_loss)]
    pub fn value(&self) -> f64 {
        self.hits as f64 / self.total as f64
    }
}

impl fmt::Display for Accuracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} ({:.1}%)", self.hits, self.total, self.value() * 100.0)
    }
}

/// Score `result` against the marked index.
pub fn accuracy(result: &ExecutionResult, marked: u64) -> GroverResult<Accuracy> {
    let mut hits = 0;
    for outcome in &result.outcomes {
        if decode_outcome(outcome)? == marked {
            hits += 1;
        }
    }
    Accuracy::new(hits, result.outcomes.len() as u64)
}

/// The most frequent decoded index and how often it occurred. Ties go to
/// the smaller index.
pub fn most_frequent(result: &ExecutionResult) -> GroverResult<Option<(u64, u64)>> {
    let mut tally: FxHashMap<u64, u64> = FxHashMap::default();
    for outcome in &result.outcomes {
        *tally.entry(decode_outcome(outcome)?).or_insert(0) += 1;
    }
    Ok(tally
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(&a.0))))
}
