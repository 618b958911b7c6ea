//! Backend capability introspection.
//!
//! [`Capabilities`] describe what a backend can address and execute:
//! physical qubit ids, supported gates, shot limits, and the noise it
//! injects. The executor never reads them; backends use them to validate
//! circuits before running.

use grover_ir::{Gate, QubitId};
use serde::{Deserialize, Serialize};

use crate::error::{HalError, HalResult};

/// Hardware capabilities of a backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Capabilities {
    /// Name of the backend.
    pub name: String,
    /// Number of qubits available.
    pub num_qubits: u32,
    /// Addressable physical qubit ids, ascending.
    pub qubits: Vec<QubitId>,
    /// Supported gate set.
    pub gate_set: GateSet,
    /// Maximum number of trials per job.
    pub max_shots: u32,
    /// Whether this is a simulator (`true`) or a device model (`false`).
    pub is_simulator: bool,
    /// Noise injected during execution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub noise_profile: Option<NoiseProfile>,
}

impl Capabilities {
    /// Create capabilities for a noiseless simulator addressing ids `0..num_qubits`.
    pub fn simulator(num_qubits: u32) -> Self {
        Self {
            name: "simulator".into(),
            num_qubits,
            qubits: (0..num_qubits).map(QubitId).collect(),
            gate_set: GateSet::universal(),
            max_shots: 100_000,
            is_simulator: true,
            noise_profile: None,
        }
    }

    /// Replace the addressable ids. Duplicates are dropped and the list sorted.
    pub fn with_qubits(mut self, qubits: impl IntoIterator<Item = QubitId>) -> Self {
        let mut qubits: Vec<QubitId> = qubits.into_iter().collect();
        qubits.sort_unstable();
        qubits.dedup();
        self.num_qubits = qubits.len() as u32;
        self.qubits = qubits;
        self
    }

    /// Set the noise profile.
    pub fn with_noise_profile(mut self, noise: NoiseProfile) -> Self {
        self.noise_profile = Some(noise);
        self
    }

    /// Set the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Check whether `qubit` is addressable.
    pub fn supports_qubit(&self, qubit: QubitId) -> bool {
        self.qubits.binary_search(&qubit).is_ok()
    }

    /// Whether execution injects any noise.
    pub fn is_noisy(&self) -> bool {
        self.noise_profile
            .as_ref()
            .is_some_and(|noise| !noise.is_noiseless())
    }
}

/// Gates a backend can execute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateSet {
    /// Standard gate names (lowercase).
    pub standard: Vec<String>,
    /// Widest named unitary accepted; `0` disables named unitaries.
    pub max_unitary_qubits: u32,
}

impl GateSet {
    /// H, X and dense unitaries up to 12 qubits.
    pub fn universal() -> Self {
        Self {
            standard: vec!["h".into(), "x".into()],
            max_unitary_qubits: 12,
        }
    }

    /// Check if a gate is supported.
    pub fn contains(&self, gate: &Gate) -> bool {
        match gate {
            Gate::Standard(g) => self.standard.iter().any(|name| name == g.name()),
            Gate::Unitary { num_qubits, .. } => *num_qubits <= self.max_unitary_qubits,
        }
    }
}

/// Device-wide error rates.
///
/// Every rate is a probability: gate errors are applied per operand after
/// each gate, readout errors per measured bit.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NoiseProfile {
    /// Depolarizing probability after a single-qubit gate.
    #[serde(default)]
    pub single_qubit_error: f64,
    /// Depolarizing probability per operand after a multi-qubit gate.
    #[serde(default)]
    pub multi_qubit_error: f64,
    /// Probability that a measured bit is reported flipped.
    #[serde(default)]
    pub readout_error: f64,
}

impl NoiseProfile {
    /// A profile with every rate zero.
    pub fn noiseless() -> Self {
        Self::default()
    }

    /// Check that every rate is a probability.
    pub fn validate(&self) -> HalResult<()> {
        for (field, value) in [
            ("single_qubit_error", self.single_qubit_error),
            ("multi_qubit_error", self.multi_qubit_error),
            ("readout_error", self.readout_error),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(HalError::InvalidNoiseProfile(format!(
                    "{field} = {value} is outside [0, 1]"
                )));
            }
        }
        Ok(())
    }

    /// Whether every rate is zero.
    pub fn is_noiseless(&self) -> bool {
        self.single_qubit_error == 0.0 && self.multi_qubit_error == 0.0 && self.readout_error == 0.0
    }

    /// Gate error rate for a gate of the given width.
    pub fn gate_error(&self, num_qubits: usize) -> f64 {
        if num_qubits > 1 {
            self.multi_qubit_error
        } else {
            self.single_qubit_error
        }
    }
}
