//! Backend trait.
//!
//! The [`Backend`] trait defines two ways of executing a circuit:
//!
//! ```text
//!   capabilities() ──→ validate() ──→ run()                          blocking
//!                                 └─→ submit() ──→ status()* ──→ result()   job
//! ```
//!
//! | Method | Kind | Returns |
//! |--------|------|---------|
//! | `name()` | sync | `&str` |
//! | `capabilities()` | sync | `&Capabilities` |
//! | `availability()` | async | `HalResult<BackendAvailability>` |
//! | `validate()` | async | `HalResult<ValidationResult>` |
//! | `run()` | async | `HalResult<ExecutionResult>` |
//! | `submit()` | async | `HalResult<JobId>` |
//! | `status()` | async | `HalResult<JobStatus>` |
//! | `result()` | async | `HalResult<ExecutionResult>` |
//!
//! Polling policy lives with the caller. A backend only reports status.

use std::time::Duration;

use async_trait::async_trait;
use grover_ir::{Circuit, ClbitId};

use crate::capability::Capabilities;
use crate::error::HalResult;
use crate::job::{JobId, JobStatus};
use crate::result::ExecutionResult;

/// Trait for circuit execution backends.
///
/// # Contract
///
/// - `capabilities()` MUST be synchronous and infallible. Capabilities
///   MUST be cached at construction time.
/// - `run()` and `submit()` read exactly the classical bits in `registers`,
///   in that order, so every returned [`TrialOutcome`](crate::TrialOutcome)
///   has `registers.len()` bits.
/// - `submit()` MUST return a job whose initial status is `Queued`.
/// - `result()` MUST only be called when status is `Completed`.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Get the name of this backend.
    fn name(&self) -> &str;

    /// Get the capabilities of this backend.
    fn capabilities(&self) -> &Capabilities;

    /// Check backend availability.
    async fn availability(&self) -> HalResult<BackendAvailability>;

    /// Validate a circuit against backend constraints.
    ///
    /// SHOULD check at minimum the qubits the circuit declares against
    /// `capabilities().qubits` and its gates against `capabilities().gate_set`.
    async fn validate(&self, circuit: &Circuit) -> HalResult<ValidationResult>;

    /// Execute `trials` repetitions of the circuit and wait for the outcomes.
    async fn run(
        &self,
        circuit: &Circuit,
        registers: &[ClbitId],
        trials: u32,
    ) -> HalResult<ExecutionResult>;

    /// Submit a circuit for asynchronous execution.
    async fn submit(
        &self,
        circuit: &Circuit,
        registers: &[ClbitId],
        trials: u32,
    ) -> HalResult<JobId>;

    /// Get the status of a job.
    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus>;

    /// Get the result of a completed job.
    async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult>;
}

/// Backend availability information.
#[derive(Debug, Clone)]
pub struct BackendAvailability {
    /// Whether the backend is currently accepting jobs.
    pub is_available: bool,
    /// Number of jobs currently in queue (if known).
    pub queue_depth: Option<u32>,
    /// Estimated wait time for a new job (if known).
    pub estimated_wait: Option<Duration>,
    /// Human-readable status message.
    pub status_message: Option<String>,
}

impl BackendAvailability {
    /// Availability for a backend with no queue.
    pub fn always_available() -> Self {
        Self {
            is_available: true,
            queue_depth: Some(0),
            estimated_wait: Some(Duration::ZERO),
            status_message: None,
        }
    }

    /// Availability for a backend holding `depth` unfinished jobs.
    pub fn with_queue(depth: u32) -> Self {
        Self {
            queue_depth: Some(depth),
            estimated_wait: None,
            ..Self::always_available()
        }
    }

    /// Create availability for an offline backend.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            is_available: false,
            queue_depth: None,
            estimated_wait: None,
            status_message: Some(reason.into()),
        }
    }
}

/// Result of circuit validation against backend constraints.
#[derive(Debug, Clone)]
pub enum ValidationResult {
    /// Circuit is valid and can be submitted directly.
    Valid,
    /// Circuit is invalid for this backend.
    Invalid {
        /// Reasons the circuit is invalid.
        reasons: Vec<String>,
    },
}

impl ValidationResult {
    /// Check if the circuit is valid.
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    /// Build a result from a list of problems; empty means valid.
    pub fn from_reasons(reasons: Vec<String>) -> Self {
        if reasons.is_empty() {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid { reasons }
        }
    }

    /// Reasons the circuit was rejected, joined for display.
    pub fn describe(&self) -> Option<String> {
        match self {
            ValidationResult::Valid => None,
            ValidationResult::Invalid { reasons } => Some(reasons.join("; ")),
        }
    }
}
