//! Error types for the HAL crate.
//!
//! | Category | Variants | Recovery |
//! |----------|----------|----------|
//! | **Transient** | `BackendUnavailable` | Retry later (caller's decision) |
//! | **Permanent** | `InvalidCircuit`, `CircuitTooLarge`, `InvalidShots`, `Unsupported` | Fix input |
//! | **Job-level** | `JobFailed`, `JobCancelled`, `JobNotFound` | Resubmit or abort |
//! | **Config** | `UnknownDevice`, `InvalidNoiseProfile` | Fix configuration |

use thiserror::Error;

/// Errors that can occur in HAL operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HalError {
    /// Backend is not available.
    #[error("Backend not available: {0}")]
    BackendUnavailable(String),

    /// Job execution failed.
    #[error("Job failed: {0}")]
    JobFailed(String),

    /// Job was cancelled.
    #[error("Job cancelled")]
    JobCancelled,

    /// Job not found.
    #[error("Job not found: {0}")]
    JobNotFound(String),

    /// Result requested before the job completed.
    #[error("Job {0} has not completed")]
    JobNotComplete(String),

    /// Invalid circuit.
    #[error("Invalid circuit: {0}")]
    InvalidCircuit(String),

    /// Circuit exceeds backend capabilities.
    #[error("Circuit exceeds backend capabilities: {0}")]
    CircuitTooLarge(String),

    /// Unsupported feature.
    #[error("Unsupported feature: {0}")]
    Unsupported(String),

    /// Invalid number of shots.
    #[error("Invalid shots: {0}")]
    InvalidShots(String),

    /// Malformed measurement data.
    #[error("Invalid outcome: {0}")]
    InvalidOutcome(String),

    /// No device profile with this name.
    #[error("Unknown device '{0}'")]
    UnknownDevice(String),

    /// Noise parameters outside `[0, 1]`.
    #[error("Invalid noise profile: {0}")]
    InvalidNoiseProfile(String),

    /// Generic backend error.
    #[error("Backend error: {0}")]
    Backend(String),
}

impl HalError {
    /// Returns `true` if the operation may succeed when repeated later.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::BackendUnavailable(_))
    }
}

/// Result type for HAL operations.
pub type HalResult<T> = Result<T, HalError>;
