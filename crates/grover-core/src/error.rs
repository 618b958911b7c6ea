//! Error handling for Grover search.

use grover_hal::HalError;
use grover_ir::IrError;
use thiserror::Error;

/// Result type for Grover search operations.
pub type GroverResult<T> = Result<T, GroverError>;

/// Errors that can occur while building, running or scoring a search.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum GroverError {
    /// More qubits requested than the mapping (or a bit width) provides.
    #[error("Requested {requested} qubits but only {available} are available")]
    QubitRange { requested: usize, available: usize },

    /// A search needs at least one data qubit.
    #[error("At least one data qubit is required")]
    NoDataQubits,

    /// Marked index outside `[0, 2^qubits)`.
    #[error("Marked index {marked} is outside [0, 2^{qubits})")]
    MarkedIndexRange { marked: u64, qubits: u32 },

    /// Accuracy over zero outcomes, or zero trials requested.
    #[error("No trials to evaluate")]
    NoTrials,

    /// More hits than trials.
    #[error("Accuracy {hits}/{total} counts more hits than trials")]
    InvalidAccuracy { hits: u64, total: u64 },

    /// The backend kept the job pending for every allowed poll.
    #[error("Job {job} still pending after {polls} polls")]
    ExecutionTimeout { job: String, polls: u32 },

    /// Backend failure, propagated unchanged.
    #[error(transparent)]
    Backend(#[from] HalError),

    /// Circuit construction failure.
    #[error(transparent)]
    Circuit(#[from] IrError),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = GroverError::QubitRange {
            requested: 11,
            available: 10,
        };
        assert_eq!(
            err.to_string(),
            "Requested 11 qubits but only 10 are available"
        );

        let err = GroverError::MarkedIndexRange {
            marked: 4,
            qubits: 2,
        };
        assert_eq!(err.to_string(), "Marked index 4 is outside [0, 2^2)");
    }

    #[test]
    fn test_backend_errors_pass_through() {
        let err: GroverError = HalError::JobFailed("calibration".into()).into();
        assert!(matches!(err, GroverError::Backend(HalError::JobFailed(_))));
        assert_eq!(err.to_string(), "Job failed: calibration");
    }
}
