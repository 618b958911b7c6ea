//! Circuit execution against a [`Backend`].
//!
//! Two paths, tracked by [`ExecutionState`]:
//!
//! ```text
//!   Noiseless:  Built ──→ Submitted ──────────────→ Completed     (Backend::run)
//!   Noisy:      Built ──→ Submitted ──→ Pending* ──→ Completed    (submit + poll)
//! ```
//!
//! Polling sleeps through an injected [`Sleeper`] so tests can observe the
//! schedule without waiting on a clock.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use grover_hal::{Backend, ExecutionResult, HalError, JobId, JobStatus};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::assembler::GroverCircuit;
use crate::error::{GroverError, GroverResult};

/// How a circuit is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Blocking run on an ideal backend.
    #[default]
    Noiseless,
    /// Job submission to a noisy device, polled until it finishes.
    Noisy,
}

impl std::fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionMode::Noiseless => write!(f, "noiseless"),
            ExecutionMode::Noisy => write!(f, "noisy"),
        }
    }
}

/// Where an execution currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionState {
    /// Circuit assembled, nothing sent yet.
    Built,
    /// Handed to the backend.
    Submitted,
    /// Job queued or running on the backend.
    Pending,
    /// Outcomes retrieved.
    Completed,
}

/// Polling schedule for job-based execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Wait between two status checks.
    pub interval: Duration,
    /// Status checks before giving up.
    pub max_polls: u32,
}

impl PollPolicy {
    /// Create a policy.
    pub fn new(interval: Duration, max_polls: u32) -> Self {
        Self {
            interval,
            max_polls,
        }
    }
}

impl Default for PollPolicy {
    /// 100 ms between checks, five minutes in total.
    fn default() -> Self {
        Self::new(Duration::from_millis(100), 3_000)
    }
}

/// Waits between status polls.
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Suspend for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// [`Sleeper`] backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// [`Sleeper`] that returns immediately and records every request.
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    calls: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    /// Create a sleeper with no recorded calls.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every requested duration, in order.
    pub fn calls(&self) -> Vec<Duration> {
        self.calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(duration);
    }
}

/// Runs assembled circuits on a backend and collects their outcomes.
pub struct Executor<'b, S = TokioSleeper> {
    backend: &'b dyn Backend,
    policy: PollPolicy,
    sleeper: S,
    state: ExecutionState,
}

impl<'b> Executor<'b> {
    /// Create an executor with the default poll policy and tokio sleeps.
    pub fn new(backend: &'b dyn Backend) -> Self {
        Self {
            backend,
            policy: PollPolicy::default(),
            sleeper: TokioSleeper,
            state: ExecutionState::Built,
        }
    }
}

impl<'b, S: Sleeper> Executor<'b, S> {
    /// Replace the sleeper.
    pub fn with_sleeper<T: Sleeper>(self, sleeper: T) -> Executor<'b, T> {
        Executor {
            backend: self.backend,
            policy: self.policy,
            sleeper,
            state: self.state,
        }
    }

    /// Replace the poll policy.
    pub fn with_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The current state.
    pub fn state(&self) -> ExecutionState {
        self.state
    }

    /// The sleeper in use.
    pub fn sleeper(&self) -> &S {
        &self.sleeper
    }

    /// Execute `trials` repetitions of `grover` and return the outcomes of
    /// its data register.
    #[instrument(skip(self, grover), fields(n = grover.qubits(), s = grover.marked()))]
    pub async fn execute(
        &mut self,
        grover: &GroverCircuit,
        trials: u32,
        mode: ExecutionMode,
    ) -> GroverResult<ExecutionResult> {
        self.state = ExecutionState::Built;
        if trials == 0 {
            return Err(GroverError::NoTrials);
        }

        let registers = grover.registers();
        let result = match mode {
            ExecutionMode::Noiseless => {
                self.transition(ExecutionState::Submitted);
                self.backend
                    .run(grover.circuit(), &registers, trials)
                    .await?
            }
            ExecutionMode::Noisy => {
                let job_id = self
                    .backend
                    .submit(grover.circuit(), &registers, trials)
                    .await?;
                self.transition(ExecutionState::Submitted);
                debug!(job = %job_id, "submitted");
                self.poll(&job_id).await?
            }
        };

        check_outcomes(&result, registers.len(), trials)?;
        self.transition(ExecutionState::Completed);
        Ok(result)
    }

    async fn poll(&mut self, job_id: &JobId) -> GroverResult<ExecutionResult> {
        for attempt in 1..=self.policy.max_polls {
            match self.backend.status(job_id).await? {
                JobStatus::Completed => {
                    debug!(job = %job_id, attempt, "job completed");
                    return Ok(self.backend.result(job_id).await?);
                }
                JobStatus::Failed(reason) => {
                    warn!(job = %job_id, %reason, "job failed");
                    return Err(HalError::JobFailed(reason).into());
                }
                JobStatus::Cancelled => {
                    warn!(job = %job_id, "job cancelled");
                    return Err(HalError::JobCancelled.into());
                }
                status @ (JobStatus::Queued | JobStatus::Running) => {
                    if self.state != ExecutionState::Pending {
                        self.transition(ExecutionState::Pending);
                    }
                    debug!(job = %job_id, attempt, %status, "job pending");
                    if attempt < self.policy.max_polls {
                        self.sleeper.sleep(self.policy.interval).await;
                    }
                }
            }
        }
        Err(GroverError::ExecutionTimeout {
            job: job_id.to_string(),
            polls: self.policy.max_polls,
        })
    }

    fn transition(&mut self, next: ExecutionState) {
        debug!(from = ?self.state, to = ?next, "execution state");
        self.state = next;
    }
}

fn check_outcomes(result: &ExecutionResult, width: usize, trials: u32) -> GroverResult<()> {
    if result.outcomes.len() != trials as usize {
        return Err(HalError::InvalidOutcome(format!(
            "expected {trials} outcomes, backend returned {}",
            result.outcomes.len()
        ))
        .into());
    }
    if let Some(bad) = result.outcomes.iter().find(|o| o.len() != width) {
        return Err(HalError::InvalidOutcome(format!(
            "expected {width} bits per outcome, got {}",
            bad.len()
        ))
        .into());
    }
    Ok(())
}
