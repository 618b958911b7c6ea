//! End-to-end search: allocate, assemble, execute, score.

use std::fmt;

use grover_hal::Backend;
use grover_ir::QubitId;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::assembler::CircuitAssembler;
use crate::decoder::{Accuracy, accuracy, most_frequent};
use crate::error::GroverResult;
use crate::executor::{ExecutionMode, Executor, PollPolicy, Sleeper, TokioSleeper};
use crate::mapping::QubitAllocator;

/// Outcome of one search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchReport {
    /// Data qubits `n`.
    pub qubits: u32,
    /// Marked index `s`.
    pub marked: u64,
    /// Oracle/diffusion rounds.
    pub repeats: u32,
    /// Trials executed.
    pub trials: u32,
    /// How the circuit was executed.
    pub mode: ExecutionMode,
    /// Physical qubits used, data first, ancilla last.
    pub physical_qubits: Vec<QubitId>,
    /// Trials that found `s`.
    pub accuracy: Accuracy,
    /// Most frequent decoded index.
    pub most_frequent: Option<u64>,
}

impl fmt::Display for SearchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "n={} s={} repeats={} accuracy={}",
            self.qubits, self.marked, self.repeats, self.accuracy
        )?;
        if let Some(top) = self.most_frequent {
            write!(f, " most_frequent={top}")?;
        }
        Ok(())
    }
}

/// Runs Grover searches on one backend.
pub struct GroverSearch<'b, S = TokioSleeper> {
    allocator: QubitAllocator,
    executor: Executor<'b, S>,
    trials: u32,
}

impl<'b> GroverSearch<'b> {
    /// Search on `backend` with the given allocator, 1000 trials per run.
    pub fn new(allocator: QubitAllocator, backend: &'b dyn Backend) -> Self {
        Self {
            allocator,
            executor: Executor::new(backend),
            trials: 1000,
        }
    }
}

impl<'b, S: Sleeper> GroverSearch<'b, S> {
    /// Set trials per run.
    pub fn with_trials(mut self, trials: u32) -> Self {
        self.trials = trials;
        self
    }

    /// Set the polling schedule used for noisy runs.
    pub fn with_policy(mut self, policy: PollPolicy) -> Self {
        self.executor = self.executor.with_policy(policy);
        self
    }

    /// Replace the sleeper used between polls.
    pub fn with_sleeper<T: Sleeper>(self, sleeper: T) -> GroverSearch<'b, T> {
        GroverSearch {
            allocator: self.allocator,
            executor: self.executor.with_sleeper(sleeper),
            trials: self.trials,
        }
    }

    /// The allocator.
    pub fn allocator(&self) -> &QubitAllocator {
        &self.allocator
    }

    /// Trials per run.
    pub fn trials(&self) -> u32 {
        self.trials
    }

    /// Search for `s` among `2^n` items.
    #[instrument(skip(self))]
    pub async fn run(&mut self, n: u32, s: u64, mode: ExecutionMode) -> GroverResult<SearchReport> {
        let grover = CircuitAssembler::new(&self.allocator).assemble(n, s)?;
        let result = self.executor.execute(&grover, self.trials, mode).await?;

        let accuracy = accuracy(&result, s)?;
        let most_frequent = most_frequent(&result)?.map(|(value, _)| value);
        info!(n, s, %accuracy, "search finished");

        let mut physical_qubits = grover.data_qubits().to_vec();
        physical_qubits.push(grover.ancilla());

        Ok(SearchReport {
            qubits: n,
            marked: s,
            repeats: grover.repeats(),
            trials: self.trials,
            mode,
            physical_qubits,
            accuracy,
            most_frequent,
        })
    }
}
