//! Grover search simulation.
//!
//! Given `n` data qubits and a marked index `s < 2^n`, this crate builds the
//! Grover circuit that amplifies `|s⟩`, executes it on a
//! [`Backend`](grover_hal::Backend), and reports how often the measured
//! register decoded to `s`.
//!
//! # Pipeline
//!
//! ```text
//! QubitAllocator ──→ oracle_matrix / diffusion_matrix ──→ CircuitAssembler
//!                                                             │
//!                    accuracy ←── decode ←── Executor ←───────┘
//! ```
//!
//! - [`QubitAllocator`] maps logical positions onto a fixed list of physical
//!   qubits ([`QubitMapping`]).
//! - [`oracle_matrix`] builds `Uf`, the permutation flipping the ancilla
//!   when the data register holds `s`; [`diffusion_matrix`] builds the
//!   inversion about `|0…0⟩`.
//! - [`CircuitAssembler`] emits state preparation, [`iteration_count`]
//!   rounds of oracle plus diffusion, and measurement.
//! - [`Executor`] runs the circuit synchronously (noiseless) or as a polled
//!   job (noisy).
//! - [`decode`] and [`accuracy`] score the outcomes.
//!
//! [`GroverSearch`] wires the whole chain for one `(n, s)` pair.
//!
//! # Example
//!
//! ```ignore
//! use grover_adapter_sim::SimulatorBackend;
//! use grover_core::{ExecutionMode, GroverSearch, QubitAllocator};
//!
//! let backend = SimulatorBackend::new();
//! let mut search = GroverSearch::new(QubitAllocator::default(), &backend).with_trials(1000);
//! let report = search.run(2, 3, ExecutionMode::Noiseless).await?;
//! assert!(report.accuracy.value() > 0.25);
//! ```

pub mod assembler;
pub mod config;
pub mod decoder;
pub mod error;
pub mod executor;
pub mod mapping;
pub mod operators;
pub mod search;

pub use assembler::{CircuitAssembler, DIFFUSION_NAME, GroverCircuit, ORACLE_NAME};
pub use config::{GroverConfig, PollConfig};
pub use decoder::{Accuracy, accuracy, decode, decode_outcome, most_frequent};
pub use error::{GroverError, GroverResult};
pub use executor::{
    ExecutionMode, ExecutionState, Executor, PollPolicy, RecordingSleeper, Sleeper, TokioSleeper,
};
pub use mapping::{QubitAllocator, QubitMapping, REFERENCE_MAPPING};
pub use operators::{diffusion_matrix, iteration_count, oracle_matrix};
pub use search::{GroverSearch, SearchReport};
