//! Grover Local Statevector Simulator
//!
//! A [`Backend`](grover_hal::Backend) that runs Grover search circuits on a
//! dense statevector, with an optional noise model taken from a
//! [`DeviceProfile`](grover_hal::DeviceProfile).
//!
//! # Features
//!
//! - **Exact evolution**: H, X, and dense named unitaries on the qubits the
//!   circuit declares (physical ids are compacted)
//! - **Noise**: per-trial Pauli faults after every gate plus readout flips
//! - **Job queue emulation**: submitted jobs stay pending for a configurable
//!   number of status polls
//! - **Reproducible**: optional sampler seed
//!
//! # Example
//!
//! ```ignore
//! use grover_adapter_sim::SimulatorBackend;
//! use grover_hal::{Backend, device_profile};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let device = device_profile("19q-acorn")?;
//!     let backend = SimulatorBackend::from_device(&device)?.with_seed(7);
//!
//!     let circuit = build_circuit()?;
//!     let result = backend.run(&circuit, &registers, 1000).await?;
//!     println!("{:?}", result.counts().most_frequent());
//!     Ok(())
//! }
//! ```

mod program;
mod simulator;
mod statevector;

pub use simulator::SimulatorBackend;
