//! Grover Hardware Abstraction Layer
//!
//! This crate defines the contract between the Grover search core and
//! whatever executes its circuits: a local simulator, a noisy device model,
//! or a remote service.
//!
//! # Overview
//!
//! The HAL provides:
//! - A common [`Backend`] trait with a blocking [`Backend::run`] path and a
//!   job-based [`Backend::submit`] / [`Backend::status`] / [`Backend::result`]
//!   path
//! - [`Capabilities`] describing addressable qubits, gates, and shot limits
//! - [`NoiseProfile`] and named [`DeviceProfile`]s for noisy execution
//! - [`ExecutionResult`], an ordered list of per-trial [`TrialOutcome`]s,
//!   with [`Counts`] as a derived histogram
//!
//! # Lifecycle
//!
//! ```text
//!   capabilities() ──→ validate() ──→ run()                         (blocking)
//!                                 └─→ submit() ──→ status()* ──→ result()  (job)
//! ```
//!
//! # Implementing a Backend
//!
//! ```ignore
//! use grover_hal::{
//!     Backend, BackendAvailability, Capabilities, ExecutionResult, HalResult, JobId,
//!     JobStatus, ValidationResult,
//! };
//! use grover_ir::{Circuit, ClbitId};
//! use async_trait::async_trait;
//!
//! struct MyBackend {
//!     capabilities: Capabilities,
//! }
//!
//! #[async_trait]
//! impl Backend for MyBackend {
//!     fn name(&self) -> &str { "my_backend" }
//!     fn capabilities(&self) -> &Capabilities { &self.capabilities }
//!     async fn availability(&self) -> HalResult<BackendAvailability> {
//!         Ok(BackendAvailability::always_available())
//!     }
//!     async fn validate(&self, circuit: &Circuit) -> HalResult<ValidationResult> {
//!         Ok(ValidationResult::Valid)
//!     }
//!     // run, submit, status, result ...
//! }
//! ```

pub mod backend;
pub mod capability;
pub mod device;
pub mod error;
pub mod job;
pub mod result;

pub use backend::{Backend, BackendAvailability, ValidationResult};
pub use capability::{Capabilities, GateSet, NoiseProfile};
pub use device::{DeviceProfile, available_devices, device_profile};
pub use error::{HalError, HalResult};
pub use job::{Job, JobId, JobStatus};
pub use result::{Counts, ExecutionResult, TrialOutcome};
