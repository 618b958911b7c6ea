//! Simulator backend implementation.

use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rustc_hash::FxHashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use tracing::{debug, instrument};
use uuid::Uuid;

use grover_hal::{
    Backend, BackendAvailability, Capabilities, DeviceProfile, ExecutionResult, HalError,
    HalResult, Job, JobId, JobStatus, NoiseProfile, ValidationResult,
};
use grover_ir::{Circuit, ClbitId};

use crate::program::Program;

/// Default width limit; 2^20 amplitudes is 16 MiB.
const DEFAULT_MAX_QUBITS: u32 = 20;

/// Job data for the simulator.
struct SimJob {
    job: Job,
    result: ExecutionResult,
    /// Status polls left before the job reports `Completed`.
    pending_polls: u32,
}

/// Local simulator backend.
///
/// Executes circuits on a dense statevector. Without a noise profile it
/// evolves the state once and samples every trial from it; with one it runs
/// an independent noisy trajectory per trial.
pub struct SimulatorBackend {
    capabilities: Capabilities,
    noise: NoiseProfile,
    /// Submitted jobs.
    jobs: Arc<Mutex<FxHashMap<String, SimJob>>>,
    /// Maximum number of qubits supported.
    max_qubits: u32,
    /// Polls a submitted job stays pending for.
    pending_polls: u32,
    rng: Mutex<StdRng>,
}

impl SimulatorBackend {
    /// Create a new noiseless simulator with default settings.
    pub fn new() -> Self {
        Self::with_max_qubits(DEFAULT_MAX_QUBITS)
    }

    /// Create a noiseless simulator with custom max qubits.
    pub fn with_max_qubits(max_qubits: u32) -> Self {
        Self {
            capabilities: Capabilities::simulator(max_qubits),
            noise: NoiseProfile::noiseless(),
            jobs: Arc::new(Mutex::new(FxHashMap::default())),
            max_qubits,
            pending_polls: 0,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Create a simulator emulating a named device: its addressable qubits
    /// and its noise.
    pub fn from_device(device: &DeviceProfile) -> HalResult<Self> {
        device.noise.validate()?;
        let max_qubits = device.capabilities.num_qubits.min(DEFAULT_MAX_QUBITS);
        Ok(Self {
            capabilities: device.capabilities.clone(),
            noise: device.noise,
            max_qubits,
            ..Self::with_max_qubits(max_qubits)
        })
    }

    /// Replace the noise profile.
    pub fn with_noise(mut self, noise: NoiseProfile) -> HalResult<Self> {
        noise.validate()?;
        self.capabilities.noise_profile = (!noise.is_noiseless()).then_some(noise);
        self.noise = noise;
        Ok(self)
    }

    /// Seed the sampler for reproducible outcomes.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    /// Keep submitted jobs `Queued`/`Running` for `polls` status calls.
    pub fn with_pending_polls(mut self, polls: u32) -> Self {
        self.pending_polls = polls;
        self
    }

    /// The noise profile applied to every run.
    pub fn noise(&self) -> &NoiseProfile {
        &self.noise
    }

    fn check(&self, circuit: &Circuit, trials: u32) -> HalResult<()> {
        if circuit.num_qubits() > self.max_qubits as usize {
            return Err(HalError::CircuitTooLarge(format!(
                "Circuit has {} qubits but simulator only supports {}",
                circuit.num_qubits(),
                self.max_qubits
            )));
        }
        if trials == 0 || trials > self.capabilities.max_shots {
            return Err(HalError::InvalidShots(format!(
                "{trials} trials requested, limit is 1..={}",
                self.capabilities.max_shots
            )));
        }
        if let Some(reasons) = self.validation(circuit).describe() {
            return Err(HalError::InvalidCircuit(reasons));
        }
        Ok(())
    }

    fn validation(&self, circuit: &Circuit) -> ValidationResult {
        let mut reasons = Vec::new();
        if circuit.num_qubits() > self.max_qubits as usize {
            reasons.push(format!(
                "{} qubits exceed the limit of {}",
                circuit.num_qubits(),
                self.max_qubits
            ));
        }
        for &q in circuit.qubits() {
            if !self.capabilities.supports_qubit(q) {
                reasons.push(format!("qubit {q} is not addressable"));
            }
        }
        for instruction in circuit.instructions() {
            if let Some(gate) = instruction.as_gate() {
                if !self.capabilities.gate_set.contains(gate) {
                    reasons.push(format!("gate '{}' is not supported", gate.name()));
                }
            }
        }
        ValidationResult::from_reasons(reasons)
    }

    /// Run simulation synchronously.
    #[instrument(skip(self, circuit, registers), fields(circuit = circuit.name()))]
    fn run_simulation(
        &self,
        circuit: &Circuit,
        registers: &[ClbitId],
        trials: u32,
    ) -> HalResult<ExecutionResult> {
        let start = Instant::now();
        let program = Program::compile(circuit, registers)?;
        debug!(
            "Starting simulation: {} qubits, {} gates, {} trials, noisy = {}",
            program.num_qubits(),
            program.num_ops(),
            trials,
            !self.noise.is_noiseless()
        );

        let outcomes = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            if self.noise.is_noiseless() {
                program.run_noiseless(trials, &mut *rng)
            } else {
                program.run_noisy(trials, &self.noise, &mut *rng)
            }
        };

        let elapsed = start.elapsed();
        debug!("Simulation completed in {:?}", elapsed);

        Ok(ExecutionResult::new(outcomes)
            .with_execution_time(elapsed.as_millis() as u64)
            .with_metadata(serde_json::json!({
                "backend": self.capabilities.name,
                "qubits": program.num_qubits(),
                "noisy": !self.noise.is_noiseless(),
            })))
    }
}

impl Default for SimulatorBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for SimulatorBackend {
    fn name(&self) -> &str {
        &self.capabilities.name
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    async fn availability(&self) -> HalResult<BackendAvailability> {
        let jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        let pending = jobs.values().filter(|j| j.job.status.is_pending()).count();
        Ok(BackendAvailability::with_queue(pending as u32))
    }

    async fn validate(&self, circuit: &Circuit) -> HalResult<ValidationResult> {
        Ok(self.validation(circuit))
    }

    #[instrument(skip(self, circuit, registers))]
    async fn run(
        &self,
        circuit: &Circuit,
        registers: &[ClbitId],
        trials: u32,
    ) -> HalResult<ExecutionResult> {
        self.check(circuit, trials)?;
        self.run_simulation(circuit, registers, trials)
    }

    #[instrument(skip(self, circuit, registers))]
    async fn submit(
        &self,
        circuit: &Circuit,
        registers: &[ClbitId],
        trials: u32,
    ) -> HalResult<JobId> {
        self.check(circuit, trials)?;

        let job_id = JobId::new(Uuid::new_v4().to_string());
        let job = Job::new(job_id.clone(), trials).with_backend(self.name());

        // Results are computed eagerly; status polling only replays the queue.
        let result = self.run_simulation(circuit, registers, trials)?;

        let mut jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        jobs.insert(
            job_id.0.clone(),
            SimJob {
                job,
                result,
                pending_polls: self.pending_polls,
            },
        );

        debug!("Submitted job: {}", job_id);
        Ok(job_id)
    }

    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus> {
        let mut jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        let sim_job = jobs
            .get_mut(&job_id.0)
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))?;

        if sim_job.pending_polls == 0 {
            sim_job.job.transition(JobStatus::Completed);
            return Ok(sim_job.job.status.clone());
        }
        sim_job.pending_polls -= 1;
        let reported = sim_job.job.status.clone();
        sim_job.job.transition(JobStatus::Running);
        Ok(reported)
    }

    async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        let jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        let sim_job = jobs
            .get(&job_id.0)
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))?;
        if !sim_job.job.status.is_success() {
            return Err(HalError::JobNotComplete(job_id.0.clone()));
        }
        Ok(sim_job.result.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grover_hal::device_profile;
    use grover_ir::{QubitId, UnitaryMatrix};

    fn bell(q0: u32, q1: u32) -> Circuit {
        let mut cnot = UnitaryMatrix::identity(2).unwrap();
        cnot.swap_columns(2, 3).unwrap();

        let mut circuit = Circuit::with_qubits("bell", [QubitId(q0), QubitId(q1)], 2);
        circuit.define_unitary("cnot", cnot).unwrap();
        circuit.h(QubitId(q0)).unwrap();
        circuit
            .apply_unitary("cnot", [QubitId(q0), QubitId(q1)])
            .unwrap();
        circuit.measure(QubitId(q0), ClbitId(0)).unwrap();
        circuit.measure(QubitId(q1), ClbitId(1)).unwrap();
        circuit
    }

    const REGISTERS: [ClbitId; 2] = [ClbitId(0), ClbitId(1)];

    #[test]
    fn test_simulator_capabilities() {
        let backend = SimulatorBackend::new();
        let caps = backend.capabilities();

        assert!(caps.is_simulator);
        assert_eq!(caps.num_qubits, 20);
        assert!(backend.noise().is_noiseless());
    }

    #[tokio::test]
    async fn test_simulator_bell_state() {
        let backend = SimulatorBackend::new().with_seed(11);

        let result = backend.run(&bell(11, 6), &REGISTERS, 1000).await.unwrap();
        assert_eq!(result.shots, 1000);
        assert_eq!(result.width(), Some(2));

        let counts = result.counts();
        assert_eq!(counts.get("00") + counts.get("11"), 1000);
        assert_eq!(counts.get("01") + counts.get("10"), 0);
    }

    #[tokio::test]
    async fn test_submit_reports_pending_then_completed() {
        let backend = SimulatorBackend::new().with_pending_polls(2).with_seed(3);

        let job_id = backend.submit(&bell(0, 1), &REGISTERS, 100).await.unwrap();
        assert!(matches!(
            backend.result(&job_id).await,
            Err(HalError::JobNotComplete(_))
        ));
        assert_eq!(
            backend.availability().await.unwrap().queue_depth,
            Some(1)
        );

        assert_eq!(backend.status(&job_id).await.unwrap(), JobStatus::Queued);
        assert_eq!(backend.status(&job_id).await.unwrap(), JobStatus::Running);
        assert_eq!(backend.status(&job_id).await.unwrap(), JobStatus::Completed);
        assert_eq!(backend.status(&job_id).await.unwrap(), JobStatus::Completed);

        let result = backend.result(&job_id).await.unwrap();
        assert_eq!(result.outcomes.len(), 100);
    }

    #[tokio::test]
    async fn test_unknown_job() {
        let backend = SimulatorBackend::new();
        let missing = JobId::new("missing");
        assert!(matches!(
            backend.status(&missing).await,
            Err(HalError::JobNotFound(_))
        ));
        assert!(matches!(
            backend.result(&missing).await,
            Err(HalError::JobNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_simulator_too_many_qubits() {
        let backend = SimulatorBackend::with_max_qubits(1);
        let result = backend.run(&bell(0, 1), &REGISTERS, 100).await;
        assert!(matches!(result, Err(HalError::CircuitTooLarge(_))));
    }

    #[tokio::test]
    async fn test_zero_trials_rejected() {
        let backend = SimulatorBackend::new();
        let result = backend.submit(&bell(0, 1), &REGISTERS, 0).await;
        assert!(matches!(result, Err(HalError::InvalidShots(_))));
    }

    #[tokio::test]
    async fn test_device_rejects_missing_qubit() {
        let device = device_profile("19q-acorn").unwrap();
        let backend = SimulatorBackend::from_device(&device).unwrap();
        assert!(!backend.noise().is_noiseless());

        let validation = backend.validate(&bell(3, 4)).await.unwrap();
        assert!(!validation.is_valid());
        assert!(validation.describe().unwrap().contains("q3"));

        let result = backend.run(&bell(3, 4), &REGISTERS, 10).await;
        assert!(matches!(result, Err(HalError::InvalidCircuit(_))));

        assert!(backend.validate(&bell(11, 6)).await.unwrap().is_valid());
    }

    #[tokio::test]
    async fn test_noisy_device_produces_errors() {
        let device = device_profile("19q-acorn").unwrap();
        let backend = SimulatorBackend::from_device(&device).unwrap().with_seed(17);

        let result = backend.run(&bell(11, 6), &REGISTERS, 2000).await.unwrap();
        let counts = result.counts();
        let wrong = counts.get("01") + counts.get("10");
        assert!(wrong > 0, "noise should produce uncorrelated outcomes");
        assert!(wrong < 1000, "noise should not dominate: {wrong}");
    }

    #[test]
    fn test_with_noise_validates() {
        let bad = NoiseProfile {
            multi_qubit_error: -0.1,
            ..NoiseProfile::default()
        };
        assert!(SimulatorBackend::new().with_noise(bad).is_err());

        let good = NoiseProfile {
            readout_error: 0.02,
            ..NoiseProfile::default()
        };
        let backend = SimulatorBackend::new().with_noise(good).unwrap();
        assert!(backend.capabilities().is_noisy());
    }
}
