//! Shared helpers for CLI commands.

use std::path::Path;

use anyhow::{Context, Result};

use grover_adapter_sim::SimulatorBackend;
use grover_core::{ExecutionMode, GroverConfig, QubitAllocator};
use grover_hal::device_profile;

use crate::SearchArgs;

/// Load the configuration file (if any), then apply command-line overrides.
pub fn load_config(path: Option<&Path>, args: &SearchArgs) -> Result<GroverConfig> {
    let mut config = GroverConfig::load(path).with_context(|| match path {
        Some(p) => format!("Failed to load configuration from {}", p.display()),
        None => "Invalid configuration".to_string(),
    })?;

    if let Some(trials) = args.trials {
        config.trials = trials;
    }
    if let Some(device) = &args.device {
        config.device.clone_from(device);
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    config
        .validate()
        .context("Invalid command-line overrides")?;
    Ok(config)
}

/// Execution mode selected by `--noisy`.
pub fn execution_mode(args: &SearchArgs) -> ExecutionMode {
    if args.noisy {
        ExecutionMode::Noisy
    } else {
        ExecutionMode::Noiseless
    }
}

/// Build the simulator for a run: noiseless by default, or loaded with the
/// configured device profile in noisy mode.
pub fn create_backend(config: &GroverConfig, mode: ExecutionMode) -> Result<SimulatorBackend> {
    let backend = match mode {
        ExecutionMode::Noiseless => SimulatorBackend::new(),
        ExecutionMode::Noisy => {
            let device = device_profile(&config.device)
                .with_context(|| format!("Unknown device: '{}'", config.device))?;
            SimulatorBackend::from_device(&device)
                .with_context(|| format!("Failed to configure device '{}'", device.name))?
        }
    };

    Ok(match config.seed {
        Some(seed) => backend.with_seed(seed),
        None => backend,
    })
}

/// Allocator over the configured physical qubits.
pub fn create_allocator(config: &GroverConfig) -> QubitAllocator {
    QubitAllocator::new(config.mapping.clone())
}
