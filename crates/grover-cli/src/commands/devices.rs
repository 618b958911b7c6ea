//! Devices command implementation.

use anyhow::{Context, Result};
use console::style;

use grover_adapter_sim::SimulatorBackend;
use grover_hal::{Backend, available_devices, device_profile};

/// Execute the devices command.
pub async fn execute() -> Result<()> {
    println!("{} Available devices:\n", style("Grover").cyan().bold());

    for name in available_devices() {
        let device = device_profile(name)?;
        let backend = SimulatorBackend::from_device(&device)
            .with_context(|| format!("Failed to configure device '{name}'"))?;
        let caps = backend.capabilities();
        let available = backend.availability().await?.is_available;

        println!(
            "  {} {} {}",
            if available {
                style("●").green()
            } else {
                style("○").red()
            },
            style(&device.name).bold(),
            if caps.is_simulator { "(ideal)" } else { "(noisy model)" }
        );
        println!("    Qubits: {}", caps.num_qubits);
        println!("    Max shots: {}", caps.max_shots);
        if device.is_noisy() {
            let noise = &device.noise;
            println!(
                "    Noise: 1q {:.3}, multi-qubit {:.3}, readout {:.3}",
                noise.single_qubit_error, noise.multi_qubit_error, noise.readout_error
            );
        }
        println!();
    }

    Ok(())
}
