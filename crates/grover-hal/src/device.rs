//! Named device profiles.
//!
//! A [`DeviceProfile`] bundles the capabilities and noise a backend should
//! emulate. Profiles are looked up by name, case-insensitively, so
//! `"19Q-Acorn"` and `"19q-acorn"` select the same device.

use grover_ir::QubitId;
use serde::{Deserialize, Serialize};

use crate::capability::{Capabilities, NoiseProfile};
use crate::error::{HalError, HalResult};

/// Name of the 19-qubit noisy device model.
pub const ACORN: &str = "19q-acorn";

/// Name of the noiseless profile.
pub const IDEAL: &str = "ideal";

/// Capabilities plus noise for a named device.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceProfile {
    /// Canonical (lowercase) profile name.
    pub name: String,
    /// What the device can address and execute.
    pub capabilities: Capabilities,
    /// Noise injected when running on it.
    pub noise: NoiseProfile,
}

impl DeviceProfile {
    /// Whether running on this device injects noise.
    pub fn is_noisy(&self) -> bool {
        !self.noise.is_noiseless()
    }

    fn acorn() -> Self {
        // Ids 0..=19 with qubit 3 unavailable.
        let qubits = (0..=19).filter(|&id| id != 3).map(QubitId);
        let noise = NoiseProfile {
            single_qubit_error: 0.01,
            multi_qubit_error: 0.03,
            readout_error: 0.05,
        };
        let capabilities = Capabilities::simulator(0)
            .with_name(ACORN)
            .with_qubits(qubits)
            .with_noise_profile(noise);
        Self {
            name: ACORN.into(),
            capabilities: Capabilities {
                is_simulator: false,
                max_shots: 10_000,
                ..capabilities
            },
            noise,
        }
    }

    fn ideal() -> Self {
        Self {
            name: IDEAL.into(),
            capabilities: Capabilities::simulator(20).with_name(IDEAL),
            noise: NoiseProfile::noiseless(),
        }
    }
}

/// Look up a device profile by name.
pub fn device_profile(name: &str) -> HalResult<DeviceProfile> {
    match name.trim().to_ascii_lowercase().as_str() {
        ACORN => Ok(DeviceProfile::acorn()),
        IDEAL => Ok(DeviceProfile::ideal()),
        _ => Err(HalError::UnknownDevice(name.to_string())),
    }
}

/// Names accepted by [`device_profile`].
pub fn available_devices() -> &'static [&'static str] {
    &[ACORN, IDEAL]
}
