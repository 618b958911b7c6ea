//! Search configuration.
//!
//! Loaded from a YAML or JSON file (chosen by extension, YAML otherwise),
//! then overridden by `GROVER_*` environment variables. Every field has a
//! default, so an empty file is a valid configuration.
//!
//! ```yaml
//! mapping: [11, 6, 16, 17, 10, 12, 7, 1, 5, 0]
//! trials: 1000
//! device: 19q-acorn
//! seed: 42
//! poll:
//!   interval_ms: 100
//!   max_polls: 3000
//! ```

use std::path::Path;
use std::time::Duration;

use grover_hal::device_profile;
use serde::{Deserialize, Serialize};

use crate::error::{GroverError, GroverResult};
use crate::executor::PollPolicy;
use crate::mapping::QubitMapping;

/// Complete search configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroverConfig {
    /// Physical qubits in allocation order.
    #[serde(default)]
    pub mapping: QubitMapping,

    /// Trials per search.
    #[serde(default = "default_trials")]
    pub trials: u32,

    /// Polling schedule for noisy runs.
    #[serde(default)]
    pub poll: PollConfig,

    /// Device profile used for noisy runs.
    #[serde(default = "default_device")]
    pub device: String,

    /// Sampler seed; unseeded runs draw from OS entropy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// Polling settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PollConfig {
    /// Milliseconds between status checks.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Status checks before giving up.
    #[serde(default = "default_max_polls")]
    pub max_polls: u32,
}

fn default_trials() -> u32 {
    1000
}

fn default_device() -> String {
    "19q-acorn".to_string()
}

fn default_interval_ms() -> u64 {
    100
}

fn default_max_polls() -> u32 {
    3_000
}

impl Default for GroverConfig {
    fn default() -> Self {
        Self {
            mapping: QubitMapping::reference(),
            trials: default_trials(),
            poll: PollConfig::default(),
            device: default_device(),
            seed: None,
        }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            max_polls: default_max_polls(),
        }
    }
}

impl GroverConfig {
    /// Parse YAML.
    pub fn from_yaml(contents: &str) -> GroverResult<Self> {
        // An empty document parses as unit, not as an empty mapping.
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml_ng::from_str(contents).map_err(|e| GroverError::Config(e.to_string()))
    }

    /// Parse JSON.
    pub fn from_json(contents: &str) -> GroverResult<Self> {
        serde_json::from_str(contents).map_err(|e| GroverError::Config(e.to_string()))
    }

    /// Load from a file; `.json` files are parsed as JSON, anything else as YAML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> GroverResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| GroverError::Config(format!("{}: {e}", path.display())))?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json(&contents)
        } else {
            Self::from_yaml(&contents)
        }
    }

    /// Load with the following precedence:
    /// 1. Environment variables
    /// 2. Configuration file, if given
    /// 3. Defaults
    pub fn load(config_file: Option<&Path>) -> GroverResult<Self> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = config.merge_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `GROVER_TRIALS`, `GROVER_DEVICE` and `GROVER_SEED` from `lookup`.
    pub fn merge_env(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> GroverResult<Self> {
        if let Some(v) = lookup("GROVER_TRIALS") {
            self.trials = parse_env("GROVER_TRIALS", &v)?;
        }
        if let Some(v) = lookup("GROVER_DEVICE") {
            self.device = v;
        }
        if let Some(v) = lookup("GROVER_SEED") {
            self.seed = Some(parse_env("GROVER_SEED", &v)?);
        }
        Ok(self)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> GroverResult<()> {
        if self.trials == 0 {
            return Err(GroverError::Config("trials must be at least 1".into()));
        }
        if self.poll.max_polls == 0 {
            return Err(GroverError::Config("poll.max_polls must be at least 1".into()));
        }
        if self.mapping.len() < 2 {
            return Err(GroverError::Config(
                "mapping needs at least two qubits (one data qubit plus the ancilla)".into(),
            ));
        }
        device_profile(&self.device)?;
        Ok(())
    }

    /// The polling schedule.
    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy::new(
            Duration::from_millis(self.poll.interval_ms),
            self.poll.max_polls,
        )
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> GroverResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| GroverError::Config(format!("{key}={value} is not a valid number")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use grover_hal::HalError;
    use grover_ir::QubitId;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = GroverConfig::default();
        assert_eq!(config.mapping, QubitMapping::reference());
        assert_eq!(config.trials, 1000);
        assert_eq!(config.device, "19q-acorn");
        assert_eq!(config.seed, None);
        assert_eq!(config.poll_policy(), PollPolicy::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_partial() {
        let config = GroverConfig::from_yaml("trials: 250\npoll:\n  interval_ms: 5\n").unwrap();
        assert_eq!(config.trials, 250);
        assert_eq!(config.poll.interval_ms, 5);
        assert_eq!(config.poll.max_polls, 3_000);
        assert_eq!(config.device, "19q-acorn");
    }

    #[test]
    fn test_yaml_empty_is_default() {
        assert_eq!(GroverConfig::from_yaml("").unwrap(), GroverConfig::default());
    }

    #[test]
    fn test_yaml_rejects_unknown_and_bad_mapping() {
        assert!(matches!(
            GroverConfig::from_yaml("shots: 10"),
            Err(GroverError::Config(_))
        ));
        assert!(matches!(
            GroverConfig::from_yaml("mapping: [1, 1]"),
            Err(GroverError::Config(_))
        ));
    }

    #[test]
    fn test_json() {
        let config =
            GroverConfig::from_json(r#"{"mapping": [3, 4, 5], "seed": 9, "device": "ideal"}"#)
                .unwrap();
        assert_eq!(config.mapping.ids(), &[QubitId(3), QubitId(4), QubitId(5)]);
        assert_eq!(config.seed, Some(9));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file_by_extension() {
        let mut yaml = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(yaml, "trials: 42").unwrap();
        assert_eq!(GroverConfig::from_file(yaml.path()).unwrap().trials, 42);

        let mut json = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        writeln!(json, r#"{{"trials": 43}}"#).unwrap();
        assert_eq!(GroverConfig::from_file(json.path()).unwrap().trials, 43);

        assert!(GroverConfig::from_file("/nonexistent/grover.yaml").is_err());
    }

    #[test]
    fn test_merge_env() {
        let env = |key: &str| match key {
            "GROVER_TRIALS" => Some("10".to_string()),
            "GROVER_SEED" => Some("7".to_string()),
            _ => None,
        };
        let config = GroverConfig::default().merge_env(env).unwrap();
        assert_eq!(config.trials, 10);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.device, "19q-acorn");

        let bad = |key: &str| (key == "GROVER_TRIALS").then(|| "many".to_string());
        assert!(matches!(
            GroverConfig::default().merge_env(bad),
            Err(GroverError::Config(_))
        ));
    }

    #[test]
    fn test_validate() {
        let config = GroverConfig {
            trials: 0,
            ..GroverConfig::default()
        };
        assert!(matches!(config.validate(), Err(GroverError::Config(_))));

        let config = GroverConfig {
            device: "9q-square".into(),
            ..GroverConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(GroverError::Backend(HalError::UnknownDevice(_)))
        ));

        let config = GroverConfig {
            mapping: QubitMapping::new([QubitId(1)]).unwrap(),
            ..GroverConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
