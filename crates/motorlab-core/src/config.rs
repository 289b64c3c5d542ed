use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::params::PhysicalParameters;
use crate::presets;

// ---------------------------------------------------------------------------
// Serde default functions
// ---------------------------------------------------------------------------

const fn default_duration() -> f64 {
    3.0
}
const fn default_dt() -> f64 {
    0.001
}
const fn default_amplitude() -> f64 {
    1.0
}

// ---------------------------------------------------------------------------
// SimulationConfig
// ---------------------------------------------------------------------------

/// Largest time grid a single step response may allocate.
pub const MAX_SAMPLES: usize = 10_000_000;

/// Step-response simulation settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationConfig {
    /// Simulated time span in seconds (default: 3.0).
    #[serde(default = "default_duration")]
    pub duration: f64,

    /// Sample period in seconds (default: 0.001 = 1000 Hz).
    #[serde(default = "default_dt")]
    pub dt: f64,

    /// Step input amplitude in volts (default: 1.0).
    #[serde(default = "default_amplitude")]
    pub amplitude: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            duration: default_duration(),
            dt: default_dt(),
            amplitude: default_amplitude(),
        }
    }
}

impl SimulationConfig {
    /// Validate configuration. Returns Err on invalid values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(invalid("simulation.dt", format!("{} (must be > 0)", self.dt)));
        }
        if !self.duration.is_finite() || self.duration < self.dt {
            return Err(invalid(
                "simulation.duration",
                format!("{} (must be >= dt = {})", self.duration, self.dt),
            ));
        }
        if self.samples().is_none() {
            return Err(invalid(
                "simulation.duration",
                format!(
                    "{} at dt = {} needs more than {MAX_SAMPLES} samples",
                    self.duration, self.dt
                ),
            ));
        }
        if !self.amplitude.is_finite() {
            return Err(invalid(
                "simulation.amplitude",
                format!("{} (must be finite)", self.amplitude),
            ));
        }
        Ok(())
    }

    /// Number of samples produced, including `t = 0`.
    ///
    /// `None` when the grid would exceed [`MAX_SAMPLES`] or `duration / dt`
    /// is not a finite non-negative ratio.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn samples(&self) -> Option<usize> {
        let steps = (self.duration / self.dt + 1e-9).floor();
        if !(steps >= 0.0 && steps < MAX_SAMPLES as f64) {
            return None;
        }
        (steps as usize).checked_add(1)
    }
}

fn invalid(field: &str, message: String) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_owned(),
        message,
    }
}

// ---------------------------------------------------------------------------
// MotorConfig
// ---------------------------------------------------------------------------

/// Motor parameters plus simulation settings, as stored in a TOML file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MotorConfig {
    /// Physical constants, validated on deserialization.
    pub motor: PhysicalParameters,

    #[serde(default)]
    pub simulation: SimulationConfig,
}

impl Default for MotorConfig {
    fn default() -> Self {
        Self {
            motor: presets::speed_example(),
            simulation: SimulationConfig::default(),
        }
    }
}

impl MotorConfig {
    /// Validate configuration. Motor parameters are already validated on
    /// construction, so only the simulation block is checked.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.simulation.validate()
    }

    /// Parse from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from TOML file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r"
[motor]
inertia = 0.01
damping = 0.1
motor_constant = 0.01
resistance = 1.0
inductance = 0.5

[simulation]
duration = 2.0
dt = 0.01
amplitude = 12.0
";

    #[test]
    fn simulation_defaults() {
        let sim = SimulationConfig::default();
        assert!((sim.duration - 3.0).abs() < f64::EPSILON);
        assert!((sim.dt - 0.001).abs() < f64::EPSILON);
        assert!((sim.amplitude - 1.0).abs() < f64::EPSILON);
        assert!(sim.validate().is_ok());
    }

    #[test]
    fn default_config_is_speed_example() {
        let config = MotorConfig::default();
        assert_eq!(config.motor, presets::speed_example());
    }

    #[test]
    fn samples_include_endpoints() {
        let sim = SimulationConfig {
            duration: 1.0,
            dt: 0.1,
            amplitude: 1.0,
        };
        assert_eq!(sim.samples(), Some(11));
    }

    #[test]
    fn parse_full_file() {
        let config = MotorConfig::from_toml_str(FULL).unwrap();
        assert_eq!(config.motor, presets::speed_example());
        assert!((config.simulation.duration - 2.0).abs() < f64::EPSILON);
        assert!((config.simulation.amplitude - 12.0).abs() < f64::EPSILON);
    }

    #[test]
    fn simulation_block_optional() {
        let text = "[motor]\nJ = 0.01\nb = 0.1\nK = 0.01\nR = 1.0\nL = 0.5\n";
        let config = MotorConfig::from_toml_str(text).unwrap();
        assert_eq!(config.simulation, SimulationConfig::default());
    }

    #[test]
    fn motor_block_required() {
        let err = MotorConfig::from_toml_str("[simulation]\ndt = 0.01\n").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn invalid_motor_rejected_at_parse() {
        let text = "[motor]\nJ = 0.01\nb = 0.1\nK = 0.01\nR = 1.0\nL = 0.0\n";
        let err = MotorConfig::from_toml_str(text).unwrap_err();
        assert!(err.to_string().contains("L = 0"));
    }

    #[test]
    fn invalid_dt_rejected() {
        let sim = SimulationConfig {
            dt: 0.0,
            ..SimulationConfig::default()
        };
        assert!(matches!(
            sim.validate(),
            Err(ConfigError::InvalidValue { field, .. }) if field == "simulation.dt"
        ));
    }

    #[test]
    fn duration_shorter_than_dt_rejected() {
        let sim = SimulationConfig {
            duration: 0.0005,
            ..SimulationConfig::default()
        };
        assert!(matches!(
            sim.validate(),
            Err(ConfigError::InvalidValue { field, .. }) if field == "simulation.duration"
        ));
    }

    #[test]
    fn from_file_missing_path_is_io_error() {
        let err = MotorConfig::from_file("/nonexistent/motor.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn round_trip_through_toml() {
        let config = MotorConfig::from_toml_str(FULL).unwrap();
        let text = toml::to_string(&config).unwrap();
        assert_eq!(MotorConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn shipped_speed_config_matches_preset() {
        let config =
            MotorConfig::from_toml_str(include_str!("../../../configs/speed_motor.toml")).unwrap();
        assert_eq!(config.motor, crate::presets::speed_example());
        assert_eq!(config.simulation.samples(), Some(3001));
    }

    #[test]
    fn oversized_grid_has_no_sample_count() {
        let sim = SimulationConfig {
            duration: 1e300,
            dt: 1e-300,
            amplitude: 1.0,
        };
        assert_eq!(sim.samples(), None);
        assert!(matches!(
            sim.validate(),
            Err(ConfigError::InvalidValue { field, .. }) if field == "simulation.duration"
        ));
    }

    #[test]
    fn grid_at_sample_limit() {
        let at_limit = SimulationConfig {
            duration: (MAX_SAMPLES - 1) as f64,
            dt: 1.0,
            amplitude: 1.0,
        };
        assert_eq!(at_limit.samples(), Some(MAX_SAMPLES));
        assert!(at_limit.validate().is_ok());

        let over = SimulationConfig {
            duration: MAX_SAMPLES as f64,
            ..at_limit
        };
        assert_eq!(over.samples(), None);
        assert!(over.validate().is_err());
    }
}
