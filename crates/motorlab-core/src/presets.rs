//! Reference motor parameter sets.

use crate::error::ConfigError;
use crate::params::PhysicalParameters;

/// Names accepted by [`by_name`].
pub const NAMES: [&str; 2] = ["speed", "position"];

/// Small brushed motor used for speed control:
/// `J=0.01, b=0.1, K=0.01, R=1, L=0.5`.
pub fn speed_example() -> PhysicalParameters {
    PhysicalParameters::new(0.01, 0.1, 0.01, 1.0, 0.5)
        .unwrap_or_else(|_| unreachable!("speed preset is valid"))
}

/// Miniature servo motor used for position control:
/// `J=3.2284e-6, b=3.5077e-6, K=0.0274, R=4, L=2.75e-6`.
pub fn position_example() -> PhysicalParameters {
    PhysicalParameters::new(3.2284e-6, 3.5077e-6, 0.0274, 4.0, 2.75e-6)
        .unwrap_or_else(|_| unreachable!("position preset is valid"))
}

/// Look up a preset by name (case-insensitive).
pub fn by_name(name: &str) -> Result<PhysicalParameters, ConfigError> {
    match name.to_ascii_lowercase().as_str() {
        "speed" => Ok(speed_example()),
        "position" => Ok(position_example()),
        _ => Err(ConfigError::UnknownPreset(name.to_owned())),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
