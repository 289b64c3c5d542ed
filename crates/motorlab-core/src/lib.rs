// motorlab-core: physical parameters, configuration, presets and errors for DC motor modeling.

pub mod config;
pub mod error;
pub mod params;
pub mod presets;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::config::{MotorConfig, SimulationConfig};
    pub use crate::error::{ConfigError, InvalidParameterError, ModelError, MotorError};
    pub use crate::params::PhysicalParameters;
    pub use crate::presets;
}
