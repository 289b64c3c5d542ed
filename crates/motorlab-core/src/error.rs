use thiserror::Error;

/// Top-level error type for motorlab.
#[derive(Debug, Error)]
pub enum MotorError {
    #[error("Parameter error: {0}")]
    Parameter(#[from] InvalidParameterError),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// A physical parameter violates its precondition.
///
/// Copy + static strings so it can travel through every layer unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("Invalid parameter {name} = {value} (must be {requirement})")]
pub struct InvalidParameterError {
    /// Parameter name as written in the motor equations (`J`, `b`, `K`, `R`, `L`).
    pub name: &'static str,
    /// The rejected value.
    pub value: f64,
    /// Human-readable constraint, e.g. `"> 0"`.
    pub requirement: &'static str,
}

impl InvalidParameterError {
    pub const fn new(name: &'static str, value: f64, requirement: &'static str) -> Self {
        Self {
            name,
            value,
            requirement,
        }
    }
}

/// Errors from constructing, converting or simulating a linear model.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ModelError {
    #[error(transparent)]
    InvalidParameter(#[from] InvalidParameterError),

    #[error("Denominator polynomial is empty")]
    EmptyDenominator,

    #[error("Denominator polynomial is identically zero")]
    ZeroLeadingCoefficient,

    #[error(
        "Improper transfer function: numerator degree {numerator_degree} > denominator degree {denominator_degree}"
    )]
    Improper {
        numerator_degree: usize,
        denominator_degree: usize,
    },

    #[error("Polynomial coefficient is not finite: {0}")]
    NonFiniteCoefficient(f64),

    #[error("Unsupported system order: expected {expected}, got {got}")]
    UnsupportedOrder { expected: usize, got: usize },

    #[error("Invalid time grid: duration={duration}, dt={dt} (need 0 < dt <= duration, both finite)")]
    InvalidTimeGrid { duration: f64, dt: f64 },

    #[error("Invalid sample period: dt={0} (must be finite and > 0)")]
    InvalidSamplePeriod(f64),

    #[error("Time grid too fine: duration={duration}, dt={dt} needs more than {max} samples")]
    TooManySamples { duration: f64, dt: f64, max: usize },
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Unknown preset: {0}")]
    UnknownPreset(String),
}
