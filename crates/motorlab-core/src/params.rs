//! Physical constants of a permanent-magnet DC motor.
//!
//! The motor is described by Newton's second law on the rotor and
//! Kirchhoff's voltage law on the armature:
//!
//! ```text
//! J·dω/dt + b·ω = K·i
//! L·di/dt + R·i = V − K·ω
//! ```
//!
//! with `Kt = Ke = K` in SI units.

use serde::{Deserialize, Serialize};

use crate::error::InvalidParameterError;

/// Immutable, validated set of the five motor constants.
///
/// Invariants: `J > 0`, `L > 0`, `b >= 0`, `K >= 0`, `R >= 0`, all finite.
/// The only ways to obtain a value are [`PhysicalParameters::new`] and
/// deserialization, both of which validate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ParameterRecord", into = "ParameterRecord")]
pub struct PhysicalParameters {
    inertia: f64,
    damping: f64,
    motor_constant: f64,
    resistance: f64,
    inductance: f64,
}

impl PhysicalParameters {
    /// Validate and build a parameter set.
    ///
    /// Argument order follows the motor equations: `J, b, K, R, L`.
    pub fn new(
        inertia: f64,
        damping: f64,
        motor_constant: f64,
        resistance: f64,
        inductance: f64,
    ) -> Result<Self, InvalidParameterError> {
        require_finite("J", inertia)?;
        require_finite("b", damping)?;
        require_finite("K", motor_constant)?;
        require_finite("R", resistance)?;
        require_finite("L", inductance)?;

        if inertia <= 0.0 {
            return Err(InvalidParameterError::new("J", inertia, "> 0"));
        }
        if inductance <= 0.0 {
            return Err(InvalidParameterError::new("L", inductance, "> 0"));
        }
        if damping < 0.0 {
            return Err(InvalidParameterError::new("b", damping, ">= 0"));
        }
        if motor_constant < 0.0 {
            return Err(InvalidParameterError::new("K", motor_constant, ">= 0"));
        }
        if resistance < 0.0 {
            return Err(InvalidParameterError::new("R", resistance, ">= 0"));
        }

        Ok(Self {
            inertia,
            damping,
            motor_constant,
            resistance,
            inductance,
        })
    }

    /// Rotor inertia `J` (kg·m²).
    pub const fn inertia(&self) -> f64 {
        self.inertia
    }

    /// Viscous friction coefficient `b` (N·m·s).
    pub const fn damping(&self) -> f64 {
        self.damping
    }

    /// Torque / back-EMF constant `K` (N·m/A = V·s/rad).
    pub const fn motor_constant(&self) -> f64 {
        self.motor_constant
    }

    /// Armature resistance `R` (Ω).
    pub const fn resistance(&self) -> f64 {
        self.resistance
    }

    /// Armature inductance `L` (H).
    pub const fn inductance(&self) -> f64 {
        self.inductance
    }

    /// Copy with a different `K`, re-validated.
    pub fn with_motor_constant(self, motor_constant: f64) -> Result<Self, InvalidParameterError> {
        Self::new(
            self.inertia,
            self.damping,
            motor_constant,
            self.resistance,
            self.inductance,
        )
    }

    /// Mechanical time constant `J / b`, `None` without friction.
    pub fn mechanical_time_constant(&self) -> Option<f64> {
        (self.damping > 0.0).then(|| self.inertia / self.damping)
    }

    /// Electrical time constant `L / R`, `None` for a lossless armature.
    pub fn electrical_time_constant(&self) -> Option<f64> {
        (self.resistance > 0.0).then(|| self.inductance / self.resistance)
    }
}

fn require_finite(name: &'static str, value: f64) -> Result<(), InvalidParameterError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(InvalidParameterError::new(name, value, "finite"))
    }
}

// ---------------------------------------------------------------------------
// Serde record
// ---------------------------------------------------------------------------

/// Unvalidated wire form.  Accepts the single-letter symbols as aliases.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ParameterRecord {
    #[serde(alias = "J")]
    inertia: f64,
    #[serde(alias = "b")]
    damping: f64,
    #[serde(alias = "K")]
    motor_constant: f64,
    #[serde(alias = "R")]
    resistance: f64,
    #[serde(alias = "L")]
    inductance: f64,
}

impl TryFrom<ParameterRecord> for PhysicalParameters {
    type Error = InvalidParameterError;

    fn try_from(r: ParameterRecord) -> Result<Self, Self::Error> {
        Self::new(
            r.inertia,
            r.damping,
            r.motor_constant,
            r.resistance,
            r.inductance,
        )
    }
}

impl From<PhysicalParameters> for ParameterRecord {
    fn from(p: PhysicalParameters) -> Self {
        Self {
            inertia: p.inertia,
            damping: p.damping,
            motor_constant: p.motor_constant,
            resistance: p.resistance,
            inductance: p.inductance,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn example() -> PhysicalParameters {
        PhysicalParameters::new(0.01, 0.1, 0.01, 1.0, 0.5).unwrap()
    }

    #[test]
    fn accessors_return_constructor_values() {
        let p = example();
        assert!((p.inertia() - 0.01).abs() < f64::EPSILON);
        assert!((p.damping() - 0.1).abs() < f64::EPSILON);
        assert!((p.motor_constant() - 0.01).abs() < f64::EPSILON);
        assert!((p.resistance() - 1.0).abs() < f64::EPSILON);
        assert!((p.inductance() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_inertia_rejected() {
        let err = PhysicalParameters::new(0.0, 0.1, 0.01, 1.0, 0.5).unwrap_err();
        assert_eq!(err.name, "J");
        assert_eq!(err.requirement, "> 0");
    }

    #[test]
    fn zero_inductance_rejected() {
        let err = PhysicalParameters::new(0.01, 0.1, 0.01, 1.0, 0.0).unwrap_err();
        assert_eq!(err.name, "L");
    }

    #[test]
    fn negative_values_rejected() {
        assert_eq!(
            PhysicalParameters::new(0.01, -0.1, 0.01, 1.0, 0.5)
                .unwrap_err()
                .name,
            "b"
        );
        assert_eq!(
            PhysicalParameters::new(0.01, 0.1, -0.01, 1.0, 0.5)
                .unwrap_err()
                .name,
            "K"
        );
        assert_eq!(
            PhysicalParameters::new(0.01, 0.1, 0.01, -1.0, 0.5)
                .unwrap_err()
                .name,
            "R"
        );
        assert_eq!(
            PhysicalParameters::new(-0.01, 0.1, 0.01, 1.0, 0.5)
                .unwrap_err()
                .name,
            "J"
        );
    }

    #[test]
    fn zero_damping_coupling_and_resistance_allowed() {
        assert!(PhysicalParameters::new(0.01, 0.0, 0.0, 0.0, 0.5).is_ok());
    }

    #[test]
    fn non_finite_rejected() {
        let err = PhysicalParameters::new(f64::NAN, 0.1, 0.01, 1.0, 0.5).unwrap_err();
        assert_eq!(err.requirement, "finite");
        let err = PhysicalParameters::new(0.01, 0.1, 0.01, f64::INFINITY, 0.5).unwrap_err();
        assert_eq!(err.name, "R");
    }

    #[test]
    fn with_motor_constant_revalidates() {
        let p = example().with_motor_constant(0.02).unwrap();
        assert!((p.motor_constant() - 0.02).abs() < f64::EPSILON);
        assert!(example().with_motor_constant(-1.0).is_err());
    }

    #[test]
    fn time_constants() {
        let p = example();
        assert!((p.mechanical_time_constant().unwrap() - 0.1).abs() < 1e-12);
        assert!((p.electrical_time_constant().unwrap() - 0.5).abs() < 1e-12);
        let lossless = PhysicalParameters::new(0.01, 0.0, 0.01, 0.0, 0.5).unwrap();
        assert!(lossless.mechanical_time_constant().is_none());
        assert!(lossless.electrical_time_constant().is_none());
    }

    #[test]
    fn deserialize_accepts_symbols() {
        let p: PhysicalParameters =
            toml::from_str("J = 0.01\nb = 0.1\nK = 0.01\nR = 1.0\nL = 0.5\n").unwrap();
        assert_eq!(p, example());
    }

    #[test]
    fn deserialize_validates() {
        let result: Result<PhysicalParameters, _> = toml::from_str(
            "inertia = 0.0\ndamping = 0.1\nmotor_constant = 0.01\nresistance = 1.0\ninductance = 0.5\n",
        );
        let err = result.unwrap_err();
        assert!(err.to_string().contains("J = 0"));
    }

    #[test]
    fn serialize_uses_long_names() {
        let text = toml::to_string(&example()).unwrap();
        assert!(text.contains("inertia = 0.01"));
        assert!(text.contains("inductance = 0.5"));
    }
}
