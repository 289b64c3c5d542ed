//! DC motor model construction.
//!
//! Laplace-transforming the rotor and armature equations with zero initial
//! conditions gives
//!
//! ```text
//! s(Js + b)Θ(s) = K·I(s)
//! (Ls + R)I(s)  = V(s) − K·sΘ(s)
//! ```
//!
//! Eliminating `I(s)` yields the speed transfer function
//! `P(s) = ω(s)/V(s) = K / ((Js + b)(Ls + R) + K²)`.
//! Taking `x = [ω, i]` as state gives the state-space form directly.

use motorlab_core::error::InvalidParameterError;
use motorlab_core::params::PhysicalParameters;
use motorlab_core::presets;
use nalgebra::{Matrix2, RowVector2, Vector2};
use serde::Serialize;
use tracing::debug;

use crate::poly;
use crate::state_space::StateSpaceModel;
use crate::transfer_function::TransferFunction;

/// Speed transfer function `ω(s)/V(s)`.
///
/// Denominator `[J·L, J·R + b·L, b·R + K²]`, numerator `[K]`.
pub fn build_transfer_function(params: &PhysicalParameters) -> TransferFunction {
    let mechanical = [params.inertia(), params.damping()];
    let electrical = [params.inductance(), params.resistance()];
    let k = params.motor_constant();

    let mut den = poly::multiply(&mechanical, &electrical);
    den = poly::add(&den, &[k * k]);

    // J·L > 0, so the denominator is already trimmed and second order.
    TransferFunction::from_trimmed(vec![k], den)
}

/// State-space model over `x = [ω, i]`, input `V`, output `ω`.
///
/// ```text
/// A = [-b/J   K/J]   B = [ 0 ]   C = [1 0]   D = 0
///     [-K/L  -R/L]       [1/L]
/// ```
pub fn build_state_space(params: &PhysicalParameters) -> StateSpaceModel {
    let j = params.inertia();
    let b = params.damping();
    let k = params.motor_constant();
    let r = params.resistance();
    let l = params.inductance();

    StateSpaceModel::from_matrices(
        Matrix2::new(-b / j, k / j, -k / l, -r / l),
        Vector2::new(0.0, 1.0 / l),
        RowVector2::new(1.0, 0.0),
        0.0,
    )
}

// ---------------------------------------------------------------------------
// MotorModel
// ---------------------------------------------------------------------------

/// Both representations of one motor, derived from the same parameters.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MotorModel {
    parameters: PhysicalParameters,
    transfer_function: TransferFunction,
    state_space: StateSpaceModel,
}

impl MotorModel {
    /// Derive both representations from validated parameters.
    pub fn from_parameters(parameters: PhysicalParameters) -> Self {
        let transfer_function = build_transfer_function(&parameters);
        let state_space = build_state_space(&parameters);
        debug!(
            den = ?transfer_function.denominator(),
            num = ?transfer_function.numerator(),
            "built motor model"
        );
        Self {
            parameters,
            transfer_function,
            state_space,
        }
    }

    pub const fn parameters(&self) -> &PhysicalParameters {
        &self.parameters
    }

    pub const fn transfer_function(&self) -> &TransferFunction {
        &self.transfer_function
    }

    pub const fn state_space(&self) -> &StateSpaceModel {
        &self.state_space
    }
}

// ---------------------------------------------------------------------------
// MotorModelBuilder
// ---------------------------------------------------------------------------

/// Chainable builder over raw parameter values.
///
/// Values are only validated in [`build`](Self::build), so setters can be
/// applied in any order.  Defaults to the speed-control example motor.
///
/// ```
/// use motorlab_model::prelude::*;
///
/// let model = MotorModelBuilder::new()
///     .with_inertia(0.02)
///     .with_inductance(0.25)
///     .build()
///     .unwrap();
/// assert_eq!(model.transfer_function().order(), 2);
///
/// assert!(MotorModelBuilder::new().with_inertia(0.0).build().is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotorModelBuilder {
    inertia: f64,
    damping: f64,
    motor_constant: f64,
    resistance: f64,
    inductance: f64,
}

impl Default for MotorModelBuilder {
    fn default() -> Self {
        Self::from_parameters(&presets::speed_example())
    }
}

impl MotorModelBuilder {
    /// Start from the speed-control example motor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing parameter set.
    pub const fn from_parameters(params: &PhysicalParameters) -> Self {
        Self {
            inertia: params.inertia(),
            damping: params.damping(),
            motor_constant: params.motor_constant(),
            resistance: params.resistance(),
            inductance: params.inductance(),
        }
    }

    /// Rotor inertia `J` (kg·m²).
    pub const fn with_inertia(mut self, inertia: f64) -> Self {
        self.inertia = inertia;
        self
    }

    /// Viscous friction `b` (N·m·s).
    pub const fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    /// Torque / back-EMF constant `K`.
    pub const fn with_motor_constant(mut self, motor_constant: f64) -> Self {
        self.motor_constant = motor_constant;
        self
    }

    /// Armature resistance `R` (Ω).
    pub const fn with_resistance(mut self, resistance: f64) -> Self {
        self.resistance = resistance;
        self
    }

    /// Armature inductance `L` (H).
    pub const fn with_inductance(mut self, inductance: f64) -> Self {
        self.inductance = inductance;
        self
    }

    /// Validate the current values.
    pub fn parameters(&self) -> Result<PhysicalParameters, InvalidParameterError> {
        PhysicalParameters::new(
            self.inertia,
            self.damping,
            self.motor_constant,
            self.resistance,
            self.inductance,
        )
    }

    /// Validate, then derive the transfer function only.
    pub fn build_transfer_function(&self) -> Result<TransferFunction, InvalidParameterError> {
        Ok(build_transfer_function(&self.parameters()?))
    }

    /// Validate, then derive the state-space model only.
    pub fn build_state_space(&self) -> Result<StateSpaceModel, InvalidParameterError> {
        Ok(build_state_space(&self.parameters()?))
    }

    /// Validate, then derive both representations.
    pub fn build(&self) -> Result<MotorModel, InvalidParameterError> {
        Ok(MotorModel::from_parameters(self.parameters()?))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
