//! Open-loop step response of a [`StateSpaceModel`].
//!
//! The continuous model is discretized with a zero-order hold, which is exact
//! for a piecewise-constant input such as a step:
//!
//! ```text
//! [A_d  B_d] = expm(dt · [A  B])
//! [ 0    1 ]              [0  0]
//! ```

use motorlab_core::config::{MAX_SAMPLES, SimulationConfig};
use motorlab_core::error::{InvalidParameterError, ModelError};
use nalgebra::{Matrix2, Matrix3, RowVector2, Vector2};
use serde::Serialize;
use tracing::debug;

use crate::state_space::StateSpaceModel;

/// Band around the final value that counts as settled (2%).
pub const SETTLING_BAND: f64 = 0.02;

// ---------------------------------------------------------------------------
// DiscreteStateSpace
// ---------------------------------------------------------------------------

/// Zero-order-hold discretization `x[k+1] = A_d·x[k] + B_d·u[k]`.
#[derive(Clone, Debug, PartialEq)]
pub struct DiscreteStateSpace {
    a: Matrix2<f64>,
    b: Vector2<f64>,
    c: RowVector2<f64>,
    d: f64,
    dt: f64,
}

impl DiscreteStateSpace {
    pub const fn a(&self) -> &Matrix2<f64> {
        &self.a
    }

    pub const fn b(&self) -> &Vector2<f64> {
        &self.b
    }

    /// Sample period (seconds).
    pub const fn dt(&self) -> f64 {
        self.dt
    }

    /// Advance one sample.  Returns the output at the current state.
    pub fn step(&self, state: &mut Vector2<f64>, input: f64) -> f64 {
        let y = (self.c * *state)[0] + self.d * input;
        *state = self.a * *state + self.b * input;
        y
    }
}

impl StateSpaceModel {
    /// Zero-order-hold discretization with sample period `dt`.
    pub fn discretize(&self, dt: f64) -> Result<DiscreteStateSpace, ModelError> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(ModelError::InvalidSamplePeriod(dt));
        }

        let mut aug = Matrix3::zeros();
        aug.fixed_view_mut::<2, 2>(0, 0).copy_from(self.a());
        aug.fixed_view_mut::<2, 1>(0, 2).copy_from(self.b());
        aug *= dt;

        let exp_aug = matrix_exp(&aug);

        Ok(DiscreteStateSpace {
            a: exp_aug.fixed_view::<2, 2>(0, 0).into_owned(),
            b: exp_aug.fixed_view::<2, 1>(0, 2).into_owned(),
            c: *self.c(),
            d: self.d(),
            dt,
        })
    }

    /// Response to a step of height `amplitude` applied at `t = 0` from rest.
    ///
    /// Samples are taken at `0, dt, 2·dt, …` up to and including `duration`,
    /// at most [`MAX_SAMPLES`] of them.
    #[allow(clippy::cast_precision_loss)]
    pub fn step_response(
        &self,
        duration: f64,
        dt: f64,
        amplitude: f64,
    ) -> Result<StepResponse, ModelError> {
        if !duration.is_finite() || !dt.is_finite() || dt <= 0.0 || duration < dt {
            return Err(ModelError::InvalidTimeGrid { duration, dt });
        }
        if !amplitude.is_finite() {
            return Err(InvalidParameterError::new("amplitude", amplitude, "finite").into());
        }

        let samples = SimulationConfig {
            duration,
            dt,
            amplitude,
        }
        .samples()
        .ok_or(ModelError::TooManySamples {
            duration,
            dt,
            max: MAX_SAMPLES,
        })?;
        let discrete = self.discretize(dt)?;

        let mut state = Vector2::zeros();
        let mut time = Vec::with_capacity(samples);
        let mut output = Vec::with_capacity(samples);
        let mut states = Vec::with_capacity(samples);
        for k in 0..samples {
            time.push(k as f64 * dt);
            states.push([state[0], state[1]]);
            output.push(discrete.step(&mut state, amplitude));
        }
        debug!(samples, dt, amplitude, "simulated step response");

        Ok(StepResponse {
            time,
            output,
            states,
            amplitude,
            final_value: self.dc_gain().map(|g| g * amplitude),
        })
    }

    /// Step response using the settings of a [`SimulationConfig`].
    pub fn step_response_with(&self, sim: &SimulationConfig) -> Result<StepResponse, ModelError> {
        self.step_response(sim.duration, sim.dt, sim.amplitude)
    }
}

/// `e^M` by scaling-and-squaring with a truncated Taylor series.
#[allow(clippy::cast_possible_truncation)]
fn matrix_exp(m: &Matrix3<f64>) -> Matrix3<f64> {
    // Scale so that ||M / 2^s||_inf <= 0.5.
    let norm_inf = m
        .row_iter()
        .map(|row| row.iter().map(|x| x.abs()).sum::<f64>())
        .fold(0.0_f64, f64::max);

    let s = if norm_inf > 0.5 {
        (norm_inf / 0.5).log2().ceil() as i32
    } else {
        0
    };
    let scaled = m * 0.5_f64.powi(s);

    let mut result = Matrix3::identity();
    let mut term = Matrix3::identity();
    for k in 1..=20_u32 {
        term = term * scaled / f64::from(k);
        result += term;
        if term.amax() < 1e-18 * result.amax() {
            break;
        }
    }

    for _ in 0..s {
        result = result * result;
    }
    result
}

// ---------------------------------------------------------------------------
// StepResponse
// ---------------------------------------------------------------------------

/// Sampled step response.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StepResponse {
    /// Sample times (seconds).
    pub time: Vec<f64>,
    /// Output `y` at each sample.
    pub output: Vec<f64>,
    /// State vector at each sample (`[ω, i]` for a motor model).
    pub states: Vec<[f64; 2]>,
    /// Input step height.
    pub amplitude: f64,
    /// Steady-state output `dc_gain · amplitude`, `None` for a singular `A`.
    pub final_value: Option<f64>,
}

/// Transient characteristics of a step response.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct StepMetrics {
    /// Steady-state output.
    pub final_value: f64,
    /// Output at the sample furthest beyond zero in the direction of the final value.
    pub peak: f64,
    pub peak_time: f64,
    /// Percent overshoot past the final value (0 when none).
    pub overshoot: f64,
    /// Time to go from 10% to 90% of the final value.
    pub rise_time: Option<f64>,
    /// Time after which the output stays within 2% of the final value.
    pub settling_time: Option<f64>,
}

impl StepResponse {
    /// Number of samples.
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Transient metrics, `None` when the final value is zero or undefined.
    pub fn metrics(&self) -> Option<StepMetrics> {
        let final_value = self.final_value.filter(|&v| v != 0.0)?;
        let normalized: Vec<f64> = self.output.iter().map(|y| y / final_value).collect();

        let (peak_idx, _) = normalized
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))?;
        let peak = self.output[peak_idx];
        let overshoot = ((normalized[peak_idx] - 1.0) * 100.0).max(0.0);

        let rise_time = self
            .first_crossing(&normalized, 0.1)
            .zip(self.first_crossing(&normalized, 0.9))
            .map(|(t10, t90)| t90 - t10);

        let settling_time = match normalized
            .iter()
            .rposition(|n| (n - 1.0).abs() > SETTLING_BAND)
        {
            None => Some(self.time[0]),
            Some(last) if last + 1 < self.len() => Some(self.time[last + 1]),
            Some(_) => None,
        };

        Some(StepMetrics {
            final_value,
            peak,
            peak_time: self.time[peak_idx],
            overshoot,
            rise_time,
            settling_time,
        })
    }

    /// First time the normalized output reaches `level`, linearly
    /// interpolated between samples.
    fn first_crossing(&self, normalized: &[f64], level: f64) -> Option<f64> {
        let idx = normalized.iter().position(|&n| n >= level)?;
        if idx == 0 {
            return Some(self.time[0]);
        }
        let (n0, n1) = (normalized[idx - 1], normalized[idx]);
        let (t0, t1) = (self.time[idx - 1], self.time[idx]);
        Some(t0 + (level - n0) / (n1 - n0) * (t1 - t0))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
