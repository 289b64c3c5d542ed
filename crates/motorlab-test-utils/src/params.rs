//! Random sampling of valid [`PhysicalParameters`].
//!
//! Each constant is drawn log-uniformly, since real motors span several
//! orders of magnitude (a micro servo has `J ≈ 1e-6`, a traction motor
//! `J ≈ 1`).

use std::ops::Range;

use motorlab_core::params::PhysicalParameters;
use rand::Rng;

/// Sampling bounds for each constant, all strictly positive.
#[derive(Clone, Debug)]
pub struct ParameterRanges {
    pub inertia: Range<f64>,
    pub damping: Range<f64>,
    pub motor_constant: Range<f64>,
    pub resistance: Range<f64>,
    pub inductance: Range<f64>,
}

impl Default for ParameterRanges {
    fn default() -> Self {
        Self {
            inertia: 1e-6..1.0,
            damping: 1e-6..1.0,
            motor_constant: 1e-3..1.0,
            resistance: 1e-2..1e2,
            inductance: 1e-6..1.0,
        }
    }
}

impl ParameterRanges {
    /// Draw one parameter set.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PhysicalParameters {
        PhysicalParameters::new(
            log_uniform(rng, &self.inertia),
            log_uniform(rng, &self.damping),
            log_uniform(rng, &self.motor_constant),
            log_uniform(rng, &self.resistance),
            log_uniform(rng, &self.inductance),
        )
        .unwrap_or_else(|e| panic!("sampling ranges produced invalid parameters: {e}"))
    }
}

/// Draw one parameter set from the default ranges.
pub fn random_parameters<R: Rng + ?Sized>(rng: &mut R) -> PhysicalParameters {
    ParameterRanges::default().sample(rng)
}

/// `exp(Uniform(ln(low), ln(high)))`.
fn log_uniform<R: Rng + ?Sized>(rng: &mut R, range: &Range<f64>) -> f64 {
    rng.gen_range(range.start.ln()..range.end.ln()).exp()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
