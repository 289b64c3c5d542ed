//! Single-input single-output transfer functions `P(s) = N(s) / D(s)`.

use motorlab_core::error::ModelError;
use nalgebra::Complex;
use serde::Serialize;

use crate::poly;

/// Proper rational transfer function.
///
/// Coefficients are stored highest power first with leading zeros trimmed;
/// the leading denominator coefficient is non-zero and
/// `deg N <= deg D`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TransferFunction {
    numerator: Vec<f64>,
    denominator: Vec<f64>,
}

impl TransferFunction {
    /// Create from numerator and denominator coefficients (highest power first).
    pub fn new(
        numerator: impl Into<Vec<f64>>,
        denominator: impl Into<Vec<f64>>,
    ) -> Result<Self, ModelError> {
        let numerator = numerator.into();
        let denominator = denominator.into();

        if let Some(&bad) = numerator
            .iter()
            .chain(&denominator)
            .find(|c| !c.is_finite())
        {
            return Err(ModelError::NonFiniteCoefficient(bad));
        }
        if denominator.is_empty() {
            return Err(ModelError::EmptyDenominator);
        }
        let Some(denominator_degree) = poly::degree(&denominator) else {
            return Err(ModelError::ZeroLeadingCoefficient);
        };
        let numerator_degree = poly::degree(&numerator).unwrap_or(0);
        if numerator_degree > denominator_degree {
            return Err(ModelError::Improper {
                numerator_degree,
                denominator_degree,
            });
        }

        let numerator = if numerator.is_empty() {
            vec![0.0]
        } else {
            poly::trim_leading_zeros(&numerator).to_vec()
        };
        let denominator = poly::trim_leading_zeros(&denominator).to_vec();
        Ok(Self::from_trimmed(numerator, denominator))
    }

    /// Build from coefficients already known to satisfy the invariants.
    pub(crate) const fn from_trimmed(numerator: Vec<f64>, denominator: Vec<f64>) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Numerator coefficients, highest power first.
    pub fn numerator(&self) -> &[f64] {
        &self.numerator
    }

    /// Denominator coefficients, highest power first.
    pub fn denominator(&self) -> &[f64] {
        &self.denominator
    }

    /// System order (denominator degree).
    pub fn order(&self) -> usize {
        self.denominator.len() - 1
    }

    /// Whether the numerator degree is below the denominator degree.
    pub fn is_strictly_proper(&self) -> bool {
        poly::degree(&self.numerator).is_none_or(|deg| deg < self.order())
    }

    /// Same transfer function with a monic denominator.
    pub fn normalized(&self) -> Self {
        let lead = self.denominator[0];
        Self::from_trimmed(
            self.numerator.iter().map(|c| c / lead).collect(),
            self.denominator.iter().map(|c| c / lead).collect(),
        )
    }

    /// Whether both represent the same input-output map, comparing the
    /// normalized coefficients within `rel_tol`.
    pub fn is_equivalent(&self, other: &Self, rel_tol: f64) -> bool {
        let a = self.normalized();
        let b = other.normalized();
        poly::approx_eq(&a.numerator, &b.numerator, rel_tol)
            && poly::approx_eq(&a.denominator, &b.denominator, rel_tol)
    }

    /// Frequency response `P(s)` at a complex point.
    pub fn evaluate(&self, s: Complex<f64>) -> Complex<f64> {
        poly::eval_complex(&self.numerator, s) / poly::eval_complex(&self.denominator, s)
    }

    /// Steady-state gain `P(0)`, `None` with a pole at the origin.
    pub fn dc_gain(&self) -> Option<f64> {
        let den = poly::eval(&self.denominator, 0.0);
        (den != 0.0).then(|| poly::eval(&self.numerator, 0.0) / den)
    }

    /// Roots of the denominator, sorted by real part.
    pub fn poles(&self) -> Result<Vec<Complex<f64>>, ModelError> {
        poly::roots(&self.denominator)
    }

    /// Roots of the numerator, sorted by real part.
    pub fn zeros(&self) -> Result<Vec<Complex<f64>>, ModelError> {
        poly::roots(&self.numerator)
    }
}

impl std::fmt::Display for TransferFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let num = format_polynomial(&self.numerator);
        let den = format_polynomial(&self.denominator);
        let width = num.len().max(den.len());
        writeln!(f, "{num:^width$}")?;
        writeln!(f, "{}", "-".repeat(width))?;
        write!(f, "{den:^width$}")
    }
}

fn format_polynomial(coeffs: &[f64]) -> String {
    let order = coeffs.len() - 1;
    let terms: Vec<String> = coeffs
        .iter()
        .enumerate()
        .filter(|&(i, &c)| c != 0.0 || (i == order && coeffs.iter().all(|&x| x == 0.0)))
        .map(|(i, &c)| match order - i {
            0 => format!("{c}"),
            1 => format!("{c} s"),
            p => format!("{c} s^{p}"),
        })
        .collect();
    terms.join(" + ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
