//! Second-order single-input single-output state-space models.
//!
//! ```text
//! ẋ = A·x + B·u
//! y = C·x + D·u
//! ```

use motorlab_core::error::ModelError;
use nalgebra::{Complex, Matrix2, RowVector2, Vector2};
use serde::Serialize;

use crate::poly;

/// Continuous-time LTI model with two states, one input, one output.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(into = "StateSpaceRecord")]
pub struct StateSpaceModel {
    a: Matrix2<f64>,
    b: Vector2<f64>,
    c: RowVector2<f64>,
    d: f64,
}

impl StateSpaceModel {
    /// Create from the four matrices.  All entries must be finite.
    pub fn new(
        a: Matrix2<f64>,
        b: Vector2<f64>,
        c: RowVector2<f64>,
        d: f64,
    ) -> Result<Self, ModelError> {
        if let Some(&bad) = a
            .iter()
            .chain(b.iter())
            .chain(c.iter())
            .chain(std::iter::once(&d))
            .find(|v| !v.is_finite())
        {
            return Err(ModelError::NonFiniteCoefficient(bad));
        }
        Ok(Self::from_matrices(a, b, c, d))
    }

    pub(crate) const fn from_matrices(
        a: Matrix2<f64>,
        b: Vector2<f64>,
        c: RowVector2<f64>,
        d: f64,
    ) -> Self {
        Self { a, b, c, d }
    }

    /// State matrix `A` (2×2).
    pub const fn a(&self) -> &Matrix2<f64> {
        &self.a
    }

    /// Input matrix `B` (2×1).
    pub const fn b(&self) -> &Vector2<f64> {
        &self.b
    }

    /// Output matrix `C` (1×2).
    pub const fn c(&self) -> &RowVector2<f64> {
        &self.c
    }

    /// Feedthrough `D` (1×1).
    pub const fn d(&self) -> f64 {
        self.d
    }

    /// `det(sI − A) = s² − tr(A)·s + det(A)`, highest power first.
    pub fn characteristic_polynomial(&self) -> [f64; 3] {
        [1.0, -self.a.trace(), self.a.determinant()]
    }

    /// Eigenvalues of `A`, sorted by real part.
    pub fn poles(&self) -> Vec<Complex<f64>> {
        poly::roots(&self.characteristic_polynomial())
            .unwrap_or_else(|_| unreachable!("characteristic polynomial is quadratic"))
    }

    /// Steady-state gain `D − C·A⁻¹·B`, `None` when `A` is singular.
    pub fn dc_gain(&self) -> Option<f64> {
        let a_inv = self.a.try_inverse()?;
        Some(self.d - (self.c * a_inv * self.b)[0])
    }

    /// Whether both models share the same transfer function.
    pub fn is_equivalent(&self, other: &Self, rel_tol: f64) -> bool {
        crate::convert::state_space_to_transfer_function(self)
            .is_equivalent(&crate::convert::state_space_to_transfer_function(other), rel_tol)
    }

    /// Apply the change of basis `x = T·z`, giving `(T⁻¹AT, T⁻¹B, CT, D)`.
    ///
    /// Returns `None` when `T` is singular.
    pub fn similarity_transform(&self, t: &Matrix2<f64>) -> Option<Self> {
        let t_inv = t.try_inverse()?;
        Some(Self::from_matrices(
            t_inv * self.a * t,
            t_inv * self.b,
            self.c * t,
            self.d,
        ))
    }
}

impl std::fmt::Display for StateSpaceModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let a = &self.a;
        writeln!(f, "A = [{:>12.6} {:>12.6}]", a[(0, 0)], a[(0, 1)])?;
        writeln!(f, "    [{:>12.6} {:>12.6}]", a[(1, 0)], a[(1, 1)])?;
        writeln!(f, "B = [{:>12.6}]", self.b[0])?;
        writeln!(f, "    [{:>12.6}]", self.b[1])?;
        writeln!(f, "C = [{:>12.6} {:>12.6}]", self.c[0], self.c[1])?;
        write!(f, "D = [{:>12.6}]", self.d)
    }
}

// ---------------------------------------------------------------------------
// Serde record
// ---------------------------------------------------------------------------

/// Row-major wire form: `a[row][col]`, `b[row][0]`, `c[0][col]`, `d[0][0]`.
#[derive(Serialize)]
struct StateSpaceRecord {
    a: [[f64; 2]; 2],
    b: [[f64; 1]; 2],
    c: [[f64; 2]; 1],
    d: [[f64; 1]; 1],
}

impl From<StateSpaceModel> for StateSpaceRecord {
    fn from(m: StateSpaceModel) -> Self {
        Self {
            a: [
                [m.a[(0, 0)], m.a[(0, 1)]],
                [m.a[(1, 0)], m.a[(1, 1)]],
            ],
            b: [[m.b[0]], [m.b[1]]],
            c: [[m.c[0], m.c[1]]],
            d: [[m.d]],
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
