//! Conversions between transfer-function and state-space representations.
//!
//! TF → SS uses the controllable canonical form.  For
//!
//! ```text
//!         β₀s² + β₁s + β₂
//! G(s) = ─────────────────   (denominator scaled to be monic)
//!          s² + α₁s + α₂
//! ```
//!
//! the realization is
//!
//! ```text
//! A = [-α₁  -α₂]   B = [1]   C = [β₁ − β₀α₁   β₂ − β₀α₂]   D = β₀
//!     [ 1    0 ]       [0]
//! ```
//!
//! SS → TF expands `C·adj(sI − A)·B + D·det(sI − A)` over `det(sI − A)`.

use motorlab_core::error::ModelError;
use nalgebra::{Matrix2, RowVector2, Vector2};
use tracing::debug;

use crate::poly;
use crate::state_space::StateSpaceModel;
use crate::transfer_function::TransferFunction;

/// Number of states in a [`StateSpaceModel`].
pub const STATE_DIM: usize = 2;

/// Realize a second-order transfer function in controllable canonical form.
///
/// Fails with [`ModelError::UnsupportedOrder`] unless the denominator is
/// exactly second order.
pub fn transfer_function_to_state_space(
    tf: &TransferFunction,
) -> Result<StateSpaceModel, ModelError> {
    if tf.order() != STATE_DIM {
        return Err(ModelError::UnsupportedOrder {
            expected: STATE_DIM,
            got: tf.order(),
        });
    }

    let monic = tf.normalized();
    let den = monic.denominator();
    let num = monic.numerator();
    let (alpha1, alpha2) = (den[1], den[2]);
    let beta0 = poly::coefficient(num, 2);
    let beta1 = poly::coefficient(num, 1);
    let beta2 = poly::coefficient(num, 0);

    let ss = StateSpaceModel::from_matrices(
        Matrix2::new(-alpha1, -alpha2, 1.0, 0.0),
        Vector2::new(1.0, 0.0),
        RowVector2::new(
            beta0.mul_add(-alpha1, beta1),
            beta0.mul_add(-alpha2, beta2),
        ),
        beta0,
    );
    debug!(?den, ?num, "realized transfer function in controllable canonical form");
    Ok(ss)
}

/// Transfer function of a state-space model.
///
/// The denominator is monic; leading exact-zero numerator coefficients are
/// trimmed, so a strictly proper model yields a shorter numerator.
pub fn state_space_to_transfer_function(ss: &StateSpaceModel) -> TransferFunction {
    let (a, b, c, d) = (ss.a(), ss.b(), ss.c(), ss.d());
    let den = ss.characteristic_polynomial();
    let trace = -den[1];
    let det = den[2];

    // C·adj(sI − A)·B = (C·B)·s + c₁(a₁₂b₂ − a₂₂b₁) + c₂(a₂₁b₁ − a₁₁b₂)
    let cb = (c * b)[0];
    let constant = c[0] * a[(0, 1)].mul_add(b[1], -a[(1, 1)] * b[0])
        + c[1] * a[(1, 0)].mul_add(b[0], -a[(0, 0)] * b[1]);

    let num = [d, d.mul_add(-trace, cb), d.mul_add(det, constant)];
    let tf = TransferFunction::from_trimmed(poly::trim_leading_zeros(&num).to_vec(), den.to_vec());
    debug!(num = ?tf.numerator(), den = ?tf.denominator(), "extracted transfer function");
    tf
}

impl TryFrom<&TransferFunction> for StateSpaceModel {
    type Error = ModelError;

    fn try_from(tf: &TransferFunction) -> Result<Self, Self::Error> {
        transfer_function_to_state_space(tf)
    }
}

impl From<&StateSpaceModel> for TransferFunction {
    fn from(ss: &StateSpaceModel) -> Self {
        state_space_to_transfer_function(ss)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
