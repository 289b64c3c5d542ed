//! Dense polynomial helpers.
//!
//! Coefficients are ordered highest power first, so `[a, b, c]` is
//! `a·s² + b·s + c`.  Binary operations align operands at the constant term.

use motorlab_core::error::ModelError;
use nalgebra::Complex;

/// Strip leading exact zeros, keeping at least one coefficient.
pub fn trim_leading_zeros(coeffs: &[f64]) -> &[f64] {
    match coeffs.iter().position(|&c| c != 0.0) {
        Some(first) => &coeffs[first..],
        None => &coeffs[coeffs.len().saturating_sub(1)..],
    }
}

/// Degree of the polynomial, `None` for the zero polynomial.
pub fn degree(coeffs: &[f64]) -> Option<usize> {
    coeffs
        .iter()
        .position(|&c| c != 0.0)
        .map(|first| coeffs.len() - 1 - first)
}

/// Coefficient of `s^power`, zero past the end.
pub fn coefficient(coeffs: &[f64], power: usize) -> f64 {
    coeffs
        .len()
        .checked_sub(power + 1)
        .map_or(0.0, |idx| coeffs[idx])
}

/// Product of two polynomials.
pub fn multiply(a: &[f64], b: &[f64]) -> Vec<f64> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let mut out = vec![0.0; a.len() + b.len() - 1];
    for (i, &x) in a.iter().enumerate() {
        for (j, &y) in b.iter().enumerate() {
            out[i + j] = x.mul_add(y, out[i + j]);
        }
    }
    out
}

/// Sum of two polynomials.
pub fn add(a: &[f64], b: &[f64]) -> Vec<f64> {
    let n = a.len().max(b.len());
    (0..n)
        .rev()
        .map(|power| coefficient(a, power) + coefficient(b, power))
        .collect()
}

/// Evaluate at a real point (Horner).
pub fn eval(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().fold(0.0, |acc, &c| acc.mul_add(x, c))
}

/// Evaluate at a complex point (Horner).
pub fn eval_complex(coeffs: &[f64], s: Complex<f64>) -> Complex<f64> {
    coeffs
        .iter()
        .fold(Complex::new(0.0, 0.0), |acc, &c| acc * s + c)
}

/// Roots of a polynomial of degree ≤ 2, sorted by real part then imaginary part.
///
/// The quadratic case uses the cancellation-free form
/// `q = -(b + sign(b)·√Δ)/2`, `r₁ = q/a`, `r₂ = c/q`.
pub fn roots(coeffs: &[f64]) -> Result<Vec<Complex<f64>>, ModelError> {
    let p = trim_leading_zeros(coeffs);
    let mut out = match degree(p) {
        None | Some(0) => Vec::new(),
        Some(1) => vec![Complex::new(-p[1] / p[0], 0.0)],
        Some(2) => quadratic_roots(p[0], p[1], p[2]).to_vec(),
        Some(got) => return Err(ModelError::UnsupportedOrder { expected: 2, got }),
    };
    out.sort_by(|x, y| x.re.total_cmp(&y.re).then(x.im.total_cmp(&y.im)));
    Ok(out)
}

fn quadratic_roots(a: f64, b: f64, c: f64) -> [Complex<f64>; 2] {
    let disc = b.mul_add(b, -4.0 * a * c);
    if disc < 0.0 {
        let re = -b / (2.0 * a);
        let im = (-disc).sqrt() / (2.0 * a);
        return [Complex::new(re, -im.abs()), Complex::new(re, im.abs())];
    }
    let sign: f64 = if b >= 0.0 { 1.0 } else { -1.0 };
    let q = -0.5 * sign.mul_add(disc.sqrt(), b);
    if q == 0.0 {
        // b = 0 and c = 0: double root at the origin.
        return [Complex::new(0.0, 0.0); 2];
    }
    [Complex::new(q / a, 0.0), Complex::new(c / q, 0.0)]
}

/// Coefficient-wise comparison aligned at the constant term.
///
/// Each coefficient pair must agree within `rel_tol` of the larger of the
/// two.  A pair where both sides sit below a small floor scaled by the
/// largest coefficient of either polynomial counts as zero on both sides.
pub fn approx_eq(a: &[f64], b: &[f64], rel_tol: f64) -> bool {
    let scale = a.iter().chain(b).fold(0.0_f64, |m, x| m.max(x.abs()));
    let floor = 64.0 * f64::EPSILON * scale;
    (0..a.len().max(b.len())).all(|power| {
        let x = coefficient(a, power);
        let y = coefficient(b, power);
        let magnitude = x.abs().max(y.abs());
        magnitude <= floor || (x - y).abs() <= rel_tol * magnitude
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
