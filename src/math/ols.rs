//! Dense least-squares helpers.
//!
//! The Levenberg–Marquardt solver needs three linear-algebra primitives:
//!
//! - solve a (possibly tall) least-squares system for each damped step
//! - decide whether a Jacobian has full column rank
//! - form the covariance of the estimate, `(JᵀJ)⁻¹`, at the solution
//!
//! All three go through an SVD. The systems are tiny (at most six columns) so
//! the cost is irrelevant and SVD behaves well on nearly collinear columns.
//! (Nalgebra's `QR::solve` is intended for square systems and will panic for
//! non-square matrices.)

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Relative singular-value cutoff used for rank decisions.
fn rank_tolerance(x: &DMatrix<f64>, max_sv: f64) -> f64 {
    max_sv * f64::EPSILON * x.nrows().max(x.ncols()) as f64
}

/// Numerical column rank of `x`: singular values above
/// `relative_tolerance * max_singular_value` count.
///
/// Pass `None` for the usual machine-precision cutoff. Matrices built by
/// finite differences carry noise far above that and need a looser one.
pub fn column_rank(x: &DMatrix<f64>, relative_tolerance: Option<f64>) -> usize {
    if x.is_empty() {
        return 0;
    }
    let sv = x.singular_values();
    let max_sv = sv.iter().copied().fold(0.0_f64, f64::max);
    if !(max_sv.is_finite() && max_sv > 0.0) {
        return 0;
    }
    let tol = match relative_tolerance {
        Some(rel) => max_sv * rel,
        None => rank_tolerance(x, max_sv),
    };
    sv.iter().filter(|&&s| s > tol).count()
}

/// Unscaled covariance of the estimate, `(JᵀJ)⁻¹ = V Σ⁻² Vᵀ`.
///
/// Returns `None` when `jacobian` is rank deficient.
pub fn unscaled_covariance(jacobian: &DMatrix<f64>) -> Option<DMatrix<f64>> {
    let p = jacobian.ncols();
    let svd = jacobian.clone().svd(false, true);
    let v_t = svd.v_t?;
    let max_sv = svd.singular_values.iter().copied().fold(0.0_f64, f64::max);
    if !(max_sv.is_finite() && max_sv > 0.0) {
        return None;
    }
    let tol = rank_tolerance(jacobian, max_sv);

    let mut cov = DMatrix::<f64>::zeros(p, p);
    for (k, &s) in svd.singular_values.iter().enumerate() {
        if s <= tol {
            return None;
        }
        let row = v_t.row(k);
        let inv_s2 = 1.0 / (s * s);
        for i in 0..p {
            for j in 0..p {
                cov[(i, j)] += row[i] * row[j] * inv_s2;
            }
        }
    }
    Some(cov)
}
