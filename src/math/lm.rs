//! Levenberg–Marquardt nonlinear least squares.
//!
//! Minimizes `Σ (y_i - f(x_i; p))²` over the parameter vector `p`, where the
//! caller supplies `f` as a closure mapping a parameter slice to the vector of
//! predictions at every observation.
//!
//! Implementation notes:
//! - forward-difference Jacobian, one column per parameter, computed in
//!   parallel (each column only needs one extra model evaluation)
//! - each damped step solves the augmented system `[J; √λ·D] δ ≈ [r; 0]` with
//!   the SVD least-squares helper, where `D = diag(‖J_j‖)` (Marquardt scaling)
//! - the iteration starts from all-ones unless told otherwise
//!
//! For a model that is linear in its parameters the first undamped step is
//! already the exact solution, so convergence takes a handful of iterations.

use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;
use tracing::debug;

use crate::error::PetError;
use crate::math::ols::{column_rank, solve_least_squares};

/// Relative singular-value cutoff for the finite-difference Jacobian.
///
/// Forward differences leave noise of order `sqrt(EPSILON)` in every column,
/// so exactly collinear regressors only show up above that level.
const JACOBIAN_RANK_TOLERANCE: f64 = 1e-6;

/// Solver tolerances.
#[derive(Debug, Clone)]
pub struct LmOptions {
    pub max_iterations: usize,
    /// Relative SSE reduction below which the fit is considered converged.
    pub ftol: f64,
    /// Relative step size below which the fit is considered converged.
    pub xtol: f64,
    pub initial_lambda: f64,
}

impl Default for LmOptions {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            ftol: 1.49012e-8,
            xtol: 1.49012e-8,
            initial_lambda: 1e-3,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LmSolution {
    pub params: Vec<f64>,
    /// Jacobian of the predictions at `params` (rows = observations).
    pub jacobian: DMatrix<f64>,
    pub sse: f64,
    pub iterations: usize,
}

/// Run Levenberg–Marquardt from `initial`.
///
/// `predict` must return exactly `observed.len()` values.
pub fn levenberg_marquardt<F>(
    predict: F,
    observed: &[f64],
    initial: &[f64],
    opts: &LmOptions,
) -> Result<LmSolution, PetError>
where
    F: Fn(&[f64]) -> Vec<f64> + Sync,
{
    let n = observed.len();
    let p = initial.len();
    if p == 0 {
        return Err(PetError::Regression("model has no coefficients".into()));
    }
    if n < p {
        return Err(PetError::Regression(format!(
            "{n} data points cannot determine {p} coefficients"
        )));
    }

    let y = DVector::from_column_slice(observed);
    let mut params = initial.to_vec();
    let mut residual = residuals(&predict, &params, &y)?;
    let mut sse = residual.norm_squared();
    let mut lambda = opts.initial_lambda;

    let mut jacobian = numerical_jacobian(&predict, &params, n)?;
    if column_rank(&jacobian, Some(JACOBIAN_RANK_TOLERANCE)) < p {
        return Err(PetError::Regression(
            "Jacobian is rank deficient; a regressor is constant or collinear with another".into(),
        ));
    }

    for iteration in 1..=opts.max_iterations {
        let scale: Vec<f64> = (0..p).map(|j| jacobian.column(j).norm().max(1e-300)).collect();

        // Inner loop: raise damping until a step lowers the SSE.
        let accepted = loop {
            let delta = damped_step(&jacobian, &residual, &scale, lambda)?;
            let trial: Vec<f64> = params.iter().zip(delta.iter()).map(|(a, d)| a + d).collect();
            let trial_residual = residuals(&predict, &trial, &y)?;
            let trial_sse = trial_residual.norm_squared();

            if trial_sse.is_finite() && trial_sse <= sse {
                lambda = (lambda / 10.0).max(1e-12);
                break Some((trial, trial_residual, trial_sse, delta.norm()));
            }
            lambda *= 10.0;
            if lambda > 1e16 {
                break None;
            }
        };

        let Some((trial, trial_residual, trial_sse, step_norm)) = accepted else {
            // No damping lowers the SSE: we are at the minimum to working precision.
            debug!(iteration, sse, "levenberg-marquardt stalled at minimum");
            return Ok(LmSolution { params, jacobian, sse, iterations: iteration });
        };

        let reduction = sse - trial_sse;
        let param_norm = DVector::from_column_slice(&trial).norm();
        params = trial;
        residual = trial_residual;
        let prev_sse = sse;
        sse = trial_sse;
        jacobian = numerical_jacobian(&predict, &params, n)?;

        let tiny = sse <= f64::EPSILON * f64::EPSILON * (n as f64);
        let f_converged = reduction <= opts.ftol * prev_sse;
        let x_converged = step_norm <= opts.xtol * (param_norm + opts.xtol);
        if tiny || f_converged || x_converged {
            debug!(iteration, sse, "levenberg-marquardt converged");
            return Ok(LmSolution { params, jacobian, sse, iterations: iteration });
        }
    }

    Err(PetError::Regression(format!(
        "optimal coefficients not found within {} iterations",
        opts.max_iterations
    )))
}

fn residuals<F>(predict: &F, params: &[f64], y: &DVector<f64>) -> Result<DVector<f64>, PetError>
where
    F: Fn(&[f64]) -> Vec<f64> + Sync,
{
    let predicted = predict(params);
    if predicted.len() != y.len() {
        return Err(PetError::Regression(format!(
            "model returned {} predictions for {} observations",
            predicted.len(),
            y.len()
        )));
    }
    Ok(DVector::from_iterator(
        y.len(),
        y.iter().zip(predicted.iter()).map(|(obs, fit)| obs - fit),
    ))
}

fn numerical_jacobian<F>(predict: &F, params: &[f64], n: usize) -> Result<DMatrix<f64>, PetError>
where
    F: Fn(&[f64]) -> Vec<f64> + Sync,
{
    let base = predict(params);
    let eps = f64::EPSILON.sqrt();

    let columns: Vec<Vec<f64>> = (0..params.len())
        .into_par_iter()
        .map(|j| {
            let h = eps * params[j].abs().max(1.0);
            let mut shifted = params.to_vec();
            shifted[j] += h;
            let step = shifted[j] - params[j];
            predict(&shifted)
                .iter()
                .zip(base.iter())
                .map(|(a, b)| (a - b) / step)
                .collect()
        })
        .collect();

    let mut jac = DMatrix::<f64>::zeros(n, params.len());
    for (j, col) in columns.iter().enumerate() {
        if col.len() != n {
            return Err(PetError::Regression("model output length changed between evaluations".into()));
        }
        for (i, v) in col.iter().enumerate() {
            if !v.is_finite() {
                return Err(PetError::Regression(format!(
                    "non-finite Jacobian entry at point {i}, coefficient {j}"
                )));
            }
            jac[(i, j)] = *v;
        }
    }
    Ok(jac)
}

fn damped_step(
    jacobian: &DMatrix<f64>,
    residual: &DVector<f64>,
    scale: &[f64],
    lambda: f64,
) -> Result<DVector<f64>, PetError> {
    let (n, p) = jacobian.shape();
    let mut augmented = DMatrix::<f64>::zeros(n + p, p);
    augmented.view_mut((0, 0), (n, p)).copy_from(jacobian);
    let damping = lambda.sqrt();
    for j in 0..p {
        augmented[(n + j, j)] = damping * scale[j];
    }
    let mut rhs = DVector::<f64>::zeros(n + p);
    rhs.rows_mut(0, n).copy_from(residual);

    solve_least_squares(&augmented, &rhs)
        .ok_or_else(|| PetError::Regression("damped normal equations could not be solved".into()))
}
