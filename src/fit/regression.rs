//! Generic regression wrapper around the Levenberg–Marquardt solver.
//!
//! This layer knows nothing about equipment. It takes:
//! - a model function `y = f(x; c)`
//! - one array per independent variable (all the same length)
//! - the observed dependent array
//!
//! and returns the fitted coefficients plus a single "average one-sigma"
//! number describing how well the coefficients are determined.

use rayon::prelude::*;
use tracing::debug;

use crate::error::PetError;
use crate::math::{LmOptions, levenberg_marquardt, unscaled_covariance};

/// A curve `y = f(x; c)` with a fixed number of regressors and coefficients.
pub trait ModelFunction: Sync {
    fn coefficient_count(&self) -> usize;
    fn regressor_count(&self) -> usize;
    /// Evaluate at one point. `x.len() == regressor_count()`,
    /// `coefficients.len() == coefficient_count()`.
    fn evaluate(&self, x: &[f64], coefficients: &[f64]) -> f64;
}

/// Result of one regression.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveFit {
    pub coefficients: Vec<f64>,
    /// Mean over coefficients of the standard error `sqrt(diag(pcov))`.
    ///
    /// `+inf` when there are exactly as many points as coefficients.
    pub one_sigma_error: f64,
    pub sse: f64,
    pub iterations: usize,
}

/// Fit `model` to the data, starting from all-ones coefficients.
pub fn fit(
    model: &dyn ModelFunction,
    independent: &[Vec<f64>],
    dependent: &[f64],
) -> Result<CurveFit, PetError> {
    let points = to_points(model, independent, dependent.len())?;
    if let Some(i) = dependent.iter().position(|v| !v.is_finite()) {
        return Err(PetError::Regression(format!(
            "dependent value at point {i} is not finite"
        )));
    }

    let n = dependent.len();
    let p = model.coefficient_count();
    let predict = |c: &[f64]| -> Vec<f64> { points.par_iter().map(|x| model.evaluate(x, c)).collect() };

    let solution = levenberg_marquardt(predict, dependent, &vec![1.0; p], &LmOptions::default())?;

    let one_sigma_error = if n > p {
        let cov = unscaled_covariance(&solution.jacobian).ok_or_else(|| {
            PetError::Regression("covariance of the fitted coefficients is singular".into())
        })?;
        let residual_variance = solution.sse / (n - p) as f64;
        let total: f64 = (0..p).map(|j| (cov[(j, j)] * residual_variance).sqrt()).sum();
        total / p as f64
    } else {
        f64::INFINITY
    };

    debug!(
        points = n,
        coefficients = p,
        iterations = solution.iterations,
        sse = solution.sse,
        one_sigma_error,
        "regression finished"
    );

    Ok(CurveFit {
        coefficients: solution.params,
        one_sigma_error,
        sse: solution.sse,
        iterations: solution.iterations,
    })
}

/// Re-evaluate `model` at every data point.
///
/// Returns `(predicted, percent_error)` where
/// `percent_error[i] = 100 * (predicted[i] - actual[i]) / actual[i]`.
/// A zero `actual` value gives a non-finite percent error.
pub fn evaluate(
    model: &dyn ModelFunction,
    independent: &[Vec<f64>],
    coefficients: &[f64],
    actual: &[f64],
) -> Result<(Vec<f64>, Vec<f64>), PetError> {
    if coefficients.len() != model.coefficient_count() {
        return Err(PetError::Regression(format!(
            "expected {} coefficients, got {}",
            model.coefficient_count(),
            coefficients.len()
        )));
    }
    let points = to_points(model, independent, actual.len())?;

    let predicted: Vec<f64> = points.iter().map(|x| model.evaluate(x, coefficients)).collect();
    let percent_error = predicted
        .iter()
        .zip(actual)
        .map(|(fit, obs)| 100.0 * (fit - obs) / obs)
        .collect();
    Ok((predicted, percent_error))
}

/// Transpose per-variable arrays into per-point rows, checking shape.
fn to_points(model: &dyn ModelFunction, independent: &[Vec<f64>], n: usize) -> Result<Vec<Vec<f64>>, PetError> {
    if independent.len() != model.regressor_count() {
        return Err(PetError::Regression(format!(
            "model takes {} independent variables, got {}",
            model.regressor_count(),
            independent.len()
        )));
    }
    for (k, arr) in independent.iter().enumerate() {
        if arr.len() != n {
            return Err(PetError::Regression(format!(
                "independent variable {k} has {} values, expected {n}",
                arr.len()
            )));
        }
        if let Some(i) = arr.iter().position(|v| !v.is_finite()) {
            return Err(PetError::Regression(format!(
                "independent variable {k} is not finite at point {i}"
            )));
        }
    }
    Ok((0..n).map(|i| independent.iter().map(|arr| arr[i]).collect()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `y = c0 + c1 * x0 + c2 * x1`
    struct Plane;

    impl ModelFunction for Plane {
        fn coefficient_count(&self) -> usize {
            3
        }
        fn regressor_count(&self) -> usize {
            2
        }
        fn evaluate(&self, x: &[f64], c: &[f64]) -> f64 {
            c[0] + c[1] * x[0] + c[2] * x[1]
        }
    }

    fn plane_data() -> (Vec<Vec<f64>>, Vec<f64>) {
        let x0 = vec![0.0, 1.0, 2.0, 0.0, 1.0, 2.0, 3.0];
        let x1 = vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 2.0];
        let y = x0.iter().zip(&x1).map(|(a, b)| 0.5 + 2.0 * a - 1.5 * b).collect();
        (vec![x0, x1], y)
    }

    #[test]
    fn exact_plane_is_recovered_with_zero_error() {
        let (x, y) = plane_data();
        let fit = fit(&Plane, &x, &y).unwrap();
        assert!((fit.coefficients[0] - 0.5).abs() < 1e-6);
        assert!((fit.coefficients[1] - 2.0).abs() < 1e-6);
        assert!((fit.coefficients[2] + 1.5).abs() < 1e-6);
        assert!(fit.one_sigma_error < 1e-6);
    }

    #[test]
    fn noisy_plane_has_positive_error() {
        let (x, mut y) = plane_data();
        for (i, v) in y.iter_mut().enumerate() {
            *v += if i % 2 == 0 { 0.05 } else { -0.05 };
        }
        let fit = fit(&Plane, &x, &y).unwrap();
        assert!(fit.one_sigma_error > 0.0);
        assert!(fit.one_sigma_error.is_finite());
    }

    #[test]
    fn one_sigma_error_matches_direct_least_squares() {
        use nalgebra::{DMatrix, DVector};

        let (x, mut y) = plane_data();
        for (i, v) in y.iter_mut().enumerate() {
            *v += [0.03, -0.05, 0.01, 0.04, -0.02, -0.06, 0.05][i];
        }
        let fit = fit(&Plane, &x, &y).unwrap();

        // Closed form: beta = (AᵀA)⁻¹Aᵀy, sigma_j = sqrt((AᵀA)⁻¹_jj · SSE/(n−p)).
        let (n, p) = (y.len(), 3);
        let a = DMatrix::from_fn(n, p, |i, j| if j == 0 { 1.0 } else { x[j - 1][i] });
        let yv = DVector::from_column_slice(&y);
        let ata_inv = (a.transpose() * &a).try_inverse().unwrap();
        let beta = &ata_inv * a.transpose() * &yv;
        let sse = (&yv - &a * &beta).norm_squared();
        let expected = (0..p)
            .map(|j| (ata_inv[(j, j)] * sse / (n - p) as f64).sqrt())
            .sum::<f64>()
            / p as f64;

        for j in 0..p {
            assert!((fit.coefficients[j] - beta[j]).abs() < 1e-6, "{j}");
        }
        assert!((fit.sse - sse).abs() < 1e-10);
        assert!(
            ((fit.one_sigma_error - expected) / expected).abs() < 1e-6,
            "{} vs {expected}",
            fit.one_sigma_error
        );
    }

    #[test]
    fn exactly_determined_fit_reports_infinite_error() {
        let x = vec![vec![0.0, 1.0, 0.0], vec![0.0, 0.0, 1.0]];
        let y = vec![1.0, 2.0, 3.0];
        let fit = fit(&Plane, &x, &y).unwrap();
        assert!(fit.one_sigma_error.is_infinite());
    }

    #[test]
    fn constant_regressor_fails() {
        let x = vec![vec![1.0, 2.0, 3.0, 4.0], vec![5.0; 4]];
        let y = vec![1.0, 2.0, 3.0, 4.0];
        let err = fit(&Plane, &x, &y).unwrap_err();
        assert!(matches!(err, PetError::Regression(_)));
    }

    #[test]
    fn shape_mismatch_fails() {
        let x = vec![vec![1.0, 2.0, 3.0, 4.0], vec![1.0, 2.0]];
        assert!(fit(&Plane, &x, &[1.0, 2.0, 3.0, 4.0]).is_err());
        assert!(fit(&Plane, &x[..1], &[1.0, 2.0, 3.0, 4.0]).is_err());
    }

    #[test]
    fn evaluate_reports_percent_error() {
        let x = vec![vec![1.0, 2.0], vec![0.0, 0.0]];
        let (pred, err) = evaluate(&Plane, &x, &[0.0, 1.0, 0.0], &[1.0, 2.5]).unwrap();
        assert_eq!(pred, vec![1.0, 2.0]);
        assert_eq!(err[0], 0.0);
        assert!((err[1] + 20.0).abs() < 1e-12);
    }

    #[test]
    fn zero_actual_value_gives_non_finite_error() {
        let x = vec![vec![1.0], vec![0.0]];
        let (_, err) = evaluate(&Plane, &x, &[0.0, 1.0, 0.0], &[0.0]).unwrap();
        assert!(!err[0].is_finite());
    }
}
