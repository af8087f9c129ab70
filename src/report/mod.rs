//! Reporting utilities: error statistics and formatted terminal output.

pub mod format;

pub use format::*;

use crate::models::QuantityResult;

/// Row counts around catalog expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpansionStats {
    pub base_rows: usize,
    pub correction_factors: usize,
    pub expanded_rows: usize,
}

/// Percent-error statistics for one regressed quantity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorStats {
    pub mean_abs: f64,
    pub max_abs: f64,
    /// Points whose error is not finite (zero catalog value).
    pub non_finite: usize,
}

pub fn error_stats(result: &QuantityResult) -> ErrorStats {
    let finite: Vec<f64> = result
        .percent_error
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .collect();
    let mean_abs = if finite.is_empty() {
        0.0
    } else {
        finite.iter().map(|v| v.abs()).sum::<f64>() / finite.len() as f64
    };
    ErrorStats {
        mean_abs,
        max_abs: result.max_abs_percent_error(),
        non_finite: result.percent_error.len() - finite.len(),
    }
}
