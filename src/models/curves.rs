//! The two linear curve forms shared by all heat pump curve-fit models.
//!
//! ```text
//! four-term:  Y/Y_R = c1 + c2·x1 + c3·x2 + c4·x3 + c5·x4
//! five-term:  Y/Y_R = c1 + c2·x1 + c3·x2 + c4·x3 + c5·x4 + c6·x5
//! ```
//!
//! Every `x` is a scaled quantity (see `math::scaling`). The four-term form
//! uses load temperature, source temperature, load flow, source flow; the
//! five-term form puts the second air temperature in front of those.

use serde::Serialize;

use crate::fit::ModelFunction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CurveForm {
    /// Simulation-engine `Curve:QuadLinear`.
    FourTerm,
    /// Simulation-engine `Curve:QuintLinear`.
    FiveTerm,
}

impl CurveForm {
    pub fn display_name(self) -> &'static str {
        match self {
            CurveForm::FourTerm => "QuadLinear",
            CurveForm::FiveTerm => "QuintLinear",
        }
    }
}

impl ModelFunction for CurveForm {
    fn coefficient_count(&self) -> usize {
        self.regressor_count() + 1
    }

    fn regressor_count(&self) -> usize {
        match self {
            CurveForm::FourTerm => 4,
            CurveForm::FiveTerm => 5,
        }
    }

    fn evaluate(&self, x: &[f64], coefficients: &[f64]) -> f64 {
        coefficients[0]
            + x.iter()
                .zip(&coefficients[1..])
                .map(|(xi, ci)| xi * ci)
                .sum::<f64>()
    }
}

/// A curve form multiplied back up by the rated value of its output.
///
/// Used to evaluate fitted coefficients in physical units.
#[derive(Debug, Clone, Copy)]
pub struct RatedCurve {
    pub form: CurveForm,
    pub rated_value: f64,
}

impl ModelFunction for RatedCurve {
    fn coefficient_count(&self) -> usize {
        self.form.coefficient_count()
    }

    fn regressor_count(&self) -> usize {
        self.form.regressor_count()
    }

    fn evaluate(&self, x: &[f64], coefficients: &[f64]) -> f64 {
        self.rated_value * self.form.evaluate(x, coefficients)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coefficient_counts() {
        assert_eq!(CurveForm::FourTerm.coefficient_count(), 5);
        assert_eq!(CurveForm::FiveTerm.coefficient_count(), 6);
    }

    #[test]
    fn four_term_evaluation() {
        let y = CurveForm::FourTerm.evaluate(&[1.0, 2.0, 3.0, 4.0], &[1.0, 1.0, 1.0, 1.0, 1.0]);
        assert_eq!(y, 11.0);
    }

    #[test]
    fn rated_curve_scales_output() {
        let curve = RatedCurve { form: CurveForm::FiveTerm, rated_value: 2.0 };
        let y = curve.evaluate(&[1.0; 5], &[0.5, 0.0, 0.0, 0.0, 0.0, 1.0]);
        assert_eq!(y, 3.0);
    }
}
