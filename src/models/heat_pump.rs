//! Table-driven heat pump curve-fit model.
//!
//! All four supported formulations share one procedure:
//!
//! 1. scale every catalog column (temperatures to the 10 °C reference,
//!    flows and outputs to their rated values)
//! 2. fit each output quantity with a four- or five-term linear curve
//! 3. evaluate the fitted curves back in physical units for comparison
//!
//! A formulation is therefore fully described by a static
//! `HeatPumpDefinition`; see the `wahp_*` / `wwhp_*` modules.

use std::collections::BTreeMap;

use tracing::{info, warn};

use crate::domain::{ColumnHeader, ColumnHeaderArray, EquipType, RequiredConstantParameter};
use crate::error::PetError;
use crate::fit::{ModelFunction, evaluate, fit};
use crate::math::{scale_by_rated, scale_temperature};
use crate::models::curves::{CurveForm, RatedCurve};
use crate::models::equipment::{EquipmentModel, QuantityResult};

/// How a catalog column is made dimensionless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnScaling {
    /// `(T + 273.15) / (10 + 273.15)`
    Temperature,
    /// Divided by the rated parameter with this id.
    Rated(&'static str),
}

/// One regressed output quantity.
#[derive(Debug)]
pub struct QuantitySpec {
    pub key: &'static str,
    pub label: &'static str,
    pub symbol: &'static str,
    /// Catalog column holding the output.
    pub column: usize,
    /// Rated parameter the output is scaled by.
    pub rated_id: &'static str,
    pub form: CurveForm,
    /// Catalog columns used as regressors, in curve order.
    pub regressors: &'static [usize],
}

#[derive(Debug)]
pub struct HeatPumpDefinition {
    pub equip_type: EquipType,
    pub name: &'static str,
    pub short_name: &'static str,
    pub columns: &'static [ColumnHeader],
    /// Symbol per column for the governing equations (e.g. `TLI`).
    pub column_symbols: &'static [&'static str],
    pub column_scaling: &'static [ColumnScaling],
    pub parameters: &'static [RequiredConstantParameter],
    pub quantities: &'static [QuantitySpec],
    pub minimum_rows: usize,
    pub nomenclature: &'static [(&'static str, &'static str)],
}

impl HeatPumpDefinition {
    fn column_scale(&self, column: usize) -> Option<ColumnScaling> {
        self.column_scaling.get(column).copied()
    }

    /// `(HC/HC_R) = HC_1 + HC_2*(TLI/TLI_R) + ...`
    pub fn governing_equation(&self, q: &QuantitySpec) -> String {
        let mut eq = format!("({s}/{s}_R) = {s}_1", s = q.symbol);
        for (i, &c) in q.regressors.iter().enumerate() {
            let x = self.column_symbols.get(c).copied().unwrap_or("?");
            eq.push_str(&format!(" + {}_{}*({x}/{x}_R)", q.symbol, i + 2));
        }
        eq
    }
}

/// A heat pump model instance: rated values plus the results of the last
/// successful generation.
#[derive(Debug, Clone)]
pub struct HeatPumpCurveFit {
    definition: &'static HeatPumpDefinition,
    rated: BTreeMap<&'static str, f64>,
    results: Vec<QuantityResult>,
}

impl HeatPumpCurveFit {
    pub fn new(definition: &'static HeatPumpDefinition) -> Self {
        let rated = definition
            .parameters
            .iter()
            .map(|p| (p.id, p.default_value))
            .collect();
        Self {
            definition,
            rated,
            results: Vec::new(),
        }
    }

    pub fn definition(&self) -> &'static HeatPumpDefinition {
        self.definition
    }

    fn rated(&self, id: &str) -> Result<f64, PetError> {
        self.rated.get(id).copied().ok_or_else(|| PetError::UnknownParameterKey {
            equip: self.definition.equip_type,
            id: id.to_string(),
        })
    }

    /// Scale every column of `dataset`, column-major.
    fn scaled_columns(&self, dataset: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, PetError> {
        let def = self.definition;
        (0..def.columns.len())
            .map(|c| {
                let raw = dataset.iter().map(|row| row[c]);
                match def.column_scale(c) {
                    Some(ColumnScaling::Temperature) => Ok(raw.map(scale_temperature).collect()),
                    Some(ColumnScaling::Rated(id)) => {
                        let rated = self.rated(id)?;
                        Ok(raw.map(|v| scale_by_rated(v, rated)).collect())
                    }
                    None => Err(PetError::InvalidInput(format!("column {c} has no scaling rule"))),
                }
            })
            .collect()
    }

    fn generate(&self, dataset: &[Vec<f64>], on_progress: &mut dyn FnMut()) -> Result<Vec<QuantityResult>, PetError> {
        let def = self.definition;
        let width = def.columns.len();

        if dataset.len() < def.minimum_rows {
            return Err(PetError::InvalidInput(format!(
                "{} needs at least {} catalog rows, got {}",
                def.short_name,
                def.minimum_rows,
                dataset.len()
            )));
        }
        if let Some(i) = dataset.iter().position(|row| row.len() != width) {
            return Err(PetError::InvalidInput(format!(
                "catalog row {i} has {} values, expected {width}",
                dataset[i].len()
            )));
        }

        let scaled = self.scaled_columns(dataset)?;
        on_progress();

        let mut fits = Vec::with_capacity(def.quantities.len());
        for q in def.quantities {
            let independent: Vec<Vec<f64>> = q.regressors.iter().map(|&c| scaled[c].clone()).collect();
            let curve_fit = fit(&q.form, &independent, &scaled[q.column]).map_err(|e| with_label(q.label, e))?;
            info!(
                equipment = def.short_name,
                quantity = q.key,
                iterations = curve_fit.iterations,
                one_sigma_error = curve_fit.one_sigma_error,
                "quantity regressed"
            );
            fits.push((independent, curve_fit));
            on_progress();
        }

        let mut results = Vec::with_capacity(fits.len());
        for (q, (independent, curve_fit)) in def.quantities.iter().zip(fits) {
            let catalog: Vec<f64> = dataset.iter().map(|row| row[q.column]).collect();
            let curve = RatedCurve {
                form: q.form,
                rated_value: self.rated(q.rated_id)?,
            };
            let (predicted, percent_error) = evaluate(&curve, &independent, &curve_fit.coefficients, &catalog)
                .map_err(|e| with_label(q.label, e))?;
            results.push(QuantityResult {
                key: q.key,
                label: q.label,
                symbol: q.symbol,
                coefficients: curve_fit.coefficients,
                one_sigma_error: curve_fit.one_sigma_error,
                catalog,
                predicted,
                percent_error,
            });
            on_progress();
        }

        Ok(results)
    }
}

fn with_label(label: &str, err: PetError) -> PetError {
    match err {
        PetError::Regression(msg) => PetError::Regression(format!("{label}: {msg}")),
        other => other,
    }
}

fn round4(v: f64) -> f64 {
    (v * 1e4).round() / 1e4
}

impl EquipmentModel for HeatPumpCurveFit {
    fn equip_type(&self) -> EquipType {
        self.definition.equip_type
    }

    fn name(&self) -> &'static str {
        self.definition.name
    }

    fn short_name(&self) -> &'static str {
        self.definition.short_name
    }

    fn headers(&self) -> ColumnHeaderArray {
        ColumnHeaderArray::new(self.definition.columns.to_vec())
    }

    fn get_required_constant_parameters(&self) -> Vec<RequiredConstantParameter> {
        self.definition.parameters.to_vec()
    }

    fn set_required_constant_parameter(&mut self, id: &str, value: f64) -> Result<(), PetError> {
        match self.definition.parameters.iter().find(|p| p.id == id) {
            Some(p) => {
                self.rated.insert(p.id, value);
                Ok(())
            }
            None => Err(PetError::UnknownParameterKey {
                equip: self.definition.equip_type,
                id: id.to_string(),
            }),
        }
    }

    fn rated_value(&self, id: &str) -> Option<f64> {
        self.rated.get(id).copied()
    }

    fn minimum_data_points_for_generation(&self) -> usize {
        self.definition.minimum_rows
    }

    fn progress_step_count(&self) -> usize {
        1 + 2 * self.definition.quantities.len()
    }

    fn generate_parameters(
        &mut self,
        dataset: &[Vec<f64>],
        on_progress: &mut dyn FnMut(),
        on_done: &mut dyn FnMut(bool, String),
    ) {
        self.results.clear();
        match self.generate(dataset, on_progress) {
            Ok(results) => {
                self.results = results;
                on_done(
                    true,
                    format!(
                        "Generated {} curves for {} from {} catalog rows",
                        self.results.len(),
                        self.definition.short_name,
                        dataset.len()
                    ),
                );
            }
            Err(err) => {
                warn!(equipment = self.definition.short_name, error = %err, "parameter generation failed");
                on_done(false, err.to_string());
            }
        }
    }

    fn quantity_results(&self) -> &[QuantityResult] {
        &self.results
    }

    fn regression_metrics(&self) -> Vec<(String, f64)> {
        self.results
            .iter()
            .map(|r| {
                (
                    format!("{} average curve-fit error (1 standard deviation)", r.label),
                    r.one_sigma_error,
                )
            })
            .collect()
    }

    fn parameter_summary(&self) -> String {
        let def = self.definition;
        let mut out = format!("{}\n**Begin Nomenclature**\n", def.name);
        for (symbol, meaning) in def.nomenclature {
            out.push_str(&format!("{symbol}: {meaning}\n"));
        }
        out.push_str("Subscript _R: Rated Value\nSubscript _#: Coefficient #\n**End Nomenclature**\n\n");

        out.push_str("**Begin Governing Equations**\n");
        for q in def.quantities {
            out.push_str(&def.governing_equation(q));
            out.push('\n');
        }
        out.push_str("**End Governing Equations**\n\n");

        out.push_str("**Begin Reporting Parameters**\n");
        for p in def.parameters {
            let value = self.rated.get(p.id).copied().unwrap_or(p.default_value);
            out.push_str(&format!("{}: {value}\n", p.title));
        }
        for r in &self.results {
            for (i, c) in r.coefficients.iter().enumerate() {
                out.push_str(&format!("{} Coefficient {}_{}: {}\n", r.label, r.symbol, i + 1, round4(*c)));
            }
        }
        out.push_str("**End Reporting Parameters**");
        out
    }
}

/// Coefficient count of the widest curve this definition regresses.
pub fn max_coefficient_count(definition: &HeatPumpDefinition) -> usize {
    definition
        .quantities
        .iter()
        .map(|q| q.form.coefficient_count())
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UnitType;

    static COLUMNS: [ColumnHeader; 4] = [
        ColumnHeader::new("Load Temp", UnitType::Temperature),
        ColumnHeader::new("Source Temp", UnitType::Temperature),
        ColumnHeader::new("Flow", UnitType::Flow),
        ColumnHeader::new("Output", UnitType::Power),
    ];

    static PARAMETERS: [RequiredConstantParameter; 2] = [
        RequiredConstantParameter {
            id: "v",
            title: "Rated Flow",
            description: "flow",
            unit_type: UnitType::Flow,
            default_value: 2.0,
        },
        RequiredConstantParameter {
            id: "q",
            title: "Rated Output",
            description: "output",
            unit_type: UnitType::Power,
            default_value: 10.0,
        },
    ];

    // Four-term curve with the flow used twice is rank deficient on purpose.
    static QUANTITIES: [QuantitySpec; 1] = [QuantitySpec {
        key: "output",
        label: "Output",
        symbol: "Q",
        column: 3,
        rated_id: "q",
        form: CurveForm::FourTerm,
        regressors: &[0, 1, 2, 2],
    }];

    static DEFINITION: HeatPumpDefinition = HeatPumpDefinition {
        equip_type: EquipType::WwhpHeatingCurveFit,
        name: "Test Heat Pump",
        short_name: "TEST",
        columns: &COLUMNS,
        column_symbols: &["TLI", "TSI", "V", "Q"],
        column_scaling: &[
            ColumnScaling::Temperature,
            ColumnScaling::Temperature,
            ColumnScaling::Rated("v"),
            ColumnScaling::Rated("q"),
        ],
        parameters: &PARAMETERS,
        quantities: &QUANTITIES,
        minimum_rows: 5,
        nomenclature: &[("Q", "Output")],
    };

    fn dataset() -> Vec<Vec<f64>> {
        (0..8)
            .map(|i| {
                let i = i as f64;
                vec![20.0 + i, 5.0 + 2.0 * (i % 3.0), 1.0 + 0.1 * i, 9.0 + 0.3 * i]
            })
            .collect()
    }

    #[test]
    fn new_instance_uses_defaults() {
        let m = HeatPumpCurveFit::new(&DEFINITION);
        assert_eq!(m.rated_value("v"), Some(2.0));
        assert_eq!(m.rated_value("q"), Some(10.0));
        assert_eq!(m.progress_step_count(), 3);
        assert_eq!(max_coefficient_count(&DEFINITION), 5);
    }

    #[test]
    fn governing_equation_text() {
        let eq = DEFINITION.governing_equation(&QUANTITIES[0]);
        assert_eq!(eq, "(Q/Q_R) = Q_1 + Q_2*(TLI/TLI_R) + Q_3*(TSI/TSI_R) + Q_4*(V/V_R) + Q_5*(V/V_R)");
    }

    #[test]
    fn failed_regression_reports_once_and_stores_nothing() {
        let mut m = HeatPumpCurveFit::new(&DEFINITION);
        let mut progress = 0;
        let mut done = Vec::new();
        m.generate_parameters(&dataset(), &mut || progress += 1, &mut |ok, msg| done.push((ok, msg)));

        assert_eq!(done.len(), 1);
        assert!(!done[0].0);
        assert!(done[0].1.contains("Output"), "{}", done[0].1);
        assert_eq!(progress, 1);
        assert!(m.quantity_results().is_empty());
        assert!(m.regression_metrics().is_empty());
    }

    #[test]
    fn too_few_rows_fails_before_extraction() {
        let mut m = HeatPumpCurveFit::new(&DEFINITION);
        let mut progress = 0;
        let mut done = Vec::new();
        m.generate_parameters(&dataset()[..3], &mut || progress += 1, &mut |ok, msg| done.push((ok, msg)));
        assert_eq!(progress, 0);
        assert_eq!(done.len(), 1);
        assert!(!done[0].0);
        assert!(done[0].1.contains("at least 5"));
    }

    #[test]
    fn ragged_row_is_rejected() {
        let mut m = HeatPumpCurveFit::new(&DEFINITION);
        let mut data = dataset();
        data[4].pop();
        let mut done = Vec::new();
        m.generate_parameters(&data, &mut || {}, &mut |ok, msg| done.push((ok, msg)));
        assert!(!done[0].0);
        assert!(done[0].1.contains("row 4"));
    }

    #[test]
    fn summary_lists_rated_values() {
        let mut m = HeatPumpCurveFit::new(&DEFINITION);
        m.set_required_constant_parameter("q", 12.5).unwrap();
        let s = m.parameter_summary();
        assert!(s.starts_with("Test Heat Pump"));
        assert!(s.contains("Rated Output: 12.5"));
        assert!(s.contains("Q: Output"));
    }

    #[test]
    fn rounding_to_four_places() {
        assert_eq!(round4(1.234_56), 1.2346);
        assert_eq!(round4(-0.000_04), -0.0);
    }
}
