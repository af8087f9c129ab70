//! The equipment-model seam.
//!
//! Front ends (CLI, worker thread) only ever talk to `dyn EquipmentModel`. The
//! concrete model is picked from an `EquipType` by `equipment_factory`.

use serde::Serialize;

use crate::domain::{ColumnHeaderArray, EquipType, RequiredConstantParameter};
use crate::error::PetError;
use crate::models::heat_pump::HeatPumpDefinition;
use crate::models::{wahp_cooling, wahp_heating, wwhp_cooling, wwhp_heating};

/// Regression output for one physical quantity, in lock-step with the
/// catalog rows it was generated from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuantityResult {
    /// Stable key, e.g. `heating_capacity`.
    pub key: &'static str,
    pub label: &'static str,
    /// Coefficient symbol used in the parameter summary (e.g. `HC`).
    pub symbol: &'static str,
    pub coefficients: Vec<f64>,
    pub one_sigma_error: f64,
    pub catalog: Vec<f64>,
    pub predicted: Vec<f64>,
    pub percent_error: Vec<f64>,
}

impl QuantityResult {
    /// Largest absolute percent error, ignoring non-finite points.
    pub fn max_abs_percent_error(&self) -> f64 {
        self.percent_error
            .iter()
            .filter(|v| v.is_finite())
            .fold(0.0_f64, |acc, v| acc.max(v.abs()))
    }
}

pub trait EquipmentModel {
    fn equip_type(&self) -> EquipType;
    /// Long descriptive name.
    fn name(&self) -> &'static str;
    /// Brief id, at most 32 characters.
    fn short_name(&self) -> &'static str;
    fn headers(&self) -> ColumnHeaderArray;

    fn get_required_constant_parameters(&self) -> Vec<RequiredConstantParameter>;
    /// Fails with `UnknownParameterKey` when `id` is not one of this model's
    /// parameters.
    fn set_required_constant_parameter(&mut self, id: &str, value: f64) -> Result<(), PetError>;
    /// Current value of a rated parameter.
    fn rated_value(&self, id: &str) -> Option<f64>;

    fn minimum_data_points_for_generation(&self) -> usize;
    /// Number of `on_progress` calls a successful `generate_parameters` makes.
    fn progress_step_count(&self) -> usize;

    /// Regress every output quantity against `dataset`.
    ///
    /// `on_done` is called exactly once. On failure no results are stored.
    fn generate_parameters(
        &mut self,
        dataset: &[Vec<f64>],
        on_progress: &mut dyn FnMut(),
        on_done: &mut dyn FnMut(bool, String),
    );

    /// Results of the last successful generation (empty before that).
    fn quantity_results(&self) -> &[QuantityResult];
    /// `(description, one-sigma error)` per regressed quantity.
    fn regression_metrics(&self) -> Vec<(String, f64)>;
    /// Free-form text: nomenclature, governing equations, rated values and
    /// coefficients.
    fn parameter_summary(&self) -> String;
}

/// Static description of the formulation behind an equipment type.
pub fn heat_pump_definition(equip_type: EquipType) -> &'static HeatPumpDefinition {
    match equip_type {
        EquipType::WahpHeatingCurveFit => &wahp_heating::DEFINITION,
        EquipType::WahpCoolingCurveFit => &wahp_cooling::DEFINITION,
        EquipType::WwhpHeatingCurveFit => &wwhp_heating::DEFINITION,
        EquipType::WwhpCoolingCurveFit => &wwhp_cooling::DEFINITION,
    }
}

/// Build a fresh model (rated parameters at their defaults).
pub fn equipment_factory(equip_type: EquipType) -> Box<dyn EquipmentModel + Send> {
    let model = match equip_type {
        EquipType::WahpHeatingCurveFit => wahp_heating::model(),
        EquipType::WahpCoolingCurveFit => wahp_cooling::model(),
        EquipType::WwhpHeatingCurveFit => wwhp_heating::model(),
        EquipType::WwhpCoolingCurveFit => wwhp_cooling::model(),
    };
    Box::new(model)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_builds_every_type() {
        for t in EquipType::ALL {
            let m = equipment_factory(t);
            assert_eq!(m.equip_type(), t);
            assert!(m.short_name().len() <= 32);
            assert!(m.quantity_results().is_empty());
            assert!(m.regression_metrics().is_empty());
            assert!(m.minimum_data_points_for_generation() >= 5);
            assert!(m.progress_step_count() >= 5);
        }
    }

    #[test]
    fn definitions_match_their_types() {
        for t in EquipType::ALL {
            assert_eq!(heat_pump_definition(t).equip_type, t);
            assert_eq!(heat_pump_definition(t).short_name, equipment_factory(t).short_name());
        }
    }

    #[test]
    fn new_models_start_from_defaults() {
        for t in EquipType::ALL {
            let m = equipment_factory(t);
            for p in m.get_required_constant_parameters() {
                assert_eq!(m.rated_value(p.id), Some(p.default_value), "{t:?} {}", p.id);
            }
        }
    }

    #[test]
    fn unknown_parameter_key_is_an_error() {
        let mut m = equipment_factory(EquipType::WahpHeatingCurveFit);
        let err = m.set_required_constant_parameter("nope", 1.0).unwrap_err();
        assert_eq!(
            err,
            PetError::UnknownParameterKey {
                equip: EquipType::WahpHeatingCurveFit,
                id: "nope".to_string()
            }
        );
    }
}
