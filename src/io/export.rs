//! Export generated parameters to JSON.
//!
//! The export carries everything needed to rebuild the curves downstream:
//! rated values, coefficients per quantity and the pointwise comparison
//! against the catalog. Non-finite percent errors (zero catalog values) are
//! written as `null`.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::AppError;
use crate::models::{EquipmentModel, QuantityResult};

#[derive(Debug, Serialize)]
pub struct ResultsFile<'a> {
    pub tool: &'static str,
    pub generated_at: DateTime<Utc>,
    pub equipment: &'static str,
    pub name: &'static str,
    pub rated_parameters: BTreeMap<&'static str, f64>,
    pub catalog_rows: usize,
    pub quantities: &'a [QuantityResult],
    pub parameter_summary: String,
}

impl<'a> ResultsFile<'a> {
    pub fn from_model(model: &'a dyn EquipmentModel, generated_at: DateTime<Utc>) -> Self {
        let rated_parameters = model
            .get_required_constant_parameters()
            .iter()
            .map(|p| (p.id, model.rated_value(p.id).unwrap_or(p.default_value)))
            .collect();
        let quantities = model.quantity_results();
        Self {
            tool: "pet",
            generated_at,
            equipment: model.equip_type().unique_string(),
            name: model.name(),
            rated_parameters,
            catalog_rows: quantities.first().map(|q| q.catalog.len()).unwrap_or(0),
            quantities,
            parameter_summary: model.parameter_summary(),
        }
    }
}

/// Write the model's results to a JSON file, stamped with the current time.
pub fn write_results_json(path: &Path, model: &dyn EquipmentModel) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create results JSON '{}': {e}", path.display())))?;
    let results = ResultsFile::from_model(model, Utc::now());
    serde_json::to_writer_pretty(file, &results)
        .map_err(|e| AppError::new(2, format!("Failed to write results JSON: {e}")))?;
    Ok(())
}
