//! Catalog expansion: base table + correction factors -> full dataset.
//!
//! Growth law:
//!
//! ```text
//! rows_final = rows_base * Π_f (1 + num_corrections_f)
//! ```
//!
//! Each factor re-expands *everything* produced so far (the base rows plus the
//! rows added by earlier factors), so the growth compounds. The snapshot of the
//! working table is taken at the start of each factor and is an owned copy, so
//! appending never disturbs the rows being iterated.
//!
//! After expansion the table must be non-empty, large enough for the equipment's
//! regressions, finite, and every column must vary.

use tracing::{debug, warn};

use crate::catalog::correction::{CorrectionFactor, CorrectionType};
use crate::domain::Dataset;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpansionStatus {
    Ok,
    Error,
}

/// Outcome of an expansion run.
///
/// On `Error` the dataset holds whatever was built before the failing check
/// (possibly empty) and must not be regressed.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpansionResult {
    pub status: ExpansionStatus,
    pub message: String,
    pub dataset: Dataset,
}

impl ExpansionResult {
    fn ok(dataset: Dataset) -> Self {
        Self {
            status: ExpansionStatus::Ok,
            message: String::new(),
            dataset,
        }
    }

    fn error(message: impl Into<String>, dataset: Dataset) -> Self {
        let message = message.into();
        warn!(%message, "catalog expansion rejected");
        Self {
            status: ExpansionStatus::Error,
            message,
            dataset,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == ExpansionStatus::Ok
    }
}

/// Expand a base table with an ordered list of correction factors and validate
/// the result.
pub fn expand(
    base_dataset: &[Vec<f64>],
    correction_factors: &[CorrectionFactor],
    minimum_row_count: usize,
    dry_bulb_column: Option<usize>,
    wet_bulb_column: Option<usize>,
) -> ExpansionResult {
    let messages = check_inputs(base_dataset, correction_factors, dry_bulb_column, wet_bulb_column);
    if !messages.is_empty() {
        return ExpansionResult::error(messages.join("\n"), Vec::new());
    }

    let mut result: Dataset = base_dataset.to_vec();
    for cf in correction_factors {
        let snapshot = result.clone();
        for k in 0..cf.num_corrections {
            for row in &snapshot {
                result.push(corrected_row(row, cf, k, dry_bulb_column, wet_bulb_column));
            }
        }
        debug!(
            factor = %cf.name,
            before = snapshot.len(),
            after = result.len(),
            "applied correction factor"
        );
    }

    if result.is_empty() {
        return ExpansionResult::error("Full catalog data set appears empty.", result);
    }

    if result.len() < minimum_row_count {
        let message = format!(
            "Full catalog data set too small. Data includes {} rows, but this equipment requires at least {minimum_row_count}.",
            result.len()
        );
        return ExpansionResult::error(message, result);
    }

    if let Some((row, col)) = first_non_finite(&result) {
        let message = format!("Full catalog data has a non-finite value at row {row}, column {col}.");
        return ExpansionResult::error(message, result);
    }

    if let Some(col) = first_constant_column(&result) {
        let message = format!(
            "Column {col} is constant across the full catalog data set; every column must contain variation."
        );
        return ExpansionResult::error(message, result);
    }

    ExpansionResult::ok(result)
}

fn corrected_row(
    row: &[f64],
    cf: &CorrectionFactor,
    k: usize,
    dry_bulb_column: Option<usize>,
    wet_bulb_column: Option<usize>,
) -> Vec<f64> {
    let mut out = row.to_vec();
    match cf.correction_type {
        CorrectionType::Multiplier => {
            if let Some(base) = cf.base_column_index {
                out[base] = row[base] * cf.base_correction[k];
            }
        }
        CorrectionType::Replacement => {
            if let Some(base) = cf.base_column_index {
                out[base] = cf.base_correction[k];
            }
        }
        CorrectionType::CombinedDrybulbWetbulb => {
            if let (Some(db), Some(wb)) = (dry_bulb_column, wet_bulb_column) {
                out[db] = cf.base_correction_db[k];
                out[wb] = cf.base_correction_wb[k];
            }
        }
    }
    for (&col, multipliers) in &cf.mod_correction_data_column_map {
        out[col] = row[col] * multipliers[k];
    }
    out
}

/// Shape checks that must hold before any row is built.
fn check_inputs(
    base_dataset: &[Vec<f64>],
    correction_factors: &[CorrectionFactor],
    dry_bulb_column: Option<usize>,
    wet_bulb_column: Option<usize>,
) -> Vec<String> {
    let mut messages = Vec::new();

    let width = base_dataset.first().map(Vec::len).unwrap_or(0);
    for (i, row) in base_dataset.iter().enumerate() {
        if row.len() != width {
            messages.push(format!(
                "Base data row {i} has {} columns, expected {width}.",
                row.len()
            ));
        }
    }

    for cf in correction_factors {
        let (ok, cf_messages) = cf.check_ok(dry_bulb_column, wet_bulb_column);
        if !ok {
            messages.extend(cf_messages);
            continue;
        }
        if base_dataset.is_empty() {
            continue;
        }
        let mut referenced: Vec<usize> = cf.columns_to_modify.iter().copied().collect();
        match cf.correction_type {
            CorrectionType::CombinedDrybulbWetbulb => {
                referenced.extend(dry_bulb_column);
                referenced.extend(wet_bulb_column);
            }
            _ => referenced.extend(cf.base_column_index),
        }
        for col in referenced {
            if col >= width {
                messages.push(format!(
                    "Correction factor '{}' references column {col}, but the data has {width} columns.",
                    cf.name
                ));
            }
        }
    }

    messages
}

fn first_non_finite(data: &[Vec<f64>]) -> Option<(usize, usize)> {
    data.iter().enumerate().find_map(|(r, row)| {
        row.iter().position(|v| !v.is_finite()).map(|c| (r, c))
    })
}

fn first_constant_column(data: &[Vec<f64>]) -> Option<usize> {
    let first = data.first()?;
    (0..first.len()).find(|&col| data.iter().all(|row| row[col] == first[col]))
}

/// Owns the inputs of one expansion and the processed output.
///
/// This is the stateful counterpart of [`expand`] for front ends that collect
/// the base table and the correction factors in separate steps.
#[derive(Debug, Clone, Default)]
pub struct CatalogExpansionEngine {
    correction_factors: Vec<CorrectionFactor>,
    base_data: Dataset,
    final_data: Dataset,
    last_error_message: String,
    data_processed: bool,
}

impl CatalogExpansionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_correction_factor(&mut self, cf: CorrectionFactor) {
        self.correction_factors.push(cf);
    }

    /// Base data in rows: `data[row][column]`.
    pub fn set_base_data(&mut self, data: Dataset) {
        self.base_data = data;
    }

    pub fn correction_factors(&self) -> &[CorrectionFactor] {
        &self.correction_factors
    }

    pub fn base_data(&self) -> &[Vec<f64>] {
        &self.base_data
    }

    /// Expanded data from the last successful `process`.
    pub fn final_data(&self) -> &[Vec<f64>] {
        &self.final_data
    }

    pub fn last_error_message(&self) -> &str {
        &self.last_error_message
    }

    pub fn data_processed(&self) -> bool {
        self.data_processed
    }

    /// Expand the owned base data with the owned correction factors.
    pub fn process(
        &mut self,
        minimum_row_count: usize,
        dry_bulb_column: Option<usize>,
        wet_bulb_column: Option<usize>,
    ) -> ExpansionResult {
        let result = expand(
            &self.base_data,
            &self.correction_factors,
            minimum_row_count,
            dry_bulb_column,
            wet_bulb_column,
        );
        self.data_processed = true;
        if result.is_ok() {
            self.final_data = result.dataset.clone();
            self.last_error_message.clear();
        } else {
            self.final_data.clear();
            self.last_error_message = result.message.clone();
        }
        result
    }

    /// Back to the freshly-constructed state.
    pub fn reset(&mut self) {
        self.correction_factors.clear();
        self.base_data.clear();
        self.final_data.clear();
        self.last_error_message.clear();
        self.data_processed = false;
    }
}
