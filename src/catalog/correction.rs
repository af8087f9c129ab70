//! Correction factor data model and self-validation.
//!
//! A correction factor is a small auxiliary table from a manufacturer catalog:
//! "if the held-constant variable took these `num_corrections` other values,
//! multiply these other columns by these amounts". The expansion engine turns
//! each factor into extra catalog rows.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// How a correction factor treats its base column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CorrectionType {
    /// New base value is the old value times the correction value.
    Multiplier,
    /// New base value is the correction value itself.
    Replacement,
    /// Replaces both the air dry-bulb and wet-bulb columns at once.
    CombinedDrybulbWetbulb,
}

impl CorrectionType {
    pub fn display_name(self) -> &'static str {
        match self {
            CorrectionType::Multiplier => "Multiplier",
            CorrectionType::Replacement => "Replacement",
            CorrectionType::CombinedDrybulbWetbulb => "Combined DB/WB",
        }
    }
}

/// Default number of correction rows for a freshly created factor.
pub const DEFAULT_NUM_CORRECTIONS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectionFactor {
    pub name: String,
    pub correction_type: CorrectionType,
    pub num_corrections: usize,
    /// Column replaced/multiplied by `base_correction`. `None` until chosen.
    ///
    /// Ignored for `CombinedDrybulbWetbulb`.
    #[serde(default)]
    pub base_column_index: Option<usize>,
    #[serde(default)]
    pub columns_to_modify: BTreeSet<usize>,
    #[serde(default)]
    pub base_correction: Vec<f64>,
    #[serde(default)]
    pub base_correction_db: Vec<f64>,
    #[serde(default)]
    pub base_correction_wb: Vec<f64>,
    /// Per modified column, one multiplier per correction row.
    #[serde(default)]
    pub mod_correction_data_column_map: BTreeMap<usize, Vec<f64>>,
}

impl CorrectionFactor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            correction_type: CorrectionType::Multiplier,
            num_corrections: DEFAULT_NUM_CORRECTIONS,
            base_column_index: None,
            columns_to_modify: BTreeSet::new(),
            base_correction: Vec::new(),
            base_correction_db: Vec::new(),
            base_correction_wb: Vec::new(),
            mod_correction_data_column_map: BTreeMap::new(),
        }
    }

    /// Replace the modified-column selection, keeping the column map in sync.
    ///
    /// Existing multipliers for columns that stay selected are kept; new
    /// columns start as all-ones (no change).
    pub fn set_columns_to_modify(&mut self, columns: impl IntoIterator<Item = usize>) {
        self.columns_to_modify = columns.into_iter().collect();
        self.mod_correction_data_column_map
            .retain(|col, _| self.columns_to_modify.contains(col));
        for &col in &self.columns_to_modify {
            self.mod_correction_data_column_map
                .entry(col)
                .or_insert_with(|| vec![1.0; self.num_corrections]);
        }
    }

    /// One-line description for lists and logs.
    pub fn describe(&self) -> String {
        format!(
            "CorrectionFactor {}; {} corrections ({})",
            self.name,
            self.num_corrections,
            self.correction_type.display_name()
        )
    }

    /// Validate the factor against its own invariants.
    ///
    /// All problems are collected so a front end can show them together. The
    /// dry-bulb/wet-bulb columns are those of the equipment the factor will be
    /// applied to.
    pub fn check_ok(&self, dry_bulb_column: Option<usize>, wet_bulb_column: Option<usize>) -> (bool, Vec<String>) {
        let mut messages = Vec::new();
        let n = self.num_corrections;

        if n < 1 {
            messages.push(format!(
                "Correction factor '{}': number of corrections must be at least 1 (got {n}).",
                self.name
            ));
        }

        match self.correction_type {
            CorrectionType::Multiplier | CorrectionType::Replacement => {
                match self.base_column_index {
                    None => messages.push(format!(
                        "Correction factor '{}': a base data column has not been selected.",
                        self.name
                    )),
                    Some(base) if self.columns_to_modify.contains(&base) => messages.push(format!(
                        "Correction factor '{}': base column {base} cannot also be a modified column.",
                        self.name
                    )),
                    Some(_) => {}
                }
                if self.base_correction.len() != n {
                    messages.push(format!(
                        "Correction factor '{}': expected {n} base correction values, found {}.",
                        self.name,
                        self.base_correction.len()
                    ));
                }
            }
            CorrectionType::CombinedDrybulbWetbulb => {
                for (label, column) in [("dry-bulb", dry_bulb_column), ("wet-bulb", wet_bulb_column)] {
                    match column {
                        None => messages.push(format!(
                            "Correction factor '{}': equipment has no {label} column for a combined DB/WB correction.",
                            self.name
                        )),
                        Some(c) if self.columns_to_modify.contains(&c) => messages.push(format!(
                            "Correction factor '{}': {label} column {c} cannot also be a modified column.",
                            self.name
                        )),
                        Some(_) => {}
                    }
                }
                if self.base_correction_db.len() != n {
                    messages.push(format!(
                        "Correction factor '{}': expected {n} dry-bulb correction values, found {}.",
                        self.name,
                        self.base_correction_db.len()
                    ));
                }
                if self.base_correction_wb.len() != n {
                    messages.push(format!(
                        "Correction factor '{}': expected {n} wet-bulb correction values, found {}.",
                        self.name,
                        self.base_correction_wb.len()
                    ));
                }
            }
        }

        for col in &self.columns_to_modify {
            match self.mod_correction_data_column_map.get(col) {
                None => messages.push(format!(
                    "Correction factor '{}': no correction data for modified column {col}.",
                    self.name
                )),
                Some(values) if values.len() != n => messages.push(format!(
                    "Correction factor '{}': column {col} has {} correction values, expected {n}.",
                    self.name,
                    values.len()
                )),
                Some(_) => {}
            }
        }
        for col in self.mod_correction_data_column_map.keys() {
            if !self.columns_to_modify.contains(col) {
                messages.push(format!(
                    "Correction factor '{}': correction data given for column {col}, which is not a modified column.",
                    self.name
                ));
            }
        }

        (messages.is_empty(), messages)
    }
}
