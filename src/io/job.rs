//! Job files.
//!
//! A job describes one parameter-estimation run:
//!
//! ```json
//! {
//!   "equipment": "wahp-heating-curve-fit",
//!   "rated_parameters": { "qh": 10.0, "cp": 2.5 },
//!   "base_data_csv": "catalog.csv",
//!   "correction_factors": [ ... ]
//! }
//! ```
//!
//! Base data can be inline (`base_data`, rows of numbers) or a CSV file with
//! one header row. A relative CSV path is resolved against the job file.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::catalog::CorrectionFactor;
use crate::domain::{Dataset, EquipType};
use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobFile {
    pub equipment: EquipType,
    /// Rated parameter overrides by id; missing ids keep their defaults.
    #[serde(default)]
    pub rated_parameters: BTreeMap<String, f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub base_data: Dataset,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_data_csv: Option<PathBuf>,
    #[serde(default)]
    pub correction_factors: Vec<CorrectionFactor>,
}

impl JobFile {
    pub fn new(equipment: EquipType) -> Self {
        Self {
            equipment,
            rated_parameters: BTreeMap::new(),
            base_data: Vec::new(),
            base_data_csv: None,
            correction_factors: Vec::new(),
        }
    }
}

/// Read a job file. A CSV referenced by the job is loaded into `base_data`.
pub fn read_job(path: &Path) -> Result<JobFile, AppError> {
    let file =
        File::open(path).map_err(|e| AppError::new(2, format!("Failed to open job file '{}': {e}", path.display())))?;
    let mut job: JobFile =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid job file '{}': {e}", path.display())))?;

    if let Some(csv_path) = job.base_data_csv.clone() {
        let resolved = match path.parent() {
            Some(dir) if csv_path.is_relative() => dir.join(&csv_path),
            _ => csv_path,
        };
        job.base_data = read_base_csv(&resolved)?;
    }
    Ok(job)
}

pub fn write_job(path: &Path, job: &JobFile) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create job file '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, job).map_err(|e| AppError::new(2, format!("Failed to write job file: {e}")))
}

/// Read a numeric catalog table. The first row is a header and is skipped.
pub fn read_base_csv(path: &Path) -> Result<Dataset, AppError> {
    let file =
        File::open(path).map_err(|e| AppError::new(2, format!("Failed to open catalog CSV '{}': {e}", path.display())))?;
    parse_base_csv(file, &path.display().to_string())
}

fn parse_base_csv<R: std::io::Read>(reader: R, label: &str) -> Result<Dataset, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        // Line numbers are 1-based and the header is line 1.
        let line = idx + 2;
        let record = record.map_err(|e| AppError::new(2, format!("{label}:{line}: {e}")))?;
        let row = record
            .iter()
            .enumerate()
            .map(|(col, field)| {
                field.parse::<f64>().map_err(|_| {
                    AppError::new(2, format!("{label}:{line}: column {} value '{field}' is not a number", col + 1))
                })
            })
            .collect::<Result<Vec<f64>, AppError>>()?;
        rows.push(row);
    }
    Ok(rows)
}
