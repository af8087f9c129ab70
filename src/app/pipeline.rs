//! Shared "parameter generation" pipeline used by `pet fit` and `pet demo`.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! rated overrides -> catalog expansion -> background regression -> results
//!
//! The commands can then focus on presentation (printing, plotting, export).

use tracing::{info, warn};

use crate::app::worker::{BoxedModel, WorkerMessage, spawn_generation};
use crate::catalog::CatalogExpansionEngine;
use crate::error::AppError;
use crate::io::JobFile;
use crate::models::equipment_factory;
use crate::report::ExpansionStats;

/// All computed outputs of a single run.
pub struct RunOutput {
    pub model: BoxedModel,
    pub stats: ExpansionStats,
    /// Progress messages received from the worker.
    pub progress_steps: usize,
    /// Completion message from the worker.
    pub message: String,
}

/// Execute the full pipeline for a job and return the populated model.
pub fn run_job(job: &JobFile) -> Result<RunOutput, AppError> {
    // 1) Model with the job's rated values.
    let mut model = equipment_factory(job.equipment);
    for (id, value) in &job.rated_parameters {
        model
            .set_required_constant_parameter(id, *value)
            .map_err(|e| AppError::new(2, format!("Job file: {e}")))?;
    }

    // 2) Expand the base table.
    let headers = model.headers();
    if let Some(i) = job.base_data.iter().position(|row| row.len() != headers.len()) {
        return Err(AppError::new(
            3,
            format!(
                "Base data row {i} has {} values; {} expects {} columns ({}).",
                job.base_data[i].len(),
                model.short_name(),
                headers.len(),
                headers.names().join(", ")
            ),
        ));
    }

    let mut engine = CatalogExpansionEngine::new();
    engine.set_base_data(job.base_data.clone());
    for cf in &job.correction_factors {
        engine.add_correction_factor(cf.clone());
    }
    let expansion = engine.process(
        model.minimum_data_points_for_generation(),
        headers.db_column(),
        headers.wb_column(),
    );
    if !expansion.is_ok() {
        return Err(AppError::new(3, format!("Catalog expansion failed: {}", expansion.message)));
    }

    let stats = ExpansionStats {
        base_rows: job.base_data.len(),
        correction_factors: job.correction_factors.len(),
        expanded_rows: expansion.dataset.len(),
    };
    info!(
        equipment = model.short_name(),
        base_rows = stats.base_rows,
        expanded_rows = stats.expanded_rows,
        "catalog expanded"
    );

    // 3) Regress on the worker and wait for completion.
    let handle = spawn_generation(model, expansion.dataset)?;
    let mut progress_steps = 0;
    let mut outcome = None;
    while let Some(msg) = handle.recv() {
        match msg {
            WorkerMessage::Progress => progress_steps += 1,
            WorkerMessage::Done { success, message } => outcome = Some((success, message)),
        }
    }
    let model = handle.join()?;

    match outcome {
        Some((true, message)) => Ok(RunOutput {
            model,
            stats,
            progress_steps,
            message,
        }),
        Some((false, message)) => {
            warn!(%message, "parameter generation failed");
            Err(AppError::new(4, format!("Parameter generation failed: {message}")))
        }
        None => Err(AppError::new(4, "Parameter generation ended without a completion message.")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CorrectionFactor;
    use crate::data::{SyntheticOptions, synthetic_catalog};
    use crate::domain::EquipType;

    #[test]
    fn synthetic_job_runs_end_to_end() {
        let model = equipment_factory(EquipType::WwhpHeatingCurveFit);
        let catalog = synthetic_catalog(model.as_ref(), &SyntheticOptions::default()).unwrap();
        let mut job = JobFile::new(EquipType::WwhpHeatingCurveFit);
        job.base_data = catalog.dataset;

        let run = run_job(&job).unwrap();
        assert_eq!(run.stats.expanded_rows, 40);
        assert_eq!(run.progress_steps, run.model.progress_step_count());
        assert_eq!(run.model.quantity_results().len(), 2);
    }

    #[test]
    fn correction_factor_multiplies_rows() {
        let model = equipment_factory(EquipType::WahpHeatingCurveFit);
        let catalog = synthetic_catalog(model.as_ref(), &SyntheticOptions { rows: 10, ..SyntheticOptions::default() })
            .unwrap();
        let mut job = JobFile::new(EquipType::WahpHeatingCurveFit);
        job.base_data = catalog.dataset;

        // Load flow at 90% / 110%, with capacity and power following.
        let mut cf = CorrectionFactor::new("load flow");
        cf.num_corrections = 2;
        cf.base_column_index = Some(3);
        cf.base_correction = vec![0.9, 1.1];
        cf.set_columns_to_modify([4, 5]);
        cf.mod_correction_data_column_map.insert(4, vec![0.97, 1.02]);
        cf.mod_correction_data_column_map.insert(5, vec![0.99, 1.01]);
        job.correction_factors.push(cf);

        let run = run_job(&job).unwrap();
        assert_eq!(run.stats.base_rows, 10);
        assert_eq!(run.stats.expanded_rows, 30);
        assert_eq!(run.model.quantity_results()[0].catalog.len(), 30);
    }

    #[test]
    fn bad_rated_parameter_id_is_input_error() {
        let mut job = JobFile::new(EquipType::WahpCoolingCurveFit);
        job.rated_parameters.insert("qh".into(), 1.0);
        let err = run_job(&job).err().unwrap();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn undersized_catalog_is_data_error() {
        let mut job = JobFile::new(EquipType::WahpHeatingCurveFit);
        job.base_data = vec![vec![10.0, 0.0002, 20.0, 0.0007, 3.5, 0.9]];
        let err = run_job(&job).err().unwrap();
        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().contains("Catalog expansion failed"));
    }

    #[test]
    fn wrong_row_width_is_data_error() {
        let mut job = JobFile::new(EquipType::WahpHeatingCurveFit);
        job.base_data = vec![vec![1.0, 2.0]];
        let err = run_job(&job).err().unwrap();
        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().contains("expects 6 columns"));
    }
}
