//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads a job (or builds a synthetic catalog)
//! - runs catalog expansion + parameter generation
//! - prints reports/plots
//! - writes optional exports

use clap::Parser;
use tracing::info;

use crate::cli::{Command, DemoArgs, EquipmentArgs, FitArgs, OutputArgs};
use crate::data::{SyntheticOptions, synthetic_catalog};
use crate::error::AppError;
use crate::io::{JobFile, read_base_csv, read_job, write_job, write_results_json};
use crate::models::equipment_factory;

pub mod pipeline;
pub mod worker;

/// Entry point for the `pet` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Fit(args) => handle_fit(args),
        Command::Demo(args) => handle_demo(args),
        Command::Headers(args) => handle_headers(args),
        Command::Params(args) => handle_params(args),
    }
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let mut job = read_job(&args.job)?;
    if let Some(path) = &args.catalog {
        job.base_data = read_base_csv(path)?;
        job.base_data_csv = Some(path.clone());
    }
    info!(job = %args.job.display(), equipment = job.equipment.unique_string(), "fit");

    let run = pipeline::run_job(&job)?;
    print_outputs(&run, &args.output)
}

fn handle_demo(args: DemoArgs) -> Result<(), AppError> {
    let model = equipment_factory(args.equipment);
    let opts = SyntheticOptions {
        rows: args.rows,
        seed: args.seed,
        noise: args.noise,
    };
    let catalog = synthetic_catalog(model.as_ref(), &opts)?;
    info!(
        equipment = args.equipment.unique_string(),
        rows = catalog.dataset.len(),
        seed = args.seed,
        noise = args.noise,
        "synthetic catalog"
    );

    let mut job = JobFile::new(args.equipment);
    job.base_data = catalog.dataset;
    if let Some(path) = &args.save_job {
        write_job(path, &job)?;
    }

    let run = pipeline::run_job(&job)?;
    print_outputs(&run, &args.output)?;

    println!("Reference coefficients:");
    for r in run.model.quantity_results() {
        if let Some(reference) = catalog.coefficients.get(r.key) {
            let parts: Vec<String> = reference.iter().map(|x| format!("{x:.6}")).collect();
            println!("- {:<4} [{}]", r.symbol, parts.join(", "));
        }
    }
    Ok(())
}

fn handle_headers(args: EquipmentArgs) -> Result<(), AppError> {
    let model = equipment_factory(args.equipment);
    if args.csv {
        println!("{}", model.headers().descriptive_csv());
    } else {
        print!("{}", crate::report::format_headers(model.as_ref()));
    }
    Ok(())
}

fn handle_params(args: EquipmentArgs) -> Result<(), AppError> {
    let model = equipment_factory(args.equipment);
    print!("{}", crate::report::format_parameters(model.as_ref()));
    Ok(())
}

fn print_outputs(run: &pipeline::RunOutput, output: &OutputArgs) -> Result<(), AppError> {
    let model = run.model.as_ref();
    print!("{}", crate::report::format_run_summary(&run.stats, model));

    if output.plot {
        let plot = crate::plot::render_error_plot(model.quantity_results(), output.width, output.height);
        println!("{plot}");
    }

    if output.summary {
        println!("{}", model.parameter_summary());
    }

    if let Some(path) = &output.export {
        write_results_json(path, model)?;
        info!(path = %path.display(), "results exported");
    }

    Ok(())
}
