//! Command-line parsing for the equipment parameter estimator.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the expansion/regression code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::EquipType;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "pet",
    version,
    about = "Parameter estimation for heat pump performance curves from manufacturer catalogs"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Expand a job's catalog, regress every output quantity, and report.
    Fit(FitArgs),
    /// Run the full pipeline on a synthetic catalog.
    Demo(DemoArgs),
    /// Print the catalog column layout for an equipment type.
    Headers(EquipmentArgs),
    /// Print the rated parameters (ids, defaults) for an equipment type.
    Params(EquipmentArgs),
}

/// Output options shared by `fit` and `demo`.
#[derive(Debug, Args, Clone)]
pub struct OutputArgs {
    /// Print a percent-error plot.
    #[arg(long)]
    pub plot: bool,

    /// Plot width in characters.
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height in characters.
    #[arg(long, default_value_t = 16)]
    pub height: usize,

    /// Print the parameter summary (nomenclature, equations, coefficients).
    #[arg(long)]
    pub summary: bool,

    /// Write results JSON to this path.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Parser, Clone)]
pub struct FitArgs {
    /// Job file (JSON): equipment, rated parameters, base data, correction factors.
    #[arg(long, value_name = "JSON")]
    pub job: PathBuf,

    /// Base catalog CSV (one header row). Overrides the job's base data.
    #[arg(long, value_name = "CSV")]
    pub catalog: Option<PathBuf>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Parser, Clone)]
pub struct DemoArgs {
    #[arg(short = 'e', long, value_enum, default_value_t = EquipType::WahpHeatingCurveFit)]
    pub equipment: EquipType,

    /// Random seed for the synthetic catalog.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Relative standard deviation of multiplicative output noise.
    #[arg(long, default_value_t = 0.0)]
    pub noise: f64,

    /// Number of synthetic catalog rows.
    #[arg(short = 'n', long, default_value_t = 40)]
    pub rows: usize,

    /// Also save the synthetic catalog as a job file.
    #[arg(long, value_name = "JSON")]
    pub save_job: Option<PathBuf>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Parser, Clone)]
pub struct EquipmentArgs {
    #[arg(short = 'e', long, value_enum)]
    pub equipment: EquipType,

    /// Print the layout as two CSV lines (names, units) instead.
    #[arg(long)]
    pub csv: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fit_command() {
        let cli = Cli::parse_from(["pet", "fit", "--job", "job.json", "--plot", "--export", "out.json"]);
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        assert_eq!(args.job, PathBuf::from("job.json"));
        assert!(args.output.plot);
        assert_eq!(args.output.export, Some(PathBuf::from("out.json")));
        assert_eq!(args.output.width, 72);
    }

    #[test]
    fn parses_demo_equipment_value() {
        let cli = Cli::parse_from(["pet", "demo", "-e", "wahp-cooling-curve-fit", "--noise", "0.01"]);
        let Command::Demo(args) = cli.command else {
            panic!("expected demo");
        };
        assert_eq!(args.equipment, EquipType::WahpCoolingCurveFit);
        assert_eq!(args.noise, 0.01);
        assert_eq!(args.rows, 40);
    }

    #[test]
    fn headers_requires_equipment() {
        assert!(Cli::try_parse_from(["pet", "headers"]).is_err());
    }
}
