//! `eplus-pet` library crate.
//!
//! Parameter estimation for EnergyPlus heat pump curve-fit models: expand a
//! manufacturer catalog with its correction factors, then regress the
//! dimensionless performance curves for every output quantity.
//!
//! The binary (`pet`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the expansion engine and equipment models can back other front ends

pub mod app;
pub mod catalog;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
