//! Input/output helpers.
//!
//! - job files and CSV base tables (`job`)
//! - results JSON export (`export`)

pub mod export;
pub mod job;

pub use export::*;
pub use job::*;
