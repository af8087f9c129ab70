//! Curve fitting.
//!
//! - generic model-function seam (`ModelFunction`)
//! - least-squares fit with a one-sigma quality metric
//! - pointwise re-evaluation with percent error

pub mod regression;

pub use regression::*;
