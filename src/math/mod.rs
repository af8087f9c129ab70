//! Mathematical utilities: dense least squares, Levenberg–Marquardt, scaling.

pub mod lm;
pub mod ols;
pub mod scaling;

pub use lm::*;
pub use ols::*;
pub use scaling::*;
