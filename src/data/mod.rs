//! Data sources.
//!
//! - synthetic catalogs built from reference curves (`synthetic`)

pub mod synthetic;

pub use synthetic::*;
