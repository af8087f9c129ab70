//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the catalog table alias (`Dataset`)
//! - unit tags and equipment identifiers (`UnitType`, `EquipType`)
//! - column layouts and rated-parameter descriptors

pub mod types;

pub use types::*;
