//! Catalog data handling.
//!
//! - correction factor model + validation (`correction`)
//! - expansion of base data into the full regression dataset (`expansion`)

pub mod correction;
pub mod expansion;

pub use correction::*;
pub use expansion::*;
