//! Equipment models.
//!
//! Every supported formulation is a heat pump curve fit described by a static
//! table (`heat_pump`); the public seam is the `EquipmentModel` trait plus the
//! `equipment_factory`.

pub mod curves;
pub mod equipment;
pub mod heat_pump;
pub mod wahp_cooling;
pub mod wahp_heating;
pub mod wwhp_cooling;
pub mod wwhp_heating;

pub use curves::*;
pub use equipment::*;
pub use heat_pump::*;
