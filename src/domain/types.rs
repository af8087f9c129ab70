//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - passed between the expansion engine and the equipment models
//! - read from job files and written to result exports
//! - listed by a front end that builds entry forms

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// A catalog table: `rows[data_point][column]`.
pub type Dataset = Vec<Vec<f64>>;

/// Physical quantity carried by a column or a rated parameter.
///
/// Values are always handled in the calculation unit of their type; converting
/// from manufacturer units happens before data reaches this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitType {
    Power,
    Flow,
    Temperature,
    Dimensionless,
    Pressure,
    Length,
    RotationalSpeed,
}

impl UnitType {
    /// Label for the unit values are expected in.
    pub fn calculation_unit(self) -> &'static str {
        match self {
            UnitType::Power => "kW",
            UnitType::Flow => "m^3/s",
            UnitType::Temperature => "deg C",
            UnitType::Dimensionless => "--",
            UnitType::Pressure => "Pa",
            UnitType::Length => "m",
            UnitType::RotationalSpeed => "rev/s",
        }
    }
}

impl std::fmt::Display for UnitType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.calculation_unit())
    }
}

/// Every equipment formulation the crate knows how to parameterize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum EquipType {
    /// Water-to-air heat pump, heating mode, curve fit formulation.
    WahpHeatingCurveFit,
    /// Water-to-air heat pump, cooling coil, curve fit formulation.
    WahpCoolingCurveFit,
    /// Water-to-water heat pump, heating mode, curve fit formulation.
    WwhpHeatingCurveFit,
    /// Water-to-water heat pump, cooling mode, curve fit formulation.
    WwhpCoolingCurveFit,
}

impl EquipType {
    pub const ALL: [EquipType; 4] = [
        EquipType::WahpHeatingCurveFit,
        EquipType::WahpCoolingCurveFit,
        EquipType::WwhpHeatingCurveFit,
        EquipType::WwhpCoolingCurveFit,
    ];

    /// Stable identifier used in job files and exports.
    pub fn unique_string(self) -> &'static str {
        match self {
            EquipType::WahpHeatingCurveFit => "WAHP_Heating_CurveFit",
            EquipType::WahpCoolingCurveFit => "WAHP_Cooling_CurveFit",
            EquipType::WwhpHeatingCurveFit => "WWHP_Heating_CurveFit",
            EquipType::WwhpCoolingCurveFit => "WWHP_Cooling_CurveFit",
        }
    }

    pub fn from_unique_string(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.unique_string() == s)
    }
}

/// One catalog column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnHeader {
    pub name: &'static str,
    pub unit_type: UnitType,
    /// Air-side entering dry-bulb column (target of combined db/wb corrections).
    pub dry_bulb: bool,
    /// Air-side entering wet-bulb column (target of combined db/wb corrections).
    pub wet_bulb: bool,
}

impl ColumnHeader {
    pub const fn new(name: &'static str, unit_type: UnitType) -> Self {
        Self {
            name,
            unit_type,
            dry_bulb: false,
            wet_bulb: false,
        }
    }

    pub const fn dry_bulb(name: &'static str) -> Self {
        Self {
            name,
            unit_type: UnitType::Temperature,
            dry_bulb: true,
            wet_bulb: false,
        }
    }

    pub const fn wet_bulb(name: &'static str) -> Self {
        Self {
            name,
            unit_type: UnitType::Temperature,
            dry_bulb: false,
            wet_bulb: true,
        }
    }
}

/// The full, ordered column layout of an equipment type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnHeaderArray {
    pub columns: Vec<ColumnHeader>,
}

impl ColumnHeaderArray {
    pub fn new(columns: Vec<ColumnHeader>) -> Self {
        Self { columns }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name).collect()
    }

    pub fn units(&self) -> Vec<UnitType> {
        self.columns.iter().map(|c| c.unit_type).collect()
    }

    /// Index of the dry-bulb column, if this equipment has one.
    pub fn db_column(&self) -> Option<usize> {
        self.columns.iter().position(|c| c.dry_bulb)
    }

    /// Index of the wet-bulb column, if this equipment has one.
    pub fn wb_column(&self) -> Option<usize> {
        self.columns.iter().position(|c| c.wet_bulb)
    }

    /// One `name [unit]` line per column.
    pub fn descriptive_summary(&self) -> String {
        let mut out = String::new();
        for c in &self.columns {
            out.push_str(&format!("{} [{}]\n", c.name, c.unit_type));
        }
        out
    }

    /// Two CSV lines: column names, then units.
    pub fn descriptive_csv(&self) -> String {
        let names = self.names().join(",");
        let units: Vec<String> = self.units().iter().map(|u| u.to_string()).collect();
        format!("{names}\n{}", units.join(","))
    }
}

/// Describes a rated/constant parameter that must be supplied before generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequiredConstantParameter {
    /// Unique (per equipment type) id used by `set_required_constant_parameter`.
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub unit_type: UnitType,
    /// Default, already in the calculation unit.
    pub default_value: f64,
}
