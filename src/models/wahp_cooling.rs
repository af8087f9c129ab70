//! Water-to-air heat pump, cooling coil, curve fit formulation.
//!
//! Total capacity and power use the four-term curve with the entering air
//! wet-bulb as the load temperature. Sensible capacity depends on both air
//! temperatures and uses the five-term curve:
//!
//! ```text
//! (TC/TC_R) = TC_1 + TC_2*(Twb/Twb_R) + TC_3*(TSI/TSI_R) + TC_4*(VLI/VLI_R) + TC_5*(VSI/VSI_R)
//! (SC/SC_R) = SC_1 + SC_2*(Tdb/Tdb_R) + SC_3*(Twb/Twb_R) + SC_4*(TSI/TSI_R) + SC_5*(VLI/VLI_R) + SC_6*(VSI/VSI_R)
//! (CP/CP_R) = CP_1 + CP_2*(Twb/Twb_R) + CP_3*(TSI/TSI_R) + CP_4*(VLI/VLI_R) + CP_5*(VSI/VSI_R)
//! ```

use crate::domain::{ColumnHeader, EquipType, RequiredConstantParameter, UnitType};
use crate::models::curves::CurveForm;
use crate::models::heat_pump::{ColumnScaling, HeatPumpCurveFit, HeatPumpDefinition, QuantitySpec};

const COLUMNS: &[ColumnHeader] = &[
    ColumnHeader::new("Water-side Entering Temp", UnitType::Temperature),
    ColumnHeader::new("Water-side Volume Flow", UnitType::Flow),
    ColumnHeader::dry_bulb("Air-side Entering Dry-bulb Temp"),
    ColumnHeader::wet_bulb("Air-side Entering Wet-bulb Temp"),
    ColumnHeader::new("Air-side Volume Flow", UnitType::Flow),
    ColumnHeader::new("Total Cooling Capacity", UnitType::Power),
    ColumnHeader::new("Sensible Cooling Capacity", UnitType::Power),
    ColumnHeader::new("Cooling Power", UnitType::Power),
];

const PARAMETERS: &[RequiredConstantParameter] = &[
    RequiredConstantParameter {
        id: "vl",
        title: "Rated Air Flow Rate",
        description: "This is a nominal flow rate value for the air-side of the coil",
        unit_type: UnitType::Flow,
        default_value: 0.0006887,
    },
    RequiredConstantParameter {
        id: "vs",
        title: "Rated Water Flow Rate",
        description: "This is a nominal flow rate value for the water-side of the coil",
        unit_type: UnitType::Flow,
        default_value: 0.0001892,
    },
    RequiredConstantParameter {
        id: "qc",
        title: "Rated Total Cooling Capacity",
        description: "This is a nominal value of the total cooling capacity of the coil",
        unit_type: UnitType::Power,
        default_value: 3.513,
    },
    RequiredConstantParameter {
        id: "qs",
        title: "Rated Sensible Cooling Capacity",
        description: "This is a nominal value of the sensible cooling capacity of the coil",
        unit_type: UnitType::Power,
        default_value: 3.1,
    },
    RequiredConstantParameter {
        id: "cp",
        title: "Rated Cooling Power",
        description: "This is a nominal value of the cooling power for this coil",
        unit_type: UnitType::Power,
        default_value: 0.900,
    },
];

/// Wet-bulb, water temp, air flow, water flow.
const FOUR_TERM: &[usize] = &[3, 0, 4, 1];
/// Dry-bulb, wet-bulb, water temp, air flow, water flow.
const FIVE_TERM: &[usize] = &[2, 3, 0, 4, 1];

pub static DEFINITION: HeatPumpDefinition = HeatPumpDefinition {
    equip_type: EquipType::WahpCoolingCurveFit,
    name: "Water to Air Heat Pump, Cooling Coil, Curve Fit Formulation",
    short_name: "WAHP-Cooling-CurveFit",
    columns: COLUMNS,
    column_symbols: &["TSI", "VSI", "Tdb", "Twb", "VLI", "TC", "SC", "CP"],
    column_scaling: &[
        ColumnScaling::Temperature,
        ColumnScaling::Rated("vs"),
        ColumnScaling::Temperature,
        ColumnScaling::Temperature,
        ColumnScaling::Rated("vl"),
        ColumnScaling::Rated("qc"),
        ColumnScaling::Rated("qs"),
        ColumnScaling::Rated("cp"),
    ],
    parameters: PARAMETERS,
    quantities: &[
        QuantitySpec {
            key: "total_capacity",
            label: "Total Cooling Capacity",
            symbol: "TC",
            column: 5,
            rated_id: "qc",
            form: CurveForm::FourTerm,
            regressors: FOUR_TERM,
        },
        QuantitySpec {
            key: "sensible_capacity",
            label: "Sensible Cooling Capacity",
            symbol: "SC",
            column: 6,
            rated_id: "qs",
            form: CurveForm::FiveTerm,
            regressors: FIVE_TERM,
        },
        QuantitySpec {
            key: "cooling_power",
            label: "Cooling Power",
            symbol: "CP",
            column: 7,
            rated_id: "cp",
            form: CurveForm::FourTerm,
            regressors: FOUR_TERM,
        },
    ],
    minimum_rows: 6,
    nomenclature: &[
        ("TC", "Total Cooling Capacity"),
        ("SC", "Sensible Capacity"),
        ("CP", "Cooling Power Consumption"),
        ("Tdb", "Entering Dry-bulb Load-side Temperature"),
        ("Twb", "Entering Wet-bulb Load-side Temperature"),
        ("TSI", "Entering Source-side Temperature"),
        ("VLI", "Entering Load-side Flow Rate"),
        ("VSI", "Entering Source-side Flow Rate"),
    ],
};

pub fn model() -> HeatPumpCurveFit {
    HeatPumpCurveFit::new(&DEFINITION)
}
