//! Water-to-air heat pump, heating mode, curve fit formulation.
//!
//! ```text
//! (HC/HC_R) = HC_1 + HC_2*(TLI/TLI_R) + HC_3*(TSI/TSI_R) + HC_4*(VLI/VLI_R) + HC_5*(VSI/VSI_R)
//! (HP/HP_R) = HP_1 + HP_2*(TLI/TLI_R) + HP_3*(TSI/TSI_R) + HP_4*(VLI/VLI_R) + HP_5*(VSI/VSI_R)
//! ```

use crate::domain::{ColumnHeader, EquipType, RequiredConstantParameter, UnitType};
use crate::models::curves::CurveForm;
use crate::models::heat_pump::{ColumnScaling, HeatPumpCurveFit, HeatPumpDefinition, QuantitySpec};

const COLUMNS: &[ColumnHeader] = &[
    ColumnHeader::new("Source Side Entering Temp", UnitType::Temperature),
    ColumnHeader::new("Source Side Flow Rate", UnitType::Flow),
    ColumnHeader::new("Load Side Entering Temp", UnitType::Temperature),
    ColumnHeader::new("Load Side Flow Rate", UnitType::Flow),
    ColumnHeader::new("Load Side Heating Capacity", UnitType::Power),
    ColumnHeader::new("Compressor Power Input", UnitType::Power),
];

const PARAMETERS: &[RequiredConstantParameter] = &[
    RequiredConstantParameter {
        id: "vl",
        title: "Rated Load Side Flow Rate",
        description: "This is a nominal flow rate value for the load-side of the heat pump",
        unit_type: UnitType::Flow,
        default_value: 0.0006887,
    },
    RequiredConstantParameter {
        id: "vs",
        title: "Rated Source Side Flow Rate",
        description: "This is a nominal flow rate value for the source-side of the heat pump",
        unit_type: UnitType::Flow,
        default_value: 0.0001892,
    },
    RequiredConstantParameter {
        id: "qh",
        title: "Rated Total Heating Capacity",
        description: "This is a nominal value of the load-side heating capacity of the heat pump",
        unit_type: UnitType::Power,
        default_value: 3.513,
    },
    RequiredConstantParameter {
        id: "cp",
        title: "Rated Compressor Power Use",
        description: "This is a nominal value of the compressor power for this heat pump",
        unit_type: UnitType::Power,
        default_value: 0.900,
    },
];

/// Load temp, source temp, load flow, source flow.
const REGRESSORS: &[usize] = &[2, 0, 3, 1];

pub static DEFINITION: HeatPumpDefinition = HeatPumpDefinition {
    equip_type: EquipType::WahpHeatingCurveFit,
    name: "Water to Air Heat Pump, Heating Mode, Curve Fit Formulation",
    short_name: "WAHP-Heating-CurveFit",
    columns: COLUMNS,
    column_symbols: &["TSI", "VSI", "TLI", "VLI", "HC", "HP"],
    column_scaling: &[
        ColumnScaling::Temperature,
        ColumnScaling::Rated("vs"),
        ColumnScaling::Temperature,
        ColumnScaling::Rated("vl"),
        ColumnScaling::Rated("qh"),
        ColumnScaling::Rated("cp"),
    ],
    parameters: PARAMETERS,
    quantities: &[
        QuantitySpec {
            key: "heating_capacity",
            label: "Heating Capacity",
            symbol: "HC",
            column: 4,
            rated_id: "qh",
            form: CurveForm::FourTerm,
            regressors: REGRESSORS,
        },
        QuantitySpec {
            key: "compressor_power",
            label: "Compressor Power",
            symbol: "HP",
            column: 5,
            rated_id: "cp",
            form: CurveForm::FourTerm,
            regressors: REGRESSORS,
        },
    ],
    minimum_rows: 5,
    nomenclature: &[
        ("HC", "Heating Capacity"),
        ("HP", "Heating Power Consumption"),
        ("TLI", "Entering Load-side Temperature"),
        ("TSI", "Entering Source-side Temperature"),
        ("VLI", "Entering Load-side Flow Rate"),
        ("VSI", "Entering Source-side Flow Rate"),
    ],
};

pub fn model() -> HeatPumpCurveFit {
    HeatPumpCurveFit::new(&DEFINITION)
}
