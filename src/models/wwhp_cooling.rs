//! Water-to-water heat pump, cooling mode, curve fit formulation.

use crate::domain::{ColumnHeader, EquipType, RequiredConstantParameter, UnitType};
use crate::models::curves::CurveForm;
use crate::models::heat_pump::{ColumnScaling, HeatPumpCurveFit, HeatPumpDefinition, QuantitySpec};

const COLUMNS: &[ColumnHeader] = &[
    ColumnHeader::new("Source Side Entering Temp", UnitType::Temperature),
    ColumnHeader::new("Source Side Flow Rate", UnitType::Flow),
    ColumnHeader::new("Load Side Entering Temp", UnitType::Temperature),
    ColumnHeader::new("Load Side Flow Rate", UnitType::Flow),
    ColumnHeader::new("Load Side Cooling Capacity", UnitType::Power),
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
        id: "qc",
        title: "Rated Total Cooling Capacity",
        description: "This is a nominal value of the load-side cooling capacity of the heat pump",
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

const REGRESSORS: &[usize] = &[2, 0, 3, 1];

pub static DEFINITION: HeatPumpDefinition = HeatPumpDefinition {
    equip_type: EquipType::WwhpCoolingCurveFit,
    name: "Water to Water Heat Pump, Cooling Mode, Curve Fit Formulation",
    short_name: "WWHP-Cooling-CurveFit",
    columns: COLUMNS,
    column_symbols: &["TSI", "VSI", "TLI", "VLI", "CC", "CP"],
    column_scaling: &[
        ColumnScaling::Temperature,
        ColumnScaling::Rated("vs"),
        ColumnScaling::Temperature,
        ColumnScaling::Rated("vl"),
        ColumnScaling::Rated("qc"),
        ColumnScaling::Rated("cp"),
    ],
    parameters: PARAMETERS,
    quantities: &[
        QuantitySpec {
            key: "cooling_capacity",
            label: "Cooling Capacity",
            symbol: "CC",
            column: 4,
            rated_id: "qc",
            form: CurveForm::FourTerm,
            regressors: REGRESSORS,
        },
        QuantitySpec {
            key: "compressor_power",
            label: "Cooling Compressor Power",
            symbol: "CP",
            column: 5,
            rated_id: "cp",
            form: CurveForm::FourTerm,
            regressors: REGRESSORS,
        },
    ],
    minimum_rows: 5,
    nomenclature: &[
        ("CC", "Cooling Capacity"),
        ("CP", "Cooling Power Consumption"),
        ("TLI", "Entering Load-side Temperature"),
        ("TSI", "Entering Source-side Temperature"),
        ("VLI", "Entering Load-side Flow Rate"),
        ("VSI", "Entering Source-side Flow Rate"),
    ],
};

pub fn model() -> HeatPumpCurveFit {
    HeatPumpCurveFit::new(&DEFINITION)
}
