//! Water-to-water heat pump, heating mode, curve fit formulation.
//!
//! Same catalog layout and curve forms as the water-to-air heating model; the
//! load side is water, so both flows are liquid flows.

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

const REGRESSORS: &[usize] = &[2, 0, 3, 1];

pub static DEFINITION: HeatPumpDefinition = HeatPumpDefinition {
    equip_type: EquipType::WwhpHeatingCurveFit,
    name: "Water to Water Heat Pump, Heating Mode, Curve Fit Formulation",
    short_name: "WWHP-Heating-CurveFit",
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
            label: "Heating Compressor Power",
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{SyntheticOptions, synthetic_catalog};
    use crate::models::EquipmentModel;

    /// Manufacturer-style table with rated flows 10/20, capacity 100, power 50.
    const REFERENCE_CATALOG: [[f64; 6]; 32] = [
        [1.0, 1.0, 1.0, 1.0, 8806.98056537102, 4982.18816254417],
        [2.0, 2.0, 2.0, 2.0, 10091.5901060071, 5491.08215547703],
        [3.0, 3.0, 3.0, 3.0, 11376.1996466431, 5999.97614840989],
        [4.0, 4.0, 4.0, 4.0, 12660.8091872792, 6508.87014134276],
        [5.0, 5.0, 5.0, 1.0, 10661.4187279152, 5553.76413427562],
        [6.0, 6.0, 6.0, 2.0, 11946.0282685512, 6062.65812720848],
        [7.0, 7.0, 7.0, 3.0, 13230.6378091873, 6571.55212014134],
        [8.0, 8.0, 8.0, 4.0, 14515.2473498233, 7080.44611307421],
        [9.0, 9.0, 1.0, 1.0, 12427.6590106007, 6076.15282685512],
        [10.0, 10.0, 2.0, 2.0, 13712.2685512368, 6585.04681978799],
        [11.0, 11.0, 3.0, 3.0, 14996.8780918728, 7093.94081272085],
        [12.0, 12.0, 4.0, 4.0, 16281.4876325088, 7602.83480565371],
        [13.0, 13.0, 5.0, 1.0, 14282.0971731449, 6647.72879858657],
        [14.0, 14.0, 6.0, 2.0, 15566.7067137809, 7156.62279151944],
        [15.0, 15.0, 7.0, 3.0, 16851.316254417, 7665.5167844523],
        [16.0, 16.0, 8.0, 4.0, 18135.925795053, 8174.41077738516],
        [17.0, 1.0, 1.0, 1.0, 9000.33745583039, 5122.11749116608],
        [18.0, 2.0, 2.0, 2.0, 10284.9469964664, 5631.01148409894],
        [19.0, 3.0, 3.0, 3.0, 11569.5565371025, 6139.9054770318],
        [20.0, 4.0, 4.0, 4.0, 12854.1660777385, 6648.79946996467],
        [21.0, 5.0, 5.0, 1.0, 10854.7756183746, 5693.69346289753],
        [22.0, 6.0, 6.0, 2.0, 12139.3851590106, 6202.58745583039],
        [23.0, 7.0, 7.0, 3.0, 13423.9946996466, 6711.48144876325],
        [24.0, 8.0, 8.0, 4.0, 14708.6042402827, 7220.37544169611],
        [25.0, 9.0, 1.0, 1.0, 12621.0159010601, 6216.08215547703],
        [26.0, 10.0, 2.0, 2.0, 13905.6254416961, 6724.9761484099],
        [27.0, 11.0, 3.0, 3.0, 15190.2349823322, 7233.87014134276],
        [28.0, 12.0, 4.0, 4.0, 16474.8445229682, 7742.76413427562],
        [29.0, 13.0, 5.0, 1.0, 14475.4540636042, 6787.65812720848],
        [30.0, 14.0, 6.0, 2.0, 15760.0636042403, 7296.55212014134],
        [31.0, 15.0, 7.0, 3.0, 17044.6731448763, 7805.44611307421],
        [32.0, 16.0, 8.0, 4.0, 18329.2826855124, 8314.34010600707],
    ];

    #[test]
    fn reference_catalog_gives_published_coefficients() {
        let mut m = model();
        for (id, value) in [("vl", 10.0), ("vs", 20.0), ("qh", 100.0), ("cp", 50.0)] {
            m.set_required_constant_parameter(id, value).unwrap();
        }
        let dataset: Vec<Vec<f64>> = REFERENCE_CATALOG.iter().map(|r| r.to_vec()).collect();

        let mut done = None;
        m.generate_parameters(&dataset, &mut || {}, &mut |ok, msg| done = Some((ok, msg)));
        let (ok, msg) = done.unwrap();
        assert!(ok, "{msg}");

        let expected = [
            [12.1, 31.2, 34.2, 82.1, 88.1],
            [8.1, 34.8, 49.5, 73.2, 51.2],
        ];
        for (result, want) in m.quantity_results().iter().zip(expected) {
            for (got, want) in result.coefficients.iter().zip(want) {
                assert!((got - want).abs() < 0.05, "{}: {got} vs {want}", result.key);
            }
            assert!(result.max_abs_percent_error() < 1e-4, "{}", result.key);
        }
    }

    #[test]
    fn noisy_catalog_still_fits_closely() {
        let mut m = model();
        let opts = SyntheticOptions {
            noise: 0.002,
            ..SyntheticOptions::default()
        };
        let catalog = synthetic_catalog(&m, &opts).unwrap();

        let mut done = None;
        m.generate_parameters(&catalog.dataset, &mut || {}, &mut |ok, _| done = Some(ok));
        assert_eq!(done, Some(true));

        for (label, sigma) in m.regression_metrics() {
            assert!(sigma.is_finite() && sigma > 0.0, "{label}: {sigma}");
        }
        for result in m.quantity_results() {
            assert!(result.max_abs_percent_error() < 2.0, "{}", result.key);
        }
    }

    #[test]
    fn constant_flow_column_fails_cleanly() {
        let mut m = model();
        let mut catalog = synthetic_catalog(&m, &SyntheticOptions::default()).unwrap();
        for row in &mut catalog.dataset {
            row[3] = 0.0006887;
        }

        let mut calls = Vec::new();
        m.generate_parameters(&catalog.dataset, &mut || {}, &mut |ok, msg| calls.push((ok, msg)));
        assert_eq!(calls.len(), 1);
        assert!(!calls[0].0);
        assert!(m.quantity_results().is_empty());
    }
}
