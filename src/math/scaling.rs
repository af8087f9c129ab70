//! Nondimensionalization used by the heat pump curve-fit models.
//!
//! Temperatures are converted to absolute and divided by the model's fixed
//! reference of 10 °C. Flows and outputs are divided by the rated value the
//! user supplies for the equipment.

pub const KELVIN_OFFSET: f64 = 273.15;

/// Reference temperature (°C) all scaled temperatures are relative to.
pub const REFERENCE_TEMPERATURE_C: f64 = 10.0;

/// `(T + 273.15) / (10 + 273.15)` for a temperature in °C.
pub fn scale_temperature(t_celsius: f64) -> f64 {
    (t_celsius + KELVIN_OFFSET) / (REFERENCE_TEMPERATURE_C + KELVIN_OFFSET)
}

/// Ratio to a rated value. A zero rated value yields a non-finite result,
/// which the regression rejects.
pub fn scale_by_rated(value: f64, rated: f64) -> f64 {
    value / rated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_temperature_scales_to_one() {
        assert!((scale_temperature(REFERENCE_TEMPERATURE_C) - 1.0).abs() < 1e-15);
        assert!(scale_temperature(20.0) > 1.0);
        assert!(scale_temperature(0.0) < 1.0);
    }

    #[test]
    fn rated_ratio() {
        assert_eq!(scale_by_rated(1.8, 0.9), 2.0);
        assert!(!scale_by_rated(1.0, 0.0).is_finite());
    }
}
