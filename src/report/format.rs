//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the regression code stays clean and testable
//! - output changes are localized

use crate::models::EquipmentModel;
use crate::report::{ExpansionStats, error_stats};

/// Format the full run summary (expansion stats + per-quantity fit diagnostics).
pub fn format_run_summary(stats: &ExpansionStats, model: &dyn EquipmentModel) -> String {
    let mut out = String::new();

    out.push_str("=== pet - Equipment Parameter Estimation ===\n");
    out.push_str(&format!("Equipment: {} ({})\n", model.name(), model.short_name()));
    out.push_str(&format!(
        "Catalog: base rows={} | correction factors={} | expanded rows={}\n",
        stats.base_rows, stats.correction_factors, stats.expanded_rows
    ));

    out.push_str("\nRated parameters:\n");
    for p in model.get_required_constant_parameters() {
        let value = model.rated_value(p.id).unwrap_or(p.default_value);
        out.push_str(&format!("- {:<36} {value} {}\n", p.title, p.unit_type));
    }

    out.push_str("\nQuantity diagnostics:\n");
    out.push_str(
        format!(
            "{:<28} {:>12} {:>12} {:>12} {:>6}\n",
            "quantity", "1-sigma", "mean |%err|", "max |%err|", "n/a"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(format!("{:-<28} {:-<12} {:-<12} {:-<12} {:-<6}\n", "", "", "", "", "").trim_end());
    out.push('\n');
    for r in model.quantity_results() {
        let s = error_stats(r);
        out.push_str(&format!(
            "{:<28} {:>12.3e} {:>12.4} {:>12.4} {:>6}\n",
            truncate(r.label, 28),
            r.one_sigma_error,
            s.mean_abs,
            s.max_abs,
            s.non_finite
        ));
    }

    out.push_str("\nCoefficients:\n");
    for r in model.quantity_results() {
        out.push_str(&format!("- {:<4} {}\n", r.symbol, fmt_vec(&r.coefficients)));
    }
    out.push('\n');

    out
}

/// Column layout of an equipment type, one column per line.
pub fn format_headers(model: &dyn EquipmentModel) -> String {
    let headers = model.headers();
    let mut out = format!("{} ({} columns)\n", model.name(), headers.len());
    for (i, c) in headers.columns.iter().enumerate() {
        let flag = if c.dry_bulb {
            " [dry-bulb]"
        } else if c.wet_bulb {
            " [wet-bulb]"
        } else {
            ""
        };
        out.push_str(&format!("{i:>2}: {} [{}]{flag}\n", c.name, c.unit_type));
    }
    out.push_str(&format!(
        "Minimum catalog rows for generation: {}\n",
        model.minimum_data_points_for_generation()
    ));
    out
}

/// Rated parameters with ids and defaults.
pub fn format_parameters(model: &dyn EquipmentModel) -> String {
    let mut out = format!("{} rated parameters\n", model.short_name());
    for p in model.get_required_constant_parameters() {
        out.push_str(&format!(
            "{:<4} {:<36} default={} {}\n     {}\n",
            p.id, p.title, p.default_value, p.unit_type, p.description
        ));
    }
    out
}

fn fmt_vec(v: &[f64]) -> String {
    let parts: Vec<String> = v.iter().map(|x| format!("{x:.6}")).collect();
    format!("[{}]", parts.join(", "))
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{SyntheticOptions, synthetic_catalog};
    use crate::domain::EquipType;
    use crate::models::equipment_factory;

    #[test]
    fn truncate_marks_cut_text() {
        assert_eq!(truncate("abcdef", 4), "abc.");
        assert_eq!(truncate("abc", 4), "abc");
    }

    #[test]
    fn headers_flag_air_temperatures() {
        let m = equipment_factory(EquipType::WahpCoolingCurveFit);
        let txt = format_headers(m.as_ref());
        assert!(txt.contains(" 2: Air-side Entering Dry-bulb Temp [deg C] [dry-bulb]"));
        assert!(txt.contains(" 3: Air-side Entering Wet-bulb Temp [deg C] [wet-bulb]"));
        assert!(txt.contains("Minimum catalog rows for generation: 6"));
    }

    #[test]
    fn parameters_list_ids() {
        let m = equipment_factory(EquipType::WahpHeatingCurveFit);
        let txt = format_parameters(m.as_ref());
        for id in ["vl", "vs", "qh", "cp"] {
            assert!(txt.lines().any(|l| l.starts_with(id)), "{id}");
        }
    }

    #[test]
    fn summary_lists_each_quantity() {
        let mut m = equipment_factory(EquipType::WahpCoolingCurveFit);
        let catalog = synthetic_catalog(m.as_ref(), &SyntheticOptions::default()).unwrap();
        m.generate_parameters(&catalog.dataset, &mut || {}, &mut |_, _| {});
        let stats = ExpansionStats {
            base_rows: 40,
            correction_factors: 0,
            expanded_rows: 40,
        };
        let txt = format_run_summary(&stats, m.as_ref());
        assert!(txt.contains("expanded rows=40"));
        for label in ["Total Cooling Capacity", "Sensible Cooling Capacity", "Cooling Power"] {
            assert!(txt.contains(label), "{label}");
        }
        assert!(txt.contains("- SC   ["));
    }
}
