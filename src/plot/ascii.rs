//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! The plot shows the percent error of every regressed quantity against the
//! catalog row index:
//! - zero-error reference line: `-`
//! - points: one letter per quantity, taken from its symbol (`HC` -> `H`,
//!   `HP` -> `P`), or `*` where quantities overlap

use crate::models::QuantityResult;

/// Render a percent-error plot for the given quantities.
pub fn render_error_plot(results: &[QuantityResult], width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let n_rows = results.iter().map(|r| r.percent_error.len()).max().unwrap_or(0);
    let (x_min, x_max) = (0.0, (n_rows.max(2) - 1) as f64);

    let (y_min, y_max) = y_range(results).unwrap_or((-1.0, 1.0));
    let (y_min, y_max) = pad_range(y_min.min(0.0), y_max.max(0.0), 0.05);

    let mut grid = vec![vec![' '; width]; height];
    let markers = markers(results);

    // Zero line first so points overlay it.
    let zero = map_y(0.0, y_min, y_max, height);
    draw_line(&mut grid, 0, zero, width - 1, zero, '-');

    for (r, &marker) in results.iter().zip(&markers) {
        for (i, &e) in r.percent_error.iter().enumerate() {
            if !e.is_finite() {
                continue;
            }
            let x = map_x(i as f64, x_min, x_max, width);
            let y = map_y(e, y_min, y_max, height);
            grid[y][x] = match grid[y][x] {
                ' ' | '-' => marker,
                c if c == marker => marker,
                _ => '*',
            };
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Percent error: rows=[0, {}] | err=[{y_min:.3}, {y_max:.3}]%\n",
        n_rows.saturating_sub(1)
    ));
    for row in grid {
        out.push_str(row.into_iter().collect::<String>().trim_end());
        out.push('\n');
    }
    let legend: Vec<String> = results
        .iter()
        .zip(&markers)
        .map(|(r, m)| format!("{m}={}", r.label))
        .collect();
    out.push_str(&format!("Legend: {}\n", legend.join(", ")));

    out
}

/// First symbol (then label) character not taken by an earlier quantity;
/// digits once letters run out.
fn markers(results: &[QuantityResult]) -> Vec<char> {
    let mut used: Vec<char> = Vec::with_capacity(results.len());
    for (i, r) in results.iter().enumerate() {
        let marker = r
            .symbol
            .chars()
            .chain(r.label.chars())
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_uppercase())
            .find(|c| !used.contains(c))
            .or_else(|| char::from_digit((i % 10) as u32, 10))
            .unwrap_or('o');
        used.push(marker);
    }
    used
}

fn y_range(results: &[QuantityResult]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for &e in results.iter().flat_map(|r| r.percent_error.iter()) {
        if e.is_finite() {
            min_y = min_y.min(e);
            max_y = max_y.max(e);
        }
    }
    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(t: f64, t_min: f64, t_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((t - t_min) / (t_max - t_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quantity(symbol: &'static str, errors: Vec<f64>) -> QuantityResult {
        QuantityResult {
            key: "q",
            label: "Quantity",
            symbol,
            coefficients: vec![],
            one_sigma_error: 0.0,
            catalog: vec![1.0; errors.len()],
            predicted: vec![1.0; errors.len()],
            percent_error: errors,
        }
    }

    #[test]
    fn plot_golden_snapshot_small() {
        let results = vec![quantity("HC", vec![1.0, 0.0, -1.0])];
        let txt = render_error_plot(&results, 10, 5);
        let expected = concat!(
            "Percent error: rows=[0, 2] | err=[-1.100, 1.100]%\n",
            "H\n",
            "\n",
            "-----H----\n",
            "\n",
            "         H\n",
            "Legend: H=Quantity\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn quantities_sharing_a_first_letter_get_distinct_markers() {
        let mut capacity = quantity("HC", vec![1.0, 1.0]);
        capacity.label = "Heating Capacity";
        let mut power = quantity("HP", vec![-1.0, -1.0]);
        power.label = "Compressor Power";
        let txt = render_error_plot(&[capacity, power], 10, 5);

        assert!(txt.lines().nth(1).unwrap().starts_with('H'));
        assert!(txt.lines().nth(5).unwrap().starts_with('P'));
        assert!(txt.ends_with("Legend: H=Heating Capacity, P=Compressor Power\n"));
    }

    #[test]
    fn overlapping_quantities_use_star_and_skip_non_finite() {
        let results = vec![
            quantity("HC", vec![2.0, f64::INFINITY]),
            quantity("CP", vec![2.0, -2.0]),
        ];
        let txt = render_error_plot(&results, 10, 5);
        assert!(txt.lines().nth(1).unwrap().starts_with('*'));
        assert!(txt.lines().nth(5).unwrap().ends_with('C'));
    }
}
