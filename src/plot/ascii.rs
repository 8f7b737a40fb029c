//! ASCII/Unicode plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal or a log
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - fitted curve: `-` line
//! - optional boundary conditions: `o`

use crate::domain::{BoundaryCondition, CurveFile, FitResult};
use crate::models::{formula, sample_curve};

/// Render a plot for an in-memory fit, sampled over `[0, domain_max]`.
pub fn render_ascii_plot(
    fit: &FitResult,
    domain_max: f64,
    samples: usize,
    width: usize,
    height: usize,
) -> String {
    let curve = sample_curve(&fit.params, 0.0, domain_max, samples);
    let marks = [fit.lower, fit.upper];
    render_plot(&curve, &marks, width, height, &formula(&fit.params))
}

/// Render a plot from a saved curve JSON file.
pub fn render_ascii_plot_from_curve_file(curve: &CurveFile, width: usize, height: usize) -> String {
    let points: Vec<(f64, f64)> = curve
        .grid
        .x
        .iter()
        .zip(curve.grid.y.iter())
        .map(|(&x, &y)| (x, y))
        .collect();
    let marks = [curve.lower, curve.upper];

    render_plot(&points, &marks, width, height, &formula(&curve.params))
}

/// Render a sampled curve with optional marked points and a one-line legend.
pub fn render_plot(
    curve: &[(f64, f64)],
    marks: &[BoundaryCondition],
    width: usize,
    height: usize,
    legend: &str,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (x_min, x_max) = x_range(curve).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = y_range(curve).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    draw_curve(&mut grid, curve, x_min, x_max, y_min, y_max);

    for m in marks {
        if m.x < x_min || m.x > x_max {
            continue;
        }
        let x = map_x(m.x, x_min, x_max, width);
        let y = map_y(m.y, y_min, y_max, height);
        grid[y][x] = 'o';
    }

    // Build final string. We include a small header with ranges.
    let mut out = String::new();
    out.push_str(&format!(
        "Plot: x=[{x_min:.3e}, {x_max:.3e}] | y=[{y_min:.3e}, {y_max:.3e}]\n"
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out.push_str(&format!("- {legend}\n"));
    out
}

fn x_range(curve: &[(f64, f64)]) -> Option<(f64, f64)> {
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    for &(x, _) in curve {
        min_x = min_x.min(x);
        max_x = max_x.max(x);
    }
    if min_x.is_finite() && max_x.is_finite() && max_x > min_x {
        Some((min_x, max_x))
    } else {
        None
    }
}

fn y_range(curve: &[(f64, f64)]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for &(_, y) in curve {
        min_y = min_y.min(y);
        max_y = max_y.max(y);
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

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(grid: &mut [Vec<char>], curve: &[(f64, f64)], x_min: f64, x_max: f64, y_min: f64, y_max: f64) {
    if curve.len() < 2 {
        return;
    }
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in curve {
        let xx = map_x(x, x_min, x_max, width);
        let yy = map_y(y, y_min, y_max, height);
        if let Some((x0, y0)) = prev {
            draw_line(grid, x0, y0, xx, yy, '-');
        } else {
            grid[yy][xx] = '-';
        }
        prev = Some((xx, yy));
    }
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

    #[test]
    fn plot_golden_snapshot_small() {
        let curve = [(0.0, 0.0), (9.0, 4.0)];
        let marks = [BoundaryCondition::new(9.0, 4.0)];

        let txt = render_plot(&curve, &marks, 10, 5, "y = 4x / 9");
        let expected = concat!(
            "Plot: x=[0.000e0, 9.000e0] | y=[-2.000e-1, 4.200e0]\n",
            "        -o\n",
            "      --  \n",
            "    --    \n",
            "  --      \n",
            "--        \n",
            "- y = 4x / 9\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn plot_of_fitted_curve_marks_boundaries() {
        let fit = crate::fit::fit_and_select(&crate::domain::CurveConfig::default()).unwrap();
        let txt = render_ascii_plot(&fit, crate::domain::DOMAIN_MAX, 500, 40, 10);
        let lines: Vec<&str> = txt.lines().collect();
        // header + 10 rows + legend
        assert_eq!(lines.len(), 12);
        assert!(lines[1..11].iter().all(|l| l.chars().count() == 40));
        // Rising curve: upper boundary in the top-right corner, lower in the bottom-left.
        assert_eq!(lines[1].chars().last(), Some('o'));
        assert_eq!(lines[10].chars().next(), Some('o'));
        assert!(lines[11].starts_with("- y = (x + 2.338428e26)^2"));
    }
}
