//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - historical close prices: `-` line
//! - forecast: `+` line, anchored at the last historical point

use crate::domain::{ForecastResult, SelectedSeries};

/// Render the historical close series and the forecast on one grid.
///
/// The x axis is the trading-day index (history first, then the forecast
/// horizon); the header shows the covered date span and the padded y range.
pub fn render_ascii_plot(
    series: &SelectedSeries,
    forecast: &ForecastResult,
    width: usize,
    height: usize,
) -> String {
    if series.is_empty() {
        return "(no data to plot)\n".to_string();
    }

    let width = width.max(10);
    let height = height.max(5);

    let n_hist = series.len();
    let n_total = n_hist + forecast.values.len();
    let x_max = (n_total - 1).max(1) as f64;

    let (y_min, y_max) =
        y_range(&series.close, &forecast.values).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // History first: lines only fill blank cells, so the solid line wins
    // contested cells and the forecast visibly hangs off its last point.
    let mut prev: Option<(usize, usize)> = None;
    for (i, &value) in series.close.iter().enumerate() {
        let x = map_x(i as f64, x_max, width);
        let y = map_y(value, y_min, y_max, height);
        match prev {
            Some((x0, y0)) => draw_line(&mut grid, x0, y0, x, y, '-'),
            None => grid[y][x] = '-',
        }
        prev = Some((x, y));
    }

    let mut prev = Some((
        map_x((n_hist - 1) as f64, x_max, width),
        map_y(series.close[n_hist - 1], y_min, y_max, height),
    ));
    for (i, &value) in forecast.values.iter().enumerate() {
        let x = map_x((n_hist + i) as f64, x_max, width);
        let y = map_y(value, y_min, y_max, height);
        if let Some((x0, y0)) = prev {
            draw_line(&mut grid, x0, y0, x, y, '+');
        }
        prev = Some((x, y));
    }

    // Build final string. We include a small header with ranges.
    let mut out = String::new();
    let span_start = series.dates.first().map(|d| d.to_string());
    let span_end = forecast
        .dates
        .last()
        .or(series.dates.last())
        .map(|d| d.to_string());
    if let (Some(start), Some(end)) = (span_start, span_end) {
        out.push_str(&format!(
            "Plot: {start} -> {end} | price=[{y_min:.2}, {y_max:.2}]\n"
        ));
    }

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

fn y_range(close: &[f64], forecast: &[f64]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for &y in close.iter().chain(forecast) {
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

fn map_x(x: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = (x / x_max).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish). Only blank cells are written, so
/// earlier series keep contested cells.
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
