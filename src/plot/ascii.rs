//! ASCII plotting for terminal output.
//!
//! Intentionally "dumb" (fixed-size character grids), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Renderers:
//! - multi-series line chart over categorical x positions (per-series glyph)
//! - horizontal bar chart, plain and grouped
//! - scatter with a fitted line (probability plot)
//! - histogram rows

use crate::math::Line;

/// Glyphs assigned to line-chart series in order; nine covers the nine
/// regions without repeating.
pub const SERIES_GLYPHS: [char; 9] = ['*', '+', 'x', 'o', '@', '%', '&', '=', '~'];

const LABEL_MAX: usize = 24;

/// One named series of y-values over the shared x positions.
///
/// `None` marks a gap (no observation at that x); line segments are not drawn
/// across gaps.
#[derive(Debug, Clone)]
pub struct LineSeries {
    pub label: String,
    pub values: Vec<Option<f64>>,
}

/// One group of labelled bars (e.g. one region's male and female sums).
#[derive(Debug, Clone)]
pub struct BarGroup {
    pub label: String,
    pub bars: Vec<(String, f64)>,
}

/// Render one or more series as polylines over evenly spaced x positions.
pub fn render_line_chart(
    title: &str,
    x_labels: &[String],
    series: &[LineSeries],
    width: usize,
    height: usize,
) -> String {
    if x_labels.is_empty() || series.is_empty() {
        return format!("{title}: (no data)\n");
    }
    let width = width.max(10);
    let height = height.max(5);
    let n = x_labels.len();

    let (y_min, y_max) = value_range(
        series
            .iter()
            .flat_map(|s| s.values.iter().copied().flatten()),
    )
    .unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];
    for (si, s) in series.iter().enumerate() {
        let glyph = SERIES_GLYPHS[si % SERIES_GLYPHS.len()];
        let mut prev: Option<(usize, usize)> = None;
        for (i, v) in s.values.iter().enumerate() {
            let Some(v) = v else {
                prev = None;
                continue;
            };
            let x = x_for(i, n, width);
            let y = map_y(*v, y_min, y_max, height);
            match prev {
                Some((x0, y0)) => draw_line(&mut grid, x0, y0, x, y, glyph),
                None => draw_line(&mut grid, x, y, x, y, glyph),
            }
            prev = Some((x, y));
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "{title} | x={}..{} | y=[{y_min:.2}, {y_max:.2}]\n",
        x_labels[0],
        x_labels[n - 1]
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    for (si, s) in series.iter().enumerate() {
        out.push_str(&format!(
            "  {} {}\n",
            SERIES_GLYPHS[si % SERIES_GLYPHS.len()],
            s.label
        ));
    }
    out
}

/// Render horizontal bars, one row per label, scaled to the largest value.
pub fn render_bar_chart(title: &str, bars: &[(String, f64)], width: usize) -> String {
    if bars.is_empty() {
        return format!("{title}: (no data)\n");
    }
    let width = width.max(10);
    let max = bars.iter().map(|(_, v)| *v).fold(0.0f64, f64::max);
    let label_w = bars
        .iter()
        .map(|(l, _)| l.chars().count().min(LABEL_MAX))
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    out.push_str(title);
    out.push('\n');
    for (label, value) in bars {
        let bar = bar_cells(*value, max, width);
        out.push_str(&format!(
            "{:<label_w$} |{:<width$} {value:.2}\n",
            truncate(label, LABEL_MAX),
            "#".repeat(bar),
        ));
    }
    out
}

/// Render grouped horizontal bars; the group label is printed on its first
/// row only, and all bars share one scale so groups stay comparable.
pub fn render_grouped_bar_chart(title: &str, groups: &[BarGroup], width: usize) -> String {
    if groups.is_empty() {
        return format!("{title}: (no data)\n");
    }
    let width = width.max(10);
    let max = groups
        .iter()
        .flat_map(|g| g.bars.iter().map(|(_, v)| *v))
        .fold(0.0f64, f64::max);
    let group_w = groups
        .iter()
        .map(|g| g.label.chars().count().min(LABEL_MAX))
        .max()
        .unwrap_or(0);
    let bar_w = groups
        .iter()
        .flat_map(|g| g.bars.iter().map(|(l, _)| l.chars().count()))
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    out.push_str(title);
    out.push('\n');
    for group in groups {
        for (i, (label, value)) in group.bars.iter().enumerate() {
            let head = if i == 0 {
                truncate(&group.label, LABEL_MAX)
            } else {
                String::new()
            };
            let bar = bar_cells(*value, max, width);
            out.push_str(&format!(
                "{head:<group_w$} {label:<bar_w$} |{:<width$} {value:.2}\n",
                "#".repeat(bar),
            ));
        }
    }
    out
}

/// Render scatter points with a fitted line drawn underneath them.
pub fn render_scatter_with_line(
    title: &str,
    xs: &[f64],
    ys: &[f64],
    line: &Line,
    width: usize,
    height: usize,
) -> String {
    if xs.len() < 2 || xs.len() != ys.len() {
        return format!("{title}: (no data)\n");
    }
    let width = width.max(10);
    let height = height.max(5);

    let (x_min, x_max) = value_range(xs.iter().copied()).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = value_range(
        ys.iter()
            .copied()
            .chain([line.at(x_min), line.at(x_max)]),
    )
    .unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Line first so the observed points overlay it.
    let mut prev: Option<(usize, usize)> = None;
    for i in 0..width {
        let u = i as f64 / (width as f64 - 1.0);
        let x = x_min + u * (x_max - x_min);
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(line.at(x), y_min, y_max, height);
        match prev {
            Some((c0, r0)) => draw_line(&mut grid, c0, r0, col, row, '-'),
            None => draw_line(&mut grid, col, row, col, row, '-'),
        }
        prev = Some((col, row));
    }

    for (x, y) in xs.iter().zip(ys) {
        let col = map_x(*x, x_min, x_max, width);
        let row = map_y(*y, y_min, y_max, height);
        grid[row][col] = 'o';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "{title} | x=[{x_min:.2}, {x_max:.2}] | y=[{y_min:.2}, {y_max:.2}]\n"
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out
}

/// Render histogram bins as horizontal count bars.
///
/// `edges` must hold one more value than `counts`; the last interval prints
/// with a closed bracket because its upper edge is inclusive.
pub fn render_histogram(title: &str, edges: &[f64], counts: &[usize], width: usize) -> String {
    if counts.is_empty() || edges.len() != counts.len() + 1 {
        return format!("{title}: (no data)\n");
    }
    let width = width.max(10);
    let max = counts.iter().copied().max().unwrap_or(0);

    let mut out = String::new();
    out.push_str(title);
    out.push('\n');
    for (i, count) in counts.iter().enumerate() {
        let bracket = if i == counts.len() - 1 { ']' } else { ')' };
        let bar = bar_cells(*count as f64, max as f64, width);
        out.push_str(&format!(
            "[{:>8.2}, {:>8.2}{bracket} |{:<width$} {count}\n",
            edges[i],
            edges[i + 1],
            "#".repeat(bar),
        ));
    }
    out
}

fn bar_cells(value: f64, max: f64, width: usize) -> usize {
    if max <= 0.0 || value <= 0.0 {
        return 0;
    }
    ((value / max * width as f64).round() as usize).min(width)
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max).collect()
    }
}

fn value_range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values {
        min = min.min(v);
        max = max.max(v);
    }
    if min.is_finite() && max.is_finite() {
        Some((min, max))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

/// Column for categorical position `i` of `n`.
fn x_for(i: usize, n: usize, width: usize) -> usize {
    if n <= 1 {
        return (width - 1) / 2;
    }
    map_x(i as f64, 0.0, (n - 1) as f64, width)
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

/// Integer line drawing (Bresenham-ish). Writes only into blank cells so
/// earlier layers keep precedence.
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
