//! Terminal charts (text-based, one blocking chart at a time)

use ndarray::Array1;
use std::io::BufRead;

const CHART_WIDTH: usize = 72;
const CHART_HEIGHT: usize = 16;

/// Render a line chart of a series against its index.
///
/// With `log_scale` the y axis is logarithmic; non-positive values are
/// clamped to the smallest positive value in the series.
pub fn line_chart(values: &Array1<f64>, title: &str, log_scale: bool) {
    println!("\n{}", title);
    println!("{}", "=".repeat(title.len()));

    if values.is_empty() {
        println!("(no data)");
        return;
    }

    let plotted: Vec<f64> = if log_scale {
        let floor = values
            .iter()
            .copied()
            .filter(|&v| v > 0.0)
            .fold(f64::INFINITY, f64::min);
        let floor = if floor.is_finite() { floor } else { 1.0 };
        values.iter().map(|&v| v.max(floor).ln()).collect()
    } else {
        values.to_vec()
    };

    let columns = downsample_mean(&plotted, CHART_WIDTH);
    let grid = render_points(&columns, |_| '*');
    print_grid(&grid);

    let (min_val, max_val) = min_max(values.as_slice().unwrap_or(&[]));
    println!(
        "y: {:.4} .. {:.4}{}   x: day 0 .. {}",
        min_val,
        max_val,
        if log_scale { " (log scale)" } else { "" },
        values.len().saturating_sub(1)
    );
}

/// Render a scatter chart of a series against its index, drawing each point
/// as the digit of its cluster label.
pub fn scatter_chart(values: &Array1<f64>, labels: &[usize], title: &str) {
    println!("\n{}", title);
    println!("{}", "=".repeat(title.len()));

    if values.is_empty() || values.len() != labels.len() {
        println!("(no data)");
        return;
    }

    // One representative point per column keeps the chart readable
    let n = values.len();
    let step = (n + CHART_WIDTH - 1) / CHART_WIDTH;
    let mut columns = Vec::with_capacity(CHART_WIDTH);
    let mut column_labels = Vec::with_capacity(CHART_WIDTH);
    for start in (0..n).step_by(step) {
        columns.push(values[start]);
        column_labels.push(labels[start]);
    }

    let grid = render_points(&columns, |col| {
        char::from_digit((column_labels[col] % 10) as u32, 10).unwrap_or('?')
    });
    print_grid(&grid);

    let (min_val, max_val) = min_max(values.as_slice().unwrap_or(&[]));
    let n_clusters = labels.iter().max().map(|&m| m + 1).unwrap_or(0);
    println!(
        "y: {:.4} .. {:.4}   x: day 0 .. {}   point = cluster label (k={})",
        min_val,
        max_val,
        n - 1,
        n_clusters
    );
}

/// Render a horizontal bar chart. Bars scale with magnitude so negative
/// values (component loadings) keep a visible bar; the sign is carried by
/// the printed value.
pub fn bar_chart(labels: &[String], values: &[f64], title: &str) {
    println!("\n{}", title);
    println!("{}", "=".repeat(title.len()));

    let max_abs = values.iter().fold(0.0f64, |a, &b| a.max(b.abs()));
    let scale = if max_abs > 1e-12 { max_abs } else { 1.0 };
    let label_width = labels.iter().map(|s| s.len()).max().unwrap_or(6);

    for (label, &value) in labels.iter().zip(values.iter()) {
        let bar_len = ((value.abs() / scale) * 50.0).round() as usize;
        let bar = "#".repeat(bar_len);
        println!("{:>width$} | {:<50} {:+.6}", label, bar, value, width = label_width);
    }
}

/// Block until the viewer dismisses the current chart by pressing Enter.
/// A closed stdin (piped runs) falls through immediately.
pub fn wait_for_dismiss() {
    println!("\n[press Enter to close this chart]");
    let mut line = String::new();
    let _ = std::io::stdin().lock().read_line(&mut line);
}

/// Average the series into at most `width` buckets
fn downsample_mean(values: &[f64], width: usize) -> Vec<f64> {
    let n = values.len();
    let step = (n + width - 1) / width;
    let mut buckets = Vec::with_capacity(width);

    for start in (0..n).step_by(step) {
        let end = (start + step).min(n);
        let sum: f64 = values[start..end].iter().sum();
        buckets.push(sum / (end - start) as f64);
    }

    buckets
}

/// Place one mark per column on a CHART_HEIGHT-row grid
fn render_points<F: Fn(usize) -> char>(columns: &[f64], mark: F) -> Vec<Vec<char>> {
    let mut grid = vec![vec![' '; columns.len()]; CHART_HEIGHT];
    let (min_val, max_val) = min_max(columns);

    let range = if (max_val - min_val).abs() > 1e-12 {
        max_val - min_val
    } else {
        1.0
    };

    for (col, &value) in columns.iter().enumerate() {
        let normalized = (value - min_val) / range;
        let row = ((1.0 - normalized) * (CHART_HEIGHT - 1) as f64).round() as usize;
        grid[row.min(CHART_HEIGHT - 1)][col] = mark(col);
    }

    grid
}

fn print_grid(grid: &[Vec<char>]) {
    let width = grid.first().map(|r| r.len()).unwrap_or(0);
    for row in grid {
        let line: String = row.iter().collect();
        println!("|{}|", line);
    }
    println!("+{}+", "-".repeat(width));
}

fn min_max(values: &[f64]) -> (f64, f64) {
    let min_val = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max_val = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    (min_val, max_val)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_line_chart_constant_series() {
        // Zero range must not panic or divide by zero
        let values = array![5.0, 5.0, 5.0, 5.0];
        line_chart(&values, "constant", false);
        line_chart(&values, "constant log", true);
    }

    #[test]
    fn test_line_chart_empty_series() {
        let values: Array1<f64> = array![];
        line_chart(&values, "empty", false);
    }

    #[test]
    fn test_scatter_chart_labels() {
        let values = array![1.0, 2.0, 3.0, 4.0];
        let labels = vec![0usize, 0, 1, 1];
        scatter_chart(&values, &labels, "scatter");
    }

    #[test]
    fn test_bar_chart_negative_values() {
        let labels: Vec<String> = ["Open", "Close"].iter().map(|s| s.to_string()).collect();
        bar_chart(&labels, &[-0.7, 0.3], "loadings");
    }

    #[test]
    fn test_downsample_mean() {
        let values: Vec<f64> = (0..144).map(|i| i as f64).collect();
        let buckets = downsample_mean(&values, 72);
        assert_eq!(buckets.len(), 72);
        // Buckets of two consecutive integers average to x.5
        assert!((buckets[0] - 0.5).abs() < 1e-12);
        assert!((buckets[71] - 142.5).abs() < 1e-12);
    }
}
