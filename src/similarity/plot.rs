// Scatter rendering for the 2-D article map.
//
// Points are numbered on the plot; the number-to-article legend is
// printed to the terminal (see output::terminal::display_map_legend),
// since a headless CLI has no window to click points in.

use std::path::Path;

use anyhow::{anyhow, Result};
use plotters::prelude::*;

/// Render the projected article positions as a labeled scatter PNG.
pub fn render_map(points: &[(f64, f64)], path: &Path, title: &str) -> Result<()> {
    if points.is_empty() {
        anyhow::bail!("no points to plot");
    }

    let (x_range, y_range) = padded_ranges(points);

    let root = BitMapBackend::new(path, (900, 700)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| anyhow!("failed to draw {}: {e}", path.display()))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(30)
        .y_label_area_size(45)
        .build_cartesian_2d(x_range, y_range)
        .map_err(|e| anyhow!("failed to draw {}: {e}", path.display()))?;

    chart
        .configure_mesh()
        .disable_mesh()
        .draw()
        .map_err(|e| anyhow!("failed to draw {}: {e}", path.display()))?;

    chart
        .draw_series(points.iter().enumerate().map(|(i, &(x, y))| {
            EmptyElement::at((x, y))
                + Circle::new((0, 0), 4, BLUE.filled())
                + Text::new(format!("{}", i + 1), (6, -14), ("sans-serif", 14))
        }))
        .map_err(|e| anyhow!("failed to draw {}: {e}", path.display()))?;

    root.present()
        .map_err(|e| anyhow!("failed to write {}: {e}", path.display()))?;

    Ok(())
}

/// Axis ranges with 10% padding, widened when all points coincide so the
/// chart never gets a zero-width range.
fn padded_ranges(points: &[(f64, f64)]) -> (std::ops::Range<f64>, std::ops::Range<f64>) {
    let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(x, y) in points {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }

    let pad = |min: f64, max: f64| {
        let span = (max - min).abs();
        let margin = if span < f64::EPSILON { 1.0 } else { span * 0.1 };
        (min - margin)..(max + margin)
    };

    (pad(x_min, x_max), pad(y_min, y_max))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranges_are_padded_and_nonempty() {
        let (x, y) = padded_ranges(&[(0.0, 0.0), (1.0, 2.0)]);
        assert!(x.start < 0.0 && x.end > 1.0);
        assert!(y.start < 0.0 && y.end > 2.0);
    }

    #[test]
    fn degenerate_points_still_get_a_range() {
        let (x, y) = padded_ranges(&[(3.0, 3.0)]);
        assert!(x.end > x.start);
        assert!(y.end > y.start);
    }
}
