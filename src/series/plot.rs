// Shared plotters scaffolding for the series step charts.
//
// Every step saves one PNG built from the same primitives: line series,
// vertical stems (ACF/PACF), and dashed horizontal reference bands. The
// panel abstraction keeps the per-step code down to assembling data.

use std::path::Path;

use anyhow::{anyhow, Result};
use plotters::prelude::*;

/// One labeled line within a panel.
pub struct Line {
    pub label: String,
    pub color: RGBColor,
    pub points: Vec<(f64, f64)>,
}

impl Line {
    pub fn new(label: &str, color: RGBColor, points: Vec<(f64, f64)>) -> Self {
        Self {
            label: label.to_string(),
            color,
            points,
        }
    }

    /// Convenience for y-values plotted against their index, starting at
    /// `offset` (rolling statistics start partway into the series).
    pub fn from_values(label: &str, color: RGBColor, offset: usize, values: &[f64]) -> Self {
        Self::new(
            label,
            color,
            values
                .iter()
                .enumerate()
                .map(|(i, &v)| ((offset + i) as f64, v))
                .collect(),
        )
    }
}

/// One chart panel. Panels stack vertically in the output image.
pub struct Panel {
    pub title: String,
    pub lines: Vec<Line>,
    /// Vertical segments from y=0, for correlogram stems
    pub stems: Vec<(f64, f64)>,
    /// Dashed horizontal reference levels (confidence bands)
    pub bands: Vec<f64>,
}

impl Panel {
    pub fn lines(title: &str, lines: Vec<Line>) -> Self {
        Self {
            title: title.to_string(),
            lines,
            stems: Vec::new(),
            bands: Vec::new(),
        }
    }

    pub fn stems(title: &str, stems: Vec<(f64, f64)>, bands: Vec<f64>) -> Self {
        Self {
            title: title.to_string(),
            lines: Vec::new(),
            stems,
            bands,
        }
    }
}

/// Render one or more stacked panels to a PNG.
pub fn save_panels(path: &Path, panels: &[Panel]) -> Result<()> {
    if panels.is_empty() {
        anyhow::bail!("no panels to plot");
    }

    let height = 300 * panels.len() as u32;
    let root = BitMapBackend::new(path, (1000, height)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| anyhow!("failed to draw {}: {e}", path.display()))?;

    let areas = root.split_evenly((panels.len(), 1));

    for (panel, area) in panels.iter().zip(areas.iter()) {
        draw_panel(panel, area).map_err(|e| anyhow!("failed to draw {}: {e}", path.display()))?;
    }

    root.present()
        .map_err(|e| anyhow!("failed to write {}: {e}", path.display()))?;

    Ok(())
}

type Area<'a> = DrawingArea<BitMapBackend<'a>, plotters::coord::Shift>;

fn draw_panel(
    panel: &Panel,
    area: &Area<'_>,
) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let (x_range, y_range) = panel_ranges(panel);

    let mut chart = ChartBuilder::on(area)
        .caption(&panel.title, ("sans-serif", 20))
        .margin(15)
        .x_label_area_size(30)
        .y_label_area_size(55)
        .build_cartesian_2d(x_range.clone(), y_range)?;

    chart
        .configure_mesh()
        .light_line_style(WHITE)
        .y_labels(6)
        .draw()?;

    for line in &panel.lines {
        chart
            .draw_series(LineSeries::new(line.points.iter().copied(), &line.color))?
            .label(&line.label)
            .legend({
                let color = line.color;
                move |(x, y)| PathElement::new(vec![(x, y), (x + 18, y)], color)
            });
    }

    if !panel.stems.is_empty() {
        chart.draw_series(
            panel
                .stems
                .iter()
                .map(|&(x, v)| PathElement::new(vec![(x, 0.0), (x, v)], BLACK)),
        )?;
        chart.draw_series(
            panel
                .stems
                .iter()
                .map(|&(x, v)| Circle::new((x, v), 3, BLACK.filled())),
        )?;
    }

    for &band in &panel.bands {
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(x_range.start, band), (x_range.end, band)],
            RED.mix(0.6),
        )))?;
    }

    if !panel.lines.is_empty() {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK.mix(0.4))
            .draw()?;
    }

    Ok(())
}

fn panel_ranges(panel: &Panel) -> (std::ops::Range<f64>, std::ops::Range<f64>) {
    let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);

    let mut feed = |x: f64, y: f64| {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    };

    for line in &panel.lines {
        for &(x, y) in &line.points {
            feed(x, y);
        }
    }
    for &(x, v) in &panel.stems {
        feed(x, v);
        feed(x, 0.0);
    }

    for &band in &panel.bands {
        y_min = y_min.min(band);
        y_max = y_max.max(band);
    }

    if !x_min.is_finite() {
        x_min = 0.0;
        x_max = 1.0;
    }
    if !y_min.is_finite() {
        y_min = 0.0;
        y_max = 1.0;
    }

    let pad = |min: f64, max: f64| {
        let span = (max - min).abs();
        let margin = if span < f64::EPSILON { 1.0 } else { span * 0.08 };
        (min - margin)..(max + margin)
    };

    (pad(x_min, x_max), pad(y_min, y_max))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_values_applies_offset() {
        let line = Line::from_values("x", BLUE, 3, &[1.0, 2.0]);
        assert_eq!(line.points, vec![(3.0, 1.0), (4.0, 2.0)]);
    }

    #[test]
    fn ranges_cover_stems_and_bands() {
        let panel = Panel::stems("acf", vec![(0.0, 1.0), (5.0, -0.4)], vec![0.3, -0.3]);
        let (x, y) = panel_ranges(&panel);
        assert!(x.start <= 0.0 && x.end >= 5.0);
        assert!(y.start <= -0.4 && y.end >= 1.0);
    }
}
