// Series transforms: log and first differencing. Both derive a new
// series; the input is untouched.

use std::path::Path;

use anyhow::Result;
use plotters::style::BLUE;

use super::loader::TimeSeries;
use super::plot::{save_panels, Line, Panel};

/// Natural log of every value. Fails on non-positive values rather than
/// producing NaNs that poison every later step.
pub fn log_transform(series: &TimeSeries) -> Result<TimeSeries> {
    if let Some(bad) = series.values.iter().find(|v| **v <= 0.0) {
        anyhow::bail!(
            "cannot log-transform {}: contains non-positive value {bad}",
            series.name
        );
    }
    let values = series.values.iter().map(|v| v.ln()).collect();
    Ok(series.with_values(format!("log({})", series.name), values))
}

/// First difference: value_t − value_{t−1}. One observation shorter than
/// the input; a constant series differences to all zeros.
pub fn difference(series: &TimeSeries) -> TimeSeries {
    TimeSeries {
        name: format!("Δ{}", series.name),
        dates: series.dates.iter().skip(1).copied().collect(),
        values: series.values.windows(2).map(|w| w[1] - w[0]).collect(),
    }
}

/// Apply the log transform and save `log_trans.png`. Returns the derived
/// series for any caller that wants to keep analyzing it.
pub fn run_log(series: &TimeSeries, out_dir: &Path) -> Result<TimeSeries> {
    let logged = log_transform(series)?;

    let path = out_dir.join("log_trans.png");
    save_panels(
        &path,
        &[Panel::lines(
            "Log Transformation",
            vec![Line::from_values(&logged.name, BLUE, 0, &logged.values)],
        )],
    )?;
    println!("\n  Saved {}", path.display());

    Ok(logged)
}
