// Time-series analysis pipeline.
//
// `run` walks one CSV column through the full sequence: description,
// trend regression, stationarity checks before and after differencing,
// log transform, seasonal decomposition, correlograms, and an ARIMA
// fit with a forecast. Each step that produces a figure writes one PNG
// into a directory named after the CSV file.

pub mod arima;
pub mod correlation;
pub mod decompose;
pub mod describe;
pub mod loader;
pub mod plot;
pub mod regression;
pub mod stationarity;
pub mod transform;

use anyhow::Result;
use tracing::{info, warn};

pub use arima::{ArimaFit, ArimaOrder};
pub use loader::{SeriesConfig, TimeSeries};

/// Run the whole analysis sequence for one configured series.
pub fn run(config: &SeriesConfig) -> Result<()> {
    let series = loader::load(config)?;
    info!(
        rows = series.len(),
        column = %series.name,
        "loaded {}",
        config.csv_path.display()
    );

    let out_dir = loader::output_dir(&config.csv_path)?;

    describe::run(&series, &config.date_format);
    regression::run(&series, &out_dir)?;
    stationarity::run(&series, config.window, &out_dir, "stationarity.png")?;

    // Log transform only works on strictly positive data; skip it for
    // series that cross zero rather than aborting the run.
    if let Err(error) = transform::run_log(&series, &out_dir) {
        warn!("skipping log transform: {error:#}");
    }

    let differenced = transform::difference(&series);
    stationarity::run(&differenced, config.window, &out_dir, "stationarity_diff.png")?;

    if let Err(error) = decompose::run(&series, config.season, &out_dir) {
        warn!("skipping seasonal decomposition: {error:#}");
    }

    correlation::run(&series, config.lags, &out_dir)?;

    let (p, d, q) = config.order;
    arima::run(
        &series,
        ArimaOrder::new(p, d, q),
        config.forecast_steps,
        &out_dir,
    )?;

    println!("\nFigures saved under {}", out_dir.display());
    Ok(())
}
