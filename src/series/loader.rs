// CSV time-series loading.
//
// The date column is parsed with a caller-supplied chrono format. Partial
// formats like "%Y-%m" or "%Y" are accepted — missing month/day default
// to 1 — so monthly and yearly datasets load without a synthetic day
// column. Rows whose date or value fail to parse are dropped.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::format::{parse, Parsed, StrftimeItems};
use chrono::NaiveDate;
use tracing::{debug, info};

/// Everything Pipeline B needs, collected upfront from CLI flags instead
/// of interactive prompts.
pub struct SeriesConfig {
    pub csv_path: PathBuf,
    pub date_column: String,
    pub date_format: String,
    pub value_column: String,
    /// Rolling window for the stationarity plots
    pub window: usize,
    /// Lag count for ACF/PACF
    pub lags: usize,
    /// Seasonal period for decomposition
    pub season: usize,
    /// ARIMA order (p, d, q)
    pub order: (usize, usize, usize),
    /// Forecast horizon in steps
    pub forecast_steps: usize,
}

/// A dated series of one numeric column. Transform steps derive new
/// series; the loaded one is never mutated.
#[derive(Debug, Clone)]
pub struct TimeSeries {
    /// Column name this series was selected from
    pub name: String,
    pub dates: Vec<NaiveDate>,
    pub values: Vec<f64>,
}

impl TimeSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// A same-dated series with new values (log transform).
    pub fn with_values(&self, name: impl Into<String>, values: Vec<f64>) -> TimeSeries {
        debug_assert_eq!(values.len(), self.dates.len());
        TimeSeries {
            name: name.into(),
            dates: self.dates.clone(),
            values,
        }
    }
}

/// Parse a date cell with the configured format, defaulting missing
/// month and day fields to 1.
pub fn parse_date(text: &str, format: &str) -> Result<NaiveDate> {
    let mut parsed = Parsed::new();
    parse(&mut parsed, text.trim(), StrftimeItems::new(format))
        .with_context(|| format!("date {text:?} does not match format {format:?}"))?;
    if parsed.month.is_none() {
        parsed.set_month(1)?;
    }
    if parsed.day.is_none() {
        parsed.set_day(1)?;
    }
    parsed
        .to_naive_date()
        .with_context(|| format!("date {text:?} is not a valid calendar date"))
}

/// Format a date back with the same format string. Round-trips with
/// `parse_date` for any format that only uses year/month/day fields.
pub fn format_date(date: NaiveDate, format: &str) -> String {
    date.format(format).to_string()
}

/// Load the configured CSV and select the date and value columns.
pub fn load(config: &SeriesConfig) -> Result<TimeSeries> {
    let file = File::open(&config.csv_path)
        .with_context(|| format!("Failed to open {}", config.csv_path.display()))?;
    let mut reader = csv::Reader::from_reader(file);

    let headers = reader
        .headers()
        .context("Failed to read CSV headers")?
        .clone();
    let date_idx = column_index(&headers, &config.date_column)?;
    let value_idx = column_index(&headers, &config.value_column)?;

    let mut dates = Vec::new();
    let mut values = Vec::new();
    let mut dropped = 0usize;

    for (row, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Malformed CSV record at row {row}"))?;

        let date_cell = record.get(date_idx).unwrap_or("");
        let value_cell = record.get(value_idx).unwrap_or("");

        let date = match parse_date(date_cell, &config.date_format) {
            Ok(d) => d,
            Err(e) => {
                debug!(row, error = %e, "Dropping row with unparsable date");
                dropped += 1;
                continue;
            }
        };
        let value = match value_cell.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => v,
            _ => {
                debug!(row, cell = value_cell, "Dropping row with non-numeric value");
                dropped += 1;
                continue;
            }
        };

        dates.push(date);
        values.push(value);
    }

    if values.is_empty() {
        anyhow::bail!(
            "no usable rows in {} (column {:?} with dates in {:?})",
            config.csv_path.display(),
            config.value_column,
            config.date_format
        );
    }

    info!(
        rows = values.len(),
        dropped,
        column = config.value_column,
        "Loaded time series"
    );

    Ok(TimeSeries {
        name: config.value_column.clone(),
        dates,
        values,
    })
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .with_context(|| {
            let available: Vec<&str> = headers.iter().collect();
            format!("column {name:?} not found; CSV has {available:?}")
        })
}

/// Directory next to the CSV, named after its stem, where all the plot
/// images for this dataset land. Created if missing.
pub fn output_dir(csv_path: &Path) -> Result<PathBuf> {
    let stem = csv_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "series".to_string());
    let dir = csv_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default()
        .join(stem);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    Ok(dir)
}
