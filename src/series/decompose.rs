// Additive seasonal decomposition: observed = trend + seasonal + residual.
//
// Trend is a centered moving average (even periods get the standard
// 2×period window with half weights at the ends). Seasonal indices are
// the by-phase means of the detrended series, centered to sum to zero.

use std::path::Path;

use anyhow::Result;
use plotters::style::{BLACK, BLUE, GREEN, RED};

use super::loader::TimeSeries;
use super::plot::{save_panels, Line, Panel};

/// Decomposition components. Trend and residual are undefined near the
/// edges where the centered window does not fit.
#[derive(Debug)]
pub struct Decomposition {
    pub trend: Vec<Option<f64>>,
    pub seasonal: Vec<f64>,
    pub residual: Vec<Option<f64>>,
}

/// Decompose a series with the given seasonal period.
pub fn seasonal_decompose(values: &[f64], period: usize) -> Result<Decomposition> {
    if period < 2 {
        anyhow::bail!("seasonal period must be at least 2, got {period}");
    }
    let n = values.len();
    if n < 2 * period {
        anyhow::bail!("need at least two full periods ({} observations), have {n}", 2 * period);
    }

    let trend = centered_moving_average(values, period);

    // By-phase means of the detrended series
    let mut phase_sums = vec![0.0; period];
    let mut phase_counts = vec![0usize; period];
    for (i, (&value, trend_i)) in values.iter().zip(&trend).enumerate() {
        if let Some(t) = trend_i {
            phase_sums[i % period] += value - t;
            phase_counts[i % period] += 1;
        }
    }
    let mut indices: Vec<f64> = phase_sums
        .iter()
        .zip(&phase_counts)
        .map(|(&sum, &count)| if count > 0 { sum / count as f64 } else { 0.0 })
        .collect();

    // Center so the seasonal component sums to zero over one period
    let mean_index = indices.iter().sum::<f64>() / period as f64;
    for index in &mut indices {
        *index -= mean_index;
    }

    let seasonal: Vec<f64> = (0..n).map(|i| indices[i % period]).collect();
    let residual: Vec<Option<f64>> = values
        .iter()
        .zip(&trend)
        .zip(&seasonal)
        .map(|((&value, trend_i), &s)| trend_i.map(|t| value - t - s))
        .collect();

    Ok(Decomposition {
        trend,
        seasonal,
        residual,
    })
}

/// Centered moving average with window = period. For even periods this
/// is the 2×MA: a window of period+1 values where the two endpoints get
/// half weight.
fn centered_moving_average(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let n = values.len();
    let mut trend = vec![None; n];

    if period % 2 == 1 {
        let half = period / 2;
        for i in half..n.saturating_sub(half) {
            let window = &values[i - half..=i + half];
            trend[i] = Some(window.iter().sum::<f64>() / period as f64);
        }
    } else {
        let half = period / 2;
        for i in half..n.saturating_sub(half) {
            let window = &values[i - half..=i + half];
            let mut sum = window[0] / 2.0 + window[period] / 2.0;
            sum += window[1..period].iter().sum::<f64>();
            trend[i] = Some(sum / period as f64);
        }
    }

    trend
}

/// Decompose and save the 4-panel `decomp.png`.
pub fn run(series: &TimeSeries, period: usize, out_dir: &Path) -> Result<()> {
    let decomposition = seasonal_decompose(&series.values, period)?;

    let unwrap_points = |component: &[Option<f64>]| -> Vec<(f64, f64)> {
        component
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.map(|v| (i as f64, v)))
            .collect()
    };

    let path = out_dir.join("decomp.png");
    save_panels(
        &path,
        &[
            Panel::lines(
                "Observed",
                vec![Line::from_values(&series.name, BLUE, 0, &series.values)],
            ),
            Panel::lines(
                "Trend",
                vec![Line::new("trend", RED, unwrap_points(&decomposition.trend))],
            ),
            Panel::lines(
                "Seasonal",
                vec![Line::from_values(
                    "seasonal",
                    GREEN,
                    0,
                    &decomposition.seasonal,
                )],
            ),
            Panel::lines(
                "Residual",
                vec![Line::new(
                    "residual",
                    BLACK,
                    unwrap_points(&decomposition.residual),
                )],
            ),
        ],
    )?;
    println!("\n  Saved {}", path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recovers_pure_seasonal_pattern() {
        // Period-4 sawtooth around zero, no trend
        let pattern = [2.0, -1.0, 0.0, -1.0];
        let values: Vec<f64> = (0..40).map(|i| pattern[i % 4]).collect();
        let d = seasonal_decompose(&values, 4).unwrap();

        // Seasonal component should match the centered pattern
        let mean: f64 = pattern.iter().sum::<f64>() / 4.0;
        for (i, &s) in d.seasonal.iter().enumerate().take(8) {
            assert!(
                (s - (pattern[i % 4] - mean)).abs() < 1e-9,
                "seasonal[{i}] = {s}"
            );
        }

        // Residuals are zero wherever the trend is defined
        for r in d.residual.iter().flatten() {
            assert!(r.abs() < 1e-9);
        }
    }

    #[test]
    fn seasonal_sums_to_zero_over_a_period() {
        let values: Vec<f64> = (0..48).map(|i| (i % 12) as f64 + i as f64 * 0.1).collect();
        let d = seasonal_decompose(&values, 12).unwrap();
        let sum: f64 = d.seasonal[..12].iter().sum();
        assert!(sum.abs() < 1e-9);
    }

    #[test]
    fn trend_edges_are_undefined() {
        let values: Vec<f64> = (0..24).map(|i| i as f64).collect();
        let d = seasonal_decompose(&values, 4).unwrap();
        assert!(d.trend[0].is_none());
        assert!(d.trend[1].is_none());
        assert!(d.trend[2].is_some());
    }

    #[test]
    fn short_series_is_an_error() {
        assert!(seasonal_decompose(&[1.0; 10], 12).is_err());
    }
}
