// Stationarity diagnostics: rolling statistics plot plus the Augmented
// Dickey-Fuller test.
//
// ADF regresses Δy_t on a constant, the lagged level y_{t−1}, and lagged
// differences; the t-statistic of the level coefficient is compared
// against MacKinnon-style critical values. A strongly negative statistic
// rejects the unit root, i.e. the series looks stationary.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use nalgebra::{DMatrix, DVector};
use plotters::style::{BLACK, BLUE, RED};

use super::loader::TimeSeries;
use super::plot::{save_panels, Line, Panel};

/// Dickey-Fuller test output, printed in the classic layout.
#[derive(Debug)]
pub struct AdfResult {
    pub statistic: f64,
    pub p_value: f64,
    pub lags_used: usize,
    pub observations: usize,
    pub critical_values: Vec<(&'static str, f64)>,
}

impl AdfResult {
    /// True when the unit-root hypothesis is rejected at 5%.
    pub fn is_stationary(&self) -> bool {
        self.p_value < 0.05
    }
}

/// Rolling mean over `window` observations. Output starts at index
/// `window − 1` of the input and has `n − window + 1` entries.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    if window == 0 || values.len() < window {
        return Vec::new();
    }
    values
        .windows(window)
        .map(|w| w.iter().sum::<f64>() / window as f64)
        .collect()
}

/// Rolling sample standard deviation, aligned like `rolling_mean`.
pub fn rolling_std(values: &[f64], window: usize) -> Vec<f64> {
    if window < 2 || values.len() < window {
        return Vec::new();
    }
    values
        .windows(window)
        .map(|w| {
            let mean = w.iter().sum::<f64>() / window as f64;
            (w.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (window - 1) as f64).sqrt()
        })
        .collect()
}

/// Augmented Dickey-Fuller test with automatic lag length
/// (Schwert's rule capped at n/4) unless one is given.
pub fn adf_test(values: &[f64], max_lag: Option<usize>) -> Result<AdfResult> {
    let n = values.len();
    if n < 10 {
        anyhow::bail!("ADF test needs at least 10 observations, have {n}");
    }

    let diff: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();

    let lag = max_lag
        .unwrap_or_else(|| (2.0 * (n as f64).powf(1.0 / 3.0)) as usize)
        .clamp(1, n / 4);

    let effective_n = diff.len() - lag;
    let num_regressors = 2 + lag;
    if effective_n < num_regressors + 2 {
        anyhow::bail!("series too short for ADF with {lag} lags");
    }

    // Regressors per row: [1, y_{t-1}, Δy_{t-1}, ..., Δy_{t-lag}]
    let mut rows = Vec::with_capacity(effective_n * num_regressors);
    for t in lag..diff.len() {
        rows.push(1.0);
        rows.push(values[t]);
        for i in 1..=lag {
            rows.push(diff[t - i]);
        }
    }
    let x = DMatrix::from_row_slice(effective_n, num_regressors, &rows);
    let y = DVector::from_column_slice(&diff[lag..]);

    let xtx = x.transpose() * &x;
    let xty = x.transpose() * &y;
    let xtx_inv = xtx
        .try_inverse()
        .context("ADF regression matrix is singular")?;
    let beta = &xtx_inv * xty;

    let residuals = &y - &x * &beta;
    let sse: f64 = residuals.iter().map(|r| r * r).sum();
    let mse = sse / (effective_n - num_regressors) as f64;
    let se_level = (mse * xtx_inv[(1, 1)]).sqrt();

    let statistic = beta[1] / se_level;

    Ok(AdfResult {
        statistic,
        p_value: approximate_p_value(statistic, n),
        lags_used: lag,
        observations: effective_n,
        critical_values: vec![("1%", -3.43), ("5%", -2.86), ("10%", -2.57)],
    })
}

/// Interpolated p-value from the constant-only critical values. Coarse,
/// but enough to label a series stationary or not.
fn approximate_p_value(statistic: f64, n: usize) -> f64 {
    let adj = 1.0 / n as f64;
    let cv_1 = -3.43 - 6.0 * adj;
    let cv_5 = -2.86 - 4.0 * adj;
    let cv_10 = -2.57 - 3.0 * adj;

    if statistic <= cv_1 {
        0.01
    } else if statistic <= cv_5 {
        interpolate(statistic, cv_1, 0.01, cv_5, 0.05)
    } else if statistic <= cv_10 {
        interpolate(statistic, cv_5, 0.05, cv_10, 0.10)
    } else if statistic <= 0.0 {
        interpolate(statistic, cv_10, 0.10, 0.0, 0.70)
    } else {
        0.95
    }
}

fn interpolate(x: f64, x0: f64, y0: f64, x1: f64, y1: f64) -> f64 {
    y0 + (y1 - y0) * (x - x0) / (x1 - x0)
}

/// Plot the series with its rolling statistics and print the
/// Dickey-Fuller report. `png_name` varies so the differenced re-run
/// does not overwrite the original plot.
pub fn run(series: &TimeSeries, window: usize, out_dir: &Path, png_name: &str) -> Result<AdfResult> {
    let mean = rolling_mean(&series.values, window);
    let std = rolling_std(&series.values, window);
    let offset = window.saturating_sub(1);

    let mut lines = vec![Line::from_values("original", BLUE, 0, &series.values)];
    if !mean.is_empty() {
        lines.push(Line::from_values("rolling mean", RED, offset, &mean));
    }
    if !std.is_empty() {
        lines.push(Line::from_values("rolling std", BLACK, offset, &std));
    }

    let path = out_dir.join(png_name);
    save_panels(
        &path,
        &[Panel::lines(
            &format!("Rolling Statistics — {}", series.name),
            lines,
        )],
    )?;

    let result = adf_test(&series.values, None)?;

    println!("\n{}", "=== Dickey-Fuller Test ===".bold());
    println!("  Series: {}", series.name);
    println!("  Test statistic      {:>10.3}", result.statistic);
    println!("  p-value             {:>10.3}", result.p_value);
    println!("  Lags used           {:>10}", result.lags_used);
    println!("  Observations        {:>10}", result.observations);
    for (level, value) in &result.critical_values {
        println!("  Critical value {level:>3} {value:>11.2}");
    }
    let verdict = if result.is_stationary() {
        "stationary at 5%".green()
    } else {
        "unit root not rejected".yellow()
    };
    println!("  Verdict: {verdict}");
    println!("  Saved {}", path.display());

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn rolling_mean_aligns_to_window_end() {
        let m = rolling_mean(&[1.0, 2.0, 3.0, 4.0], 2);
        assert_eq!(m, vec![1.5, 2.5, 3.5]);
    }

    #[test]
    fn rolling_std_of_constant_is_zero() {
        let s = rolling_std(&[4.0; 10], 3);
        assert!(s.iter().all(|&v| v.abs() < 1e-12));
    }

    #[test]
    fn adf_rejects_for_white_noise() {
        let mut rng = StdRng::seed_from_u64(7);
        let values: Vec<f64> = (0..200).map(|_| rng.random::<f64>() - 0.5).collect();
        let result = adf_test(&values, Some(2)).unwrap();
        assert!(
            result.statistic < -2.86,
            "white noise should reject the unit root, got {}",
            result.statistic
        );
        assert!(result.is_stationary());
    }

    #[test]
    fn adf_keeps_unit_root_for_random_walk() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut walk = vec![0.0];
        for i in 1..300 {
            // Drifting walk, clearly integrated
            let step = 0.1 + rng.random::<f64>() - 0.5;
            walk.push(walk[i - 1] + step);
        }
        let result = adf_test(&walk, Some(2)).unwrap();
        assert!(!result.is_stationary(), "p = {}", result.p_value);
    }

    #[test]
    fn adf_needs_enough_data() {
        assert!(adf_test(&[1.0, 2.0, 3.0], None).is_err());
    }
}
