// Autocorrelation (ACF) and partial autocorrelation (PACF), used to eye
// the lag order before an ARIMA fit. PACF uses the Durbin-Levinson
// recursion over the ACF values.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use super::loader::TimeSeries;
use super::plot::{save_panels, Panel};
use super::transform::difference;

/// ACF for lags 0..=max_lag. Lag 0 is 1 by definition.
pub fn acf(values: &[f64], max_lag: usize) -> Vec<f64> {
    let n = values.len();
    if n < 2 {
        return Vec::new();
    }

    let max_lag = max_lag.min(n - 1);
    let mean = values.iter().sum::<f64>() / n as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64;

    if variance == 0.0 {
        return vec![1.0; max_lag + 1];
    }

    (0..=max_lag)
        .map(|lag| {
            if lag == 0 {
                return 1.0;
            }
            let covariance: f64 = values[lag..]
                .iter()
                .zip(&values[..n - lag])
                .map(|(a, b)| (a - mean) * (b - mean))
                .sum();
            covariance / (n as f64 * variance)
        })
        .collect()
}

/// PACF for lags 0..=max_lag via Durbin-Levinson.
pub fn pacf(values: &[f64], max_lag: usize) -> Vec<f64> {
    let rho = acf(values, max_lag);
    if rho.is_empty() {
        return Vec::new();
    }

    let max_lag = rho.len() - 1;
    let mut result = vec![0.0; max_lag + 1];
    result[0] = 1.0;
    if max_lag == 0 {
        return result;
    }

    let mut phi = vec![vec![0.0; max_lag + 1]; max_lag + 1];
    phi[1][1] = rho[1];
    result[1] = rho[1];

    for k in 2..=max_lag {
        let mut numerator = rho[k];
        let mut denominator = 1.0;
        for j in 1..k {
            numerator -= phi[k - 1][j] * rho[k - j];
            denominator -= phi[k - 1][j] * rho[j];
        }
        if denominator.abs() < 1e-12 {
            break;
        }
        phi[k][k] = numerator / denominator;
        result[k] = phi[k][k];

        for j in 1..k {
            phi[k][j] = phi[k - 1][j] - phi[k][k] * phi[k - 1][k - j];
        }
    }

    result
}

/// Compute ACF/PACF of the differenced series and save the two-panel
/// `corrfunc.png` with ±1.96/√n confidence bands.
pub fn run(series: &TimeSeries, max_lag: usize, out_dir: &Path) -> Result<()> {
    let diff = difference(series);
    if diff.len() < 3 {
        anyhow::bail!("series too short for a correlogram after differencing");
    }

    let acf_values = acf(&diff.values, max_lag);
    let pacf_values = pacf(&diff.values, max_lag);

    let band = 1.96 / (diff.len() as f64).sqrt();
    let to_stems = |values: &[f64]| -> Vec<(f64, f64)> {
        values
            .iter()
            .enumerate()
            .map(|(lag, &v)| (lag as f64, v))
            .collect()
    };

    let path = out_dir.join("corrfunc.png");
    save_panels(
        &path,
        &[
            Panel::stems("ACF", to_stems(&acf_values), vec![band, -band]),
            Panel::stems("PACF", to_stems(&pacf_values), vec![band, -band]),
        ],
    )?;

    println!("\n{}", "=== Correlogram ===".bold());
    println!("  Series: {} (first difference)", series.name);
    println!("  Lags: {}   confidence band: ±{band:.3}", acf_values.len() - 1);
    let significant: Vec<usize> = acf_values
        .iter()
        .enumerate()
        .skip(1)
        .filter(|(_, v)| v.abs() > band)
        .map(|(lag, _)| lag)
        .collect();
    println!("  Significant ACF lags: {significant:?}");
    println!("  Saved {}", path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn ar1(phi: f64, n: usize) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(11);
        let mut data = vec![0.0];
        for i in 1..n {
            let noise = rng.random::<f64>() - 0.5;
            data.push(phi * data[i - 1] + noise);
        }
        data
    }

    #[test]
    fn acf_lag_zero_is_one() {
        let values = ar1(0.5, 100);
        let rho = acf(&values, 10);
        assert_eq!(rho.len(), 11);
        assert!((rho[0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn acf_of_constant_series_is_flat() {
        let rho = acf(&[3.0; 50], 5);
        assert_eq!(rho, vec![1.0; 6]);
    }

    #[test]
    fn acf_decays_for_ar_process() {
        let values = ar1(0.8, 500);
        let rho = acf(&values, 5);
        assert!(rho[1] > 0.5, "lag-1 autocorrelation was {}", rho[1]);
        assert!(rho[1] > rho[3].abs());
    }

    #[test]
    fn pacf_matches_acf_at_lag_one() {
        let values = ar1(0.6, 300);
        let rho = acf(&values, 10);
        let partial = pacf(&values, 10);
        assert!((partial[1] - rho[1]).abs() < 1e-12);
    }

    #[test]
    fn pacf_cuts_off_for_ar1() {
        let values = ar1(0.8, 500);
        let partial = pacf(&values, 6);
        assert!(partial[1] > 0.5);
        // Higher partial lags should be much smaller for an AR(1)
        for lag in 3..=6 {
            assert!(
                partial[lag].abs() < partial[1] / 2.0,
                "pacf[{lag}] = {}",
                partial[lag]
            );
        }
    }
}
