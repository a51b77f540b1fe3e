// Linear trend regression: OLS of the series on [1, t, t²].
//
// A straight line plus curvature is enough to characterize the long-run
// trend before detrending. Solved by normal equations with nalgebra.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use nalgebra::{DMatrix, DVector};
use plotters::style::{BLUE, CYAN, RED};

use super::loader::TimeSeries;
use super::plot::{save_panels, Line, Panel};

/// A fitted least-squares model.
#[derive(Debug)]
pub struct OlsFit {
    /// [intercept, t, t²]
    pub coefficients: Vec<f64>,
    pub std_errors: Vec<f64>,
    pub r_squared: f64,
    pub fitted: Vec<f64>,
    /// Residual standard deviation
    pub sigma: f64,
}

/// Fit value ~ 1 + t + t² over the observation index.
pub fn quadratic_trend(values: &[f64]) -> Result<OlsFit> {
    let n = values.len();
    if n < 4 {
        anyhow::bail!("need at least 4 observations for a quadratic trend, have {n}");
    }

    let x = DMatrix::from_fn(n, 3, |row, col| (row as f64).powi(col as i32));
    let y = DVector::from_column_slice(values);

    let xtx = x.transpose() * &x;
    let xty = x.transpose() * &y;
    let xtx_inv = xtx
        .try_inverse()
        .context("trend design matrix is singular")?;
    let beta = &xtx_inv * xty;

    let fitted_vec = &x * &beta;
    let residuals = &y - &fitted_vec;

    let sse: f64 = residuals.iter().map(|r| r * r).sum();
    let mean = values.iter().sum::<f64>() / n as f64;
    let sst: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    let r_squared = if sst > 0.0 { 1.0 - sse / sst } else { 0.0 };

    let dof = (n - 3) as f64;
    let mse = sse / dof;
    let std_errors: Vec<f64> = (0..3).map(|i| (mse * xtx_inv[(i, i)]).sqrt()).collect();

    Ok(OlsFit {
        coefficients: beta.iter().copied().collect(),
        std_errors,
        r_squared,
        fitted: fitted_vec.iter().copied().collect(),
        sigma: mse.sqrt(),
    })
}

/// Print the regression summary and save `linear.png` with the data,
/// fitted curve, and ±1.96σ prediction band.
pub fn run(series: &TimeSeries, out_dir: &Path) -> Result<()> {
    let fit = quadratic_trend(&series.values)?;

    println!("\n{}", "=== Linear Regression ===".bold());
    println!("  Model: {} ~ 1 + t + t²", series.name);
    let names = ["const", "t", "t²"];
    println!("  {:<6} {:>14} {:>14}", "", "coef", "std err");
    for ((name, coef), se) in names.iter().zip(&fit.coefficients).zip(&fit.std_errors) {
        println!("  {name:<6} {coef:>14.6} {se:>14.6}");
    }
    println!("  R²: {:.4}", fit.r_squared);

    let observed = Line::from_values("data", BLUE, 0, &series.values);
    let fitted = Line::from_values("OLS fit", RED, 0, &fit.fitted);
    let upper: Vec<f64> = fit.fitted.iter().map(|f| f + 1.96 * fit.sigma).collect();
    let lower: Vec<f64> = fit.fitted.iter().map(|f| f - 1.96 * fit.sigma).collect();

    let path = out_dir.join("linear.png");
    save_panels(
        &path,
        &[Panel::lines(
            &format!("Linear Regression — {}", series.name),
            vec![
                observed,
                fitted,
                Line::from_values("+1.96σ", CYAN, 0, &upper),
                Line::from_values("−1.96σ", CYAN, 0, &lower),
            ],
        )],
    )?;
    println!("  Saved {}", path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recovers_exact_quadratic() {
        // y = 2 + 3t + 0.5t², no noise
        let values: Vec<f64> = (0..30)
            .map(|t| 2.0 + 3.0 * t as f64 + 0.5 * (t as f64).powi(2))
            .collect();
        let fit = quadratic_trend(&values).unwrap();
        assert!((fit.coefficients[0] - 2.0).abs() < 1e-6);
        assert!((fit.coefficients[1] - 3.0).abs() < 1e-6);
        assert!((fit.coefficients[2] - 0.5).abs() < 1e-6);
        assert!(fit.r_squared > 0.999999);
    }

    #[test]
    fn too_few_points_is_an_error() {
        assert!(quadratic_trend(&[1.0, 2.0, 3.0]).is_err());
    }
}
