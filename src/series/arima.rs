// ARIMA(p, d, q) by conditional least squares.
//
// Pure AR orders are fit directly by OLS on lagged values. Orders with an
// MA part use the Hannan-Rissanen two-step: a long AR fit supplies
// residual estimates, then the final regression includes both lagged
// values and lagged residuals. Forecasting iterates the fitted equation
// with future shocks at their expectation (zero) and integrates the
// differencing back out.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use nalgebra::{DMatrix, DVector};
use plotters::style::{BLUE, RED};

use super::loader::TimeSeries;
use super::plot::{save_panels, Line, Panel};

/// Model order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArimaOrder {
    pub p: usize,
    pub d: usize,
    pub q: usize,
}

impl ArimaOrder {
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self { p, d, q }
    }
}

impl std::fmt::Display for ArimaOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ARIMA({},{},{})", self.p, self.d, self.q)
    }
}

/// A fitted model with its diagnostics.
#[derive(Debug)]
pub struct ArimaFit {
    pub order: ArimaOrder,
    pub ar: Vec<f64>,
    pub ma: Vec<f64>,
    pub constant: f64,
    pub residuals: Vec<f64>,
    pub sigma2: f64,
    pub aic: f64,
    pub bic: f64,
}

impl ArimaFit {
    /// Fit the model to a series.
    pub fn fit(values: &[f64], order: ArimaOrder) -> Result<Self> {
        if order.p == 0 && order.q == 0 {
            anyhow::bail!("{order}: need at least one AR or MA term");
        }
        let needed = order.p + order.d + order.q + 10;
        if values.len() < needed {
            anyhow::bail!(
                "{order}: need at least {needed} observations, have {}",
                values.len()
            );
        }

        let diff = difference_n(values, order.d);
        if diff.len() < order.p.max(order.q) + 5 {
            anyhow::bail!("{order}: series too short after differencing {} times", order.d);
        }

        let (ar, ma, constant, residuals) = if order.q == 0 {
            fit_ar(&diff, order.p).with_context(|| format!("{order}: AR estimation failed"))?
        } else {
            fit_arma(&diff, order.p, order.q)
                .with_context(|| format!("{order}: ARMA estimation failed"))?
        };

        let n = residuals.len() as f64;
        let k = (order.p + order.q + 1) as f64;
        let sigma2 = residuals.iter().map(|r| r * r).sum::<f64>() / n;
        let log_likelihood =
            -0.5 * n * (1.0 + (2.0 * std::f64::consts::PI * sigma2.max(f64::MIN_POSITIVE)).ln());

        Ok(Self {
            order,
            ar,
            ma,
            constant,
            residuals,
            sigma2,
            aic: -2.0 * log_likelihood + 2.0 * k,
            bic: -2.0 * log_likelihood + k * n.ln(),
        })
    }

    /// Forecast `steps` values beyond the end of the series, in the
    /// original (undifferenced) scale.
    pub fn forecast(&self, values: &[f64], steps: usize) -> Vec<f64> {
        let mut history = difference_n(values, self.order.d);
        let mut shocks = self.residuals.clone();
        let mut forecasts = Vec::with_capacity(steps);

        for _ in 0..steps {
            let mut next = self.constant;
            for (i, &phi) in self.ar.iter().enumerate() {
                if let Some(&y) = history.get(history.len().wrapping_sub(i + 1)) {
                    next += phi * y;
                }
            }
            for (i, &theta) in self.ma.iter().enumerate() {
                if let Some(&e) = shocks.get(shocks.len().wrapping_sub(i + 1)) {
                    next += theta * e;
                }
            }
            history.push(next);
            shocks.push(0.0);
            forecasts.push(next);
        }

        // Undo the differencing, one level at a time
        let mut result = forecasts;
        for level in (0..self.order.d).rev() {
            let base = difference_n(values, level);
            let mut last = base.last().copied().unwrap_or(0.0);
            for value in &mut result {
                last += *value;
                *value = last;
            }
        }
        result
    }

    /// Multi-line fit summary for the terminal.
    pub fn summary(&self) -> String {
        let mut out = format!("{} fit\n", self.order);
        for (i, phi) in self.ar.iter().enumerate() {
            out.push_str(&format!("  φ{}  {phi:>12.6}\n", i + 1));
        }
        for (i, theta) in self.ma.iter().enumerate() {
            out.push_str(&format!("  θ{}  {theta:>12.6}\n", i + 1));
        }
        out.push_str(&format!("  const {:>10.6}\n", self.constant));
        out.push_str(&format!("  σ²    {:>10.6}\n", self.sigma2));
        out.push_str(&format!("  AIC   {:>10.2}\n", self.aic));
        out.push_str(&format!("  BIC   {:>10.2}", self.bic));
        out
    }
}

/// Difference a series `d` times.
pub fn difference_n(values: &[f64], d: usize) -> Vec<f64> {
    let mut result = values.to_vec();
    for _ in 0..d {
        if result.len() < 2 {
            return Vec::new();
        }
        result = result.windows(2).map(|w| w[1] - w[0]).collect();
    }
    result
}

type Estimate = (Vec<f64>, Vec<f64>, f64, Vec<f64>);

/// OLS regression of y on X, returning (coefficients, residuals).
fn ols(x: DMatrix<f64>, y: DVector<f64>) -> Result<(DVector<f64>, Vec<f64>)> {
    let xtx = x.transpose() * &x;
    let xty = x.transpose() * &y;
    let beta = xtx
        .try_inverse()
        .context("normal equations are singular")?
        * xty;
    let residuals: Vec<f64> = (&y - &x * &beta).iter().copied().collect();
    Ok((beta, residuals))
}

/// Pure AR(p): regress y_t on [1, y_{t−1}, ..., y_{t−p}].
fn fit_ar(values: &[f64], p: usize) -> Result<Estimate> {
    let n = values.len();
    if n < p + 2 {
        anyhow::bail!("not enough observations for AR({p})");
    }

    let rows = n - p;
    let mut data = Vec::with_capacity(rows * (p + 1));
    for t in p..n {
        data.push(1.0);
        for i in 1..=p {
            data.push(values[t - i]);
        }
    }
    let x = DMatrix::from_row_slice(rows, p + 1, &data);
    let y = DVector::from_column_slice(&values[p..]);

    let (beta, residuals) = ols(x, y)?;
    let constant = beta[0];
    let ar = beta.iter().skip(1).copied().collect();

    Ok((ar, Vec::new(), constant, residuals))
}

/// Hannan-Rissanen for ARMA(p, q): estimate shocks with a long AR fit,
/// then regress on both lagged values and lagged shocks.
fn fit_arma(values: &[f64], p: usize, q: usize) -> Result<Estimate> {
    let n = values.len();
    let mean = values.iter().sum::<f64>() / n as f64;
    let centered: Vec<f64> = values.iter().map(|v| v - mean).collect();

    let long_order = (p + q).max(10).min(n / 4).max(1);
    let (_, _, _, shocks) = fit_ar(&centered, long_order)
        .context("long AR step of Hannan-Rissanen failed")?;
    // shocks[i] corresponds to centered[long_order + i]

    let start = long_order.max(p.max(q));
    let rows = n - start;
    let num_params = 1 + p + q;
    if rows < num_params + 2 {
        anyhow::bail!("not enough observations for ARMA({p},{q})");
    }

    let mut data = Vec::with_capacity(rows * num_params);
    for t in start..n {
        data.push(1.0);
        for i in 1..=p {
            data.push(centered[t - i]);
        }
        for i in 1..=q {
            let shock = (t - i)
                .checked_sub(long_order)
                .and_then(|idx| shocks.get(idx).copied())
                .unwrap_or(0.0);
            data.push(shock);
        }
    }
    let x = DMatrix::from_row_slice(rows, num_params, &data);
    let y = DVector::from_column_slice(&centered[start..]);

    let (beta, residuals) = ols(x, y)?;
    let constant = beta[0] + mean * (1.0 - beta.iter().skip(1).take(p).sum::<f64>());
    let ar: Vec<f64> = beta.iter().skip(1).take(p).copied().collect();
    let ma: Vec<f64> = beta.iter().skip(1 + p).take(q).copied().collect();

    Ok((ar, ma, constant, residuals))
}

/// Fit, print the summary, forecast, and save `arma.png`.
pub fn run(
    series: &TimeSeries,
    order: ArimaOrder,
    forecast_steps: usize,
    out_dir: &Path,
) -> Result<()> {
    let fit = ArimaFit::fit(&series.values, order)
        .with_context(|| format!("failed to fit {order} to {}", series.name))?;

    println!("\n{}", format!("=== {} ===", order).bold());
    println!("{}", fit.summary());

    let forecast = fit.forecast(&series.values, forecast_steps);

    let n = series.len();
    let observed = Line::from_values(&series.name, BLUE, 0, &series.values);
    // Anchor the forecast line to the last observation so the plot joins up
    let mut forecast_points: Vec<(f64, f64)> = vec![(
        (n - 1) as f64,
        *series.values.last().unwrap_or(&0.0),
    )];
    forecast_points.extend(
        forecast
            .iter()
            .enumerate()
            .map(|(i, &v)| ((n + i) as f64, v)),
    );

    let path = out_dir.join("arma.png");
    save_panels(
        &path,
        &[Panel::lines(
            &format!("{} forecast — {}", order, series.name),
            vec![observed, Line::new("forecast", RED, forecast_points)],
        )],
    )?;

    println!("  Forecast ({forecast_steps} steps): first = {:.3}, last = {:.3}",
        forecast.first().copied().unwrap_or(f64::NAN),
        forecast.last().copied().unwrap_or(f64::NAN),
    );
    println!("  Saved {}", path.display());

    Ok(())
}
