// Descriptive statistics: the first look at a freshly loaded series.

use colored::Colorize;

use super::loader::TimeSeries;

/// Summary statistics in the describe() layout: count, mean, std, min,
/// quartiles, max.
#[derive(Debug, PartialEq)]
pub struct DescriptiveStats {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

/// Compute summary statistics over a value slice.
///
/// Standard deviation is the sample (n−1) estimate; quartiles use linear
/// interpolation between order statistics.
pub fn describe(values: &[f64]) -> Option<DescriptiveStats> {
    if values.is_empty() {
        return None;
    }

    let n = values.len();
    let mean = values.iter().sum::<f64>() / n as f64;
    let std = if n > 1 {
        (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64).sqrt()
    } else {
        0.0
    };

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    Some(DescriptiveStats {
        count: n,
        mean,
        std,
        min: sorted[0],
        q25: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q75: quantile(&sorted, 0.75),
        max: sorted[n - 1],
    })
}

/// Linear-interpolated quantile of an already sorted slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let pos = q * (n - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

/// Print the data-description report: column types, head rows, and the
/// summary statistics rounded to two decimals.
pub fn run(series: &TimeSeries, date_format: &str) {
    println!("\n{}", "=== Data Description ===".bold());

    println!("\n  Column types:");
    println!("    date   date ({date_format})");
    println!("    {:<6} f64", series.name);

    println!("\n  Head:");
    for (date, value) in series.dates.iter().zip(&series.values).take(5) {
        println!("    {date}  {value:>12.2}");
    }

    if let Some(stats) = describe(&series.values) {
        println!("\n  Statistics for {}:", series.name.bold());
        println!("    count  {:>12}", stats.count);
        println!("    mean   {:>12.2}", stats.mean);
        println!("    std    {:>12.2}", stats.std);
        println!("    min    {:>12.2}", stats.min);
        println!("    25%    {:>12.2}", stats.q25);
        println!("    50%    {:>12.2}", stats.median);
        println!("    75%    {:>12.2}", stats.q75);
        println!("    max    {:>12.2}", stats.max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_known_values() {
        let stats = describe(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(stats.count, 5);
        assert!((stats.mean - 3.0).abs() < 1e-12);
        assert!((stats.std - (2.5f64).sqrt()).abs() < 1e-12);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.median, 3.0);
        assert_eq!(stats.max, 5.0);
        assert!((stats.q25 - 2.0).abs() < 1e-12);
        assert!((stats.q75 - 4.0).abs() < 1e-12);
    }

    #[test]
    fn quartiles_interpolate() {
        let stats = describe(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert!((stats.q25 - 1.75).abs() < 1e-12);
        assert!((stats.median - 2.5).abs() < 1e-12);
        assert!((stats.q75 - 3.25).abs() < 1e-12);
    }

    #[test]
    fn empty_input_yields_none() {
        assert!(describe(&[]).is_none());
    }
}
