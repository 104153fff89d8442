//! Descriptive statistics for one sample.

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::error::AppError;

/// Arithmetic mean. `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator). `None` below two values.
pub fn sample_sd(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

/// Pearson correlation coefficient over paired samples.
///
/// `None` when either side is constant or fewer than two pairs exist.
pub fn pearson_r(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let mx = mean(xs)?;
    let my = mean(ys)?;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    let mut sxy = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        sxx += (x - mx) * (x - mx);
        syy += (y - my) * (y - my);
        sxy += (x - mx) * (y - my);
    }
    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    Some(sxy / (sxx * syy).sqrt())
}

/// n, mean, spread and 95% confidence interval for one labelled group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSummary {
    pub label: String,
    pub n: usize,
    pub mean: f64,
    pub sd: f64,
    pub se: f64,
    pub ci_low: f64,
    pub ci_high: f64,
}

/// Summarize one group of observations.
///
/// The confidence interval uses the t quantile at the sample's own degrees of
/// freedom, so small groups get appropriately wide intervals.
pub fn summarize(label: &str, values: &[f64]) -> Result<SampleSummary, AppError> {
    let n = values.len();
    if n < 2 {
        return Err(AppError::no_data(format!(
            "group '{label}' has {n} observation(s); need at least 2"
        )));
    }

    let mean = mean(values).unwrap_or(f64::NAN);
    let sd = sample_sd(values).unwrap_or(f64::NAN);
    let se = sd / (n as f64).sqrt();

    let df = (n - 1) as f64;
    let t = StudentsT::new(0.0, 1.0, df)
        .map_err(|e| AppError::internal(format!("t distribution (df {df}): {e}")))?;
    let quantile = t.inverse_cdf(0.975);

    let summary = SampleSummary {
        label: label.to_string(),
        n,
        mean,
        sd,
        se,
        ci_low: mean - quantile * se,
        ci_high: mean + quantile * se,
    };
    if !summary.mean.is_finite() || !summary.sd.is_finite() || !summary.se.is_finite() {
        return Err(AppError::internal(format!(
            "non-finite descriptive statistics for group '{label}'"
        )));
    }
    Ok(summary)
}
