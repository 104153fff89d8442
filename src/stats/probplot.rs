//! Normality diagnostics for the paired difference series.
//!
//! The probability plot pairs the ordered differences with normal order
//! statistic medians (Filliben's estimate) and fits a least-squares line
//! through the points; r close to 1 means the points hug the line and the
//! series looks normal. The histogram is the companion shape check.

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

use crate::error::AppError;
use crate::math::{Line, fit_line};
use crate::stats::describe::pearson_r;

/// Points, fit line and linearity coefficient of a normal probability plot.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityPlot {
    /// Normal order statistic medians, ascending.
    pub theoretical: Vec<f64>,
    /// The sample, sorted ascending.
    pub ordered: Vec<f64>,
    pub line: Line,
    pub r: f64,
}

/// Filliben's estimate of the uniform order statistic medians.
///
/// m_n = 0.5^(1/n), m_1 = 1 - m_n, and m_i = (i - 0.3175) / (n + 0.365)
/// for the interior positions (i is 1-based).
pub fn uniform_order_medians(n: usize) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![0.5];
    }
    let last = 0.5f64.powf(1.0 / n as f64);
    let mut medians = Vec::with_capacity(n);
    medians.push(1.0 - last);
    for i in 2..n {
        medians.push((i as f64 - 0.3175) / (n as f64 + 0.365));
    }
    medians.push(last);
    medians
}

/// Build the probability plot for `values`.
///
/// Needs at least two finite values; fewer is a no-data condition (the
/// caller skips the diagnostic rather than failing the run).
pub fn probability_plot(values: &[f64]) -> Result<ProbabilityPlot, AppError> {
    if values.len() < 2 {
        return Err(AppError::no_data(format!(
            "probability plot needs at least 2 values, got {}",
            values.len()
        )));
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(AppError::internal(
            "probability plot input contains non-finite values",
        ));
    }

    let mut ordered = values.to_vec();
    ordered.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| AppError::internal(format!("standard normal: {e}")))?;
    let theoretical: Vec<f64> = uniform_order_medians(ordered.len())
        .into_iter()
        .map(|u| normal.inverse_cdf(u))
        .collect();

    let line = fit_line(&theoretical, &ordered)?;
    // A constant sample has no defined correlation; report 0.
    let r = pearson_r(&theoretical, &ordered).unwrap_or(0.0);

    Ok(ProbabilityPlot {
        theoretical,
        ordered,
        line,
        r,
    })
}

/// Equal-width histogram bins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    /// Bin boundaries, ascending; one more edge than counts.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

/// Bin `values` into `bins` equal-width intervals spanning the data range.
///
/// The final bin is closed on the right so the maximum lands inside it.
/// A constant sample collapses to one unit-width bin around the value.
pub fn histogram(values: &[f64], bins: usize) -> Option<Histogram> {
    if values.is_empty() || bins == 0 {
        return None;
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return None;
    }

    if min == max {
        return Some(Histogram {
            edges: vec![min - 0.5, max + 0.5],
            counts: vec![values.len()],
        });
    }

    let width = (max - min) / bins as f64;
    let mut edges = Vec::with_capacity(bins + 1);
    for i in 0..=bins {
        edges.push(min + width * i as f64);
    }
    let mut counts = vec![0usize; bins];
    for &v in values {
        let mut idx = ((v - min) / width) as usize;
        if idx >= bins {
            idx = bins - 1;
        }
        counts[idx] += 1;
    }
    Some(Histogram { edges, counts })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filliben_medians_for_three_points() {
        let m = uniform_order_medians(3);
        assert_eq!(m.len(), 3);
        // m_3 = 0.5^(1/3), m_1 = 1 - m_3, m_2 = (2 - 0.3175) / 3.365 = 0.5.
        assert!((m[2] - 0.793701).abs() < 1e-6);
        assert!((m[0] - 0.206299).abs() < 1e-6);
        assert!((m[1] - 0.5).abs() < 1e-12);

        assert_eq!(uniform_order_medians(1), vec![0.5]);
        assert!(uniform_order_medians(0).is_empty());
    }

    #[test]
    fn theoretical_quantiles_are_symmetric_and_monotone() {
        let plot = probability_plot(&[4.0, 1.0, 3.0, 2.0, 5.0]).unwrap();

        assert_eq!(plot.ordered, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        for pair in plot.theoretical.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        // Median position maps to the distribution centre.
        assert!(plot.theoretical[2].abs() < 1e-12);
        assert!((plot.theoretical[0] + plot.theoretical[4]).abs() < 1e-9);
        assert!(plot.r > 0.0 && plot.r <= 1.0);
    }

    #[test]
    fn affine_normal_scores_fit_exactly() {
        // Values manufactured as 2 * quantile + 1 in shuffled order.
        let normal = Normal::new(0.0, 1.0).unwrap();
        let scores: Vec<f64> = uniform_order_medians(7)
            .into_iter()
            .map(|u| 2.0 * normal.inverse_cdf(u) + 1.0)
            .collect();
        let shuffled = [
            scores[3], scores[0], scores[6], scores[2], scores[5], scores[1], scores[4],
        ];

        let plot = probability_plot(&shuffled).unwrap();
        assert!((plot.line.slope - 2.0).abs() < 1e-9);
        assert!((plot.line.intercept - 1.0).abs() < 1e-9);
        assert!((plot.r - 1.0).abs() < 1e-9);
    }

    #[test]
    fn too_small_or_non_finite_input_is_rejected() {
        assert_eq!(probability_plot(&[1.0]).unwrap_err().exit_code(), 3);
        assert_eq!(
            probability_plot(&[1.0, f64::NAN]).unwrap_err().exit_code(),
            4
        );
    }

    #[test]
    fn histogram_bins_span_the_range() {
        let h = histogram(&[1.0, 2.0, 2.0, 3.0, 10.0], 3).unwrap();
        assert_eq!(h.edges, vec![1.0, 4.0, 7.0, 10.0]);
        // The maximum is right-inclusive in the last bin.
        assert_eq!(h.counts, vec![4, 0, 1]);
        assert_eq!(h.max_count(), 4);
    }

    #[test]
    fn constant_sample_collapses_to_one_bin() {
        let h = histogram(&[5.0, 5.0, 5.0], 4).unwrap();
        assert_eq!(h.edges, vec![4.5, 5.5]);
        assert_eq!(h.counts, vec![3]);

        assert_eq!(histogram(&[], 4), None);
        assert_eq!(histogram(&[1.0], 0), None);
    }
}
