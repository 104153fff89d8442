//! Independent two-sample Student's t-test with pooled variance.

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::error::AppError;
use crate::stats::describe::{mean, sample_sd};

/// Full result of the pooled two-sample test.
///
/// Both one-sided p-values are carried alongside the two-sided one, and the
/// effect sizes cover pooled (Cohen's d, Hedges' g), control-group (Glass's
/// delta, first sample as reference) and correlation (point-biserial r) forms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TTestResult {
    pub n1: usize,
    pub n2: usize,
    pub mean_diff: f64,
    pub df: f64,
    pub t: f64,
    pub p_two_sided: f64,
    pub p_less: f64,
    pub p_greater: f64,
    pub cohen_d: f64,
    pub hedges_g: f64,
    pub glass_delta: f64,
    pub pearson_r: f64,
}

/// Pooled-variance Student's t-test of `a` against `b`.
///
/// The statistic is (mean(a) - mean(b)) / (s_p * sqrt(1/n1 + 1/n2)) with
/// s_p the pooled standard deviation and df = n1 + n2 - 2. Equal variances
/// are assumed, not tested.
pub fn students_t_test(a: &[f64], b: &[f64]) -> Result<TTestResult, AppError> {
    let (n1, n2) = (a.len(), b.len());
    if n1 < 2 || n2 < 2 {
        return Err(AppError::no_data(format!(
            "t-test needs at least 2 observations per group, got {n1} and {n2}"
        )));
    }

    let m1 = mean(a).unwrap_or(f64::NAN);
    let m2 = mean(b).unwrap_or(f64::NAN);
    let s1 = sample_sd(a).unwrap_or(f64::NAN);
    let s2 = sample_sd(b).unwrap_or(f64::NAN);

    let df = (n1 + n2 - 2) as f64;
    let pooled_var = ((n1 - 1) as f64 * s1 * s1 + (n2 - 1) as f64 * s2 * s2) / df;
    let pooled_sd = pooled_var.sqrt();
    let se = pooled_sd * (1.0 / n1 as f64 + 1.0 / n2 as f64).sqrt();

    let mean_diff = m1 - m2;
    let t = mean_diff / se;
    if !t.is_finite() {
        return Err(AppError::internal(
            "t statistic is not finite (zero pooled variance?)",
        ));
    }

    let dist = StudentsT::new(0.0, 1.0, df)
        .map_err(|e| AppError::internal(format!("t distribution (df {df}): {e}")))?;
    let p_two_sided = 2.0 * (1.0 - dist.cdf(t.abs()));
    let p_less = dist.cdf(t);
    let p_greater = 1.0 - p_less;

    let cohen_d = mean_diff / pooled_sd;
    let total = (n1 + n2) as f64;
    let hedges_g = cohen_d * (1.0 - 3.0 / (4.0 * total - 9.0));
    let glass_delta = mean_diff / s1;
    let pearson_r = (t * t / (t * t + df)).sqrt();

    Ok(TTestResult {
        n1,
        n2,
        mean_diff,
        df,
        t,
        p_two_sided,
        p_less,
        p_greater,
        cohen_d,
        hedges_g,
        glass_delta,
        pearson_r,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worked_example_matches_reference_values() {
        // Both samples have variance 2.5; pooled se is exactly 1.
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [2.0, 3.0, 4.0, 5.0, 6.0];

        let r = students_t_test(&a, &b).unwrap();
        assert_eq!(r.n1, 5);
        assert_eq!(r.n2, 5);
        assert_eq!(r.df, 8.0);
        assert!((r.mean_diff + 1.0).abs() < 1e-12);
        assert!((r.t + 1.0).abs() < 1e-12);
        assert!((r.p_two_sided - 0.346594).abs() < 1e-4);
        assert!((r.cohen_d + 0.632456).abs() < 1e-5);
        assert!((r.hedges_g + 0.571252).abs() < 1e-4);
        assert!((r.glass_delta + 0.632456).abs() < 1e-5);
        assert!((r.pearson_r - (1.0f64 / 9.0).sqrt()).abs() < 1e-9);
    }

    #[test]
    fn one_sided_p_values_bracket_the_two_sided_one() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [2.0, 3.0, 4.0, 5.0, 6.0];

        let r = students_t_test(&a, &b).unwrap();
        // t is negative, so the less-than tail carries half the two-sided p.
        assert!((r.p_less - r.p_two_sided / 2.0).abs() < 1e-9);
        assert!((r.p_less + r.p_greater - 1.0).abs() < 1e-12);
    }

    #[test]
    fn repeated_runs_are_identical() {
        let a = [12.3, 11.1, 9.8, 14.2];
        let b = [8.1, 7.7, 9.0, 6.5];
        assert_eq!(
            students_t_test(&a, &b).unwrap(),
            students_t_test(&a, &b).unwrap()
        );
    }

    #[test]
    fn identical_samples_give_zero_effect() {
        let a = [1.0, 2.0, 3.0];
        let r = students_t_test(&a, &a).unwrap();
        assert_eq!(r.t, 0.0);
        assert!((r.p_two_sided - 1.0).abs() < 1e-12);
        assert_eq!(r.cohen_d, 0.0);
        assert_eq!(r.mean_diff, 0.0);
    }

    #[test]
    fn degenerate_inputs_are_rejected() {
        // Too few observations.
        let err = students_t_test(&[1.0], &[1.0, 2.0]).unwrap_err();
        assert_eq!(err.exit_code(), 3);

        // Zero spread in both groups leaves the statistic undefined.
        let err = students_t_test(&[5.0, 5.0], &[5.0, 5.0]).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }
}
