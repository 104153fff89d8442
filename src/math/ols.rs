//! Straight-line least squares.
//!
//! The probability plot regresses ordered observations on theoretical normal
//! quantiles, so the only model solved here is `y = slope * x + intercept`.
//! The design matrix is built as `[x, 1]` and solved via SVD rather than QR:
//! nalgebra's `QR::solve` targets square systems and panics on tall matrices,
//! while SVD handles them and stays stable when the quantile spread is tiny
//! (small samples put all theoretical quantiles close together).

use nalgebra::{DMatrix, DVector};

use crate::error::AppError;

/// Slope and intercept of a fitted line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub slope: f64,
    pub intercept: f64,
}

impl Line {
    /// Evaluate the line at `x`.
    pub fn at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Solve a least squares problem using SVD.
///
/// Returns `None` if no finite solution emerges even at the loosest tolerance.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if the strict solve fails.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Fit `y = slope * x + intercept` over paired observations.
pub fn fit_line(xs: &[f64], ys: &[f64]) -> Result<Line, AppError> {
    if xs.len() != ys.len() {
        return Err(AppError::internal(format!(
            "line fit needs paired samples, got {} x and {} y",
            xs.len(),
            ys.len()
        )));
    }
    if xs.len() < 2 {
        return Err(AppError::internal(
            "line fit needs at least two points",
        ));
    }

    let design = DMatrix::from_fn(xs.len(), 2, |row, col| if col == 0 { xs[row] } else { 1.0 });
    let rhs = DVector::from_column_slice(ys);
    let beta = solve_least_squares(&design, &rhs)
        .ok_or_else(|| AppError::internal("line fit did not converge"))?;

    Ok(Line {
        slope: beta[0],
        intercept: beta[1],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn fit_line_recovers_exact_line() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        let ys = [1.0, 3.0, 5.0, 7.0];

        let line = fit_line(&xs, &ys).unwrap();
        assert!((line.slope - 2.0).abs() < 1e-10);
        assert!((line.intercept - 1.0).abs() < 1e-10);
        assert!((line.at(10.0) - 21.0).abs() < 1e-9);
    }

    #[test]
    fn fit_line_minimizes_residuals_on_noisy_points() {
        // Hand-computed: Sxx = 5, Sxy = 4, slope 0.8, intercept 0.3.
        let xs = [0.0, 1.0, 2.0, 3.0];
        let ys = [0.5, 0.5, 2.5, 2.5];

        let line = fit_line(&xs, &ys).unwrap();
        assert!((line.slope - 0.8).abs() < 1e-10);
        assert!((line.intercept - 0.3).abs() < 1e-10);
    }

    #[test]
    fn fit_line_rejects_degenerate_input() {
        let err = fit_line(&[1.0], &[2.0]).unwrap_err();
        assert_eq!(err.exit_code(), 4);

        let err = fit_line(&[1.0, 2.0], &[2.0]).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }
}
