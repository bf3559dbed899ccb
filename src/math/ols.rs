//! Ordinary least squares solvers.
//!
//! Both the Dickey-Fuller regression and the autoregressive fit reduce to
//! small linear systems of the form:
//!
//! ```text
//! minimize Σ (y_i - x_i^T β)^2
//! ```
//!
//! Implementation choices:
//! - We use SVD to solve the least-squares problem robustly even when the
//!   design matrix is tall (more rows than columns).
//!   (Nalgebra's `QR::solve` is intended for square systems and will panic for
//!   non-square matrices.)
//! - The parameter dimension here is tiny (at most the AR lag order plus two
//!   columns), so SVD performance is a non-issue.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails. Near-constant
    // price series can make the lagged-difference columns almost collinear.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// A solved regression with the diagnostics the ADF test needs.
#[derive(Debug, Clone)]
pub struct OlsFit {
    /// Coefficients, in design-matrix column order.
    pub beta: Vec<f64>,
    /// Residual sum of squares.
    pub ssr: f64,
    /// Rows in the design matrix.
    pub n: usize,
    /// Columns in the design matrix.
    pub k: usize,
    /// Standard error per coefficient, from `s^2 (X^T X)^{-1}`.
    pub std_errors: Vec<f64>,
}

impl OlsFit {
    /// t-ratio of coefficient `j`.
    pub fn t_value(&self, j: usize) -> f64 {
        self.beta[j] / self.std_errors[j]
    }

    /// Akaike information criterion up to a constant shared by fits on the
    /// same sample (`n ln(SSR/n) + 2k`), which is all lag selection compares.
    pub fn aic(&self) -> f64 {
        self.n as f64 * (self.ssr / self.n as f64).ln() + 2.0 * self.k as f64
    }
}

/// Solve OLS and compute coefficient standard errors.
///
/// Returns `None` when the system is singular, when there are no residual
/// degrees of freedom (`n <= k`), or when the residual variance collapses to
/// zero (a constant series leaves every t-ratio undefined).
pub fn fit_ols(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<OlsFit> {
    let n = x.nrows();
    let k = x.ncols();
    if n <= k {
        return None;
    }

    let beta = solve_least_squares(x, y)?;
    let residuals = y - x * &beta;
    let ssr = residuals.dot(&residuals);

    let s2 = ssr / (n - k) as f64;
    if !(s2.is_finite() && s2 > 0.0) {
        return None;
    }

    let xtx_inv = (x.transpose() * x).try_inverse()?;
    let mut std_errors = Vec::with_capacity(k);
    for j in 0..k {
        let var = s2 * xtx_inv[(j, j)];
        if !(var.is_finite() && var > 0.0) {
            return None;
        }
        std_errors.push(var.sqrt());
    }

    Some(OlsFit {
        beta: beta.iter().copied().collect(),
        ssr,
        n,
        k,
        std_errors,
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
    fn fit_ols_reports_standard_errors() {
        // y = 1 + 2x with symmetric noise; hand-checkable normal equations.
        let x = DMatrix::from_row_slice(4, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0, 1.0, 3.0]);
        let y = DVector::from_row_slice(&[1.1, 2.9, 5.1, 6.9]);

        let fit = fit_ols(&x, &y).unwrap();
        assert_eq!(fit.n, 4);
        assert_eq!(fit.k, 2);
        assert!((fit.beta[0] - 1.0).abs() < 0.1);
        assert!((fit.beta[1] - 2.0).abs() < 0.1);
        assert!(fit.std_errors.iter().all(|se| se.is_finite() && *se > 0.0));
        // t-ratio of the slope dwarfs the noise.
        assert!(fit.t_value(1) > 10.0);
    }

    #[test]
    fn fit_ols_rejects_exact_fit_and_degenerate_input() {
        // n == k: no residual degrees of freedom.
        let x = DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 1.0, 1.0]);
        let y = DVector::from_row_slice(&[1.0, 2.0]);
        assert!(fit_ols(&x, &y).is_none());

        // Constant response on a constant regressor: zero residual variance.
        let x = DMatrix::from_row_slice(4, 1, &[1.0, 1.0, 1.0, 1.0]);
        let y = DVector::from_row_slice(&[3.0, 3.0, 3.0, 3.0]);
        assert!(fit_ols(&x, &y).is_none());
    }
}
