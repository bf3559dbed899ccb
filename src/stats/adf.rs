//! Augmented Dickey-Fuller unit-root test.
//!
//! Constant-only regression with automatic lag selection:
//!
//! ```text
//! Δy_t = α + γ·y_{t-1} + Σ_{i=1..k} β_i·Δy_{t-i} + ε_t
//! ```
//!
//! The reported statistic is the t-ratio of γ̂; the null (unit root, not
//! stationary) is rejected for sufficiently negative values. P-values use the
//! MacKinnon (1994) regression-surface approximation for the constant-only
//! case, so results line up with the standard implementations this pipeline's
//! 0.05 threshold was calibrated against.
//!
//! Lag order is chosen by AIC over `0..=maxlag` with the Schwert rule
//! `maxlag = ⌈12·(n/100)^{1/4}⌉`. All candidates are compared on the common
//! sample trimmed to `maxlag`, then the winner is refit on its own longest
//! sample.

use nalgebra::{DMatrix, DVector};
use statrs::function::erf::erf;

use crate::domain::StationarityResult;
use crate::error::AppError;
use crate::math::ols::fit_ols;
use crate::math::series::{difference, drop_non_finite};

/// MacKinnon (1994) constants for the constant-only ("c") regression, one
/// I(1) variable. Statistics above/below the max/min are clamped to p = 1/0;
/// the star threshold switches between the small-p and large-p polynomials.
const TAU_MAX: f64 = 2.74;
const TAU_MIN: f64 = -18.83;
const TAU_STAR: f64 = -1.61;
const TAU_SMALLP: [f64; 3] = [2.1659, 1.4412, 0.038269];
const TAU_LARGEP: [f64; 4] = [1.7339, 0.93202, -0.12745, -0.010368];

/// Run the ADF test against a numeric series.
///
/// Non-finite values are dropped first, so derived columns with undefined
/// leading values can be passed as-is.
pub fn adf_test(series: &[f64]) -> Result<StationarityResult, AppError> {
    let y = drop_non_finite(series);
    let n = y.len();
    if n < 4 {
        return Err(AppError::insufficient(format!(
            "Series too short for the ADF test ({n} finite observations, need at least 4)."
        )));
    }

    let dy = difference(&y);
    let maxlag = schwert_maxlag(n);

    // Lag selection: every candidate sees the sample trimmed to maxlag so the
    // AIC values are comparable.
    let mut best: Option<(usize, f64)> = None;
    for k in 0..=maxlag {
        let (x, resp) = build_design(&y, &dy, maxlag, k);
        let Some(fit) = fit_ols(&x, &resp) else {
            continue;
        };
        let aic = fit.aic();
        if best.map(|(_, best_aic)| aic < best_aic).unwrap_or(true) {
            best = Some((k, aic));
        }
    }

    let Some((used_lag, _)) = best else {
        return Err(AppError::insufficient(
            "Series is degenerate (no usable ADF regression; is it constant?).",
        ));
    };

    // Refit the chosen lag on its own longest sample.
    let (x, resp) = build_design(&y, &dy, used_lag, used_lag);
    let fit = fit_ols(&x, &resp).ok_or_else(|| {
        AppError::insufficient("Series is degenerate (zero residual variance in ADF regression).")
    })?;

    let statistic = fit.t_value(0);
    if !statistic.is_finite() {
        return Err(AppError::insufficient(
            "ADF statistic is undefined for this series.",
        ));
    }

    Ok(StationarityResult {
        statistic,
        p_value: mackinnon_p(statistic),
        used_lag,
        n_obs: fit.n,
    })
}

/// Schwert's rule of thumb, capped so the regression keeps residual degrees
/// of freedom.
fn schwert_maxlag(n: usize) -> usize {
    let rule = (12.0 * (n as f64 / 100.0).powf(0.25)).ceil() as usize;
    rule.min((n / 2).saturating_sub(2))
}

/// Design matrix for the augmented regression at lag `k`.
///
/// `offset` fixes the first usable index into the differenced series; lag
/// selection passes `maxlag` for all candidates, the final fit passes `k`.
/// Columns: lagged level, then `k` lagged differences, then the constant.
fn build_design(y: &[f64], dy: &[f64], offset: usize, k: usize) -> (DMatrix<f64>, DVector<f64>) {
    debug_assert!(offset >= k);
    let rows = dy.len() - offset;
    let cols = k + 2;

    let x = DMatrix::from_fn(rows, cols, |i, j| {
        let t = offset + i;
        if j == 0 {
            y[t]
        } else if j <= k {
            dy[t - j]
        } else {
            1.0
        }
    });
    let resp = DVector::from_fn(rows, |i, _| dy[offset + i]);

    (x, resp)
}

/// MacKinnon approximate p-value for the constant-only regression.
fn mackinnon_p(tau: f64) -> f64 {
    if tau > TAU_MAX {
        return 1.0;
    }
    if tau < TAU_MIN {
        return 0.0;
    }
    let z = if tau <= TAU_STAR {
        polyval(&TAU_SMALLP, tau)
    } else {
        polyval(&TAU_LARGEP, tau)
    };
    norm_cdf(z)
}

fn polyval(coefs: &[f64], x: f64) -> f64 {
    coefs
        .iter()
        .rev()
        .fold(0.0, |acc, &c| acc * x + c)
}

fn norm_cdf(z: f64) -> f64 {
    0.5 * (1.0 + erf(z / std::f64::consts::SQRT_2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mackinnon_clamps_extreme_statistics() {
        assert_eq!(mackinnon_p(3.0), 1.0);
        assert_eq!(mackinnon_p(-20.0), 0.0);
    }

    #[test]
    fn mackinnon_matches_published_surface() {
        // Small-p branch: tau = -3 -> Φ(2.1659 - 3·1.4412 + 9·0.038269) ≈ 0.0349.
        let p = mackinnon_p(-3.0);
        assert!((p - 0.0349).abs() < 1e-3, "got {p}");

        // Large-p branch: tau = -1 -> Φ(0.68481) ≈ 0.7533.
        let p = mackinnon_p(-1.0);
        assert!((p - 0.7533).abs() < 2e-3, "got {p}");

        // Monotone in tau.
        assert!(mackinnon_p(-4.0) < mackinnon_p(-3.0));
        assert!(mackinnon_p(-3.0) < mackinnon_p(-1.0));
    }

    #[test]
    fn mean_reverting_series_reads_stationary() {
        // Strong alternation with a deterministic wobble so residuals are
        // nonzero; γ is near -2 and the t-ratio is far into the left tail.
        let y: Vec<f64> = (0..60)
            .map(|t| {
                let sign = if t % 2 == 0 { 1.0 } else { -1.0 };
                sign * (1.0 + 0.1 * (t as f64).sin())
            })
            .collect();

        let result = adf_test(&y).unwrap();
        assert!(result.statistic < -5.0, "statistic {}", result.statistic);
        assert!(result.is_stationary());
        assert!(result.n_obs > 0);
        assert!(result.used_lag <= schwert_maxlag(y.len()));
    }

    #[test]
    fn growing_series_reads_non_stationary() {
        // Exponential growth: the level coefficient is positive, far from the
        // rejection region.
        let y: Vec<f64> = (0..80)
            .map(|t| 1.02_f64.powi(t) * (1.0 + 0.05 * (t as f64).sin()))
            .collect();

        let result = adf_test(&y).unwrap();
        assert!(!result.is_stationary());
        assert!(result.p_value > 0.5, "p-value {}", result.p_value);
    }

    #[test]
    fn non_finite_values_are_dropped_before_testing() {
        let mut y: Vec<f64> = (0..60)
            .map(|t| {
                let sign = if t % 2 == 0 { 1.0 } else { -1.0 };
                sign * (1.0 + 0.1 * (t as f64).sin())
            })
            .collect();
        let clean = adf_test(&y).unwrap();

        y.insert(0, f64::NAN);
        let padded = adf_test(&y).unwrap();
        assert_eq!(clean, padded);
    }

    #[test]
    fn degenerate_series_is_an_insufficient_data_error() {
        let constant = [5.0; 40];
        let err = adf_test(&constant).unwrap_err();
        assert_eq!(err.exit_code(), 3);

        let short = [1.0, 2.0, 3.0];
        let err = adf_test(&short).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}
