//! ARIMA(p, d, 0) estimation by conditional least squares.
//!
//! The pipeline fixes the order at (5, 1, 0): difference the price series
//! once, fit a 5-lag autoregression on the differences, forecast recursively,
//! and re-integrate the predictions back to price levels.
//!
//! Estimation detail:
//! - the AR coefficients solve the OLS problem of `w_t` on `w_{t-1..t-p}`
//!   over the `d`-times differenced series `w`
//! - no intercept when `d >= 1` (the differenced mean is absorbed by the
//!   integration constant), an intercept when `d = 0`
//! - no randomness anywhere: refitting the same series reproduces the same
//!   coefficients and forecasts exactly
//!
//! Moving-average terms would need an iterative innovations estimator; `q`
//! must be 0 here.

use nalgebra::{DMatrix, DVector};

use crate::domain::ArimaOrder;
use crate::error::AppError;
use crate::math::ols::solve_least_squares;
use crate::math::series::{difference, difference_n};

/// A fitted model, ready to forecast.
#[derive(Debug, Clone)]
pub struct ArimaFit {
    order: ArimaOrder,
    /// AR coefficients, lag 1 first.
    coefficients: Vec<f64>,
    /// Zero when `d >= 1`.
    intercept: f64,
    /// Last `p` values of the differenced series, oldest first.
    diff_tail: Vec<f64>,
    /// Last observed value at each integration level (level 0 = prices).
    level_tails: Vec<f64>,
}

/// Fit an ARIMA(p, d, 0) model to a price-level series.
pub fn fit_arima(series: &[f64], order: ArimaOrder) -> Result<ArimaFit, AppError> {
    if order.q != 0 {
        return Err(AppError::usage(format!(
            "Moving-average terms are not supported (got q = {}).",
            order.q
        )));
    }
    if series.iter().any(|v| !v.is_finite()) {
        return Err(AppError::insufficient(
            "Price series contains non-finite values.",
        ));
    }

    let ArimaOrder { p, d, .. } = order;
    let with_intercept = d == 0;
    let params = p + usize::from(with_intercept);

    let w = difference_n(series, d);
    let rows = w.len().saturating_sub(p);
    if rows < params.max(1) {
        return Err(AppError::insufficient(format!(
            "Model could not be fit: {} observations leave {rows} usable rows \
             for {params} AR parameters at order {order}.",
            series.len(),
        )));
    }

    let x = DMatrix::from_fn(rows, params, |i, j| {
        let t = p + i;
        if j < p {
            w[t - 1 - j]
        } else {
            1.0
        }
    });
    let resp = DVector::from_fn(rows, |i, _| w[p + i]);

    let beta = solve_least_squares(&x, &resp).ok_or_else(|| {
        AppError::model("Model could not be fit: AR system is singular or non-finite.")
    })?;

    let coefficients: Vec<f64> = beta.iter().copied().take(p).collect();
    let intercept = if with_intercept { beta[p] } else { 0.0 };

    // Retain what forecasting needs: the last p differences and, per
    // integration level, the last observed value.
    let mut level_tails = Vec::with_capacity(d);
    let mut cur = series.to_vec();
    for _ in 0..d {
        level_tails.push(cur[cur.len() - 1]);
        cur = difference(&cur);
    }
    let diff_tail = cur[cur.len() - p..].to_vec();

    Ok(ArimaFit {
        order,
        coefficients,
        intercept,
        diff_tail,
        level_tails,
    })
}

impl ArimaFit {
    pub fn order(&self) -> ArimaOrder {
        self.order
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Forecast `steps` price levels beyond the fitted sample.
    ///
    /// Predictions are made on the differenced scale and integrated back
    /// against the retained level tails.
    pub fn forecast(&self, steps: usize) -> Vec<f64> {
        let mut window = self.diff_tail.clone();
        let mut tails = self.level_tails.clone();
        let mut out = Vec::with_capacity(steps);

        for _ in 0..steps {
            let mut w_hat = self.intercept;
            for (i, phi) in self.coefficients.iter().enumerate() {
                w_hat += phi * window[window.len() - 1 - i];
            }

            let mut level = w_hat;
            for tail in tails.iter_mut().rev() {
                level += *tail;
                *tail = level;
            }
            out.push(level);

            if !window.is_empty() {
                window.remove(0);
                window.push(w_hat);
            }
        }

        out
    }
}
