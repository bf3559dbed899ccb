//! Series transforms used by the stationarity test and the forecaster.

/// First difference: `x[t] - x[t-1]`, one element shorter than the input.
pub fn difference(xs: &[f64]) -> Vec<f64> {
    xs.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Apply [`difference`] `d` times.
pub fn difference_n(xs: &[f64], d: usize) -> Vec<f64> {
    let mut out = xs.to_vec();
    for _ in 0..d {
        out = difference(&out);
    }
    out
}

/// Drop NaN/infinite values, keeping order.
///
/// The stationarity checker accepts any numeric column, including derived
/// columns whose leading values are undefined.
pub fn drop_non_finite(xs: &[f64]) -> Vec<f64> {
    xs.iter().copied().filter(|v| v.is_finite()).collect()
}
