//! Text rendering of the run summary, ADF panels, and forecast table.

use crate::domain::{ForecastResult, SelectedSeries, StationarityResult};

/// Format the run header: selection, observation window, model order.
pub fn format_run_summary(series: &SelectedSeries, forecast: &ForecastResult) -> String {
    let mut out = String::new();

    out.push_str("=== kabu - Japan Stock ARIMA Forecast ===\n");
    out.push_str(&format!("Stock: {}\n", series.stock));

    match (series.dates.first(), series.dates.last()) {
        (Some(first), Some(last)) => {
            out.push_str(&format!(
                "Window: {first} -> {last} | n={} observations\n",
                series.len()
            ));
        }
        _ => out.push_str("Window: (empty)\n"),
    }

    out.push_str(&format!("Model: ARIMA{}\n", forecast.order));
    out.push_str(&format!(
        "Coefficients: {}\n",
        fmt_vec(&forecast.coefficients)
    ));
    if let Some(first) = forecast.dates.first() {
        out.push_str(&format!(
            "Forecast: {} business days from {first}\n",
            forecast.dates.len()
        ));
    }
    out.push('\n');

    out
}

/// Format one stationarity panel.
pub fn format_stationarity(title: &str, result: &StationarityResult) -> String {
    let mut out = String::new();

    out.push_str(&format!("ADF Test: {title}\n"));
    out.push_str(&format!("ADF Statistic: {:.6}\n", result.statistic));
    out.push_str(&format!("P-value: {:.6}\n", result.p_value));
    out.push_str(&format!(
        "Lag order: {} | n={}\n",
        result.used_lag, result.n_obs
    ));
    if result.is_stationary() {
        out.push_str("✔ The series is stationary.\n");
    } else {
        out.push_str("✖ The series is NOT stationary.\n");
    }

    out
}

/// Format the (date, forecast) table.
pub fn format_forecast_table(forecast: &ForecastResult) -> String {
    let mut out = String::new();

    out.push_str("Forecasted values:\n");
    out.push_str(&format!("{:<12} {:>12}\n", "date", "forecast"));
    out.push_str(&format!("{:-<12} {:-<12}\n", "", ""));
    for (date, value) in forecast.rows() {
        out.push_str(&format!("{:<12} {:>12.2}\n", date.to_string(), value));
    }

    out
}

fn fmt_vec(v: &[f64]) -> String {
    let parts: Vec<String> = v.iter().map(|x| format!("{x:.6}")).collect();
    format!("[{}]", parts.join(", "))
}
