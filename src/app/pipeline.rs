//! Shared analysis pipeline used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! select series -> stationarity checks -> ARIMA fit -> forecast dates
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).
//! The dataset is assembled separately and passed in by reference, so
//! re-running a selection never refetches.

use crate::domain::{
    AnalysisConfig, CombinedDataset, ForecastResult, SelectedSeries, StationarityResult,
};
use crate::error::AppError;
use crate::forecast::arima::fit_arima;
use crate::forecast::calendar::business_days_after;
use crate::stats::adf_test;

/// All computed outputs of one stock selection.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub series: SelectedSeries,
    pub close_check: StationarityResult,
    pub diff_check: StationarityResult,
    pub forecast: ForecastResult,
}

/// Execute the analysis for one stock selection.
///
/// Both stationarity checks always run; neither verdict gates the forecast.
pub fn run_analysis(
    dataset: &CombinedDataset,
    config: &AnalysisConfig,
) -> Result<RunOutput, AppError> {
    let series = dataset.select(&config.stock)?;

    let close_check = adf_test(&series.close)?;
    let diff_check = adf_test(&series.close_diff)?;

    let fit = fit_arima(&series.close, config.order)?;
    let values = fit.forecast(config.steps);

    let last = series
        .last_date()
        .ok_or_else(|| AppError::insufficient("Selected series has no observations."))?;
    let dates = business_days_after(last, config.steps);

    let forecast = ForecastResult {
        dates,
        values,
        coefficients: fit.coefficients().to_vec(),
        order: fit.order(),
    };

    Ok(RunOutput {
        series,
        close_check,
        diff_check,
        forecast,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CombinedDataset, PricePoint, PriceTable};
    use crate::forecast::calendar::is_business_day;
    use chrono::NaiveDate;

    /// A dataset with one instrument and a wobbly upward drift, long enough
    /// for the (5,1,0) fit.
    fn dataset(name: &str, days: usize) -> CombinedDataset {
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let dates = business_days_after(start, days);
        let points: Vec<PricePoint> = dates
            .iter()
            .enumerate()
            .map(|(t, &date)| {
                let close = 100.0 + t as f64 * 0.3 + 5.0 * (t as f64 * 0.7).sin();
                PricePoint {
                    date,
                    open: close - 0.5,
                    high: close + 1.0,
                    low: close - 1.0,
                    close,
                    volume: 10_000,
                }
            })
            .collect();

        CombinedDataset::from_tables(vec![PriceTable {
            stock: name.to_string(),
            ticker: "7974.T".to_string(),
            points,
        }])
    }

    #[test]
    fn end_to_end_selection_produces_ten_forecast_rows() {
        let dataset = dataset("Nintendo_Co_Ltd", 60);
        let config = AnalysisConfig::for_stock("Nintendo_Co_Ltd");

        let run = run_analysis(&dataset, &config).unwrap();

        assert_eq!(run.forecast.dates.len(), 10);
        assert_eq!(run.forecast.values.len(), 10);

        let last = run.series.last_date().unwrap();
        assert!(run.forecast.dates.iter().all(|d| *d > last));
        assert!(run.forecast.dates.iter().all(|d| is_business_day(*d)));
        assert!(run.forecast.values.iter().all(|v| v.is_finite()));

        // Both checks ran and reported a p-value.
        assert!((0.0..=1.0).contains(&run.close_check.p_value));
        assert!((0.0..=1.0).contains(&run.diff_check.p_value));
    }

    #[test]
    fn rerun_is_idempotent() {
        let dataset = dataset("Sony", 45);
        let config = AnalysisConfig::for_stock("Sony");

        let a = run_analysis(&dataset, &config).unwrap();
        let b = run_analysis(&dataset, &config).unwrap();

        assert_eq!(a.forecast.values, b.forecast.values);
        assert_eq!(a.forecast.dates, b.forecast.dates);
        assert_eq!(a.close_check, b.close_check);
    }

    #[test]
    fn too_short_series_halts_with_insufficient_data() {
        let dataset = dataset("Sony", 5);
        let config = AnalysisConfig::for_stock("Sony");

        let err = run_analysis(&dataset, &config).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn unknown_stock_is_rejected() {
        let dataset = dataset("Sony", 40);
        let config = AnalysisConfig::for_stock("Hitachi");
        assert_eq!(run_analysis(&dataset, &config).unwrap_err().exit_code(), 2);
    }
}
