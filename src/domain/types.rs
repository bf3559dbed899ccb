//! Core data types for the forecasting pipeline.
//!
//! These types are intentionally kept lightweight so they can be:
//!
//! - assembled once per run and passed by reference (no process-wide state)
//! - shared unchanged between the CLI and TUI front-ends
//! - constructed directly in tests without fixtures

use chrono::NaiveDate;

use crate::error::AppError;

/// Number of forward steps produced by the forecaster.
pub const FORECAST_STEPS: usize = 10;

/// Model order fixed by the pipeline: AR lag 5, one differencing pass, no MA terms.
pub const DEFAULT_ORDER: ArimaOrder = ArimaOrder { p: 5, d: 1, q: 0 };

/// ARIMA(p, d, q) order.
///
/// Only `q = 0` is estimable by the conditional least squares fit in
/// [`crate::forecast::arima`]; a non-zero `q` is rejected at fit time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArimaOrder {
    /// Autoregressive lag order.
    pub p: usize,
    /// Differencing degree.
    pub d: usize,
    /// Moving-average lag order.
    pub q: usize,
}

impl std::fmt::Display for ArimaOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.p, self.d, self.q)
    }
}

/// One trading day of one instrument, as returned by the data provider.
#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Ordered daily history for one instrument, tagged with its display name.
#[derive(Debug, Clone)]
pub struct PriceTable {
    /// Display name applied to every row ("Stock" tag).
    pub stock: String,
    /// Exchange ticker the rows were fetched for.
    pub ticker: String,
    /// Rows in ascending date order.
    pub points: Vec<PricePoint>,
}

/// One row of the combined dataset: a price point plus its instrument tag.
#[derive(Debug, Clone)]
pub struct DatasetRow {
    pub stock: String,
    pub point: PricePoint,
}

/// All instruments' rows stacked and ordered by date.
///
/// Built once per run by the dataset assembler and passed by reference to
/// whichever front-end drives selections; re-analysis never refetches.
#[derive(Debug, Clone)]
pub struct CombinedDataset {
    rows: Vec<DatasetRow>,
}

impl CombinedDataset {
    /// Stack per-instrument tables and order by date.
    ///
    /// The sort is stable, so rows sharing a date keep the configured
    /// instrument order.
    pub fn from_tables(tables: Vec<PriceTable>) -> Self {
        let mut rows = Vec::with_capacity(tables.iter().map(|t| t.points.len()).sum());
        for table in tables {
            for point in table.points {
                rows.push(DatasetRow {
                    stock: table.stock.clone(),
                    point,
                });
            }
        }
        rows.sort_by_key(|r| r.point.date);
        Self { rows }
    }

    pub fn rows(&self) -> &[DatasetRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct display names in order of first appearance.
    pub fn stock_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for row in &self.rows {
            if !names.iter().any(|n| n == &row.stock) {
                names.push(row.stock.clone());
            }
        }
        names
    }

    /// Extract the closing-price series for one display name, with derived
    /// percentage-return and first-difference columns.
    ///
    /// The first observation has no prior price, so its row is dropped and
    /// every remaining row holds defined values in all columns.
    pub fn select(&self, stock: &str) -> Result<SelectedSeries, AppError> {
        let mut dates = Vec::new();
        let mut close = Vec::new();
        for row in &self.rows {
            if row.stock == stock {
                dates.push(row.point.date);
                close.push(row.point.close);
            }
        }

        if close.is_empty() {
            return Err(AppError::usage(format!(
                "Unknown stock '{stock}'. Run `kabu stocks` for the configured names."
            )));
        }

        let returns: Vec<f64> = close
            .windows(2)
            .map(|w| (w[1] - w[0]) / w[0])
            .collect();
        let close_diff: Vec<f64> = close.windows(2).map(|w| w[1] - w[0]).collect();

        dates.remove(0);
        close.remove(0);

        Ok(SelectedSeries {
            stock: stock.to_string(),
            dates,
            close,
            returns,
            close_diff,
        })
    }
}

/// One instrument's closing-price series with derived columns.
///
/// Invariant: all four columns have the same length (one fewer row than the
/// raw close series, see [`CombinedDataset::select`]).
#[derive(Debug, Clone)]
pub struct SelectedSeries {
    pub stock: String,
    pub dates: Vec<NaiveDate>,
    pub close: Vec<f64>,
    /// Period-over-period percentage return.
    pub returns: Vec<f64>,
    /// First difference of the close price.
    pub close_diff: Vec<f64>,
}

impl SelectedSeries {
    pub fn len(&self) -> usize {
        self.close.len()
    }

    pub fn is_empty(&self) -> bool {
        self.close.is_empty()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }
}

/// Augmented Dickey-Fuller test output.
#[derive(Debug, Clone, PartialEq)]
pub struct StationarityResult {
    /// ADF t-statistic for the lagged level coefficient.
    pub statistic: f64,
    /// MacKinnon approximate p-value.
    pub p_value: f64,
    /// Augmenting lag order chosen by AIC.
    pub used_lag: usize,
    /// Observations entering the final regression.
    pub n_obs: usize,
}

impl StationarityResult {
    /// Verdict at the fixed 5% significance level.
    ///
    /// A p-value of exactly 0.05 reads as not stationary.
    pub fn is_stationary(&self) -> bool {
        self.p_value < 0.05
    }
}

/// Fixed-horizon forecast of price levels.
#[derive(Debug, Clone)]
pub struct ForecastResult {
    /// Future business days, strictly after the last observed date.
    pub dates: Vec<NaiveDate>,
    /// Forecast price levels, one per date.
    pub values: Vec<f64>,
    /// Fitted AR coefficients (lag 1 first).
    pub coefficients: Vec<f64>,
    /// Order the model was fit with.
    pub order: ArimaOrder,
}

impl ForecastResult {
    pub fn rows(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }
}

/// Knobs shared by the CLI and TUI front-ends.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub stock: String,
    pub steps: usize,
    pub order: ArimaOrder,
}

impl AnalysisConfig {
    pub fn for_stock(stock: impl Into<String>) -> Self {
        Self {
            stock: stock.into(),
            steps: FORECAST_STEPS,
            order: DEFAULT_ORDER,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(date: NaiveDate, close: f64) -> PricePoint {
        PricePoint {
            date,
            open: close,
            high: close,
            low: close,
            close,
            volume: 1000,
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    #[test]
    fn stack_orders_by_date_and_keeps_instrument_order_on_ties() {
        let a = PriceTable {
            stock: "Sony".to_string(),
            ticker: "6758.T".to_string(),
            points: vec![point(day(2), 10.0), point(day(3), 11.0)],
        };
        let b = PriceTable {
            stock: "Hitachi".to_string(),
            ticker: "6501.T".to_string(),
            points: vec![point(day(2), 20.0), point(day(4), 21.0)],
        };

        let dataset = CombinedDataset::from_tables(vec![a, b]);
        let stocks: Vec<&str> = dataset.rows().iter().map(|r| r.stock.as_str()).collect();
        assert_eq!(stocks, ["Sony", "Hitachi", "Sony", "Hitachi"]);
        assert_eq!(dataset.stock_names(), ["Sony", "Hitachi"]);
    }

    #[test]
    fn select_derives_returns_and_diff_and_drops_first_row() {
        let table = PriceTable {
            stock: "Sony".to_string(),
            ticker: "6758.T".to_string(),
            points: vec![
                point(day(2), 100.0),
                point(day(3), 110.0),
                point(day(6), 99.0),
            ],
        };
        let dataset = CombinedDataset::from_tables(vec![table]);

        let series = dataset.select("Sony").unwrap();
        // One fewer row than the raw close column.
        assert_eq!(series.len(), 2);
        assert_eq!(series.dates, vec![day(3), day(6)]);
        assert_eq!(series.close, vec![110.0, 99.0]);
        assert!((series.returns[0] - 0.10).abs() < 1e-12);
        assert!((series.returns[1] - (-0.1)).abs() < 1e-12);
        assert_eq!(series.close_diff, vec![10.0, -11.0]);
        assert!(series
            .returns
            .iter()
            .chain(&series.close_diff)
            .all(|v| v.is_finite()));
    }

    #[test]
    fn select_unknown_stock_is_a_usage_error() {
        let dataset = CombinedDataset::from_tables(vec![]);
        let err = dataset.select("Nintendo_Co_Ltd").unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn stationarity_verdict_boundary() {
        let mut result = StationarityResult {
            statistic: -2.0,
            p_value: 0.05,
            used_lag: 0,
            n_obs: 50,
        };
        assert!(!result.is_stationary());
        result.p_value = 0.049_999;
        assert!(result.is_stationary());
    }
}
