//! Yahoo Finance chart API integration.
//!
//! Yahoo has no official API; the v8 chart endpoint returns daily OHLCV bars
//! as parallel arrays with per-slot nulls for non-trading days, wrapped in
//! provider metadata that we flatten into plain [`PricePoint`] rows.

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::domain::{PricePoint, PriceTable};
use crate::error::AppError;

const BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// Yahoo rejects reqwest's default user agent.
const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:120.0) Gecko/20100101 Firefox/120.0";

/// Chart API response envelope.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<u64>>,
}

pub struct YahooClient {
    client: Client,
}

impl YahooClient {
    pub fn new() -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AppError::data(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Download daily history for `ticker` over `[start, end)` and tag every
    /// row with the display name.
    pub fn load_stock(
        &self,
        ticker: &str,
        stock: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceTable, AppError> {
        let url = chart_url(ticker, start, end);

        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| AppError::data(format!("Request for {ticker} failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::data(format!(
                "Request for {ticker} failed with status {}.",
                resp.status()
            )));
        }

        let body: ChartResponse = resp
            .json()
            .map_err(|e| AppError::data(format!("Failed to parse chart response for {ticker}: {e}")))?;

        let points = parse_chart(ticker, start, end, body)?;
        Ok(PriceTable {
            stock: stock.to_string(),
            ticker: ticker.to_string(),
            points,
        })
    }
}

/// `period2` is the exclusive end of the window at midnight UTC, matching the
/// fixed `[start, end)` date range.
fn chart_url(ticker: &str, start: NaiveDate, end: NaiveDate) -> String {
    let period1 = start
        .and_hms_opt(0, 0, 0)
        .expect("midnight is valid")
        .and_utc()
        .timestamp();
    let period2 = end
        .and_hms_opt(0, 0, 0)
        .expect("midnight is valid")
        .and_utc()
        .timestamp();
    format!("{BASE_URL}/{ticker}?period1={period1}&period2={period2}&interval=1d")
}

/// Flatten the chart envelope into rows within `[start, end)`.
///
/// Slots where every OHLCV field is null (holidays) are skipped.
fn parse_chart(
    ticker: &str,
    start: NaiveDate,
    end: NaiveDate,
    resp: ChartResponse,
) -> Result<Vec<PricePoint>, AppError> {
    let result = resp.chart.result.ok_or_else(|| {
        if let Some(err) = resp.chart.error {
            AppError::data(format!(
                "No data available for {ticker}: {} ({}).",
                err.description, err.code
            ))
        } else {
            AppError::data(format!("No data available for {ticker}: empty chart result."))
        }
    })?;

    let data = result
        .into_iter()
        .next()
        .ok_or_else(|| AppError::data(format!("No data available for {ticker}: empty result array.")))?;

    let timestamps = data
        .timestamp
        .ok_or_else(|| AppError::data(format!("No data available for {ticker}: no timestamps.")))?;

    let quote = data
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| AppError::data(format!("No data available for {ticker}: no quote data.")))?;

    let mut points = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        let date = chrono::DateTime::from_timestamp(ts, 0)
            .map(|dt| dt.naive_utc().date())
            .ok_or_else(|| AppError::data(format!("Invalid timestamp {ts} for {ticker}.")))?;

        if date < start || date >= end {
            continue;
        }

        let open = quote.open.get(i).copied().flatten();
        let high = quote.high.get(i).copied().flatten();
        let low = quote.low.get(i).copied().flatten();
        let close = quote.close.get(i).copied().flatten();
        let volume = quote.volume.get(i).copied().flatten();

        let (Some(open), Some(high), Some(low), Some(close)) = (open, high, low, close) else {
            continue;
        };

        points.push(PricePoint {
            date,
            open,
            high,
            low,
            close,
            volume: volume.unwrap_or(0),
        });
    }

    if points.is_empty() {
        return Err(AppError::data(format!(
            "No data available for {ticker} in the configured date range."
        )));
    }

    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn fixture(json: &str) -> ChartResponse {
        serde_json::from_str(json).unwrap()
    }

    // 2025-01-06, 2025-01-07, 2025-11-05 at 00:00 UTC.
    const THREE_DAYS: &str = r#"{
        "chart": {
            "result": [{
                "timestamp": [1736121600, 1736208000, 1762300800],
                "indicators": {
                    "quote": [{
                        "open":   [100.0, null, 130.0],
                        "high":   [105.0, null, 135.0],
                        "low":    [ 99.0, null, 129.0],
                        "close":  [104.0, null, 134.0],
                        "volume": [5000,  null, 7000]
                    }]
                }
            }],
            "error": null
        }
    }"#;

    #[test]
    fn parse_keeps_rows_in_range_and_skips_null_slots() {
        let start = date(2025, 1, 1);
        let end = date(2025, 11, 5);

        let points = parse_chart("6758.T", start, end, fixture(THREE_DAYS)).unwrap();
        // The null slot is dropped; 2025-11-05 is outside the half-open range.
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].date, date(2025, 1, 6));
        assert_eq!(points[0].close, 104.0);
        assert_eq!(points[0].volume, 5000);
        assert!(points.iter().all(|p| p.date >= start && p.date < end));
    }

    #[test]
    fn tagged_table_applies_display_name_to_every_row() {
        let start = date(2025, 1, 1);
        let end = date(2025, 12, 31);
        let points = parse_chart("6758.T", start, end, fixture(THREE_DAYS)).unwrap();

        let table = PriceTable {
            stock: "Sony".to_string(),
            ticker: "6758.T".to_string(),
            points,
        };
        assert_eq!(table.stock, "Sony");
        assert_eq!(table.points.len(), 2);
    }

    #[test]
    fn provider_error_payload_is_a_data_error() {
        let json = r#"{
            "chart": {
                "result": null,
                "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}
            }
        }"#;
        let err = parse_chart("0000.T", date(2025, 1, 1), date(2025, 11, 5), fixture(json))
            .unwrap_err();
        assert_eq!(err.exit_code(), 4);
        assert!(err.to_string().contains("No data available for 0000.T"));
    }

    #[test]
    fn all_rows_filtered_out_is_a_data_error() {
        let err = parse_chart("6758.T", date(2024, 1, 1), date(2024, 2, 1), fixture(THREE_DAYS))
            .unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn chart_url_uses_exclusive_end_at_midnight() {
        let url = chart_url("6758.T", date(2025, 1, 1), date(2025, 11, 5));
        assert!(url.contains("period1=1735689600"));
        assert!(url.contains("period2=1762300800"));
        assert!(url.contains("interval=1d"));
    }
}
