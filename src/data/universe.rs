//! The fixed instrument universe and dataset assembly.

use chrono::NaiveDate;

use crate::data::yahoo::YahooClient;
use crate::domain::CombinedDataset;
use crate::error::AppError;

/// The ten Japan-listed instruments, as (ticker, display name), in the order
/// they are fetched and listed for selection.
pub const STOCKS: [(&str, &str); 10] = [
    ("6758.T", "Sony"),
    ("6501.T", "Hitachi"),
    ("9984.T", "SoftBank_Group_Corp"),
    ("8035.T", "Tokyo_Electron_Ltd"),
    ("7203.T", "Toyota_Motor_Corp"),
    ("6857.T", "Advantest_Group"),
    ("8316.T", "Sumitomo_Mitsui_Financial_Group_Inc"),
    ("9983.T", "Fast_Retailing_Co_Ltd"),
    ("8306.T", "Mitsubishi_UFJ_Financial_Group_Inc"),
    ("7974.T", "Nintendo_Co_Ltd"),
];

/// Start of the fetch window (inclusive).
pub fn range_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid calendar date")
}

/// End of the fetch window (exclusive).
pub fn range_end() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 11, 5).expect("valid calendar date")
}

/// Fetch all configured instruments sequentially and stack them into one
/// dataset.
///
/// `progress` is called before each fetch with the 1-based position and the
/// display name, so front-ends can show a waiting indicator. A failed fetch
/// aborts the whole assembly; a partially assembled dataset would silently
/// break the ten-name selection invariant.
pub fn fetch_dataset(
    client: &YahooClient,
    mut progress: impl FnMut(usize, &str),
) -> Result<CombinedDataset, AppError> {
    let mut tables = Vec::with_capacity(STOCKS.len());
    for (i, &(ticker, name)) in STOCKS.iter().enumerate() {
        progress(i + 1, name);
        tables.push(client.load_stock(ticker, name, range_start(), range_end())?);
    }
    Ok(CombinedDataset::from_tables(tables))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn universe_has_exactly_ten_unique_entries() {
        assert_eq!(STOCKS.len(), 10);

        let names: Vec<&str> = STOCKS.iter().map(|&(_, n)| n).collect();
        for (i, name) in names.iter().enumerate() {
            assert!(!names[..i].contains(name), "duplicate name {name}");
        }

        let tickers: Vec<&str> = STOCKS.iter().map(|&(t, _)| t).collect();
        assert!(tickers.iter().all(|t| t.ends_with(".T")));
    }

    #[test]
    fn expected_names_are_configured() {
        let names: Vec<&str> = STOCKS.iter().map(|&(_, n)| n).collect();
        assert_eq!(names[0], "Sony");
        assert!(names.contains(&"Nintendo_Co_Ltd"));
        assert!(names.contains(&"Toyota_Motor_Corp"));
        assert!(!names.contains(&"sony"));
    }

    #[test]
    fn fetch_window_is_the_fixed_2025_range() {
        assert_eq!(range_start(), NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(range_end(), NaiveDate::from_ymd_opt(2025, 11, 5).unwrap());
        assert!(range_start() < range_end());
    }
}
