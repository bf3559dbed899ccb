//! Export forecast rows to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream
//! scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::ForecastResult;
use crate::error::AppError;

/// Write the (date, forecast) rows to a CSV file.
pub fn write_forecast_csv(path: &Path, forecast: &ForecastResult) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::usage(format!(
            "Failed to create export CSV '{}': {e}",
            path.display()
        ))
    })?;

    writeln!(file, "date,forecast")
        .map_err(|e| AppError::usage(format!("Failed to write export CSV header: {e}")))?;

    for (date, value) in forecast.rows() {
        writeln!(file, "{date},{value:.4}")
            .map_err(|e| AppError::usage(format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ArimaOrder;
    use chrono::NaiveDate;

    #[test]
    fn export_writes_header_and_rows() {
        let forecast = ForecastResult {
            dates: vec![
                NaiveDate::from_ymd_opt(2025, 11, 5).unwrap(),
                NaiveDate::from_ymd_opt(2025, 11, 6).unwrap(),
            ],
            values: vec![1234.5, 1236.25],
            coefficients: vec![0.1],
            order: ArimaOrder { p: 1, d: 1, q: 0 },
        };

        let path = std::env::temp_dir().join(format!("kabu-export-{}.csv", std::process::id()));
        write_forecast_csv(&path, &forecast).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "date,forecast");
        assert_eq!(lines[1], "2025-11-05,1234.5000");
        assert_eq!(lines[2], "2025-11-06,1236.2500");
        assert_eq!(lines.len(), 3);
    }
}
