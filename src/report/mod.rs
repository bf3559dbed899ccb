//! Reporting utilities: formatted terminal output for analysis results.
//!
//! We keep formatting code in one place so:
//! - the statistics/forecasting code stays clean and testable
//! - output changes are localized (important for golden tests)

mod format;

pub use format::{format_forecast_table, format_run_summary, format_stationarity};
