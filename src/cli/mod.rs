//! Command-line parsing for the forecasting dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the data/statistics code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod picker;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "kabu", version, about = "Japan stock forecasting dashboard (ARIMA model)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch data, run the stationarity checks and the forecast, print the results.
    Forecast(ForecastArgs),
    /// Print the configured (ticker, display name) table.
    Stocks,
    /// Launch the interactive TUI dashboard.
    ///
    /// This uses the same underlying analysis pipeline as `kabu forecast`, but
    /// renders results in a terminal UI using Ratatui.
    Tui(ForecastArgs),
}

/// Common options for the one-shot run and the TUI.
#[derive(Debug, Parser, Clone)]
pub struct ForecastArgs {
    /// Stock display name (see `kabu stocks`). When omitted, `forecast`
    /// prompts for a selection.
    #[arg(short = 's', long)]
    pub stock: Option<String>,

    /// Forecast horizon in business days.
    #[arg(long, default_value_t = 10)]
    pub steps: usize,

    /// Render an ASCII plot in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Export forecast rows to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,
}
