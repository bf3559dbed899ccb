//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - assembles the dataset (ten sequential fetches)
//! - resolves the stock selection
//! - runs the stationarity checks and the forecast
//! - prints reports/plots
//! - writes optional exports

use clap::Parser;

use crate::cli::{Command, ForecastArgs};
use crate::data::{fetch_dataset, YahooClient};
use crate::domain::{AnalysisConfig, CombinedDataset, DEFAULT_ORDER};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `kabu` binary.
pub fn run() -> Result<(), AppError> {
    // We want `kabu` and `kabu -s Sony` to behave like `kabu tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing. This preserves a clean clap structure while
    // retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Forecast(args) => handle_forecast(args),
        Command::Stocks => handle_stocks(),
        Command::Tui(args) => crate::tui::run(args),
    }
}

fn handle_forecast(args: ForecastArgs) -> Result<(), AppError> {
    let dataset = download_dataset()?;

    let stock = resolve_stock(&args, &dataset)?;
    let config = AnalysisConfig {
        stock,
        steps: args.steps,
        order: DEFAULT_ORDER,
    };

    let run = pipeline::run_analysis(&dataset, &config)?;

    println!("{}", crate::report::format_run_summary(&run.series, &run.forecast));
    println!("{}", crate::report::format_stationarity("Close Price", &run.close_check));
    println!(
        "{}",
        crate::report::format_stationarity("Differenced Close Price", &run.diff_check)
    );
    println!("{}", crate::report::format_forecast_table(&run.forecast));

    if args.plot && !args.no_plot {
        let plot =
            crate::plot::render_ascii_plot(&run.series, &run.forecast, args.width, args.height);
        println!("{plot}");
    }

    if let Some(path) = &args.export {
        crate::io::export::write_forecast_csv(path, &run.forecast)?;
        println!("Wrote forecast CSV: {}", path.display());
    }

    Ok(())
}

fn handle_stocks() -> Result<(), AppError> {
    println!("{:<10} {}", "ticker", "name");
    for (ticker, name) in crate::data::STOCKS {
        println!("{ticker:<10} {name}");
    }
    Ok(())
}

/// Fetch all ten instruments with a terminal waiting indicator.
pub fn download_dataset() -> Result<CombinedDataset, AppError> {
    let client = YahooClient::new()?;
    println!("Downloading stock data...");
    let dataset = fetch_dataset(&client, |i, name| {
        println!("  [{i:>2}/{}] {name}", crate::data::STOCKS.len());
    })?;
    Ok(dataset)
}

/// Resolve the stock choice: flag if given (validated against the dataset),
/// otherwise the interactive picker.
fn resolve_stock(args: &ForecastArgs, dataset: &CombinedDataset) -> Result<String, AppError> {
    let names = dataset.stock_names();
    match &args.stock {
        Some(stock) => {
            if names.iter().any(|n| n == stock) {
                Ok(stock.clone())
            } else {
                Err(AppError::usage(format!(
                    "Unknown stock '{stock}'. Run `kabu stocks` for the configured names."
                )))
            }
        }
        None => crate::cli::picker::prompt_for_stock(&names),
    }
}

/// Rewrite argv so `kabu` defaults to `kabu tui`.
///
/// Rules:
/// - `kabu`                    -> `kabu tui`
/// - `kabu -s Sony ...`        -> `kabu tui -s Sony ...`
/// - `kabu --help/--version`   -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "forecast" | "stocks" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_tui() {
        assert_eq!(rewrite_args(args(&["kabu"])), args(&["kabu", "tui"]));
        assert_eq!(
            rewrite_args(args(&["kabu", "-s", "Sony"])),
            args(&["kabu", "tui", "-s", "Sony"])
        );
    }

    #[test]
    fn subcommands_and_help_pass_through() {
        assert_eq!(
            rewrite_args(args(&["kabu", "forecast", "-s", "Sony"])),
            args(&["kabu", "forecast", "-s", "Sony"])
        );
        assert_eq!(rewrite_args(args(&["kabu", "--help"])), args(&["kabu", "--help"]));
        assert_eq!(rewrite_args(args(&["kabu", "stocks"])), args(&["kabu", "stocks"]));
    }
}
