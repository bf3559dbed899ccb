//! Interactive stock picker.
//!
//! This is intentionally kept separate from clap parsing:
//! - clap handles structured flags/subcommands
//! - the picker provides the "run `kabu forecast` and choose a stock" UX
//!
//! The choices come from the assembled dataset, so only names that actually
//! have rows are offered.

use std::io::{self, Write};

use crate::error::AppError;

/// Prompt the user to select a stock from the given display names.
///
/// Behavior:
/// - list the configured names
/// - accept either a number (from the list) or an exact name
/// - `q` cancels
pub fn prompt_for_stock(names: &[String]) -> Result<String, AppError> {
    if names.is_empty() {
        return Err(AppError::data("No stocks available for selection."));
    }

    println!("Available stocks:");
    for (idx, name) in names.iter().enumerate() {
        println!("{:>3}) {name}", idx + 1);
    }

    loop {
        print!(
            "Select a stock by number (1-{}) or name (q to quit): ",
            names.len()
        );
        io::stdout()
            .flush()
            .map_err(|e| AppError::usage(format!("Failed to write prompt: {e}")))?;

        let mut input = String::new();
        let bytes = io::stdin()
            .read_line(&mut input)
            .map_err(|e| AppError::usage(format!("Failed to read input: {e}")))?;

        if bytes == 0 {
            return Err(AppError::usage(
                "No input received. Provide a stock with `kabu forecast -s <NAME>`.",
            ));
        }

        let input = input.trim();
        if input.eq_ignore_ascii_case("q") {
            return Err(AppError::usage("Canceled."));
        }

        if let Ok(choice) = input.parse::<usize>() {
            if (1..=names.len()).contains(&choice) {
                return Ok(names[choice - 1].clone());
            }
            println!(
                "Invalid choice: {choice}. Enter a number between 1 and {}.",
                names.len()
            );
            continue;
        }

        if let Some(name) = names.iter().find(|n| n.as_str() == input) {
            return Ok(name.clone());
        }
        println!("Unknown stock '{input}'. Pick one of the listed names.");
    }
}
