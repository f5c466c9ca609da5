//! CLI Adapter
//!
//! Command-line interface for the spread scanner.
//! Uses clap derive macros for argument parsing.

mod commands;
mod output;

pub use commands::{CliApp, Command, AnalyzeCmd, ProfitCmd, PairsCmd, OutputFormat};
pub use output::{render_listings, render_pairs, render_profit_table, render_report};

use anyhow::Result;

/// Initialize the CLI application
pub fn init() -> CliApp {
    use clap::Parser;
    CliApp::parse()
}

/// Execute the CLI command
pub async fn execute(app: CliApp) -> Result<()> {
    commands::execute(app).await
}
