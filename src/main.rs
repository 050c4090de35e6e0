//! Binary entry point for wallbox-report.
//!
//! Parses arguments, runs the report pipeline,
//! and maps failures to the documented process exit codes.

use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use colored::Colorize;

use wallbox_report::config::{Config, ReportArgs};
use wallbox_report::error::ReportError;

#[tokio::main]
async fn main() -> ExitCode {
    let args = ReportArgs::parse();

    // Handle shell completion generation
    if let Some(shell) = args.completion {
        clap_complete::generate(
            shell,
            &mut ReportArgs::command(),
            env!("CARGO_BIN_NAME"),
            &mut std::io::stdout(),
        );
        return ExitCode::SUCCESS;
    }

    match generate_report(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{}", format!("Error: {error}").red());
            ExitCode::from(error.exit_code())
        }
    }
}

async fn generate_report(args: &ReportArgs) -> Result<(), ReportError> {
    let config = Config::try_from_args(args)?;
    wallbox_report::run(&config).await
}
