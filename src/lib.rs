//! wallbox-report - Export Wallbox charging sessions to an Excel report.
//!
//! Authenticates to the myWallbox cloud API, fetches the charging sessions
//! for a charger over a single month or a full year,
//! and writes them to a styled Excel spreadsheet,
//! optionally with a totals summary and Italian labels.

pub mod config;
pub mod date;
pub mod error;
pub mod excel;
pub mod report;
pub mod wallbox;

use colored::Colorize;

use crate::config::Config;
use crate::error::ReportError;
use crate::report::ReportTable;
use crate::wallbox::WallboxClient;

/// Run the full report pipeline:
/// authenticate, resolve the charger, fetch sessions, write the report.
///
/// # Errors
/// Returns a `ReportError` carrying the exit code for the failure class.
pub async fn run(config: &Config) -> Result<(), ReportError> {
    let mut client = WallboxClient::new();
    client.authenticate(&config.user, &config.password).await?;
    if config.verbose {
        println!("Authenticated as {}", config.user.bold());
    }

    let inventory = client.charger_inventory().await?;
    let charger_id = inventory.resolve(config.charger_id)?;
    if config.verbose {
        println!(
            "Fetching sessions for charger {} from {} to {}",
            charger_id.to_string().cyan(),
            config.window.start.format("%d/%m/%Y %H:%M:%S"),
            config.window.end.format("%d/%m/%Y %H:%M:%S")
        );
    }

    let sessions = client.fetch_sessions(charger_id, &config.window).await?;
    if config.verbose {
        println!("Found {} sessions", sessions.len().to_string().cyan());
    }

    let table = ReportTable::build(&sessions, config.language, config.summary);
    excel::write_report(&table, &config.output_path)?;
    println!(
        "{}",
        format!("Wrote report to {}", config.output_path.display()).green()
    );
    Ok(())
}
