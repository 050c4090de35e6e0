//! Configuration module for wallbox-report.
//!
//! Handles reading configuration from CLI arguments and the user config file.

use std::fs;
use std::path::PathBuf;
use std::sync::LazyLock;

use anyhow::{Context, Result, anyhow};
use chrono::{Datelike, Local};
use clap::Parser;
use clap_complete::Shell;
use serde::Deserialize;

use crate::date::ReportWindow;
use crate::error::ReportError;
use crate::report::Language;

/// Path to the user config file: `$HOME/.config/wallbox-report.toml`
///
/// Returns `None` if the home directory cannot be determined.
pub static CONFIG_PATH: LazyLock<Option<PathBuf>> = LazyLock::new(|| {
    let home_dir = dirs::home_dir()?;
    Some(home_dir.join(".config").join(concat!(env!("CARGO_PKG_NAME"), ".toml")))
});

/// Command line arguments for wallbox-report.
#[derive(Parser, Debug)]
#[command(
    version,
    name = "wallbox-report",
    about = "Export Wallbox charging sessions to a styled Excel report"
)]
pub struct ReportArgs {
    /// myWallbox account username
    #[arg(short, long, name = "USER", required_unless_present = "completion")]
    pub user: Option<String>,

    /// myWallbox account password
    #[arg(short, long, name = "PASSWORD", required_unless_present = "completion")]
    pub password: Option<String>,

    /// Charger ID to report on; required when the account has multiple chargers
    #[arg(short, long, name = "ID")]
    pub charger_id: Option<u64>,

    /// Month for the report (1-12), defaults to the current month
    #[arg(short, long, name = "MONTH")]
    pub month: Option<u32>,

    /// Year for the report, defaults to the current year
    #[arg(short, long, name = "YEAR")]
    pub year: Option<i32>,

    /// Report on the entire year instead of a single month
    #[arg(long)]
    pub full_year: bool,

    /// Output file name, defaults to YYYY-MM.xlsx or YYYY.xlsx
    #[arg(short, long, name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Append a summary with total energy, cost and savings
    #[arg(short, long)]
    pub summary: bool,

    /// Use Italian for table headings and summary labels
    #[arg(short, long, alias = "it")]
    pub italian: bool,

    /// Generate shell completion
    #[arg(short = 'l', long, value_name = "SHELL")]
    pub completion: Option<Shell>,

    /// Print verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// User configuration from the config file.
///
/// Credentials are deliberately absent: they are accepted on the command line only.
#[derive(Debug, Default, Deserialize)]
pub struct ReportUserConfig {
    /// Default charger ID to report on.
    #[serde(default)]
    pub charger_id: Option<u64>,
    /// Append the totals summary by default.
    #[serde(default)]
    pub summary: bool,
    /// Use Italian labels by default.
    #[serde(default)]
    pub italian: bool,
    /// Print verbose output by default.
    #[serde(default)]
    pub verbose: bool,
}

/// Wrapper needed for parsing the config file section.
#[derive(Debug, Default, Deserialize)]
struct UserConfig {
    #[serde(default)]
    report: ReportUserConfig,
}

impl ReportUserConfig {
    /// Try to read user config from the file if it exists.
    /// Otherwise, fall back to default config.
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be read or parsed.
    pub fn get_user_config() -> Result<Self> {
        let Some(path) = CONFIG_PATH.as_deref() else {
            return Ok(Self::default());
        };

        match fs::read_to_string(path) {
            Ok(content) => Self::from_toml_str(&content)
                .map_err(|e| anyhow!("Failed to parse config file {}:\n{e}", path.display())),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(error) => Err(anyhow!("Failed to read config file {}: {error}", path.display())),
        }
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    /// Returns an error if the TOML string is invalid.
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        toml::from_str::<UserConfig>(toml_str)
            .map(|config| config.report)
            .map_err(|e| anyhow!("Failed to parse config: {e}"))
    }
}

/// Final config combined from CLI arguments and user config file.
#[derive(Debug)]
pub struct Config {
    /// myWallbox account username.
    pub user: String,
    /// myWallbox account password.
    pub password: String,
    /// Requested charger ID, if any.
    pub charger_id: Option<u64>,
    /// Time interval the report covers.
    pub window: ReportWindow,
    /// Path for the generated report file.
    pub output_path: PathBuf,
    /// Append the totals summary block.
    pub summary: bool,
    /// Display language for headings and labels.
    pub language: Language,
    /// Print verbose output.
    pub verbose: bool,
}

impl Config {
    /// Create config from given command line args and user config file.
    ///
    /// # Errors
    /// Returns `ReportError::InvalidMonth` (exit code 3) for a month outside 1-12,
    /// or a generic error when the config file or window is invalid.
    pub fn try_from_args(args: &ReportArgs) -> Result<Self, ReportError> {
        Self::from_args_and_config(args, &ReportUserConfig::get_user_config()?)
    }

    /// Create config from given command line args and explicit user config.
    /// This is useful for testing without reading from the config file.
    ///
    /// # Errors
    /// Returns `ReportError::InvalidMonth` (exit code 3) for a month outside 1-12,
    /// or a generic error when credentials are missing or the window is invalid.
    pub fn from_args_and_config(args: &ReportArgs, user_config: &ReportUserConfig) -> Result<Self, ReportError> {
        let user = args
            .user
            .clone()
            .context("Username is required")
            .map_err(ReportError::Other)?;
        let password = args
            .password
            .clone()
            .context("Password is required")
            .map_err(ReportError::Other)?;

        let today = Local::now();
        let month = args.month.unwrap_or_else(|| today.month());
        if !(1..=12).contains(&month) {
            return Err(ReportError::InvalidMonth(month));
        }
        let year = args.year.unwrap_or_else(|| today.year());

        let window = if args.full_year {
            ReportWindow::for_year(year)?
        } else {
            ReportWindow::for_month(year, month)?
        };

        let output_path = args
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(default_output_name(year, month, args.full_year)));

        // CLI args take priority over user config
        let charger_id = args.charger_id.or(user_config.charger_id);
        let summary = args.summary || user_config.summary;
        let italian = args.italian || user_config.italian;
        let verbose = args.verbose || user_config.verbose;

        Ok(Self {
            user,
            password,
            charger_id,
            window,
            output_path,
            summary,
            language: if italian { Language::Italian } else { Language::English },
            verbose,
        })
    }
}

/// Default report file name: `{year}-{month:02}.xlsx`, or `{year}.xlsx` for a full year.
#[must_use]
pub fn default_output_name(year: i32, month: u32, full_year: bool) -> String {
    if full_year {
        format!("{year}.xlsx")
    } else {
        format!("{year}-{month:02}.xlsx")
    }
}
