//! Error types for report generation.
//!
//! Each failure class maps to the process exit code the tool reports:
//! authentication failures exit with 1, charger resolution failures with 2,
//! and an invalid month with 3. Anything else (network, I/O, malformed
//! responses) exits with 1.

use thiserror::Error;

/// Errors that can abort a report run.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Authentication failed, please check your username and password.")]
    Authentication,

    #[error("The specified charger ID {0} does not exist in your account.")]
    UnknownCharger(u64),

    #[error(
        "Multiple chargers found in your account: {}. Please specify the one to report on with --charger-id.",
        format_ids(.0)
    )]
    MultipleChargers(Vec<u64>),

    #[error("No chargers are associated with your account.")]
    NoChargers,

    #[error("Invalid month {0} specified. Please provide a month between 1 and 12.")]
    InvalidMonth(u32),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReportError {
    /// Process exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Authentication | Self::Other(_) => 1,
            Self::UnknownCharger(_) | Self::MultipleChargers(_) | Self::NoChargers => 2,
            Self::InvalidMonth(_) => 3,
        }
    }
}

/// Comma-separated charger ID list for error messages.
fn format_ids(ids: &[u64]) -> String {
    ids.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}
