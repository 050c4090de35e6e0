//! Report window computation and date display formatting.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Local, TimeZone};

/// Inclusive local-time interval covered by a report.
///
/// Spans either one calendar month or one calendar year:
/// the first instant of the period through the last second before
/// the first instant of the following period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    pub start: DateTime<Local>,
    pub end: DateTime<Local>,
}

impl ReportWindow {
    /// Window for a single calendar month.
    ///
    /// December rolls over to January of the next year for the end bound.
    ///
    /// # Errors
    /// Returns an error if the year and month do not form a valid local date.
    pub fn for_month(year: i32, month: u32) -> Result<Self> {
        let start = local_midnight(year, month, 1)?;
        let next_month = if month == 12 {
            local_midnight(year + 1, 1, 1)?
        } else {
            local_midnight(year, month + 1, 1)?
        };
        Ok(Self {
            start,
            end: next_month - Duration::seconds(1),
        })
    }

    /// Window for a full calendar year: Jan 1 00:00:00 through Dec 31 23:59:59.
    ///
    /// # Errors
    /// Returns an error if the year does not form a valid local date.
    pub fn for_year(year: i32) -> Result<Self> {
        let start = local_midnight(year, 1, 1)?;
        let end = local_midnight(year + 1, 1, 1)? - Duration::seconds(1);
        Ok(Self { start, end })
    }
}

/// First instant of the given local calendar day.
fn local_midnight(year: i32, month: u32, day: u32) -> Result<DateTime<Local>> {
    Local
        .with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .with_context(|| format!("Invalid local date: {year}-{month:02}-{day:02}"))
}

/// Format a Unix timestamp as a local "dd/mm/yyyy hh:mm:ss" string.
#[must_use]
pub fn format_timestamp(timestamp: i64) -> String {
    Local.timestamp_opt(timestamp, 0).single().map_or_else(
        || timestamp.to_string(),
        |datetime| datetime.format("%d/%m/%Y %H:%M:%S").to_string(),
    )
}

/// Format a duration in seconds as "H:MM:SS" with unbounded hours.
#[must_use]
pub fn format_duration(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!("{}:{:02}:{:02}", seconds / 3600, (seconds % 3600) / 60, seconds % 60)
}
