//! Report table construction.
//!
//! Builds the display rows for the spreadsheet from fetched sessions:
//! a header row in the selected language, one row per session,
//! and optionally five totals rows.
//! This is a pure transformation with no I/O.

use crate::date::{format_duration, format_timestamp};
use crate::wallbox::SessionRecord;

/// Number of display columns in a report row.
pub const COLUMN_COUNT: usize = 8;

/// Number of rows in the totals summary block.
pub const SUMMARY_ROW_COUNT: usize = 5;

const HEADERS_EN: [&str; COLUMN_COUNT] = [
    "Session start",
    "Session end",
    "Duration",
    "Total energy",
    "Grid energy",
    "Solar energy",
    "Cost",
    "Savings from solar",
];

const HEADERS_IT: [&str; COLUMN_COUNT] = [
    "Inizio sessione",
    "Fine sessione",
    "Durata",
    "Energia complessiva",
    "Energia di rete",
    "Energia fotovoltaico",
    "Costo",
    "Risparmio da fotovoltaico",
];

const SUMMARY_LABELS_EN: [&str; SUMMARY_ROW_COUNT] = [
    "Total energy",
    "Total grid energy",
    "Total solar energy",
    "Total cost",
    "Total savings from solar",
];

const SUMMARY_LABELS_IT: [&str; SUMMARY_ROW_COUNT] = [
    "Energia totale",
    "Energia di rete totale",
    "Energia fotovoltaico totale",
    "Costo totale",
    "Risparmio totale da fotovoltaico",
];

/// Display language for table headings and summary labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    English,
    Italian,
}

impl Language {
    /// Header row for this language.
    #[must_use]
    pub const fn headers(self) -> [&'static str; COLUMN_COUNT] {
        match self {
            Self::English => HEADERS_EN,
            Self::Italian => HEADERS_IT,
        }
    }

    /// Summary row labels for this language.
    #[must_use]
    pub const fn summary_labels(self) -> [&'static str; SUMMARY_ROW_COUNT] {
        match self {
            Self::English => SUMMARY_LABELS_EN,
            Self::Italian => SUMMARY_LABELS_IT,
        }
    }
}

/// Table model for the spreadsheet.
///
/// Row order mirrors the input session order,
/// so callers pass sessions already sorted by start time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportTable {
    pub header: [&'static str; COLUMN_COUNT],
    pub rows: Vec<[String; COLUMN_COUNT]>,
    /// Five (label, value) totals rows; empty when the summary is disabled.
    pub summary: Vec<(&'static str, String)>,
}

impl ReportTable {
    /// Build the report table from sorted sessions.
    #[must_use]
    pub fn build(sessions: &[SessionRecord], language: Language, with_summary: bool) -> Self {
        let rows = sessions.iter().map(session_row).collect();
        let summary = if with_summary {
            summary_rows(sessions, language)
        } else {
            Vec::new()
        };
        Self {
            header: language.headers(),
            rows,
            summary,
        }
    }
}

/// Display row for one session.
///
/// Grid energy subtracts raw values before display rounding.
fn session_row(session: &SessionRecord) -> [String; COLUMN_COUNT] {
    [
        format_timestamp(session.start),
        format_timestamp(session.end),
        format_duration(session.charging_time),
        energy_cell(session.energy, &session.energy_unit),
        energy_cell(session.grid_energy(), &session.energy_unit),
        energy_cell(session.green_energy, &session.energy_unit),
        cost_cell(session.cost, &session.cost_unit),
        cost_cell(session.cost_savings, &session.cost_unit),
    ]
}

/// Five totals rows.
///
/// Energy totals sum the per-session rounded values;
/// cost and savings totals round the sum of the raw values.
/// Unit and currency symbols come from the first session;
/// with zero sessions the values render as plain zeros.
fn summary_rows(sessions: &[SessionRecord], language: Language) -> Vec<(&'static str, String)> {
    let energy_unit = sessions.first().map_or("", |session| session.energy_unit.as_str());
    let cost_unit = sessions.first().map_or("", |session| session.cost_unit.as_str());

    let total_energy: f64 = sessions.iter().map(|session| round2(session.energy)).sum();
    let total_grid: f64 = sessions.iter().map(|session| round2(session.grid_energy())).sum();
    let total_green: f64 = sessions.iter().map(|session| round2(session.green_energy)).sum();
    let total_cost: f64 = sessions.iter().map(|session| session.cost).sum();
    let total_savings: f64 = sessions.iter().map(|session| session.cost_savings).sum();

    let values = [
        energy_cell(total_energy, energy_unit),
        energy_cell(total_grid, energy_unit),
        energy_cell(total_green, energy_unit),
        cost_cell(total_cost, cost_unit),
        cost_cell(total_savings, cost_unit),
    ];

    language.summary_labels().into_iter().zip(values).collect()
}

/// Round to 2 decimal places.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Energy value with the unit suffix, for example "12.50 kWh".
fn energy_cell(value: f64, unit: &str) -> String {
    if unit.is_empty() {
        format!("{:.2}", round2(value))
    } else {
        format!("{:.2} {unit}", round2(value))
    }
}

/// Monetary value with the currency symbol prefix, for example "€3.75".
fn cost_cell(value: f64, symbol: &str) -> String {
    format!("{symbol}{:.2}", round2(value))
}


#[cfg(test)]
mod test_report_table {
    use super::*;
    use chrono::{Local, TimeZone};

    fn session(energy: f64, green_energy: f64, cost: f64, cost_savings: f64) -> SessionRecord {
        SessionRecord {
            start: 1_684_929_600,
            end: 1_684_936_800,
            charging_time: 7200,
            energy,
            energy_unit: "kWh".to_string(),
            green_energy,
            cost,
            cost_unit: "€".to_string(),
            cost_savings,
        }
    }

    #[test]
    fn builds_one_row_per_session() {
        let sessions = vec![session(10.0, 2.0, 3.0, 1.0), session(5.0, 1.0, 1.5, 0.5)];
        let table = ReportTable::build(&sessions, Language::English, false);
        assert_eq!(table.rows.len(), 2);
        assert!(table.summary.is_empty());
    }

    #[test]
    fn row_formats_timestamps_duration_and_values() {
        let start = Local
            .with_ymd_and_hms(2023, 5, 24, 12, 0, 0)
            .single()
            .expect("valid datetime");
        let mut record = session(12.5, 4.2, 3.75, 1.25);
        record.start = start.timestamp();
        record.end = start.timestamp() + 7200;

        let table = ReportTable::build(&[record], Language::English, false);
        let row = &table.rows[0];
        assert_eq!(row[0], "24/05/2023 12:00:00");
        assert_eq!(row[1], "24/05/2023 14:00:00");
        assert_eq!(row[2], "2:00:00");
        assert_eq!(row[3], "12.50 kWh");
        assert_eq!(row[4], "8.30 kWh");
        assert_eq!(row[5], "4.20 kWh");
        assert_eq!(row[6], "€3.75");
        assert_eq!(row[7], "€1.25");
    }

    #[test]
    fn grid_energy_subtracts_raw_values_before_rounding() {
        // Raw difference 1.114 - 0.567 = 0.547 rounds to 0.55.
        // Rounding each value first would give 1.11 - 0.57 = 0.54.
        let record = session(1.114, 0.567, 0.0, 0.0);
        let table = ReportTable::build(&[record], Language::English, false);
        assert_eq!(table.rows[0][4], "0.55 kWh");
    }

    #[test]
    fn energy_totals_sum_the_per_session_rounded_values() {
        // 1.004 rounds to 1.00 per session: total is 2.00, not round(2.008) = 2.01.
        let sessions = vec![session(1.004, 0.0, 0.0, 0.0), session(1.004, 0.0, 0.0, 0.0)];
        let table = ReportTable::build(&sessions, Language::English, true);
        assert_eq!(table.summary[0], ("Total energy", "2.00 kWh".to_string()));
    }

    #[test]
    fn cost_total_rounds_the_sum_of_raw_values() {
        let sessions = vec![session(1.0, 0.0, 10.50, 0.0), session(1.0, 0.0, 5.25, 0.0)];
        let table = ReportTable::build(&sessions, Language::English, true);
        assert_eq!(table.summary[3], ("Total cost", "€15.75".to_string()));
    }

    #[test]
    fn cost_total_rounding_differs_from_per_session_rounding() {
        // Costs keep raw precision until the final rounding:
        // 1.004 + 1.004 = 2.008 rounds to 2.01.
        let sessions = vec![session(1.0, 0.0, 1.004, 0.0), session(1.0, 0.0, 1.004, 0.0)];
        let table = ReportTable::build(&sessions, Language::English, true);
        assert_eq!(table.summary[3], ("Total cost", "€2.01".to_string()));
    }

    #[test]
    fn summary_totals_cover_all_five_rows() {
        let sessions = vec![session(10.0, 4.0, 3.0, 1.0), session(6.0, 2.0, 2.0, 0.5)];
        let table = ReportTable::build(&sessions, Language::English, true);
        assert_eq!(table.summary.len(), SUMMARY_ROW_COUNT);
        assert_eq!(table.summary[0], ("Total energy", "16.00 kWh".to_string()));
        assert_eq!(table.summary[1], ("Total grid energy", "10.00 kWh".to_string()));
        assert_eq!(table.summary[2], ("Total solar energy", "6.00 kWh".to_string()));
        assert_eq!(table.summary[3], ("Total cost", "€5.00".to_string()));
        assert_eq!(table.summary[4], ("Total savings from solar", "€1.50".to_string()));
    }

    #[test]
    fn italian_summary_uses_italian_labels() {
        let sessions = vec![session(10.0, 4.0, 3.0, 1.0)];
        let table = ReportTable::build(&sessions, Language::Italian, true);
        assert_eq!(table.summary[0].0, "Energia totale");
        assert_eq!(table.summary[4].0, "Risparmio totale da fotovoltaico");
    }

    #[test]
    fn empty_sessions_with_summary_yield_zero_valued_rows() {
        let table = ReportTable::build(&[], Language::English, true);
        assert!(table.rows.is_empty());
        assert_eq!(table.summary.len(), SUMMARY_ROW_COUNT);
        assert_eq!(table.summary[0], ("Total energy", "0.00".to_string()));
        assert_eq!(table.summary[3], ("Total cost", "0.00".to_string()));
    }

    #[test]
    fn empty_sessions_without_summary_yield_empty_table() {
        let table = ReportTable::build(&[], Language::English, false);
        assert!(table.rows.is_empty());
        assert!(table.summary.is_empty());
    }
}
