//! Excel report writer.
//!
//! Renders a report table to a styled single-sheet workbook:
//! bordered cells, a bold filled header row, a secondary fill for data,
//! fixed column widths, and a blank leading row and column as margin.

use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{ColNum, Format, FormatBorder, RowNum, Workbook};

use crate::report::ReportTable;

/// Fill color for the header row and summary labels.
const HEADER_FILL: &str = "f1c232";

/// Fill color for data cells and summary values.
const DATA_FILL: &str = "a2c4c9";

/// Widths for the eight report columns, after the blank margin column.
const COLUMN_WIDTHS: [f64; 8] = [22.0, 22.0, 15.0, 15.0, 15.0, 15.0, 15.0, 17.0];

/// Gap between the last data row and the first summary row.
const SUMMARY_GAP_ROWS: RowNum = 2;

/// Write the report table to an xlsx file at the given path.
///
/// # Errors
/// Returns an error if the workbook cannot be built or the path is unwritable.
pub fn write_report(table: &ReportTable, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet().set_name("Sessions")?;

    let header_format = Format::new()
        .set_bold()
        .set_border(FormatBorder::Thin)
        .set_background_color(HEADER_FILL);
    let data_format = Format::new()
        .set_border(FormatBorder::Thin)
        .set_background_color(DATA_FILL);

    // Row 0 and column 0 stay empty as a cosmetic margin.
    for (column, header) in table.header.iter().enumerate() {
        sheet.write_string_with_format(1, column as ColNum + 1, *header, &header_format)?;
    }

    let mut row: RowNum = 2;
    for data_row in &table.rows {
        for (column, cell) in data_row.iter().enumerate() {
            sheet.write_string_with_format(row, column as ColNum + 1, cell, &data_format)?;
        }
        row += 1;
    }

    if !table.summary.is_empty() {
        let mut summary_row = row + SUMMARY_GAP_ROWS;
        for (label, value) in &table.summary {
            sheet.write_string_with_format(summary_row, 1, *label, &header_format)?;
            sheet.write_string_with_format(summary_row, 2, value, &data_format)?;
            summary_row += 1;
        }
    }

    for (column, width) in COLUMN_WIDTHS.iter().enumerate() {
        sheet.set_column_width(column as ColNum + 1, *width)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    Ok(())
}
