//! Serialization of result sets.

use std::fmt;
use std::str::FromStr;

use rust_xlsxwriter::{Format, Workbook};
use serde::Serialize;
use serde_json::Value;

use crate::pipeline::{ResultSet, TabularRow};

use super::error::ExportError;

/// Name of the single worksheet in spreadsheet exports.
pub const SHEET_NAME: &str = "fares";

/// Output format for exported results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
    Xlsx,
}

impl ExportFormat {
    /// Every format, in the order they are offered for download.
    pub const ALL: [ExportFormat; 3] =
        [ExportFormat::Csv, ExportFormat::Xlsx, ExportFormat::Json];

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Xlsx => "xlsx",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Json => "application/json",
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }

    /// Download file name for an export in this format.
    pub fn file_name(&self, stem: &str) -> String {
        format!("{stem}.{}", self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            "xlsx" => Ok(ExportFormat::Xlsx),
            other => Err(ExportError::UnknownFormat(other.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// CSV with a header row equal to the row type's column list.
///
/// The header is written even when there are no rows.
fn rows_to_csv<R: TabularRow>(rows: &[R]) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(R::COLUMNS)?;
    for row in rows {
        writer.serialize(row)?;
    }

    writer.into_inner().map_err(|e| ExportError::Io(e.into_error()))
}

fn rows_to_json<R: Serialize>(rows: &[R]) -> Result<Vec<u8>, ExportError> {
    let mut bytes = serde_json::to_vec_pretty(rows)?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// A single-sheet workbook with a bold header row equal to the column
/// list.
///
/// Numeric fields become number cells, absent fields stay blank and
/// everything else is written as text.
fn rows_to_xlsx<R: TabularRow>(rows: &[R]) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    let bold = Format::new().set_bold();
    for (col, name) in (0u16..).zip(R::COLUMNS) {
        sheet.write_string_with_format(0, col, *name, &bold)?;
    }

    for (row_num, row) in (1u32..).zip(rows) {
        let value = serde_json::to_value(row)?;
        for (col, name) in (0u16..).zip(R::COLUMNS) {
            match value.get(*name) {
                None | Some(Value::Null) => {}
                Some(Value::Number(n)) => match n.as_f64() {
                    Some(n) => {
                        sheet.write_number(row_num, col, n)?;
                    }
                    None => {
                        sheet.write_string(row_num, col, n.to_string())?;
                    }
                },
                Some(Value::String(s)) => {
                    sheet.write_string(row_num, col, s)?;
                }
                Some(other) => {
                    sheet.write_string(row_num, col, other.to_string())?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

/// Serialize a result set.
pub fn to_bytes(rows: &ResultSet, format: ExportFormat) -> Result<Vec<u8>, ExportError> {
    match (format, rows) {
        (ExportFormat::Csv, ResultSet::OneWay(rows)) => rows_to_csv(rows),
        (ExportFormat::Csv, ResultSet::RoundTrip(rows)) => rows_to_csv(rows),
        (ExportFormat::Json, ResultSet::OneWay(rows)) => rows_to_json(rows),
        (ExportFormat::Json, ResultSet::RoundTrip(rows)) => rows_to_json(rows),
        (ExportFormat::Xlsx, ResultSet::OneWay(rows)) => rows_to_xlsx(rows),
        (ExportFormat::Xlsx, ResultSet::RoundTrip(rows)) => rows_to_xlsx(rows),
    }
}
