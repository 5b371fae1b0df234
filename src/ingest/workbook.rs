//! Spreadsheet reader.
//!
//! Reads the first worksheet of an XLSX/XLS/ODS workbook. The first row is
//! the header; cells are converted to the same optional strings the CSV
//! reader produces so both paths share `normalize`.

use super::{require_columns, RawRecord, COL_DATE, COL_INDICATOR, COL_MEASURE, COL_VALUE, COL_YEAR};
use crate::model::DashboardError;
use calamine::{open_workbook_auto, DataType, Reader};
use chrono::{Duration, NaiveDate};
use std::path::Path;

/// Converts a spreadsheet date serial (days since 1899-12-30) to ISO format.
pub fn serial_to_iso_date(serial: f64) -> Option<String> {
    if !serial.is_finite() {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    let date = epoch.checked_add_signed(Duration::try_days(serial.floor() as i64)?)?;
    Some(date.format("%Y-%m-%d").to_string())
}

fn cell_text(cell: &DataType) -> Option<String> {
    match cell {
        DataType::Empty => None,
        DataType::String(s) => Some(s.clone()),
        DataType::Float(f) => Some(f.to_string()),
        DataType::Int(i) => Some(i.to_string()),
        DataType::DateTime(serial) => serial_to_iso_date(*serial),
        other => Some(other.to_string()),
    }
}

/// Maps header cells to column positions.
struct Columns {
    measure: usize,
    year: usize,
    date: usize,
    value: usize,
    indicator: Option<usize>,
}

impl Columns {
    fn from_header(header: &[DataType]) -> Result<Self, DashboardError> {
        let names: Vec<String> = header
            .iter()
            .map(|c| cell_text(c).unwrap_or_default().trim().to_string())
            .collect();
        require_columns(names.iter().map(String::as_str))?;

        let position = |col: &str| names.iter().position(|n| n == col);
        let required = |col: &str| {
            position(col).ok_or_else(|| DashboardError::MissingColumn(col.to_string()))
        };

        Ok(Self {
            measure: required(COL_MEASURE)?,
            year: required(COL_YEAR)?,
            date: required(COL_DATE)?,
            value: required(COL_VALUE)?,
            indicator: position(COL_INDICATOR),
        })
    }

    fn extract(&self, row: &[DataType]) -> RawRecord {
        let at = |i: usize| row.get(i).and_then(cell_text);
        RawRecord {
            measure: at(self.measure),
            year: at(self.year),
            date: at(self.date),
            value: at(self.value),
            indicator: self.indicator.and_then(at),
        }
    }
}

/// Reads the first worksheet at `path`. Row numbers are 1-based sheet rows,
/// so the first data row is row 2.
pub fn read_workbook(path: &Path) -> Result<Vec<(usize, RawRecord)>, DashboardError> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| DashboardError::Spreadsheet(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| DashboardError::Spreadsheet("workbook has no worksheets".to_string()))?
        .map_err(|e| DashboardError::Spreadsheet(e.to_string()))?;

    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| DashboardError::Spreadsheet("worksheet is empty".to_string()))?;
    let columns = Columns::from_header(header)?;

    Ok(rows
        .enumerate()
        .filter(|(_, row)| row.iter().any(|c| !matches!(c, DataType::Empty)))
        .map(|(i, row)| (i + 2, columns.extract(row)))
        .collect())
}
