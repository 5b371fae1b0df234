//! CSV reader.
//!
//! Expects a header row naming at least `Measure`, `Year`, `Date`, and
//! `Value`. Extra columns (ISO codes, units, source notes) are ignored.
//! Quoted fields may contain commas.

use super::{require_columns, RawRecord, RawTable, RejectedRow};
use crate::model::DashboardError;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Reads raw records from any CSV source. Row numbers are file line numbers,
/// so the first data row is row 2.
///
/// A row that cannot be decoded (invalid UTF-8) lands in
/// `RawTable::unreadable`; the rows around it are still read. Header and
/// I/O failures abort the read.
pub fn read_csv<R: Read>(source: R) -> Result<RawTable, DashboardError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(source);

    let headers = reader.headers()?.clone();
    require_columns(headers.iter())?;

    let mut table = RawTable::default();
    for (i, result) in reader.byte_records().enumerate() {
        let bytes = result?;
        let row = bytes
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(i + 2);

        let mut record = match StringRecord::from_byte_record(bytes) {
            Ok(record) => record,
            Err(e) => {
                table.unreadable.push(RejectedRow {
                    row,
                    reason: format!("invalid UTF-8 in column {}", e.utf8_error().field() + 1),
                });
                continue;
            }
        };
        // Short rows are padded so absent trailing cells read as blank.
        while record.len() < headers.len() {
            record.push_field("");
        }
        match record.deserialize::<RawRecord>(Some(&headers)) {
            Ok(raw) => table.records.push((row, raw)),
            Err(e) => table.unreadable.push(RejectedRow {
                row,
                reason: format!("undecodable record: {}", e),
            }),
        }
    }

    Ok(table)
}

/// Opens `path` and reads it with `read_csv`.
pub fn read_csv_file(path: &Path) -> Result<RawTable, DashboardError> {
    let file = File::open(path)?;
    read_csv(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
ObjectId,Country,Indicator,Source,Measure,Date,Value,Year
1,World,Change in mean sea level: Sea level: Jason.1,\"NOAA, Laboratory for Satellite Altimetry\",Andaman Sea,D12/17/1992,-10.34,1992
2,World,Change in mean sea level: Sea level: Trend,\"NOAA, Laboratory for Satellite Altimetry\", Andaman Sea ,D12/27/1992,,1992
";

    #[test]
    fn test_reads_quoted_fields_and_ignores_extra_columns() {
        let records = read_csv(SAMPLE.as_bytes()).unwrap().records;
        assert_eq!(records.len(), 2);

        let (row, first) = &records[0];
        assert_eq!(*row, 2);
        assert_eq!(first.measure.as_deref(), Some("Andaman Sea"));
        assert_eq!(first.date.as_deref(), Some("D12/17/1992"));
        assert_eq!(first.value.as_deref(), Some("-10.34"));
        assert_eq!(first.year.as_deref(), Some("1992"));
    }

    #[test]
    fn test_blank_cell_is_missing() {
        let records = read_csv(SAMPLE.as_bytes()).unwrap().records;
        let (row, second) = &records[1];
        assert_eq!(*row, 3);
        assert!(second.value.as_deref().map_or(true, str::is_empty));
    }

    #[test]
    fn test_missing_required_column_fails() {
        let text = "Measure,Date,Value\nA,2020-01-01,1.0\n";
        match read_csv(text.as_bytes()) {
            Err(DashboardError::MissingColumn(col)) => assert_eq!(col, "Year"),
            other => panic!("expected MissingColumn, got {:?}", other),
        }
    }

    #[test]
    fn test_short_rows_yield_missing_fields() {
        let text = "Measure,Year,Date,Value\nA,2020\n";
        let records = read_csv(text.as_bytes()).unwrap().records;
        assert_eq!(records.len(), 1);
        assert!(records[0].1.value.is_none());
    }

    #[test]
    fn test_undecodable_row_is_isolated_between_good_rows() {
        let mut bytes = b"Measure,Year,Date,Value\nA,2020,2020-01-01,1.0\n".to_vec();
        bytes.extend_from_slice(b"B\xff,2020,2020-01-01,2.0\n");
        bytes.extend_from_slice(b"C,2021,2021-01-01,3.0\n");

        let table = read_csv(bytes.as_slice()).unwrap();
        let rows: Vec<usize> = table.records.iter().map(|(row, _)| *row).collect();
        assert_eq!(rows, vec![2, 4], "good rows on both sides survive");
        assert_eq!(table.unreadable.len(), 1);
        assert_eq!(table.unreadable[0].row, 3);
        assert!(
            table.unreadable[0].reason.contains("column 1"),
            "reason was {}",
            table.unreadable[0].reason
        );
    }
}
