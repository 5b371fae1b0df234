//! Dataset ingestion.
//!
//! Reads the sea level table from disk into raw string records, then
//! normalizes them into `Measurement`s. Format is chosen by file extension:
//!
//! - `csv`: delimited text via the `csv` crate.
//! - `xlsx` / `xlsm` / `xls` / `ods`: first worksheet via `calamine`.
//!
//! Malformed rows are isolated into `LoadReport::rejected` unless the caller
//! asks for a strict load.

pub mod delimited;
pub mod normalize;
pub mod workbook;

use crate::indicators;
use crate::logging::{self, Stage};
use crate::model::{DashboardError, Dataset};
use std::collections::BTreeSet;
use std::path::Path;

pub use normalize::{normalize, parse_date, RawRecord, RejectedRow};

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

pub const COL_MEASURE: &str = "Measure";
pub const COL_YEAR: &str = "Year";
pub const COL_DATE: &str = "Date";
pub const COL_VALUE: &str = "Value";
pub const COL_INDICATOR: &str = "Indicator";

/// Columns every input table must carry. `Indicator` is optional.
pub const REQUIRED_COLUMNS: &[&str] = &[COL_MEASURE, COL_YEAR, COL_DATE, COL_VALUE];

/// Fails with `MissingColumn` naming the first required column absent from
/// `headers`.
pub fn require_columns<'a, I>(headers: I) -> Result<(), DashboardError>
where
    I: IntoIterator<Item = &'a str>,
{
    let present: BTreeSet<&str> = headers.into_iter().map(str::trim).collect();
    match REQUIRED_COLUMNS.iter().find(|c| !present.contains(*c)) {
        Some(missing) => Err(DashboardError::MissingColumn(missing.to_string())),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Raw tables
// ---------------------------------------------------------------------------

/// Output of a reader: numbered raw records plus rows it could not decode.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub records: Vec<(usize, RawRecord)>,
    pub unreadable: Vec<RejectedRow>,
}

impl From<Vec<(usize, RawRecord)>> for RawTable {
    fn from(records: Vec<(usize, RawRecord)>) -> Self {
        Self {
            records,
            unreadable: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Load report
// ---------------------------------------------------------------------------

/// Outcome of a load: the dataset plus everything the loader set aside.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub dataset: Dataset,
    /// Data rows read from the file, accepted or not.
    pub total_rows: usize,
    pub rejected: Vec<RejectedRow>,
    /// Raw indicator labels that matched neither a rename entry nor an alias.
    pub unmapped_indicators: BTreeSet<String>,
}

/// Normalizes a reader's rows into a report, in row order. Rows the reader
/// could not decode are treated like rows that fail validation.
///
/// In strict mode the first malformed row aborts with `MalformedRecord`.
pub fn build_report(
    table: impl Into<RawTable>,
    year_cutoff: i32,
    strict: bool,
) -> Result<LoadReport, DashboardError> {
    let table = table.into();
    let mut entries: Vec<(usize, Result<RawRecord, RejectedRow>)> = table
        .records
        .into_iter()
        .map(|(row, raw)| (row, Ok(raw)))
        .chain(table.unreadable.into_iter().map(|reject| (reject.row, Err(reject))))
        .collect();
    entries.sort_by_key(|(row, _)| *row);

    let total_rows = entries.len();
    let mut rows = Vec::with_capacity(total_rows);
    let mut rejected = Vec::new();
    let mut unmapped_indicators = BTreeSet::new();

    for (row, entry) in entries {
        let outcome = entry.and_then(|raw| {
            if let Some(label) = raw.indicator.as_deref().map(str::trim) {
                if !label.is_empty()
                    && indicators::find_alias(label).is_none()
                    && !indicators::is_alias(label)
                {
                    unmapped_indicators.insert(label.to_string());
                }
            }
            normalize(row, raw)
        });

        match outcome {
            Ok(measurement) => rows.push(measurement),
            Err(reject) => {
                if strict {
                    return Err(DashboardError::MalformedRecord {
                        row: reject.row,
                        reason: reject.reason,
                    });
                }
                logging::log_rejected_row(reject.row, &reject.reason);
                rejected.push(reject);
            }
        }
    }

    logging::log_load_summary(total_rows, rows.len(), rejected.len());

    Ok(LoadReport {
        dataset: Dataset::new(rows, year_cutoff),
        total_rows,
        rejected,
        unmapped_indicators,
    })
}

/// Loads and normalizes the table at `path`.
pub fn load_dataset(path: &Path, year_cutoff: i32, strict: bool) -> Result<LoadReport, DashboardError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    logging::info(
        Stage::Load,
        None,
        &format!("Reading {} (cutoff year {})", path.display(), year_cutoff),
    );

    let records = match extension.as_str() {
        "csv" => delimited::read_csv_file(path)?,
        "xlsx" | "xlsm" | "xls" | "ods" => workbook::read_workbook(path)?.into(),
        other => return Err(DashboardError::UnsupportedFormat(other.to_string())),
    };

    build_report(records, year_cutoff, strict)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(measure: &str, year: &str, value: &str, indicator: Option<&str>) -> RawRecord {
        RawRecord {
            measure: Some(measure.to_string()),
            year: Some(year.to_string()),
            date: None,
            value: Some(value.to_string()),
            indicator: indicator.map(String::from),
        }
    }

    #[test]
    fn test_require_columns_names_first_missing() {
        assert!(require_columns(["Measure", "Year", "Date", "Value"]).is_ok());
        assert!(require_columns([" Measure ", "Year", "Date", "Value", "Indicator"]).is_ok());
        match require_columns(["Measure", "Date", "Value"]) {
            Err(DashboardError::MissingColumn(col)) => assert_eq!(col, "Year"),
            other => panic!("expected MissingColumn, got {:?}", other),
        }
    }

    #[test]
    fn test_lenient_report_isolates_malformed_rows() {
        let records = vec![
            (2, raw("A", "2020", "1.5", None)),
            (3, raw("A", "", "2.0", None)),
            (4, raw("B", "2021", "n/a", None)),
        ];
        let report = build_report(records, 2024, false).unwrap();
        assert_eq!(report.total_rows, 3);
        assert_eq!(report.dataset.len(), 1);
        let rows: Vec<usize> = report.rejected.iter().map(|r| r.row).collect();
        assert_eq!(rows, vec![3, 4]);
    }

    #[test]
    fn test_strict_report_fails_on_first_malformed_row() {
        let records = vec![
            (2, raw("A", "2020", "1.5", None)),
            (3, raw("   ", "2020", "2.0", None)),
        ];
        match build_report(records, 2024, true) {
            Err(DashboardError::MalformedRecord { row, .. }) => assert_eq!(row, 3),
            other => panic!("expected MalformedRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_unreadable_rows_merge_in_row_order() {
        let table = RawTable {
            records: vec![(2, raw("A", "2020", "1", None)), (4, raw("A", "2021", "2", None))],
            unreadable: vec![RejectedRow {
                row: 3,
                reason: "invalid UTF-8 in column 1".to_string(),
            }],
        };
        let report = build_report(table.clone(), 2024, false).unwrap();
        assert_eq!(report.total_rows, 3);
        assert_eq!(report.dataset.len(), 2);
        assert_eq!(report.rejected, table.unreadable);

        match build_report(table, 2024, true) {
            Err(DashboardError::MalformedRecord { row, reason }) => {
                assert_eq!(row, 3);
                assert!(reason.contains("UTF-8"));
            }
            other => panic!("expected MalformedRecord, got {:?}", other.map(|r| r.total_rows)),
        }
    }

    #[test]
    fn test_unmapped_indicators_exclude_known_labels_and_aliases() {
        let records = vec![
            (2, raw("A", "2020", "1", Some("Change in mean sea level: Sea level: Jason.1"))),
            (3, raw("A", "2021", "1", Some("Trend"))),
            (4, raw("A", "2022", "1", Some("Tide gauge composite"))),
        ];
        let report = build_report(records, 2024, false).unwrap();
        let unmapped: Vec<&str> = report.unmapped_indicators.iter().map(String::as_str).collect();
        assert_eq!(unmapped, vec!["Tide gauge composite"]);
    }

    #[test]
    fn test_unsupported_extension_is_rejected_before_reading() {
        let result = load_dataset(Path::new("sea_levels.parquet"), 2024, false);
        match result {
            Err(DashboardError::UnsupportedFormat(ext)) => assert_eq!(ext, "parquet"),
            other => panic!("expected UnsupportedFormat, got {:?}", other.map(|r| r.total_rows)),
        }
    }
}
