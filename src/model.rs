//! Core data types for the sea level dashboard.
//!
//! This module defines the shared domain model imported by all other modules:
//! the normalized measurement row, the immutable dataset, the selection state
//! owned by the presentation layer, the derived tables, and the error type.
//! It contains no I/O.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Last year of real observations. Later rows in the source data are
/// forward-filled placeholders.
pub const DEFAULT_YEAR_CUTOFF: i32 = 2024;

/// Number of regions shown in the volatility ranking.
pub const TOP_K: usize = 10;

/// Sentinel label for "no restriction" in region and source pickers.
pub const ALL: &str = "All";

// ---------------------------------------------------------------------------
// Measurement and dataset
// ---------------------------------------------------------------------------

/// One normalized row of the source table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Region name, whitespace-trimmed.
    pub measure: String,
    pub year: i32,
    /// Observation date; only the raw time-series view needs it.
    pub date: Option<NaiveDate>,
    /// Change in mean sea level, millimeters.
    pub value: f64,
    /// Instrument label after the rename table, when the column exists.
    pub indicator: Option<String>,
}

/// The loaded table. Immutable after load; rows beyond `year_cutoff` are
/// retained so pickers can list them but never reach an aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    rows: Vec<Measurement>,
    year_cutoff: i32,
}

impl Dataset {
    pub fn new(rows: Vec<Measurement>, year_cutoff: i32) -> Self {
        Self { rows, year_cutoff }
    }

    /// All loaded rows, including those beyond the cutoff.
    pub fn rows(&self) -> &[Measurement] {
        &self.rows
    }

    pub fn year_cutoff(&self) -> i32 {
        self.year_cutoff
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows with `year <= year_cutoff`, in load order.
    pub fn bounded(&self) -> Vec<Measurement> {
        self.rows
            .iter()
            .filter(|m| m.year <= self.year_cutoff)
            .cloned()
            .collect()
    }

    /// `"All"` followed by every distinct region, sorted.
    pub fn region_options(&self) -> Vec<String> {
        let unique: BTreeSet<&str> = self.rows.iter().map(|m| m.measure.as_str()).collect();
        std::iter::once(ALL.to_string())
            .chain(unique.into_iter().map(String::from))
            .collect()
    }

    /// `"All"` followed by every distinct indicator, sorted. Rows without an
    /// indicator contribute nothing.
    pub fn source_options(&self) -> Vec<String> {
        let unique: BTreeSet<&str> = self
            .rows
            .iter()
            .filter_map(|m| m.indicator.as_deref())
            .collect();
        std::iter::once(ALL.to_string())
            .chain(unique.into_iter().map(String::from))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Selection state
// ---------------------------------------------------------------------------

/// A picker value: either the `"All"` sentinel or one concrete label.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Choice {
    #[default]
    All,
    Only(String),
}

impl Choice {
    /// Parses a picker label. `"All"` and blank input both mean no restriction;
    /// anything else is trimmed so it compares against trimmed measures.
    pub fn parse(label: &str) -> Self {
        let trimmed = label.trim();
        if trimmed.is_empty() || trimmed == ALL {
            Choice::All
        } else {
            Choice::Only(trimmed.to_string())
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Choice::All)
    }

    /// True when `value` passes this choice. The wanted label is compared
    /// trimmed, however the choice was built.
    pub fn admits(&self, value: Option<&str>) -> bool {
        match self {
            Choice::All => true,
            Choice::Only(wanted) => value == Some(wanted.trim()),
        }
    }
}

impl From<String> for Choice {
    fn from(label: String) -> Self {
        Choice::parse(&label)
    }
}

impl From<Choice> for String {
    fn from(choice: Choice) -> Self {
        match choice {
            Choice::All => ALL.to_string(),
            Choice::Only(label) => label,
        }
    }
}

impl std::fmt::Display for Choice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Choice::All => write!(f, "{}", ALL),
            Choice::Only(label) => write!(f, "{}", label),
        }
    }
}

/// Sidebar filter values, owned by the caller and passed into every render.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectionState {
    pub region: Choice,
    pub source: Choice,
}

impl SelectionState {
    /// Builds a selection from picker labels, each parsed with `Choice::parse`.
    pub fn new(region: &str, source: &str) -> Self {
        Self {
            region: Choice::parse(region),
            source: Choice::parse(source),
        }
    }

    /// Region-only selection, source left at `All`.
    pub fn region(label: &str) -> Self {
        Self {
            region: Choice::parse(label),
            source: Choice::All,
        }
    }
}

// ---------------------------------------------------------------------------
// Derived tables
// ---------------------------------------------------------------------------

/// Mean value for one year, with the difference from the previous year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyAverage {
    pub year: i32,
    pub value: f64,
    /// `None` for the first year in the sequence.
    pub change: Option<f64>,
}

/// Sample standard deviation of one region's values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionVolatility {
    pub measure: String,
    pub volatility: f64,
}

/// Mean value for one (year, region) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearMeasureAverage {
    pub year: i32,
    pub measure: String,
    pub value: f64,
}

/// A top-K point paired with the opacity the cross-filter assigns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedPoint {
    pub year: i32,
    pub measure: String,
    pub value: f64,
    pub opacity: f64,
}

/// The cross-filter's single active region.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "measure", rename_all = "snake_case")]
pub enum ActiveMeasure {
    #[default]
    Neutral,
    Measure(String),
}

/// Everything the presentation layer reads for one render cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedTables {
    pub selection: SelectionState,
    pub filtered_rows: Vec<Measurement>,
    pub yearly_average: Vec<YearlyAverage>,
    pub year_measure_average: Vec<YearMeasureAverage>,
    /// Top-K ranking over the bounded, unfiltered dataset.
    pub region_volatility: Vec<RegionVolatility>,
    pub top_k_year_measure_average: Vec<YearMeasureAverage>,
    /// Yearly mean over the bounded, unfiltered dataset.
    pub overall_yearly_average: Vec<YearlyAverage>,
    pub linked_points: Vec<LinkedPoint>,
    pub active_measure: ActiveMeasure,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise while loading, configuring, or writing the dashboard.
#[derive(Debug)]
pub enum DashboardError {
    /// The input or output file could not be read or written.
    Io(std::io::Error),
    /// The CSV reader failed below the record level.
    Csv(String),
    /// The spreadsheet could not be opened or has no worksheet.
    Spreadsheet(String),
    /// The input file extension is not a supported table format.
    UnsupportedFormat(String),
    /// The header row lacks a required column.
    MissingColumn(String),
    /// A row is missing a usable region, year, or value (strict mode only).
    MalformedRecord { row: usize, reason: String },
    /// The configuration file is not valid TOML for `DashboardConfig`.
    Config(String),
    /// Derived tables could not be serialized.
    Serialize(String),
}

impl std::fmt::Display for DashboardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DashboardError::Io(e) => write!(f, "I/O error: {}", e),
            DashboardError::Csv(msg) => write!(f, "CSV error: {}", msg),
            DashboardError::Spreadsheet(msg) => write!(f, "Spreadsheet error: {}", msg),
            DashboardError::UnsupportedFormat(ext) => {
                write!(f, "Unsupported input format: {}", ext)
            }
            DashboardError::MissingColumn(col) => write!(f, "Missing required column: {}", col),
            DashboardError::MalformedRecord { row, reason } => {
                write!(f, "Malformed record at row {}: {}", row, reason)
            }
            DashboardError::Config(msg) => write!(f, "Config error: {}", msg),
            DashboardError::Serialize(msg) => write!(f, "Serialize error: {}", msg),
        }
    }
}

impl std::error::Error for DashboardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DashboardError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DashboardError {
    fn from(e: std::io::Error) -> Self {
        DashboardError::Io(e)
    }
}

impl From<csv::Error> for DashboardError {
    fn from(e: csv::Error) -> Self {
        DashboardError::Csv(e.to_string())
    }
}

impl From<serde_json::Error> for DashboardError {
    fn from(e: serde_json::Error) -> Self {
        DashboardError::Serialize(e.to_string())
    }
}

impl From<toml::de::Error> for DashboardError {
    fn from(e: toml::de::Error) -> Self {
        DashboardError::Config(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
