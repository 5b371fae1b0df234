//! Raw record normalization.
//!
//! Both readers produce `RawRecord`s of optional strings; this module turns
//! them into `Measurement`s or explains why a row was set aside.

use crate::indicators;
use crate::model::Measurement;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One table row before validation. Blank cells are `None` or empty.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "Measure", default)]
    pub measure: Option<String>,
    #[serde(rename = "Year", default)]
    pub year: Option<String>,
    #[serde(rename = "Date", default)]
    pub date: Option<String>,
    #[serde(rename = "Value", default)]
    pub value: Option<String>,
    #[serde(rename = "Indicator", default)]
    pub indicator: Option<String>,
}

/// A row the loader isolated, with its 1-based line/row number in the file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedRow {
    pub row: usize,
    pub reason: String,
}

fn non_blank(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Accepts `2020` and integral floats such as `2020.0` (spreadsheet exports).
fn parse_year(text: &str) -> Option<i32> {
    if let Ok(year) = text.parse::<i32>() {
        return Some(year);
    }
    let float: f64 = text.parse().ok()?;
    if float.is_finite() && float.fract() == 0.0 && float.abs() <= i32::MAX as f64 {
        Some(float as i32)
    } else {
        None
    }
}

/// Parses the date formats seen in sea level exports:
/// `2020-01-31`, `01/31/2020`, and the IMF-style `D01/31/2020`.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    let body = trimmed.strip_prefix('D').unwrap_or(trimmed);
    // Spreadsheet exports sometimes carry a midnight time component.
    let day_part = body.split([' ', 'T']).next().unwrap_or(body);

    ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(day_part, fmt).ok())
}

/// Validates `raw` into a `Measurement`.
///
/// Region, year, and value are required; a blank or unparseable date simply
/// leaves `date` unset. The indicator goes through the rename table.
pub fn normalize(row: usize, raw: RawRecord) -> Result<Measurement, RejectedRow> {
    let reject = |reason: String| RejectedRow { row, reason };

    let measure = non_blank(&raw.measure)
        .ok_or_else(|| reject("missing Measure".to_string()))?
        .to_string();

    let year_text = non_blank(&raw.year).ok_or_else(|| reject("missing Year".to_string()))?;
    let year = parse_year(year_text)
        .ok_or_else(|| reject(format!("unparseable Year '{}'", year_text)))?;

    let value_text = non_blank(&raw.value).ok_or_else(|| reject("missing Value".to_string()))?;
    let value: f64 = value_text
        .parse()
        .map_err(|_| reject(format!("unparseable Value '{}'", value_text)))?;
    if !value.is_finite() {
        return Err(reject(format!("non-finite Value '{}'", value_text)));
    }

    let date = non_blank(&raw.date).and_then(parse_date);
    let indicator = non_blank(&raw.indicator).map(indicators::display_label);

    Ok(Measurement {
        measure,
        year,
        date,
        value,
        indicator,
    })
}
