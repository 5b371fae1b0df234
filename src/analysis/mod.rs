//! Data transformation stages for the dashboard.
//!
//! Every function here is pure: it borrows rows or derived tables and
//! returns a new table. Nothing mutates the loaded dataset.
//!
//! Submodules:
//! - `filter`: region/source selection over normalized rows.
//! - `aggregate`: yearly means, yearly change, per (year, region) means.
//! - `volatility`: per-region sample standard deviation and top-K ranking.
//! - `crossfilter`: the single active-region view state that links the
//!   ranking chart to its companion scatter.

pub mod aggregate;
pub mod crossfilter;
pub mod filter;
pub mod volatility;

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::model::Measurement;

    /// A measurement with no date or indicator.
    pub fn m(measure: &str, year: i32, value: f64) -> Measurement {
        Measurement {
            measure: measure.to_string(),
            year,
            date: None,
            value,
            indicator: None,
        }
    }

    /// The two-region example used across the analysis tests.
    pub fn two_regions() -> Vec<Measurement> {
        vec![
            m("A", 2020, 10.0),
            m("A", 2021, 12.0),
            m("B", 2020, 100.0),
            m("B", 2021, 70.0),
        ]
    }
}
