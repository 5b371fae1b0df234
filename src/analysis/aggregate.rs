//! Grouped means over measurement rows.
//!
//! Means are plain arithmetic means; duplicate (year, region) rows are
//! averaged together, never summed.

use crate::model::{Measurement, YearMeasureAverage, YearlyAverage};
use std::collections::BTreeMap;

/// Running sum and count for one group.
#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    sum: f64,
    count: usize,
}

impl Accumulator {
    fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn mean(&self) -> f64 {
        self.sum / self.count as f64
    }
}

/// Mean value per year, ascending by year, with `change` set to the
/// difference from the previous entry (`None` for the first).
pub fn yearly_average(rows: &[Measurement]) -> Vec<YearlyAverage> {
    let mut groups: BTreeMap<i32, Accumulator> = BTreeMap::new();
    for row in rows {
        groups.entry(row.year).or_default().push(row.value);
    }

    let mut previous: Option<f64> = None;
    groups
        .into_iter()
        .map(|(year, acc)| {
            let value = acc.mean();
            let change = previous.map(|p| value - p);
            previous = Some(value);
            YearlyAverage { year, value, change }
        })
        .collect()
}

/// Mean value per (year, region), sorted by year then region.
pub fn year_measure_average(rows: &[Measurement]) -> Vec<YearMeasureAverage> {
    let mut groups: BTreeMap<(i32, &str), Accumulator> = BTreeMap::new();
    for row in rows {
        groups
            .entry((row.year, row.measure.as_str()))
            .or_default()
            .push(row.value);
    }

    groups
        .into_iter()
        .map(|((year, measure), acc)| YearMeasureAverage {
            year,
            measure: measure.to_string(),
            value: acc.mean(),
        })
        .collect()
}
