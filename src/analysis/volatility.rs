//! Regional volatility ranking.
//!
//! Volatility is the sample standard deviation (N−1 denominator) of a
//! region's values. Regions with fewer than two observations have no defined
//! spread and are left out of the table rather than carried as NaN.

use crate::model::{Measurement, RegionVolatility, YearMeasureAverage};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

/// Observations a region needs before its spread is defined.
pub const MIN_SAMPLES: usize = 2;

/// Sample standard deviation, or `None` below `MIN_SAMPLES`.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < MIN_SAMPLES {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Some((sum_sq / (n - 1.0)).sqrt())
}

/// Per-region volatility, sorted by region name. Callers pass the bounded,
/// unfiltered rows so the ranking does not follow the sidebar selection.
pub fn region_volatility(rows: &[Measurement]) -> Vec<RegionVolatility> {
    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for row in rows {
        groups.entry(row.measure.as_str()).or_default().push(row.value);
    }

    groups
        .into_iter()
        .filter_map(|(measure, values)| {
            sample_std_dev(&values).map(|volatility| RegionVolatility {
                measure: measure.to_string(),
                volatility,
            })
        })
        .collect()
}

/// Regions that cannot be ranked because they have too few observations.
pub fn unrankable_regions(rows: &[Measurement]) -> Vec<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for row in rows {
        *counts.entry(row.measure.as_str()).or_default() += 1;
    }
    counts
        .into_iter()
        .filter(|(_, n)| *n < MIN_SAMPLES)
        .map(|(measure, _)| measure.to_string())
        .collect()
}

/// The `k` most volatile regions: descending by volatility, ties broken by
/// name ascending. Returns everything when fewer than `k` regions exist.
pub fn top_k(volatility: &[RegionVolatility], k: usize) -> Vec<RegionVolatility> {
    let mut ranked = volatility.to_vec();
    ranked.sort_by(|a, b| {
        b.volatility
            .partial_cmp(&a.volatility)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.measure.cmp(&b.measure))
    });
    ranked.truncate(k);
    ranked
}

/// Restricts per (year, region) means to the regions in `top`.
pub fn top_k_year_measure_average(
    year_measure: &[YearMeasureAverage],
    top: &[RegionVolatility],
) -> Vec<YearMeasureAverage> {
    let keep: HashSet<&str> = top.iter().map(|r| r.measure.as_str()).collect();
    year_measure
        .iter()
        .filter(|a| keep.contains(a.measure.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fixtures::{m, two_regions};

    fn vol(measure: &str, volatility: f64) -> RegionVolatility {
        RegionVolatility {
            measure: measure.to_string(),
            volatility,
        }
    }

    #[test]
    fn test_sample_std_dev_uses_n_minus_one() {
        // Values 2,4,4,4,5,5,7,9: population sd 2.0, sample sd sqrt(32/7).
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let sd = sample_std_dev(&values).unwrap();
        assert!((sd - (32.0f64 / 7.0).sqrt()).abs() < 1e-12, "got {}", sd);
    }

    #[test]
    fn test_single_observation_has_no_std_dev() {
        assert_eq!(sample_std_dev(&[3.0]), None);
        assert_eq!(sample_std_dev(&[]), None);
    }

    #[test]
    fn test_worked_example_ranks_b_above_a() {
        let ranked = top_k(&region_volatility(&two_regions()), 10);
        let names: Vec<&str> = ranked.iter().map(|r| r.measure.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
        assert!((ranked[0].volatility - 450.0f64.sqrt()).abs() < 1e-9);
        assert!((ranked[1].volatility - 2.0f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_single_sample_regions_are_excluded() {
        let mut rows = two_regions();
        rows.push(m("Lonely Bay", 2020, 500.0));
        let table = region_volatility(&rows);
        assert!(table.iter().all(|r| r.measure != "Lonely Bay"));
        assert_eq!(unrankable_regions(&rows), vec!["Lonely Bay".to_string()]);
    }

    #[test]
    fn test_top_k_breaks_ties_by_name() {
        let table = vec![vol("Delta", 1.0), vol("Alpha", 2.0), vol("Charlie", 2.0), vol("Bravo", 2.0)];
        let names: Vec<String> = top_k(&table, 3).into_iter().map(|r| r.measure).collect();
        assert_eq!(names, vec!["Alpha", "Bravo", "Charlie"]);
    }

    #[test]
    fn test_top_k_caps_at_k_and_returns_all_when_fewer() {
        let table: Vec<RegionVolatility> = (0..15).map(|i| vol(&format!("R{:02}", i), i as f64)).collect();
        let top = top_k(&table, 10);
        assert_eq!(top.len(), 10);
        assert_eq!(top[0].measure, "R14");
        assert!(top.windows(2).all(|w| w[0].volatility >= w[1].volatility));

        assert_eq!(top_k(&table[..3], 10).len(), 3);
        assert!(top_k(&[], 10).is_empty());
    }

    #[test]
    fn test_top_k_year_measure_average_keeps_only_ranked_regions() {
        let year_measure = vec![
            YearMeasureAverage { year: 2020, measure: "A".to_string(), value: 1.0 },
            YearMeasureAverage { year: 2020, measure: "B".to_string(), value: 2.0 },
            YearMeasureAverage { year: 2021, measure: "C".to_string(), value: 3.0 },
        ];
        let top = vec![vol("C", 9.0), vol("A", 1.0)];
        let kept = top_k_year_measure_average(&year_measure, &top);
        let names: Vec<&str> = kept.iter().map(|a| a.measure.as_str()).collect();
        assert_eq!(names, vec!["A", "C"], "input order is preserved");
    }
}
