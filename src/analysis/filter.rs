//! Region and data-source filtering.

use crate::model::{Measurement, SelectionState};

/// Returns the rows admitted by `selection`. Region and source restrictions
/// compose with AND; `All` leaves that dimension unrestricted.
///
/// A selection that matches nothing yields an empty vector, never an error.
pub fn filter(rows: &[Measurement], selection: &SelectionState) -> Vec<Measurement> {
    rows.iter()
        .filter(|m| selection.region.admits(Some(m.measure.as_str())))
        .filter(|m| selection.source.admits(m.indicator.as_deref()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fixtures::{m, two_regions};

    fn with_indicator(mut row: Measurement, indicator: &str) -> Measurement {
        row.indicator = Some(indicator.to_string());
        row
    }

    #[test]
    fn test_all_returns_every_row() {
        let rows = two_regions();
        assert_eq!(filter(&rows, &SelectionState::default()), rows);
    }

    #[test]
    fn test_region_keeps_only_matching_rows() {
        let rows = two_regions();
        let out = filter(&rows, &SelectionState::region("B"));
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|r| r.measure == "B"));
    }

    #[test]
    fn test_region_selection_is_trimmed_before_matching() {
        let rows = two_regions();
        let out = filter(&rows, &SelectionState::region("  A "));
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_unknown_region_yields_empty_subset() {
        let rows = two_regions();
        assert!(filter(&rows, &SelectionState::region("Atlantis")).is_empty());
    }

    #[test]
    fn test_region_and_source_compose_with_and() {
        let rows = vec![
            with_indicator(m("A", 2020, 1.0), "Jason.1"),
            with_indicator(m("A", 2021, 2.0), "Jason.2"),
            with_indicator(m("B", 2020, 3.0), "Jason.1"),
            m("A", 2022, 4.0),
        ];
        let selection = SelectionState::new("A", "Jason.1");
        let out = filter(&rows, &selection);
        assert_eq!(out, vec![rows[0].clone()]);
    }

    #[test]
    fn test_specific_source_excludes_rows_without_indicator() {
        let rows = vec![m("A", 2020, 1.0)];
        let selection = SelectionState::new("All", "Trend");
        assert!(filter(&rows, &selection).is_empty());
    }

    #[test]
    fn test_filter_does_not_mutate_input() {
        let rows = two_regions();
        let before = rows.clone();
        let _ = filter(&rows, &SelectionState::region("A"));
        assert_eq!(rows, before);
    }
}
