//! The render pipeline: filter → aggregate → rank → link.
//!
//! `render` is a pure function of the immutable dataset and the caller's
//! selection state. Running it twice with the same inputs yields identical
//! tables; nothing is cached between calls.

use crate::analysis::aggregate::{year_measure_average, yearly_average};
use crate::analysis::crossfilter::CrossFilter;
use crate::analysis::filter::filter;
use crate::analysis::volatility::{region_volatility, top_k, top_k_year_measure_average};
use crate::logging::{self, Stage};
use crate::model::{Choice, Dataset, DerivedTables, SelectionState, TOP_K};

/// Computes every derived table for one render cycle.
///
/// The filtered views follow `selection`. The volatility ranking, its
/// companion points, and the overall average line are computed from the
/// bounded dataset and do not move when the sidebar changes.
pub fn render(dataset: &Dataset, selection: &SelectionState, cross_filter: &CrossFilter) -> DerivedTables {
    let bounded = dataset.bounded();
    let region_label = match &selection.region {
        Choice::All => None,
        Choice::Only(region) => Some(region.as_str()),
    };

    let filtered_rows = filter(&bounded, selection);
    logging::debug(
        Stage::Filter,
        region_label,
        &format!("{} of {} bounded rows selected", filtered_rows.len(), bounded.len()),
    );
    if filtered_rows.is_empty() && region_label.is_some() {
        logging::warn(Stage::Filter, region_label, "selection matches no rows");
    }

    let yearly = yearly_average(&filtered_rows);
    let year_measure = year_measure_average(&filtered_rows);
    logging::debug(
        Stage::Aggregate,
        region_label,
        &format!("{} yearly means, {} year/region means", yearly.len(), year_measure.len()),
    );

    let ranking = top_k(&region_volatility(&bounded), TOP_K);
    let overall_year_measure = year_measure_average(&bounded);
    let top_points = top_k_year_measure_average(&overall_year_measure, &ranking);
    logging::debug(
        Stage::Rank,
        None,
        &format!("{} ranked regions, {} companion points", ranking.len(), top_points.len()),
    );

    DerivedTables {
        selection: selection.clone(),
        filtered_rows,
        yearly_average: yearly,
        year_measure_average: year_measure,
        region_volatility: ranking,
        linked_points: cross_filter.link(&top_points),
        top_k_year_measure_average: top_points,
        overall_yearly_average: yearly_average(&bounded),
        active_measure: cross_filter.active().clone(),
    }
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

/// One viewer's state. Sessions share only the read-only dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardSession {
    selection: SelectionState,
    cross_filter: CrossFilter,
}

impl DashboardSession {
    pub fn new(selection: SelectionState, cross_filter: CrossFilter) -> Self {
        Self {
            selection,
            cross_filter,
        }
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn cross_filter(&self) -> &CrossFilter {
        &self.cross_filter
    }

    pub fn select_region(&mut self, label: &str) {
        self.selection.region = Choice::parse(label);
    }

    pub fn select_source(&mut self, label: &str) {
        self.selection.source = Choice::parse(label);
    }

    pub fn toggle_measure(&mut self, measure: &str) {
        self.cross_filter.toggle(measure);
    }

    pub fn clear_measure(&mut self) {
        self.cross_filter.clear();
    }

    pub fn recompute(&self, dataset: &Dataset) -> DerivedTables {
        render(dataset, &self.selection, &self.cross_filter)
    }
}
