//! Linked selection between the volatility ranking and its companion chart.
//!
//! Clicking a bar makes its region the active measure; clicking it again, or
//! clearing, returns to neutral. The filter only decides emphasis. Points
//! for other regions fade but stay in the chart so their tooltips remain
//! reachable.

use crate::model::{ActiveMeasure, LinkedPoint, YearMeasureAverage};

pub const EMPHASIZED_OPACITY: f64 = 1.0;
pub const DEEMPHASIZED_OPACITY: f64 = 0.05;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CrossFilter {
    active: ActiveMeasure,
}

impl CrossFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with `measure` active; `None` or blank means neutral.
    pub fn with_active(measure: Option<&str>) -> Self {
        let mut filter = Self::new();
        if let Some(m) = measure.map(str::trim).filter(|m| !m.is_empty()) {
            filter.toggle(m);
        }
        filter
    }

    pub fn active(&self) -> &ActiveMeasure {
        &self.active
    }

    pub fn is_neutral(&self) -> bool {
        matches!(self.active, ActiveMeasure::Neutral)
    }

    /// Selects `measure`, or returns to neutral when it is already selected.
    pub fn toggle(&mut self, measure: &str) {
        self.active = match &self.active {
            ActiveMeasure::Measure(current) if current == measure => ActiveMeasure::Neutral,
            _ => ActiveMeasure::Measure(measure.to_string()),
        };
    }

    pub fn clear(&mut self) {
        self.active = ActiveMeasure::Neutral;
    }

    pub fn is_emphasized(&self, measure: &str) -> bool {
        match &self.active {
            ActiveMeasure::Neutral => true,
            ActiveMeasure::Measure(active) => active == measure,
        }
    }

    pub fn opacity(&self, measure: &str) -> f64 {
        if self.is_emphasized(measure) {
            EMPHASIZED_OPACITY
        } else {
            DEEMPHASIZED_OPACITY
        }
    }

    /// Pairs every point with its opacity. Output order and length match
    /// the input.
    pub fn link(&self, points: &[YearMeasureAverage]) -> Vec<LinkedPoint> {
        points
            .iter()
            .map(|p| LinkedPoint {
                year: p.year,
                measure: p.measure.clone(),
                value: p.value,
                opacity: self.opacity(&p.measure),
            })
            .collect()
    }
}
