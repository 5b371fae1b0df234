//! Vega-Lite chart specifications.
//!
//! Each builder takes already-derived rows and emits a self-contained
//! Vega-Lite v5 spec with inline data. Field names in the emitted data match
//! the source table's column names (`Measure`, `Year`, `Value`, ...) so
//! tooltips read the same as the spreadsheet.

use crate::analysis::crossfilter::{DEEMPHASIZED_OPACITY, EMPHASIZED_OPACITY};
use crate::model::{
    ActiveMeasure, LinkedPoint, Measurement, RegionVolatility, YearMeasureAverage, YearlyAverage,
};
use serde_json::{json, Value};

pub const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";

/// Name of the point selection shared by the volatility bars and the
/// companion scatter.
pub const REGION_SELECT: &str = "region_select";

pub const VOLATILITY_CHART_WIDTH: u32 = 600;
pub const VOLATILITY_MIN_HEIGHT: u32 = 400;
pub const VOLATILITY_BAR_HEIGHT: u32 = 40;

/// Opacity for volatility bars outside the active selection.
pub const UNSELECTED_BAR_OPACITY: f64 = 0.3;

/// Height of the volatility chart: 40px per bar, never under 400px.
pub fn volatility_chart_height(bars: usize) -> u32 {
    let bars = bars.max(1) as u32;
    (VOLATILITY_BAR_HEIGHT * bars).max(VOLATILITY_MIN_HEIGHT)
}

/// Pan/zoom bound to the scales. Only continuous axes can bind, so this is
/// used on the temporal series alone.
fn scale_binding(name: &str) -> Value {
    json!({ "name": name, "select": "interval", "bind": "scales" })
}

/// Year × region grid colored by the mean value of each cell. One rect per
/// (year, region) pair.
pub fn heatmap(cells: &[YearMeasureAverage]) -> Value {
    let values: Vec<Value> = cells
        .iter()
        .map(|c| json!({ "Measure": c.measure, "Year": c.year, "Value": c.value }))
        .collect();

    json!({
        "$schema": VEGA_LITE_SCHEMA,
        "title": "Mean Sea Level Change by Year Across All Measured Regions",
        "width": "container",
        "data": { "values": values },
        "mark": "bar",
        "encoding": {
            "x": { "field": "Year", "type": "ordinal" },
            "y": { "field": "Measure", "type": "nominal", "title": "Region" },
            "color": {
                "field": "Value",
                "type": "quantitative",
                "scale": { "scheme": "lightgreyred" },
                "title": "Change in Mean Sea Level"
            },
            "tooltip": [
                { "field": "Measure", "type": "nominal" },
                { "field": "Year", "type": "ordinal" },
                { "field": "Value", "type": "quantitative" }
            ]
        }
    })
}

/// Raw values over the observation date. Rows without a date are skipped.
pub fn time_series(rows: &[Measurement]) -> Value {
    let values: Vec<Value> = rows
        .iter()
        .filter_map(|r| {
            r.date.map(|d| {
                json!({
                    "Date": d.format("%Y-%m-%d").to_string(),
                    "Year": r.year,
                    "Value": r.value,
                    "Measure": r.measure,
                })
            })
        })
        .collect();

    json!({
        "$schema": VEGA_LITE_SCHEMA,
        "title": "Sea Level Changes Over Time",
        "width": "container",
        "data": { "values": values },
        "mark": "line",
        "params": [scale_binding("series_zoom")],
        "encoding": {
            "x": { "field": "Date", "type": "temporal" },
            "y": { "field": "Value", "type": "quantitative" },
            "tooltip": [
                { "field": "Year", "type": "ordinal" },
                { "field": "Value", "type": "quantitative" }
            ]
        }
    })
}

fn yearly_values(yearly: &[YearlyAverage]) -> Vec<Value> {
    yearly
        .iter()
        .map(|y| json!({ "Year": y.year, "Value": y.value, "Change": y.change }))
        .collect()
}

/// Mean value per year as a line with point markers.
pub fn yearly_average(yearly: &[YearlyAverage]) -> Value {
    json!({
        "$schema": VEGA_LITE_SCHEMA,
        "title": "Average Sea Level Change by Year",
        "width": "container",
        "data": { "values": yearly_values(yearly) },
        "mark": { "type": "line", "point": true },
        "encoding": {
            "x": { "field": "Year", "type": "ordinal" },
            "y": {
                "field": "Value",
                "type": "quantitative",
                "title": "Average Sea Level Change (mm)"
            },
            "tooltip": [
                { "field": "Year", "type": "ordinal" },
                { "field": "Value", "type": "quantitative" }
            ]
        }
    })
}

/// Year-over-year change of the yearly mean. The first year has no change
/// and is omitted.
pub fn yearly_change(yearly: &[YearlyAverage]) -> Value {
    let values: Vec<Value> = yearly
        .iter()
        .filter_map(|y| y.change.map(|c| json!({ "Year": y.year, "Change": c })))
        .collect();

    json!({
        "$schema": VEGA_LITE_SCHEMA,
        "title": "Year-over-Year Change in Average Sea Level",
        "width": "container",
        "data": { "values": values },
        "mark": "bar",
        "encoding": {
            "x": { "field": "Year", "type": "ordinal" },
            "y": {
                "field": "Change",
                "type": "quantitative",
                "title": "Change from Previous Year (mm)"
            },
            "color": {
                "condition": { "test": "datum.Change < 0", "value": "#4c78a8" },
                "value": "#e45756"
            },
            "tooltip": [
                { "field": "Year", "type": "ordinal" },
                { "field": "Change", "type": "quantitative" }
            ]
        }
    })
}

/// Single-region point selection. Shift-click multi-select is disabled;
/// the page script resets the selection when the active bar is clicked again.
fn region_select_param(active: &ActiveMeasure) -> Value {
    let mut param = json!({
        "name": REGION_SELECT,
        "select": { "type": "point", "fields": ["Measure"], "toggle": false }
    });
    if let ActiveMeasure::Measure(measure) = active {
        param["value"] = json!([{ "Measure": measure }]);
    }
    param
}

fn region_color() -> Value {
    json!({
        "field": "Measure",
        "type": "nominal",
        "scale": { "scheme": "category10" },
        "title": "Region"
    })
}

/// Top-K volatility bars. Owns the `region_select` parameter.
pub fn volatility_bars(ranking: &[RegionVolatility], active: &ActiveMeasure) -> Value {
    let values: Vec<Value> = ranking
        .iter()
        .map(|r| json!({ "Measure": r.measure, "Volatility": r.volatility }))
        .collect();

    json!({
        "title": "Top 10 Most Volatile Sea Regions by Sea Level Change",
        "width": VOLATILITY_CHART_WIDTH,
        "height": volatility_chart_height(ranking.len()),
        "data": { "values": values },
        "mark": "bar",
        "params": [region_select_param(active)],
        "encoding": {
            "x": {
                "field": "Volatility",
                "type": "quantitative",
                "title": "Standard Deviation (mm)"
            },
            "y": { "field": "Measure", "type": "nominal", "sort": "-x", "title": "Region" },
            "color": region_color(),
            "opacity": {
                "condition": { "param": REGION_SELECT, "value": 1, "empty": true },
                "value": UNSELECTED_BAR_OPACITY
            },
            "tooltip": [
                { "field": "Measure", "type": "nominal" },
                { "field": "Volatility", "type": "quantitative" }
            ]
        }
    })
}

/// Top-K yearly points layered over the overall yearly-average line. Point
/// emphasis follows `region_select` so it tracks clicks in the browser; the
/// precomputed opacities stay in `derived.json`. Faded points stay hoverable.
pub fn linked_scatter(points: &[LinkedPoint], overall: &[YearlyAverage]) -> Value {
    let point_values: Vec<Value> = points
        .iter()
        .map(|p| {
            json!({
                "Year": p.year,
                "Measure": p.measure,
                "Value": p.value,
            })
        })
        .collect();

    json!({
        "title": "Yearly Sea Level Changes and Annual Average",
        "width": VOLATILITY_CHART_WIDTH,
        "layer": [
            {
                "data": { "values": point_values },
                "mark": { "type": "circle", "size": 60 },
                "encoding": {
                    "x": { "field": "Year", "type": "ordinal", "title": "Year" },
                    "y": { "field": "Value", "type": "quantitative" },
                    "color": region_color(),
                    "opacity": {
                        "condition": {
                            "param": REGION_SELECT,
                            "value": EMPHASIZED_OPACITY,
                            "empty": true
                        },
                        "value": DEEMPHASIZED_OPACITY
                    },
                    "tooltip": [
                        { "field": "Year", "type": "ordinal" },
                        { "field": "Measure", "type": "nominal" },
                        { "field": "Value", "type": "quantitative" }
                    ]
                }
            },
            {
                "data": { "values": yearly_values(overall) },
                "mark": { "type": "line", "color": "black", "strokeWidth": 3 },
                "encoding": {
                    "x": { "field": "Year", "type": "ordinal", "title": "Year" },
                    "y": {
                        "field": "Value",
                        "type": "quantitative",
                        "title": "Average Sea Level Change (mm)"
                    },
                    "tooltip": [
                        { "field": "Year", "type": "ordinal" },
                        { "field": "Value", "type": "quantitative" }
                    ]
                }
            }
        ]
    })
}

/// The ranking stacked above its companion chart so both views share one
/// selection.
pub fn volatility_panel(
    ranking: &[RegionVolatility],
    points: &[LinkedPoint],
    overall: &[YearlyAverage],
    active: &ActiveMeasure,
) -> Value {
    json!({
        "$schema": VEGA_LITE_SCHEMA,
        "vconcat": [volatility_bars(ranking, active), linked_scatter(points, overall)]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::aggregate::year_measure_average;
    use chrono::NaiveDate;

    fn row(measure: &str, year: i32, value: f64, date: Option<NaiveDate>) -> Measurement {
        Measurement {
            measure: measure.to_string(),
            year,
            date,
            value,
            indicator: None,
        }
    }

    #[test]
    fn test_volatility_height_has_floor_and_scales_per_bar() {
        assert_eq!(volatility_chart_height(0), 400);
        assert_eq!(volatility_chart_height(3), 400);
        assert_eq!(volatility_chart_height(10), 400);
        assert_eq!(volatility_chart_height(12), 480);
    }

    #[test]
    fn test_heatmap_uses_source_column_names() {
        let cells = year_measure_average(&[row("Baltic Sea", 2020, 3.5, None)]);
        let spec = heatmap(&cells);
        let first = &spec["data"]["values"][0];
        assert_eq!(first["Measure"], "Baltic Sea");
        assert_eq!(first["Year"], 2020);
        assert_eq!(spec["encoding"]["color"]["scale"]["scheme"], "lightgreyred");
    }

    #[test]
    fn test_heatmap_draws_one_cell_per_year_and_region_at_the_mean() {
        let rows = vec![
            row("A", 2020, 0.0, None),
            row("A", 2020, 10.0, None),
            row("A", 2020, 200.0, None),
            row("B", 2020, 4.0, None),
        ];
        let spec = heatmap(&year_measure_average(&rows));
        let values = spec["data"]["values"].as_array().unwrap();
        assert_eq!(values.len(), 2, "duplicate readings collapse into one cell");
        assert_eq!(values[0]["Measure"], "A");
        assert_eq!(values[0]["Value"], 70.0);
        assert_eq!(values[1]["Value"], 4.0);
    }

    #[test]
    fn test_scale_binding_only_on_continuous_axes() {
        assert!(heatmap(&[]).get("params").is_none());
        assert!(linked_scatter(&[], &[])["layer"][0].get("params").is_none());
        assert_eq!(time_series(&[])["params"][0]["bind"], "scales");
    }

    #[test]
    fn test_time_series_skips_undated_rows() {
        let dated = NaiveDate::from_ymd_opt(1993, 1, 4);
        let spec = time_series(&[row("A", 1993, 1.0, dated), row("A", 1993, 2.0, None)]);
        let values = spec["data"]["values"].as_array().unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(values[0]["Date"], "1993-01-04");
    }

    #[test]
    fn test_yearly_change_omits_first_year() {
        let yearly = vec![
            YearlyAverage { year: 2020, value: 55.0, change: None },
            YearlyAverage { year: 2021, value: 41.0, change: Some(-14.0) },
        ];
        let spec = yearly_change(&yearly);
        let values = spec["data"]["values"].as_array().unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(values[0]["Change"], -14.0);
    }

    #[test]
    fn test_neutral_selection_has_no_initial_value() {
        let spec = volatility_bars(&[], &ActiveMeasure::Neutral);
        let param = &spec["params"][0];
        assert_eq!(param["name"], REGION_SELECT);
        assert!(param.get("value").is_none());
    }

    #[test]
    fn test_region_select_is_single_region() {
        let spec = volatility_bars(&[], &ActiveMeasure::Neutral);
        assert_eq!(spec["params"][0]["select"]["toggle"], false, "shift-click must not multi-select");
    }

    #[test]
    fn test_active_measure_seeds_selection_value() {
        let spec = volatility_bars(&[], &ActiveMeasure::Measure("Yellow Sea".to_string()));
        assert_eq!(spec["params"][0]["value"][0]["Measure"], "Yellow Sea");
    }

    #[test]
    fn test_linked_points_fade_instead_of_filtering() {
        let spec = linked_scatter(&[], &[]);
        let points = &spec["layer"][0];
        assert!(points.get("transform").is_none(), "faded points must not be filtered out");
        assert_eq!(points["encoding"]["opacity"]["condition"]["param"], REGION_SELECT);
        assert_eq!(points["encoding"]["opacity"]["value"], DEEMPHASIZED_OPACITY);
        assert_eq!(spec["layer"][1]["mark"]["color"], "black");
    }

    #[test]
    fn test_linked_values_carry_no_unused_fields() {
        let points = vec![LinkedPoint {
            year: 2020,
            measure: "A".to_string(),
            value: 1.5,
            opacity: DEEMPHASIZED_OPACITY,
        }];
        let spec = linked_scatter(&points, &[]);
        let first = &spec["layer"][0]["data"]["values"][0];
        assert_eq!(first["Measure"], "A");
        assert!(first.get("Opacity").is_none());
    }

    #[test]
    fn test_panel_concatenates_ranking_above_companion() {
        let panel = volatility_panel(&[], &[], &[], &ActiveMeasure::Neutral);
        let views = panel["vconcat"].as_array().unwrap();
        assert_eq!(views.len(), 2);
        assert!(views[1]["layer"].is_array());
    }
}
