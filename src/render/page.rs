//! Static HTML page around the Vega-Lite charts.

use super::charts;
use crate::model::{ActiveMeasure, DerivedTables, SelectionState};
use serde_json::{json, Value};

const VEGA_SCRIPTS: &[&str] = &[
    "https://cdn.jsdelivr.net/npm/vega@5",
    "https://cdn.jsdelivr.net/npm/vega-lite@5",
    "https://cdn.jsdelivr.net/npm/vega-embed@6",
];

/// Sidebar and heading content that is not part of the derived tables.
#[derive(Debug, Clone)]
pub struct PageContext {
    pub title: String,
    pub region_options: Vec<String>,
    /// `None` when the source picker is disabled.
    pub source_options: Option<Vec<String>>,
}

/// Escapes text for HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Browser side of the region toggle. A click on the bar that is already
/// selected empties the selection store, which returns both views to
/// neutral. Clicks on the companion points leave the selection alone.
const TOGGLE_SCRIPT: &str = r#"function toggleOffOnRepeat(view, store, initial) {
  let active = initial;
  view.addEventListener('click', function (event, item) {
    const datum = item && item.datum;
    if (datum && datum.Volatility !== undefined) {
      if (datum.Measure === active) {
        active = null;
        setTimeout(function () { view.data(store, []).runAsync(); }, 0);
      } else {
        active = datum.Measure;
      }
    } else if (!datum) {
      active = null;
    }
  });
}
"#;

/// Serializes a spec for inline `<script>` use.
fn script_json(spec: &Value) -> String {
    spec.to_string().replace("</", "<\\/")
}

fn option_list(label: &str, options: &[String], selected: &str) -> String {
    let items: String = options
        .iter()
        .map(|o| {
            let marker = if o == selected { " class=\"selected\"" } else { "" };
            format!("<li{}>{}</li>", marker, escape_html(o))
        })
        .collect();
    format!("<h3>{}</h3><ul>{}</ul>", escape_html(label), items)
}

fn sidebar(ctx: &PageContext, selection: &SelectionState) -> String {
    let mut html = String::from("<aside>\n<h2>Choose a Region To View</h2>\n");
    html.push_str(
        "<p>The first charts are connected to the region selected and will display corresponding data.</p>\n",
    );
    html.push_str(&format!(
        "<p>Region: <strong>{}</strong></p>\n",
        escape_html(&selection.region.to_string())
    ));
    if let Some(sources) = &ctx.source_options {
        html.push_str(&format!(
            "<p>Data Source: <strong>{}</strong></p>\n",
            escape_html(&selection.source.to_string())
        ));
        html.push_str(&option_list("Data Sources", sources, &selection.source.to_string()));
    }
    html.push_str(&option_list("Regions", &ctx.region_options, &selection.region.to_string()));
    html.push_str("\n</aside>\n");
    html
}

const VOLATILITY_SECTION: &str = "volatility";

fn initial_active(active: &ActiveMeasure) -> Value {
    match active {
        ActiveMeasure::Neutral => Value::Null,
        ActiveMeasure::Measure(measure) => json!(measure),
    }
}

struct Section {
    id: &'static str,
    heading: &'static str,
    intro: &'static str,
    spec: Value,
}

fn sections(tables: &DerivedTables) -> Vec<Section> {
    vec![
        Section {
            id: "heatmap",
            heading: "Annual Sea Level Changes by Region",
            intro: "How sea levels have shifted across regions and years. Darker colors represent greater sea level increases.",
            spec: charts::heatmap(&tables.year_measure_average),
        },
        Section {
            id: "series",
            heading: "Sea Level Trends Over Time",
            intro: "Every reading for the selected region over its observation date.",
            spec: charts::time_series(&tables.filtered_rows),
        },
        Section {
            id: "yearly",
            heading: "Average Sea Level Change by Year",
            intro: "The mean of all selected readings in each year.",
            spec: charts::yearly_average(&tables.yearly_average),
        },
        Section {
            id: "change",
            heading: "Year-over-Year Change",
            intro: "How much the yearly average moved compared with the year before.",
            spec: charts::yearly_change(&tables.yearly_average),
        },
        Section {
            id: VOLATILITY_SECTION,
            heading: "Regional Volatility in Sea Level Change",
            intro: "The 10 regions with the highest standard deviation in sea level change, across all regions regardless of the sidebar. Click a region to highlight its yearly values against the annual average of all regions; click the same region again to reset.",
            spec: charts::volatility_panel(
                &tables.region_volatility,
                &tables.linked_points,
                &tables.overall_yearly_average,
                &tables.active_measure,
            ),
        },
    ]
}

/// Renders the full dashboard page.
pub fn render_page(ctx: &PageContext, tables: &DerivedTables) -> String {
    let title = escape_html(&ctx.title);
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", title));
    for src in VEGA_SCRIPTS {
        html.push_str(&format!("<script src=\"{}\"></script>\n", src));
    }
    html.push_str(
        "<style>body{font-family:sans-serif;display:flex;gap:2rem;margin:1rem}\
aside{min-width:14rem}main{flex:1}li.selected{font-weight:bold}\
.chart{width:100%}</style>\n",
    );
    html.push_str("</head>\n<body>\n");
    html.push_str(&sidebar(ctx, &tables.selection));
    html.push_str("<main>\n");
    html.push_str(&format!("<h1>{}</h1>\n", title));
    html.push_str(
        "<p>A visual narrative exploring changes in global and regional sea levels.</p>\n",
    );

    let sections = sections(tables);
    for section in &sections {
        html.push_str(&format!(
            "<section>\n<h2>{}</h2>\n<p>{}</p>\n<div class=\"chart\" id=\"chart-{}\"></div>\n</section>\n",
            escape_html(section.heading),
            escape_html(section.intro),
            section.id
        ));
    }

    html.push_str("</main>\n<script>\n");
    html.push_str(TOGGLE_SCRIPT);
    for section in &sections {
        let embed = format!(
            "vegaEmbed('#chart-{}', {}, {{\"actions\": false}})",
            section.id,
            script_json(&section.spec)
        );
        if section.id == VOLATILITY_SECTION {
            html.push_str(&format!(
                "{}.then(function (result) {{ toggleOffOnRepeat(result.view, {}, {}); }});\n",
                embed,
                script_json(&json!(format!("{}_store", charts::REGION_SELECT))),
                script_json(&initial_active(&tables.active_measure))
            ));
        } else {
            html.push_str(&format!("{};\n", embed));
        }
    }
    html.push_str("</script>\n</body>\n</html>\n");
    html
}
