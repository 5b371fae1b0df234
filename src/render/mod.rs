//! Presentation output.
//!
//! Turns `DerivedTables` into files a browser can open:
//! - `dashboard.html`: the page with every chart embedded via vega-embed.
//! - `derived.json`: the derived tables themselves, pretty-printed.
//!
//! Submodules:
//! - `charts`: Vega-Lite spec builders, one per chart.
//! - `page`: the static HTML page and its sidebar.

pub mod charts;
pub mod page;

use crate::logging::{self, Stage};
use crate::model::{DashboardError, DerivedTables};
use std::fs;
use std::path::{Path, PathBuf};

pub use page::{render_page, PageContext};

pub const PAGE_FILE: &str = "dashboard.html";
pub const TABLES_FILE: &str = "derived.json";

/// Paths written by `write_dashboard`.
#[derive(Debug, Clone, PartialEq)]
pub struct WrittenFiles {
    pub page: PathBuf,
    pub tables: PathBuf,
}

/// Writes the page and the derived tables into `output_dir`, creating it
/// if needed.
pub fn write_dashboard(
    output_dir: &Path,
    ctx: &PageContext,
    tables: &DerivedTables,
) -> Result<WrittenFiles, DashboardError> {
    fs::create_dir_all(output_dir)?;

    let page = output_dir.join(PAGE_FILE);
    fs::write(&page, render_page(ctx, tables))?;

    let tables_path = output_dir.join(TABLES_FILE);
    fs::write(&tables_path, serde_json::to_string_pretty(tables)?)?;

    logging::info(
        Stage::Render,
        None,
        &format!("Wrote {} and {}", page.display(), tables_path.display()),
    );

    Ok(WrittenFiles {
        page,
        tables: tables_path,
    })
}
