//! Sea level dashboard.
//!
//! Loads a table of sea-level measurements by region and year, derives the
//! tables behind the dashboard charts (filtered rows, yearly means and
//! change, per-region volatility ranking, linked top-10 points), and writes
//! a static Vega-Lite page.

pub mod analysis;
pub mod config;
pub mod indicators;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod render;
pub mod verify;
