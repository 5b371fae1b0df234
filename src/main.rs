//! Renders the sea level dashboard for the configured selection.
//!
//! Usage: `sealevel_dashboard [config.toml]`
//!
//! The optional argument names the config file (default `sealevel.toml`,
//! or `SEALEVEL_CONFIG`). A missing or unreadable dataset is fatal.

use sealevel_dashboard::analysis::crossfilter::CrossFilter;
use sealevel_dashboard::config;
use sealevel_dashboard::ingest;
use sealevel_dashboard::logging::{self, Stage};
use sealevel_dashboard::pipeline::DashboardSession;
use sealevel_dashboard::render::{self, PageContext};
use sealevel_dashboard::verify::{self, VerificationStatus};
use std::process::ExitCode;

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let explicit = std::env::args().nth(1);
    let (config, config_path) = config::load_from_env(explicit.as_deref())?;

    logging::init_logger(
        config.logging.min_level(),
        config.logging.file.as_deref(),
        config.logging.timestamps,
    );
    logging::info(
        Stage::Config,
        None,
        &format!("Using configuration {}", config_path.display()),
    );

    let report = ingest::load_dataset(&config.data.path, config.data.year_cutoff, config.data.strict)?;

    let verification = verify::verify_dataset(&report);
    verify::print_summary(&verification);
    if verification.status == VerificationStatus::Failed {
        logging::warn(
            Stage::Verify,
            None,
            "No rows within the year cutoff; every chart will be empty",
        );
    }

    let dataset = report.dataset;
    let session = DashboardSession::new(
        config.selection_state(),
        CrossFilter::with_active(config.selection.active_measure.as_deref()),
    );
    let tables = session.recompute(&dataset);

    let ctx = PageContext {
        title: config.dashboard.title.clone(),
        region_options: dataset.region_options(),
        source_options: config
            .dashboard
            .source_filter
            .then(|| dataset.source_options()),
    };
    let written = render::write_dashboard(&config.dashboard.output_dir, &ctx, &tables)?;

    println!("\n✅ Dashboard written to {}", written.page.display());
    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            logging::error(Stage::System, None, &e.to_string());
            eprintln!("sealevel_dashboard: {}", e);
            ExitCode::FAILURE
        }
    }
}
