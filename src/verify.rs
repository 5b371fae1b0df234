//! Dataset Verification Module
//!
//! Checks a freshly loaded dataset before it is rendered: how many rows
//! survived the loader, how many sit beyond the year cutoff, which regions
//! cannot be ranked, and which indicator labels the rename table missed.

use crate::analysis::volatility::unrankable_regions;
use crate::ingest::{LoadReport, RejectedRow};
use chrono::Utc;
use serde::Serialize;
use std::collections::BTreeSet;

// ============================================================================
// Verification Results
// ============================================================================

#[derive(Debug, Clone, Serialize, PartialEq)]
pub enum VerificationStatus {
    Success,
    PartialSuccess,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerificationReport {
    pub timestamp: String,
    pub status: VerificationStatus,
    pub total_rows: usize,
    pub accepted_rows: usize,
    pub bounded_rows: usize,
    pub beyond_cutoff_rows: usize,
    pub year_cutoff: i32,
    /// First and last year among bounded rows.
    pub year_range: Option<(i32, i32)>,
    pub region_count: usize,
    /// Regions with too few bounded observations for a volatility ranking.
    pub unrankable_regions: Vec<String>,
    pub rejected: Vec<RejectedRow>,
    pub unmapped_indicators: Vec<String>,
}

// ============================================================================
// Verification
// ============================================================================

pub fn verify_dataset(report: &LoadReport) -> VerificationReport {
    let dataset = &report.dataset;
    let bounded = dataset.bounded();

    let year_range = bounded
        .iter()
        .map(|m| m.year)
        .fold(None, |range: Option<(i32, i32)>, year| match range {
            None => Some((year, year)),
            Some((lo, hi)) => Some((lo.min(year), hi.max(year))),
        });

    let regions: BTreeSet<&str> = bounded.iter().map(|m| m.measure.as_str()).collect();
    let unrankable = unrankable_regions(&bounded);

    let status = if bounded.is_empty() {
        VerificationStatus::Failed
    } else if report.rejected.is_empty() && unrankable.is_empty() {
        VerificationStatus::Success
    } else {
        VerificationStatus::PartialSuccess
    };

    VerificationReport {
        timestamp: Utc::now().to_rfc3339(),
        status,
        total_rows: report.total_rows,
        accepted_rows: dataset.len(),
        bounded_rows: bounded.len(),
        beyond_cutoff_rows: dataset.len() - bounded.len(),
        year_cutoff: dataset.year_cutoff(),
        year_range,
        region_count: regions.len(),
        unrankable_regions: unrankable,
        rejected: report.rejected.clone(),
        unmapped_indicators: report.unmapped_indicators.iter().cloned().collect(),
    }
}

pub fn print_summary(report: &VerificationReport) {
    println!("\n═══════════════════════════════════════════════════════════");
    println!("📊 DATASET VERIFICATION");
    println!("═══════════════════════════════════════════════════════════");
    println!();
    println!("Status:           {:?}", report.status);
    println!(
        "Rows:             {}/{} accepted  ({} rejected)",
        report.accepted_rows,
        report.total_rows,
        report.rejected.len()
    );
    println!(
        "Bounded:          {} rows  ({} after {} excluded)",
        report.bounded_rows, report.beyond_cutoff_rows, report.year_cutoff
    );
    match report.year_range {
        Some((first, last)) => println!("Years:            {}–{}", first, last),
        None => println!("Years:            none"),
    }
    println!("Regions:          {}", report.region_count);

    if !report.unrankable_regions.is_empty() {
        println!("\n⚠️  Not ranked (fewer than 2 observations):");
        for region in &report.unrankable_regions {
            println!("   - {}", region);
        }
    }

    if !report.unmapped_indicators.is_empty() {
        println!("\n⚠️  Indicators without a short label:");
        for label in &report.unmapped_indicators {
            println!("   - {}", label);
        }
    }

    if !report.rejected.is_empty() {
        println!("\n❌ Rejected rows ({}):", report.rejected.len());
        for reject in report.rejected.iter().take(10) {
            println!("   - row {}: {}", reject.row, reject.reason);
        }
        if report.rejected.len() > 10 {
            println!("   ... and {} more", report.rejected.len() - 10);
        }
    }
    println!("═══════════════════════════════════════════════════════════");
}
