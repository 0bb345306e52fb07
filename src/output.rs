//! Console and file output for district counts.
//!
//! Supports a plain-text table dump, a JSON report and a CSV export of the
//! ranked districts.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tracing::debug;

use crate::aggregate::{DistrictCounts, ScanStats};
use crate::rank::RankedEntry;

/// Printed when no district received a count.
pub const EMPTY_NOTICE: &str = "No valid registrations found for the given year.";

/// Everything a run produced, in serializable form.
#[derive(Debug, Serialize)]
pub struct DistrictReport<'a> {
    pub generated_at: DateTime<Utc>,
    pub target_year: &'a str,
    pub total_registrations: u64,
    pub stats: ScanStats,
    pub counts: &'a DistrictCounts,
    pub top: &'a [RankedEntry],
}

impl<'a> DistrictReport<'a> {
    pub fn new(
        target_year: &'a str,
        counts: &'a DistrictCounts,
        stats: ScanStats,
        top: &'a [RankedEntry],
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            target_year,
            total_registrations: counts.total(),
            stats,
            counts,
            top,
        }
    }
}

/// Writes every district and its count, one per line, in first-seen order.
pub fn write_table<W: Write>(out: &mut W, counts: &DistrictCounts) -> Result<()> {
    writeln!(out, "District Registration Counts:")?;
    if counts.is_empty() {
        writeln!(out, "  (none)")?;
        return Ok(());
    }

    let width = counts.iter().map(|(d, _)| d.chars().count()).max().unwrap_or(0);
    for (district, count) in counts.iter() {
        writeln!(out, "  {district:<width$}  {count}")?;
    }
    writeln!(out, "  {}", "-".repeat(width + 2 + counts.total().to_string().len()))?;
    writeln!(out, "  {} registrations in {} districts", counts.total(), counts.len())?;
    Ok(())
}

/// Writes the report as pretty-printed JSON.
pub fn write_json<W: Write>(out: &mut W, report: &DistrictReport<'_>) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)?;
    Ok(())
}

/// Writes the ranked districts to a CSV file with a header row,
/// replacing any existing file.
pub fn write_ranked_csv(path: &Path, ranked: &[RankedEntry]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create '{}'", parent.display()))?;
    }
    debug!(path = %path.display(), rows = ranked.len(), "Writing ranked CSV");

    let mut writer = WriterBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("failed to create '{}'", path.display()))?;

    for entry in ranked {
        writer.serialize(entry)?;
    }
    writer.flush()?;

    Ok(())
}
