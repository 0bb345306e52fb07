//! One full run: aggregate, dump, render, export.

use anyhow::Result;
use std::io::Write;
use tracing::info;

use crate::aggregate::{DistrictCounts, ScanStats};
use crate::chart::{self, RenderOutcome};
use crate::config::Config;
use crate::output::{DistrictReport, write_json, write_ranked_csv, write_table};
use crate::rank;
use crate::source::aggregate_files;

/// Output switches that do not belong in the persisted [`Config`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Also print a JSON report after the table.
    pub json: bool,
}

#[derive(Debug)]
pub struct RunSummary {
    pub counts: DistrictCounts,
    pub stats: ScanStats,
    pub outcome: RenderOutcome,
}

/// Runs the pipeline described by `config`, writing console output to `out`.
#[tracing::instrument(skip_all, fields(year = %config.target_year, top_n = config.top_n))]
pub fn run<W: Write>(config: &Config, options: RunOptions, out: &mut W) -> Result<RunSummary> {
    config.validate()?;

    let (counts, stats) = aggregate_files(config)?;

    write_table(out, &counts)?;
    out.flush()?;

    let outcome = chart::render(
        out,
        &counts,
        config.top_n,
        &config.title(),
        &config.output_plot_path,
    )?;

    if let RenderOutcome::Rendered { path, bars } = &outcome {
        if let Some(csv_path) = &config.csv_output_path {
            write_ranked_csv(csv_path, bars)?;
            info!(path = %csv_path.display(), "Ranked table exported");
        }
        if config.show_plot {
            chart::show(path);
        }
    }

    if options.json {
        let top = rank::top_n(&counts, config.top_n);
        let report = DistrictReport::new(&config.target_year, &counts, stats, &top);
        write_json(out, &report)?;
    }

    Ok(RunSummary {
        counts,
        stats,
        outcome,
    })
}
