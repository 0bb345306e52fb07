//! Horizontal bar chart of the top districts.

use anyhow::{Context, Result};
use plotters::coord::ranged1d::SegmentValue;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

use crate::aggregate::DistrictCounts;
use crate::error::PipelineError;
use crate::output::EMPTY_NOTICE;
use crate::rank::{self, RankedEntry};

const CHART_SIZE: (u32, u32) = (1000, 600);
const BAR_COLOR: RGBColor = RGBColor(0x05, 0x61, 0xF7);

/// What [`render`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    /// There was nothing to draw; no file was written.
    Skipped,
    /// The chart was written to `path`. `bars` is in ranked order, largest first.
    Rendered {
        path: PathBuf,
        bars: Vec<RankedEntry>,
    },
}

/// Draws the `top_n` districts of `counts` as a horizontal bar chart at
/// `output_path`, overwriting any existing file.
///
/// Empty counts write a notice to `out` and no image.
#[tracing::instrument(skip(out, counts), fields(districts = counts.len(), output = %output_path.display()))]
pub fn render<W: Write>(
    out: &mut W,
    counts: &DistrictCounts,
    top_n: usize,
    title: &str,
    output_path: &Path,
) -> Result<RenderOutcome> {
    if counts.is_empty() {
        writeln!(out, "{EMPTY_NOTICE}")?;
        info!("No district counts, chart not rendered");
        return Ok(RenderOutcome::Skipped);
    }

    let ranked = rank::top_n(counts, top_n);

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create '{}'", parent.display()))?;
    }

    let bars = bottom_up(&ranked);
    draw_bars(&bars, title, output_path).map_err(|e| PipelineError::Chart(e.to_string()))?;

    info!(bars = ranked.len(), "Chart written");
    Ok(RenderOutcome::Rendered {
        path: output_path.to_path_buf(),
        bars: ranked,
    })
}

/// Reverses ranked entries so the largest bar is last, which puts it at the
/// top of the y axis.
fn bottom_up(ranked: &[RankedEntry]) -> Vec<RankedEntry> {
    ranked.iter().rev().cloned().collect()
}

fn segment_label(bars: &[RankedEntry], value: &SegmentValue<usize>) -> String {
    match value {
        SegmentValue::CenterOf(i) => bars
            .get(*i)
            .map(|e| e.district.clone())
            .unwrap_or_default(),
        _ => String::new(),
    }
}

fn draw_bars(
    bars: &[RankedEntry],
    title: &str,
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let max = bars.iter().map(|e| e.count).max().unwrap_or(0);
    // Headroom for the count labels past the longest bar.
    let x_max = max + max / 10 + 1;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(45)
        .y_label_area_size(170)
        .build_cartesian_2d(0u64..x_max, (0..bars.len()).into_segmented())?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(bars.len())
        .y_label_formatter(&|v| segment_label(bars, v))
        .x_desc("Number of Registrations")
        .y_desc("District")
        .draw()?;

    chart.draw_series(bars.iter().enumerate().map(|(i, e)| {
        let mut bar = Rectangle::new(
            [(0, SegmentValue::Exact(i)), (e.count, SegmentValue::Exact(i + 1))],
            BAR_COLOR.filled(),
        );
        bar.set_margin(6, 6, 0, 0);
        bar
    }))?;

    chart.draw_series(bars.iter().enumerate().map(|(i, e)| {
        let mut edge = Rectangle::new(
            [(0, SegmentValue::Exact(i)), (e.count, SegmentValue::Exact(i + 1))],
            BLACK.stroke_width(1),
        );
        edge.set_margin(6, 6, 0, 0);
        edge
    }))?;

    let label_style =
        TextStyle::from(("sans-serif", 14).into_font()).pos(Pos::new(HPos::Left, VPos::Center));
    chart.draw_series(bars.iter().enumerate().map(|(i, e)| {
        EmptyElement::at((e.count, SegmentValue::CenterOf(i)))
            + Text::new(e.count.to_string(), (5, 0), label_style.clone())
    }))?;

    root.present()?;
    Ok(())
}

fn display_available() -> bool {
    if cfg!(any(target_os = "macos", target_os = "windows")) {
        return true;
    }
    std::env::var_os("DISPLAY").is_some() || std::env::var_os("WAYLAND_DISPLAY").is_some()
}

fn viewer_command(path: &Path) -> Command {
    if cfg!(target_os = "macos") {
        let mut cmd = Command::new("open");
        cmd.arg(path);
        cmd
    } else if cfg!(target_os = "windows") {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", ""]).arg(path);
        cmd
    } else {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(path);
        cmd
    }
}

/// Opens a rendered chart in the system image viewer.
///
/// Never fails: a missing display or viewer only gets a debug log.
pub fn show(path: &Path) {
    if !display_available() {
        debug!("No display attached, chart not opened");
        return;
    }

    match viewer_command(path).status() {
        Ok(status) if status.success() => debug!(path = %path.display(), "Chart opened"),
        Ok(status) => debug!(%status, "Chart viewer exited with failure"),
        Err(e) => debug!(error = %e, "Chart viewer could not be started"),
    }
}
