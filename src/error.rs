//! Fatal error kinds for a pipeline run.
//!
//! Per-row problems never surface here; they are skipped during aggregation.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// One of the two required input files could not be opened.
    #[error("input file '{}' could not be opened", path.display())]
    MissingInputFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The drawing backend failed while producing the chart image.
    #[error("chart rendering failed: {0}")]
    Chart(String),
}
