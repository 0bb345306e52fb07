//! CSV readers for the mapping and registration datasets.

use anyhow::{Context, Result};
use csv::{Reader, ReaderBuilder, StringRecord};
use std::fs::File;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::aggregate::{DistrictCounts, RegistrationRecord, ScanStats, Tally};
use crate::config::Config;
use crate::error::PipelineError;
use crate::lookup::{PostalLookup, PostalMapping};

fn open_reader(path: &Path) -> Result<Reader<File>, PipelineError> {
    let file = File::open(path).map_err(|source| PipelineError::MissingInputFile {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(ReaderBuilder::new().flexible(true).from_reader(file))
}

/// Finds `name` in the header row. A missing column is not fatal: every row
/// then reads that field as empty.
fn column_index(headers: &StringRecord, name: &str, path: &Path) -> Option<usize> {
    let index = headers.iter().position(|h| h == name);
    if index.is_none() {
        warn!(path = %path.display(), column = name, "Column not found, field will read as empty");
    }
    index
}

fn field(record: &StringRecord, index: Option<usize>) -> &str {
    index.and_then(|i| record.get(i)).unwrap_or("")
}

/// Rows that fail to decode are skipped. Anything else (I/O) aborts the read.
fn is_row_error(err: &csv::Error) -> bool {
    matches!(err.kind(), csv::ErrorKind::Utf8 { .. })
}

/// Reads the mapping file into a [`PostalLookup`].
pub fn load_lookup(path: &Path, code_column: &str, district_column: &str) -> Result<PostalLookup> {
    let mut rdr = open_reader(path)?;
    let headers = rdr
        .headers()
        .with_context(|| format!("failed to read header of '{}'", path.display()))?
        .clone();
    let code_idx = column_index(&headers, code_column, path);
    let district_idx = column_index(&headers, district_column, path);

    let mut mappings = Vec::new();
    for result in rdr.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) if is_row_error(&e) => continue,
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read '{}'", path.display()));
            }
        };
        mappings.push(PostalMapping::new(
            field(&record, code_idx),
            field(&record, district_idx),
        ));
    }

    let rows = mappings.len();
    let lookup = PostalLookup::build(mappings);
    debug!(rows, entries = lookup.len(), "Postal lookup built");
    Ok(lookup)
}

/// Streams the registrations file through a [`Tally`].
pub fn count_file(
    path: &Path,
    lookup: &PostalLookup,
    target_year: &str,
    date_column: &str,
    address_column: &str,
) -> Result<(DistrictCounts, ScanStats)> {
    let mut rdr = open_reader(path)?;
    let headers = rdr
        .headers()
        .with_context(|| format!("failed to read header of '{}'", path.display()))?
        .clone();
    let date_idx = column_index(&headers, date_column, path);
    let address_idx = column_index(&headers, address_column, path);

    let mut tally = Tally::new(lookup, target_year);
    let mut record = StringRecord::new();
    loop {
        match rdr.read_record(&mut record) {
            Ok(true) => {
                tally.record(&RegistrationRecord::new(
                    field(&record, date_idx),
                    field(&record, address_idx),
                ));
            }
            Ok(false) => break,
            Err(e) if is_row_error(&e) => tally.skip_unreadable(),
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read '{}'", path.display()));
            }
        }
    }

    Ok(tally.finish())
}

/// Runs the whole aggregation stage over the files named in `config`.
#[tracing::instrument(
    skip_all,
    fields(
        companies = %config.companies_file_path.display(),
        zipcodes = %config.zipcode_file_path.display(),
        year = %config.target_year,
    )
)]
pub fn aggregate_files(config: &Config) -> Result<(DistrictCounts, ScanStats)> {
    let lookup = load_lookup(
        &config.zipcode_file_path,
        &config.zip_column,
        &config.district_column,
    )?;

    let (counts, stats) = count_file(
        &config.companies_file_path,
        &lookup,
        &config.target_year,
        &config.date_column,
        &config.address_column,
    )?;

    info!(
        lookup_entries = lookup.len(),
        rows_read = stats.rows_read,
        rows_in_year = stats.rows_in_year,
        rows_matched = stats.rows_matched,
        rows_unreadable = stats.rows_unreadable,
        districts = counts.len(),
        "Aggregation summary"
    );

    Ok((counts, stats))
}
