//! Counting registrations per district.

use indexmap::IndexMap;
use serde::Serialize;

use crate::lookup::{PostalLookup, PostalMapping};
use crate::postcode::candidates;

/// One row of the registrations dataset. Missing fields are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationRecord {
    pub registration_date: String,
    pub address: String,
}

impl RegistrationRecord {
    pub fn new(registration_date: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            registration_date: registration_date.into(),
            address: address.into(),
        }
    }
}

/// Registration tally per district, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DistrictCounts {
    counts: IndexMap<String, u64>,
}

impl DistrictCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, district: &str) {
        match self.counts.get_mut(district) {
            Some(count) => *count += 1,
            None => {
                self.counts.insert(district.to_string(), 1);
            }
        }
    }

    pub fn get(&self, district: &str) -> u64 {
        self.counts.get(district).copied().unwrap_or(0)
    }

    /// Iterates `(district, count)` in the order each district was first counted.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for DistrictCounts {
    fn from_iter<T: IntoIterator<Item = (S, u64)>>(iter: T) -> Self {
        let mut counts = IndexMap::new();
        for (district, count) in iter {
            *counts.entry(district.into()).or_insert(0) += count;
        }
        Self { counts }
    }
}

/// Row-level bookkeeping for one aggregation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    pub rows_read: u64,
    pub rows_in_year: u64,
    pub rows_matched: u64,
    /// Rows the CSV reader could not decode.
    pub rows_unreadable: u64,
}

/// Single-pass counter over registration rows.
pub struct Tally<'a> {
    lookup: &'a PostalLookup,
    target_year: &'a str,
    counts: DistrictCounts,
    stats: ScanStats,
}

impl<'a> Tally<'a> {
    pub fn new(lookup: &'a PostalLookup, target_year: &'a str) -> Self {
        Self {
            lookup,
            target_year,
            counts: DistrictCounts::new(),
            stats: ScanStats::default(),
        }
    }

    /// Counts one row. Returns the district it was attributed to, if any.
    ///
    /// The year filter is a plain string prefix check on the date field, and
    /// only the first resolvable postal code in the address is used.
    pub fn record(&mut self, record: &RegistrationRecord) -> Option<&str> {
        self.stats.rows_read += 1;

        if !record.registration_date.starts_with(self.target_year) {
            return None;
        }
        self.stats.rows_in_year += 1;

        let lookup = self.lookup;
        let district = candidates(&record.address).find_map(|code| lookup.district(&code))?;

        self.counts.increment(district);
        self.stats.rows_matched += 1;
        Some(district)
    }

    pub fn skip_unreadable(&mut self) {
        self.stats.rows_read += 1;
        self.stats.rows_unreadable += 1;
    }

    pub fn finish(self) -> (DistrictCounts, ScanStats) {
        (self.counts, self.stats)
    }
}

/// Builds the postal lookup from `mappings`, then counts `registrations`
/// whose date starts with `target_year`.
pub fn aggregate<R, M>(registrations: R, mappings: M, target_year: &str) -> DistrictCounts
where
    R: IntoIterator<Item = RegistrationRecord>,
    M: IntoIterator<Item = PostalMapping>,
{
    let lookup = PostalLookup::build(mappings);
    count_registrations(&lookup, registrations, target_year).0
}

/// Counts `registrations` against an existing lookup.
pub fn count_registrations<R>(
    lookup: &PostalLookup,
    registrations: R,
    target_year: &str,
) -> (DistrictCounts, ScanStats)
where
    R: IntoIterator<Item = RegistrationRecord>,
{
    let mut tally = Tally::new(lookup, target_year);
    for record in registrations {
        tally.record(&record);
    }
    tally.finish()
}
