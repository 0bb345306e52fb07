//! Top-N selection over district counts.

use serde::Serialize;

use crate::aggregate::DistrictCounts;

/// A district and its count, as selected for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedEntry {
    pub district: String,
    pub count: u64,
}

impl RankedEntry {
    pub fn new(district: impl Into<String>, count: u64) -> Self {
        Self {
            district: district.into(),
            count,
        }
    }
}

/// Returns at most `n` entries ordered by count descending.
///
/// The sort is stable, so districts with equal counts keep the order in
/// which they were first counted.
pub fn top_n(counts: &DistrictCounts, n: usize) -> Vec<RankedEntry> {
    let mut ranked: Vec<RankedEntry> = counts
        .iter()
        .map(|(district, count)| RankedEntry::new(district, count))
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(n);
    ranked
}
