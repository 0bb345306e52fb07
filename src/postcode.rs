//! Postal-code extraction from free-text addresses.

use regex::Regex;
use std::sync::LazyLock;

/// A standalone run of 6 or 7 digits.
static POSTAL_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{6,7}\b").expect("postal code pattern is valid"));

/// Strips every whitespace character from a code.
pub fn normalize_code(raw: &str) -> String {
    raw.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Yields candidate postal codes in the order they appear in `address`.
///
/// Digit runs shorter than 6 or longer than 7 are never candidates.
pub fn candidates(address: &str) -> impl Iterator<Item = String> + '_ {
    POSTAL_CODE
        .find_iter(address)
        .map(|m| normalize_code(m.as_str()))
}
