//! Postal-code to district lookup.

use std::collections::HashMap;

use crate::postcode::normalize_code;

/// One row of the mapping dataset, as read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostalMapping {
    pub code: String,
    pub district: String,
}

impl PostalMapping {
    pub fn new(code: impl Into<String>, district: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            district: district.into(),
        }
    }
}

/// Immutable map from normalized postal code to district name.
#[derive(Debug, Clone, Default)]
pub struct PostalLookup {
    entries: HashMap<String, String>,
}

impl PostalLookup {
    /// Builds the lookup, discarding rows whose code or district is empty
    /// after normalization. A repeated code keeps the last district seen.
    pub fn build<I>(mappings: I) -> Self
    where
        I: IntoIterator<Item = PostalMapping>,
    {
        let mut entries = HashMap::new();

        for mapping in mappings {
            let code = normalize_code(&mapping.code);
            let district = mapping.district.trim();
            if code.is_empty() || district.is_empty() {
                continue;
            }
            entries.insert(code, district.to_string());
        }

        Self { entries }
    }

    /// Returns the district for an already-normalized code.
    pub fn district(&self, code: &str) -> Option<&str> {
        self.entries.get(code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
