//! Direct text transforms that bypass the intermediate value

use crate::registry::FormatId;

/// Character-for-character delimiter replacement
///
/// Delimiters inside quoted fields are replaced too; this transform never
/// looks at field boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelimiterSwap {
    pub from: char,
    pub to: char,
}

impl DelimiterSwap {
    pub const fn new(from: char, to: char) -> Self {
        Self { from, to }
    }

    pub fn apply(&self, text: &str) -> String {
        text.replace(self.from, &self.to.to_string())
    }

    pub fn inverse(&self) -> Self {
        Self::new(self.to, self.from)
    }
}

/// Registered direct transform for a pair, if any
pub fn transform_for(from: FormatId, to: FormatId) -> Option<DelimiterSwap> {
    match (from, to) {
        (FormatId::TabularCsv, FormatId::TabularTsv) => Some(DelimiterSwap::new(',', '\t')),
        (FormatId::TabularTsv, FormatId::TabularCsv) => Some(DelimiterSwap::new('\t', ',')),
        _ => None,
    }
}
