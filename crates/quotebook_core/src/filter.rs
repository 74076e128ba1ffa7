//! Category filter.

use crate::quote::QuoteRecord;
use std::fmt;

const ALL: &str = "all";

/// The category selection applied when picking a quote to show.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// Every quote matches.
    #[default]
    All,
    /// Only quotes filed under this exact category match.
    Category(String),
}

impl CategoryFilter {
    /// Parses a stored or user-supplied filter.
    ///
    /// `"all"` and blank input select every category; anything else is a
    /// category name (trimmed, case-sensitive).
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value == ALL {
            CategoryFilter::All
        } else {
            CategoryFilter::Category(value.to_string())
        }
    }

    /// Returns the stored form of the filter.
    pub fn as_str(&self) -> &str {
        match self {
            CategoryFilter::All => ALL,
            CategoryFilter::Category(name) => name,
        }
    }

    /// Returns true if the quote passes the filter.
    pub fn matches(&self, quote: &QuoteRecord) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Category(name) => quote.category() == name,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
