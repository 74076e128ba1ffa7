//! Quote records.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An ordered list of quotes. Order is significant and duplicates are legal.
pub type QuoteList = Vec<QuoteRecord>;

/// A single quote: display text plus the category it is filed under.
///
/// Both fields are non-empty after trimming and are stored trimmed. Records
/// are immutable once created; equality is structural.
///
/// # Example
///
/// ```rust
/// use quotebook_core::QuoteRecord;
///
/// let quote = QuoteRecord::new("  Stay hungry. ", "Life").unwrap();
/// assert_eq!(quote.text(), "Stay hungry.");
/// assert!(QuoteRecord::new("   ", "Life").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawQuote")]
pub struct QuoteRecord {
    text: String,
    category: String,
}

impl QuoteRecord {
    /// Creates a quote, trimming both fields.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] if either field is empty after
    /// trimming.
    pub fn new(text: impl AsRef<str>, category: impl AsRef<str>) -> CoreResult<Self> {
        let text = text.as_ref().trim();
        let category = category.as_ref().trim();

        if text.is_empty() {
            return Err(CoreError::validation("text"));
        }
        if category.is_empty() {
            return Err(CoreError::validation("category"));
        }

        Ok(Self {
            text: text.to_string(),
            category: category.to_string(),
        })
    }

    /// Returns the quote text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the category.
    pub fn category(&self) -> &str {
        &self.category
    }
}

impl fmt::Display for QuoteRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" - {}", self.text, self.category)
    }
}

/// Unvalidated wire shape of a quote.
#[derive(Debug, Deserialize)]
pub(crate) struct RawQuote {
    pub(crate) text: String,
    pub(crate) category: String,
}

impl TryFrom<RawQuote> for QuoteRecord {
    type Error = CoreError;

    fn try_from(raw: RawQuote) -> CoreResult<Self> {
        QuoteRecord::new(raw.text, raw.category)
    }
}

const DEFAULT_QUOTES: [(&str, &str); 4] = [
    (
        "The best way to predict the future is to create it.",
        "Inspiration",
    ),
    (
        "Life is what happens when you're busy making other plans.",
        "Life",
    ),
    (
        "Success is not the key to happiness. Happiness is the key to success.",
        "Success",
    ),
    (
        "Do what you can, with what you have, where you are.",
        "Motivation",
    ),
];

/// Returns the seed list used when nothing usable is stored.
pub fn default_quotes() -> QuoteList {
    DEFAULT_QUOTES
        .iter()
        .map(|(text, category)| QuoteRecord {
            text: (*text).to_string(),
            category: (*category).to_string(),
        })
        .collect()
}
