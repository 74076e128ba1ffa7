//! JSON import and export of quote lists.

use crate::error::{CoreError, CoreResult};
use crate::quote::{QuoteList, QuoteRecord, RawQuote};
use serde_json::Value;

/// Message reported when an import's top level is not an array.
pub const INVALID_IMPORT_FORMAT: &str = "Invalid JSON format. Must be an array of quotes.";

/// Parses an imported document into quotes.
///
/// The document must be a JSON array of `{"text", "category"}` objects.
/// Parsing is all-or-nothing: one bad element rejects the whole import.
///
/// # Errors
///
/// - [`CoreError::Decode`] if the input is not JSON, the top level is not an
///   array, or an element is not a `{text, category}` object
/// - [`CoreError::Validation`] if an element has a blank field
pub fn parse_import(json: &str) -> CoreResult<QuoteList> {
    let value: Value = serde_json::from_str(json)
        .map_err(|e| CoreError::decode(format!("Error reading JSON: {e}")))?;

    let Value::Array(items) = value else {
        return Err(CoreError::decode(INVALID_IMPORT_FORMAT));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let raw: RawQuote = serde_json::from_value(item)
                .map_err(|e| CoreError::decode(format!("quote #{index}: {e}")))?;
            QuoteRecord::try_from(raw)
        })
        .collect()
}

/// Serializes quotes as a pretty-printed JSON array.
///
/// # Errors
///
/// Returns [`CoreError::Json`] if serialization fails.
pub fn export_json(quotes: &[QuoteRecord]) -> CoreResult<String> {
    Ok(serde_json::to_string_pretty(quotes)?)
}
