//! Add command implementation.

use quotebook_core::QuoteStore;
use quotebook_storage::KvStore;
use std::io::Write;

/// Message shown when either field is blank.
pub const MISSING_FIELDS: &str = "Please enter both a quote and a category.";

/// Runs the add command.
pub fn run<S: KvStore>(
    store: &mut QuoteStore<S>,
    text: &str,
    category: &str,
    out: &mut impl Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let quote = match store.add(text, category) {
        Ok(quote) => quote,
        Err(e) if e.is_input_error() => return Err(MISSING_FIELDS.into()),
        Err(e) => return Err(e.into()),
    };
    writeln!(out, "Added: {quote}")?;
    Ok(())
}
