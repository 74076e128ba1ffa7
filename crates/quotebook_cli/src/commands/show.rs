//! Show command implementation.

use quotebook_core::{CategoryFilter, QuoteStore};
use quotebook_storage::KvStore;
use rand::Rng;
use std::io::Write;

/// Runs the show command.
///
/// Without `category` the remembered filter applies.
pub fn run<S: KvStore, R: Rng + ?Sized>(
    store: &mut QuoteStore<S>,
    category: Option<&str>,
    rng: &mut R,
    out: &mut impl Write,
) -> Result<(), Box<dyn std::error::Error>> {
    if store.is_empty() {
        writeln!(out, "No quotes available. Please add one!")?;
        return Ok(());
    }

    let filter = match category {
        Some(name) => CategoryFilter::parse(name),
        None => store.selected_category(),
    };

    match store.random_quote(&filter, rng) {
        Some(quote) => writeln!(out, "{quote}")?,
        None => writeln!(out, "No quotes available for this category.")?,
    }
    Ok(())
}
