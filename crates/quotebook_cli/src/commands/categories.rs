//! Category listing and filter selection.

use quotebook_core::{CategoryFilter, QuoteStore};
use quotebook_storage::KvStore;
use std::io::Write;

/// Lists categories in first-seen order, marking the remembered one.
pub fn list<S: KvStore>(
    store: &QuoteStore<S>,
    out: &mut impl Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let selected = store.selected_category();
    let marker = |active: bool| if active { '*' } else { ' ' };

    writeln!(out, "{} All Categories", marker(selected == CategoryFilter::All))?;
    for category in store.categories() {
        let active = matches!(&selected, CategoryFilter::Category(name) if name == category);
        writeln!(out, "{} {}", marker(active), category)?;
    }
    Ok(())
}

/// Remembers `category` as the filter for later `show` calls.
pub fn select<S: KvStore>(
    store: &QuoteStore<S>,
    category: &str,
    out: &mut impl Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let filter = CategoryFilter::parse(category);
    if let CategoryFilter::Category(name) = &filter {
        if !store.categories().contains(&name.as_str()) {
            tracing::warn!(category = %name, "no quotes in selected category yet");
        }
    }
    store.set_selected_category(&filter)?;
    writeln!(out, "Filter set to {filter}")?;
    Ok(())
}
