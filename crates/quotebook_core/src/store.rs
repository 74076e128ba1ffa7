//! The quote store.

use crate::error::{CoreError, CoreResult};
use crate::filter::CategoryFilter;
use crate::quote::{default_quotes, QuoteList, QuoteRecord};
use crate::transfer::{export_json, parse_import};
use quotebook_storage::KvStore;
use rand::seq::SliceRandom;
use rand::Rng;

/// Side-store key holding the serialized quote list.
pub const QUOTES_KEY: &str = "quotes";

/// Side-store key holding the last selected category filter.
pub const SELECTED_CATEGORY_KEY: &str = "selectedCategory";

/// The ordered, persistent collection of quotes.
///
/// A `QuoteStore` is the only owner of its quote list and of the side-store
/// backing it. Every mutation is persisted before it becomes visible through
/// [`QuoteStore::quotes`]; a failed write leaves the in-memory list as it was.
///
/// The store does no locking. Callers sharing it across threads wrap it in a
/// mutex (the sync engine does this).
///
/// # Example
///
/// ```rust
/// use quotebook_core::QuoteStore;
/// use quotebook_storage::InMemoryKvStore;
///
/// let mut store = QuoteStore::open(InMemoryKvStore::new());
/// assert_eq!(store.len(), 4); // default quotes
///
/// store.add("Simplicity is prerequisite for reliability.", "Engineering").unwrap();
/// assert_eq!(store.categories().last(), Some(&"Engineering"));
/// ```
#[derive(Debug)]
pub struct QuoteStore<S: KvStore> {
    backend: S,
    quotes: QuoteList,
    last_viewed: Option<QuoteRecord>,
}

impl<S: KvStore> QuoteStore<S> {
    /// Opens a store over `backend`, loading the persisted list.
    pub fn open(backend: S) -> Self {
        let mut store = Self {
            backend,
            quotes: Vec::new(),
            last_viewed: None,
        };
        store.quotes = store.load();
        store
    }

    /// Reads the persisted list from the side-store.
    ///
    /// Returns the default quotes if nothing is stored or the stored value
    /// cannot be read back. Storage problems are logged, never returned.
    pub fn load(&self) -> QuoteList {
        match self.try_load() {
            Ok(Some(quotes)) => quotes,
            Ok(None) => {
                tracing::debug!("no stored quotes, using defaults");
                default_quotes()
            }
            Err(e) => {
                tracing::warn!(error = %e, "stored quotes unreadable, using defaults");
                default_quotes()
            }
        }
    }

    fn try_load(&self) -> CoreResult<Option<QuoteList>> {
        let raw = self
            .backend
            .get(QUOTES_KEY)
            .map_err(|e| malformed(e.to_string()))?;

        let Some(raw) = raw else {
            return Ok(None);
        };

        // A stored `null` counts as nothing stored.
        let quotes: Option<QuoteList> =
            serde_json::from_str(&raw).map_err(|e| malformed(e.to_string()))?;
        Ok(quotes)
    }

    /// Re-reads the persisted list, replacing the in-memory copy.
    pub fn reload(&mut self) -> &[QuoteRecord] {
        self.quotes = self.load();
        &self.quotes
    }

    /// Persists `quotes` as the complete list, replacing prior contents.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the side-store write fails. The
    /// in-memory list is only replaced after a successful write.
    pub fn save(&mut self, quotes: QuoteList) -> CoreResult<()> {
        let json = serde_json::to_string(&quotes)?;
        self.backend.set(QUOTES_KEY, &json)?;
        tracing::debug!(count = quotes.len(), "saved quotes");
        self.quotes = quotes;
        Ok(())
    }

    /// Returns the current list.
    pub fn quotes(&self) -> &[QuoteRecord] {
        &self.quotes
    }

    /// Returns the number of quotes.
    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    /// Returns true if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// Returns the underlying side-store.
    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Validates and appends a new quote, then persists the list.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] if either field is blank, or a
    /// storage error if persisting fails. Nothing is stored on error.
    pub fn add(&mut self, text: &str, category: &str) -> CoreResult<&QuoteRecord> {
        let quote = QuoteRecord::new(text, category)?;

        let mut quotes = self.quotes.clone();
        quotes.push(quote);
        self.save(quotes)?;

        tracing::info!(count = self.quotes.len(), "added quote");
        Ok(&self.quotes[self.quotes.len() - 1])
    }

    /// Appends every quote in an imported JSON document, then persists.
    ///
    /// Returns the number of quotes imported.
    ///
    /// # Errors
    ///
    /// See [`parse_import`]. A rejected import changes nothing.
    pub fn import_json(&mut self, json: &str) -> CoreResult<usize> {
        let imported = parse_import(json)?;
        let count = imported.len();

        let mut quotes = self.quotes.clone();
        quotes.extend(imported);
        self.save(quotes)?;

        tracing::info!(count, "imported quotes");
        Ok(count)
    }

    /// Serializes the current list as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Json`] if serialization fails.
    pub fn export_json(&self) -> CoreResult<String> {
        export_json(&self.quotes)
    }

    /// Returns the distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for quote in &self.quotes {
            if !seen.contains(&quote.category()) {
                seen.push(quote.category());
            }
        }
        seen
    }

    /// Returns the persisted category filter, or [`CategoryFilter::All`].
    pub fn selected_category(&self) -> CategoryFilter {
        match self.backend.get(SELECTED_CATEGORY_KEY) {
            Ok(Some(value)) => CategoryFilter::parse(&value),
            Ok(None) => CategoryFilter::All,
            Err(e) => {
                tracing::warn!(error = %e, "stored category filter unreadable");
                CategoryFilter::All
            }
        }
    }

    /// Persists the category filter.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the write fails.
    pub fn set_selected_category(&self, filter: &CategoryFilter) -> CoreResult<()> {
        self.backend.set(SELECTED_CATEGORY_KEY, filter.as_str())?;
        Ok(())
    }

    /// Picks a random quote among those matching `filter`.
    ///
    /// The picked quote becomes [`QuoteStore::last_viewed`]. Returns `None`
    /// when no quote matches.
    pub fn random_quote<R: Rng + ?Sized>(
        &mut self,
        filter: &CategoryFilter,
        rng: &mut R,
    ) -> Option<&QuoteRecord> {
        let candidates: Vec<&QuoteRecord> =
            self.quotes.iter().filter(|q| filter.matches(q)).collect();
        let picked = candidates.choose(rng).map(|q| (*q).clone())?;

        self.last_viewed = Some(picked);
        self.last_viewed.as_ref()
    }

    /// Returns the quote most recently picked by [`QuoteStore::random_quote`]
    /// in this session. Never persisted.
    pub fn last_viewed(&self) -> Option<&QuoteRecord> {
        self.last_viewed.as_ref()
    }
}

fn malformed(message: String) -> CoreError {
    CoreError::MalformedStorage {
        key: QUOTES_KEY.to_string(),
        message,
    }
}
