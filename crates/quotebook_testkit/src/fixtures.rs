//! Store fixtures.
//!
//! Provides quote stores over fresh backends and a few canned lists.

use quotebook_core::{QuoteList, QuoteRecord, QuoteStore, QUOTES_KEY};
use quotebook_storage::{FileKvStore, InMemoryKvStore, KvStore};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

/// Builds a quote, panicking on invalid input.
pub fn quote(text: &str, category: &str) -> QuoteRecord {
    QuoteRecord::new(text, category).expect("fixture quote must be valid")
}

/// Builds a list from `(text, category)` pairs.
pub fn quotes(pairs: &[(&str, &str)]) -> QuoteList {
    pairs.iter().map(|(t, c)| quote(t, c)).collect()
}

/// Serializes a list the way the store persists it.
pub fn stored_json(list: &[QuoteRecord]) -> String {
    quotebook_core::export_json(list).expect("fixture list must serialize")
}

/// Creates an in-memory backend already holding `list`.
pub fn seeded_backend(list: &[QuoteRecord]) -> Arc<InMemoryKvStore> {
    Arc::new(InMemoryKvStore::with_entries([(
        QUOTES_KEY,
        stored_json(list),
    )]))
}

/// Opens a store over a shared in-memory backend holding `list`.
///
/// The returned backend handle lets tests inspect what was persisted.
pub fn memory_store(list: &[QuoteRecord]) -> (QuoteStore<Arc<InMemoryKvStore>>, Arc<InMemoryKvStore>) {
    let backend = seeded_backend(list);
    (QuoteStore::open(Arc::clone(&backend)), backend)
}

/// Reads back the list persisted in `backend`, bypassing any store.
pub fn persisted(backend: &impl KvStore) -> Option<QuoteList> {
    let raw = backend.get(QUOTES_KEY).expect("backend read must succeed")?;
    quotebook_core::parse_import(&raw).ok()
}

/// A quote store over a temporary directory, removed on drop.
pub struct TempStore {
    /// The store instance.
    pub store: QuoteStore<FileKvStore>,
    /// The temporary directory (kept alive to prevent cleanup).
    _temp_dir: TempDir,
}

impl TempStore {
    /// Creates a store over a fresh temporary directory.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let backend = FileKvStore::open(temp_dir.path()).expect("Failed to open file store");
        Self {
            store: QuoteStore::open(backend),
            _temp_dir: temp_dir,
        }
    }

    /// Returns the store directory.
    pub fn path(&self) -> &Path {
        self._temp_dir.path()
    }
}

impl Default for TempStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Deref for TempStore {
    type Target = QuoteStore<FileKvStore>;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}

impl std::ops::DerefMut for TempStore {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.store
    }
}
