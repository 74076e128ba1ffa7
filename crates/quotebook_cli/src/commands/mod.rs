//! CLI command implementations.

pub mod add;
pub mod categories;
pub mod show;
pub mod sync;
pub mod transfer;

use quotebook_core::QuoteStore;
use quotebook_storage::FileKvStore;
use std::path::Path;

/// Opens the quote store kept in `data_dir`, creating the directory if needed.
pub fn open_store(data_dir: &Path) -> Result<QuoteStore<FileKvStore>, Box<dyn std::error::Error>> {
    let backend = FileKvStore::open(data_dir)?;
    Ok(QuoteStore::open(backend))
}
