//! File-based side-store for persistent storage.

use crate::backend::{validate_key, KvStore};
use crate::error::{StorageError, StorageResult};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const LOCK_FILE: &str = ".lock";

/// A directory-backed key-value store.
///
/// Each key is stored in its own `<key>.json` file inside the store
/// directory. Data survives process restarts.
///
/// # Durability
///
/// - `set()` writes to a temporary file, syncs it, then renames it over the
///   previous value, so readers see either the old or the new value
/// - A crash mid-write never leaves a truncated value behind
///
/// # Ownership
///
/// The directory is exclusively owned by one `FileKvStore` at a time through
/// an advisory lock on `.lock`. The lock is released on drop.
///
/// # Example
///
/// ```no_run
/// use quotebook_storage::{KvStore, FileKvStore};
/// use std::path::Path;
///
/// let store = FileKvStore::open(Path::new("quotebook-data")).unwrap();
/// store.set("quotes", "[]").unwrap();
/// ```
#[derive(Debug)]
pub struct FileKvStore {
    dir: PathBuf,
    _lock: File,
}

impl FileKvStore {
    /// Opens or creates a store at the given directory.
    ///
    /// Missing directories are created.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Locked`] if another store owns the directory,
    /// or an I/O error if it cannot be created or opened.
    pub fn open(dir: &Path) -> StorageResult<Self> {
        fs::create_dir_all(dir)?;

        let lock_path = dir.join(LOCK_FILE);
        let lock = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        lock.try_lock_exclusive()
            .map_err(|_| StorageError::Locked(dir.to_path_buf()))?;

        tracing::debug!(dir = %dir.display(), "opened file store");

        Ok(Self {
            dir: dir.to_path_buf(),
            _lock: lock,
        })
    }

    /// Returns the store directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> StorageResult<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KvStore for FileKvStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.key_path(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.key_path(key)?;

        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| e.error)?;

        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let path = self.key_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
