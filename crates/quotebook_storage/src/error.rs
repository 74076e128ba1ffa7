//! Error types for side-store operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The key cannot be used as a storage key.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    /// Another owner holds the store directory.
    #[error("store directory is locked by another process: {}", .0.display())]
    Locked(PathBuf),
}
