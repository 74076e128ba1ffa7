//! # Quotebook Storage
//!
//! Durable key-value side-store for Quotebook.
//!
//! Backends are **opaque string stores**: they map a small set of logical
//! keys to serialized values and never interpret those values. The quote
//! store decides what lives under each key.
//!
//! ## Design Principles
//!
//! - `set` is a total replacement of the value under a key
//! - No knowledge of quote records or JSON shapes
//! - Must be `Send + Sync` so the owning store can move across threads
//!
//! ## Available Backends
//!
//! - [`InMemoryKvStore`] - For testing and ephemeral sessions
//! - [`FileKvStore`] - One file per key in a locked directory
//!
//! ## Example
//!
//! ```rust
//! use quotebook_storage::{KvStore, InMemoryKvStore};
//!
//! let store = InMemoryKvStore::new();
//! store.set("quotes", "[]").unwrap();
//! assert_eq!(store.get("quotes").unwrap().as_deref(), Some("[]"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod file;
mod memory;

pub use backend::{validate_key, KvStore};
pub use error::{StorageError, StorageResult};
pub use file::FileKvStore;
pub use memory::InMemoryKvStore;
