//! # Quotebook Core
//!
//! Quote records and the persistent quote store.
//!
//! This crate provides:
//! - [`QuoteRecord`], a validated `(text, category)` pair
//! - [`QuoteStore`], the single owner of the ordered quote list and its
//!   side-store
//! - JSON import/export of quote lists
//! - Category filtering and random selection
//!
//! ## Storage layout
//!
//! The store uses two logical keys in its [`KvStore`](quotebook_storage::KvStore):
//!
//! | Key                | Value                                        |
//! |--------------------|----------------------------------------------|
//! | `quotes`           | JSON array of `{"text": .., "category": ..}` |
//! | `selectedCategory` | last selected filter, `all` or a category    |
//!
//! A missing or unreadable `quotes` value is never an error: the store falls
//! back to the built-in default quotes.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod filter;
mod quote;
mod store;
mod transfer;

pub use error::{CoreError, CoreResult};
pub use filter::CategoryFilter;
pub use quote::{default_quotes, QuoteList, QuoteRecord};
pub use store::{QuoteStore, QUOTES_KEY, SELECTED_CATEGORY_KEY};
pub use transfer::{export_json, parse_import, INVALID_IMPORT_FORMAT};
