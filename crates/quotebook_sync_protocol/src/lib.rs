//! # Quotebook Sync Protocol
//!
//! Remote wire types, alignment and conflict resolution for Quotebook sync.
//!
//! This crate provides:
//! - [`RemotePost`] and [`decode_posts`] for the remote quote feed
//! - [`Alignment`] strategies pairing local and remote records
//! - The [`ConflictResolver`] capability and its implementations
//! - [`merge`], the reconciliation of a local and a remote quote list
//!
//! This is a pure crate with no I/O operations. The only impure step of a
//! merge is whatever the supplied resolver does (an interactive resolver may
//! ask a human).
//!
//! ## Merge rules
//!
//! For every remote position `i`:
//! - if `local[i]` exists the resolver picks one of the pair
//! - otherwise `remote[i]` is copied through
//!
//! Afterwards any local records beyond the remote length are appended
//! unchanged. The result length is always `max(local.len(), remote.len())`.
//!
//! ```rust
//! use quotebook_core::QuoteRecord;
//! use quotebook_sync_protocol::{merge, ConflictPolicy};
//!
//! let local = vec![
//!     QuoteRecord::new("A", "X").unwrap(),
//!     QuoteRecord::new("B", "Y").unwrap(),
//! ];
//! let remote = vec![QuoteRecord::new("C", "Server").unwrap()];
//!
//! let outcome = merge(&local, &remote, &mut ConflictPolicy::ServerWins);
//! assert_eq!(outcome.quotes[0].text(), "C");
//! assert_eq!(outcome.quotes[1].text(), "B");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod align;
mod conflict;
mod error;
mod merge;
mod messages;

pub use align::{Alignment, Positional, Slot};
pub use conflict::{
    conflict_prompt, ConflictPolicy, ConflictResolution, ConflictResolver, InteractiveResolver,
    Prompt, ScriptedResolver,
};
pub use error::{ProtocolError, ProtocolResult};
pub use merge::{merge, merge_with, MergeDecision, MergeOutcome};
pub use messages::{decode_posts, decode_quotes, RemotePost, REMOTE_CATEGORY};
