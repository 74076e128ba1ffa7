//! # Quotebook Sync Engine
//!
//! Quote synchronization engine for Quotebook.
//!
//! This crate provides:
//! - One-shot sync (`load → fetch → merge → save`) with a tagged outcome
//! - Remote source abstraction with an HTTP implementation and a mock
//! - Pluggable conflict resolution (automatic or human-in-the-loop)
//! - A reentrancy guard and cancellation for in-flight syncs
//! - A background auto-sync timer sharing the manual trigger's semantics
//!
//! ## Architecture
//!
//! The engine owns the [`QuoteStore`](quotebook_core::QuoteStore) behind a
//! mutex. A sync holds that mutex for the whole cycle, so nothing else can
//! mutate the list while the remote fetch is outstanding. Presentation code
//! reaches the store through [`SyncEngine::with_store`], which takes the same
//! mutex.
//!
//! ## Key Invariants
//!
//! - `sync()` never panics or returns `Err`; failures are [`SyncOutcome::Failure`]
//! - A failed or cancelled sync leaves the persisted list untouched
//! - At most one sync is in flight; overlapping requests are dropped with
//!   [`SyncError::InProgress`]
//! - The remote list never exceeds the configured fetch limit

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod cancel;
mod config;
mod error;
mod http;
mod outcome;
mod scheduler;
mod state;
mod transport;

pub use cancel::CancelToken;
pub use config::{RetryConfig, SyncConfig, DEFAULT_ENDPOINT, DEFAULT_FETCH_LIMIT};
pub use error::{SyncError, SyncResult};
pub use http::{HttpClient, HttpError, HttpRemoteSource, ReqwestClient};
pub use outcome::{
    Notification, NotificationLevel, SyncOutcome, SYNC_FAILURE_MESSAGE, SYNC_IN_PROGRESS_MESSAGE,
    SYNC_SUCCESS_MESSAGE,
};
pub use scheduler::AutoSync;
pub use state::{SyncEngine, SyncState, SyncStats};
pub use transport::{FetchGate, MockRemote, RemoteSource};
