//! Remote source abstraction for sync operations.

use crate::error::{SyncError, SyncResult};
use parking_lot::Mutex;
use quotebook_core::QuoteList;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

/// A source of remote quotes.
///
/// This trait abstracts the network layer, allowing for different
/// implementations (HTTP, mock for testing, etc.). Implementations stamp
/// every returned record with the remote category.
pub trait RemoteSource: Send + Sync {
    /// Fetches at most `limit` remote quotes.
    ///
    /// This is the one call of a sync cycle that waits on the outside world.
    fn fetch(&self, limit: usize) -> SyncResult<QuoteList>;
}

impl<T: RemoteSource + ?Sized> RemoteSource for std::sync::Arc<T> {
    fn fetch(&self, limit: usize) -> SyncResult<QuoteList> {
        (**self).fetch(limit)
    }
}

/// Holds a [`MockRemote`] fetch open until the test releases it.
pub struct FetchGate {
    entered: Receiver<()>,
    release: Sender<()>,
}

impl FetchGate {
    /// Blocks until a fetch has started, or `timeout` elapses.
    ///
    /// Returns true if a fetch started.
    pub fn wait_entered(&self, timeout: Duration) -> bool {
        self.entered.recv_timeout(timeout).is_ok()
    }

    /// Lets one waiting fetch complete.
    pub fn release(&self) {
        let _ = self.release.send(());
    }
}

struct GateSide {
    entered: Sender<()>,
    release: Receiver<()>,
}

/// A mock remote for testing.
///
/// Scripted responses are consumed in order; once they run out the standing
/// response (if any) is returned on every fetch.
#[derive(Default)]
pub struct MockRemote {
    script: Mutex<VecDeque<SyncResult<QuoteList>>>,
    standing: Mutex<Option<QuoteList>>,
    gate: Mutex<Option<GateSide>>,
    fetches: AtomicUsize,
    last_limit: AtomicUsize,
}

impl MockRemote {
    /// Creates a mock with nothing to return.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock that always returns `quotes`.
    pub fn returning(quotes: QuoteList) -> Self {
        let remote = Self::new();
        remote.set_response(quotes);
        remote
    }

    /// Creates a mock whose next fetch fails with `error`.
    pub fn failing(error: SyncError) -> Self {
        let remote = Self::new();
        remote.push_error(error);
        remote
    }

    /// Sets the response returned once the script is exhausted.
    pub fn set_response(&self, quotes: QuoteList) {
        *self.standing.lock() = Some(quotes);
    }

    /// Queues a successful response.
    pub fn push_response(&self, quotes: QuoteList) {
        self.script.lock().push_back(Ok(quotes));
    }

    /// Queues a failure.
    pub fn push_error(&self, error: SyncError) {
        self.script.lock().push_back(Err(error));
    }

    /// Makes every fetch wait for [`FetchGate::release`].
    pub fn gated(self) -> (Self, FetchGate) {
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        *self.gate.lock() = Some(GateSide {
            entered: entered_tx,
            release: release_rx,
        });
        (
            self,
            FetchGate {
                entered: entered_rx,
                release: release_tx,
            },
        )
    }

    /// Returns the number of fetches made.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Returns the limit passed to the most recent fetch.
    pub fn last_limit(&self) -> usize {
        self.last_limit.load(Ordering::SeqCst)
    }
}

impl RemoteSource for MockRemote {
    fn fetch(&self, limit: usize) -> SyncResult<QuoteList> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.last_limit.store(limit, Ordering::SeqCst);

        if let Some(gate) = self.gate.lock().as_ref() {
            let _ = gate.entered.send(());
            let _ = gate.release.recv();
        }

        let next = self.script.lock().pop_front();
        let mut quotes = match next {
            Some(result) => result?,
            None => self
                .standing
                .lock()
                .clone()
                .ok_or_else(|| SyncError::network_fatal("no mock response set"))?,
        };

        quotes.truncate(limit);
        Ok(quotes)
    }
}
