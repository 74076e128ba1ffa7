//! Periodic background sync.

use crate::cancel::CancelToken;
use crate::outcome::SyncOutcome;
use crate::state::SyncEngine;
use crate::transport::RemoteSource;
use parking_lot::{Condvar, Mutex};
use quotebook_storage::KvStore;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

struct Shared {
    stopped: Mutex<bool>,
    wake: Condvar,
    stop: CancelToken,
}

/// Runs [`SyncEngine::sync`] on a fixed interval until stopped.
///
/// Each tick goes through the same entry point as a manual sync, so a tick
/// that lands while a manual sync is in flight is dropped with
/// [`SyncError::InProgress`](crate::SyncError::InProgress). The first sync
/// happens one interval after start. An interval too large to schedule means
/// the timer only wakes to stop.
///
/// Dropping the handle stops the timer and cancels an in-flight tick.
pub struct AutoSync<R: RemoteSource + 'static, S: KvStore + 'static> {
    engine: Arc<SyncEngine<R, S>>,
    shared: Arc<Shared>,
    handle: Option<JoinHandle<()>>,
}

impl<R: RemoteSource + 'static, S: KvStore + 'static> AutoSync<R, S> {
    /// Starts the timer. `on_outcome` is called with the outcome of every tick.
    pub fn start<F>(engine: Arc<SyncEngine<R, S>>, interval: Duration, mut on_outcome: F) -> Self
    where
        F: FnMut(&SyncOutcome) + Send + 'static,
    {
        let shared = Arc::new(Shared {
            stopped: Mutex::new(false),
            wake: Condvar::new(),
            stop: CancelToken::new(),
        });

        let handle = {
            let engine = Arc::clone(&engine);
            let shared = Arc::clone(&shared);
            std::thread::Builder::new()
                .name("quotebook-autosync".into())
                .spawn(move || {
                    tracing::debug!(interval_ms = interval.as_millis() as u64, "auto-sync started");
                    loop {
                        if !shared.wait_for_tick(interval) {
                            break;
                        }

                        let outcome = engine.sync_with_stop(&shared.stop);
                        on_outcome(&outcome);
                    }
                    tracing::debug!("auto-sync stopped");
                })
        };

        let handle = match handle {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::error!(error = %e, "failed to spawn auto-sync thread");
                None
            }
        };

        Self {
            engine,
            shared,
            handle,
        }
    }

    /// Returns true while the timer thread is alive.
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Returns the engine being driven.
    pub fn engine(&self) -> &Arc<SyncEngine<R, S>> {
        &self.engine
    }

    /// Asks the timer to stop without waiting for it.
    ///
    /// A tick in flight, or one about to start, is cancelled and saves
    /// nothing. Manual syncs on the same engine are not affected.
    pub fn request_stop(&self) {
        self.shared.stop.cancel();
        *self.shared.stopped.lock() = true;
        self.shared.wake.notify_all();
    }

    /// Stops the timer, cancelling an in-flight tick, and waits for the
    /// thread to exit.
    pub fn stop(&mut self) {
        self.request_stop();

        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!("auto-sync thread panicked");
            }
        }
    }
}

impl Shared {
    /// Waits one interval. Returns false once a stop was requested.
    fn wait_for_tick(&self, interval: Duration) -> bool {
        let mut stopped = self.stopped.lock();
        match Instant::now().checked_add(interval) {
            Some(deadline) => {
                while !*stopped {
                    if self.wake.wait_until(&mut stopped, deadline).timed_out() {
                        break;
                    }
                }
            }
            None => {
                while !*stopped {
                    self.wake.wait(&mut stopped);
                }
            }
        }
        !*stopped
    }
}

impl<R: RemoteSource + 'static, S: KvStore + 'static> Drop for AutoSync<R, S> {
    fn drop(&mut self) {
        self.stop();
    }
}
