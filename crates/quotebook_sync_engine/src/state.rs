//! Sync engine state machine.

use crate::cancel::CancelToken;
use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};
use crate::outcome::SyncOutcome;
use crate::transport::RemoteSource;
use parking_lot::{Mutex, RwLock};
use quotebook_core::{QuoteList, QuoteStore};
use quotebook_storage::KvStore;
use quotebook_sync_protocol::{merge, ConflictPolicy, ConflictResolver, MergeOutcome};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// The current state of the sync engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// Engine is idle, not syncing.
    Idle,
    /// Engine is waiting on the remote source.
    Fetching,
    /// Engine is reconciling local and remote lists.
    Merging,
    /// Engine is persisting the merged list.
    Saving,
    /// Engine has completed a sync cycle.
    Synced,
    /// Engine encountered an error.
    Error,
    /// Engine is waiting before retrying the fetch.
    RetryWait,
}

impl SyncState {
    /// Returns true if the engine is in an active sync state.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            SyncState::Fetching | SyncState::Merging | SyncState::Saving | SyncState::RetryWait
        )
    }
}

/// Statistics about sync operations.
#[derive(Debug, Clone, Default)]
pub struct SyncStats {
    /// Total number of sync cycles completed.
    pub cycles_completed: u64,
    /// Total number of failed syncs (dropped overlapping requests excluded).
    pub failures: u64,
    /// Total number of remote records fetched.
    pub quotes_fetched: u64,
    /// Total number of conflicts resolved.
    pub conflicts_resolved: u64,
    /// Total number of fetch retries.
    pub retries: u64,
    /// Last successful sync time.
    pub last_sync_time: Option<Instant>,
    /// Last error message.
    pub last_error: Option<String>,
}

/// Releases the in-flight flag when a sync ends, however it ends.
///
/// The cancel request is cleared on release, not on acquire, so a cancel
/// that lands while the sync is starting is still seen by it.
struct InFlight<'a> {
    flag: &'a AtomicBool,
    cancel: &'a CancelToken,
}

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool, cancel: &'a CancelToken) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag, cancel })
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.cancel.reset();
        self.flag.store(false, Ordering::Release);
    }
}

/// The sync engine reconciles the local quote store with a remote source.
///
/// # Example
///
/// ```rust
/// use quotebook_core::{QuoteRecord, QuoteStore};
/// use quotebook_storage::InMemoryKvStore;
/// use quotebook_sync_engine::{MockRemote, SyncConfig, SyncEngine};
///
/// let remote = MockRemote::returning(vec![QuoteRecord::new("C", "Server").unwrap()]);
/// let store = QuoteStore::open(InMemoryKvStore::new());
/// let engine = SyncEngine::new(SyncConfig::default(), remote, store);
///
/// let outcome = engine.sync();
/// assert_eq!(outcome.notification().message, "Quotes synced with server!");
/// assert_eq!(outcome.merged(), Some(4));
/// ```
pub struct SyncEngine<R: RemoteSource, S: KvStore> {
    config: SyncConfig,
    remote: R,
    store: Mutex<QuoteStore<S>>,
    resolver: Mutex<Box<dyn ConflictResolver + Send>>,
    state: RwLock<SyncState>,
    stats: RwLock<SyncStats>,
    in_flight: AtomicBool,
    cancel: CancelToken,
}

impl<R: RemoteSource, S: KvStore> SyncEngine<R, S> {
    /// Creates a new sync engine owning `store`.
    ///
    /// Conflicts are resolved with [`ConflictPolicy::ServerWins`] until
    /// another resolver is installed.
    pub fn new(config: SyncConfig, remote: R, store: QuoteStore<S>) -> Self {
        Self {
            config,
            remote,
            store: Mutex::new(store),
            resolver: Mutex::new(Box::new(ConflictPolicy::ServerWins)),
            state: RwLock::new(SyncState::Idle),
            stats: RwLock::new(SyncStats::default()),
            in_flight: AtomicBool::new(false),
            cancel: CancelToken::new(),
        }
    }

    /// Installs `resolver` at construction.
    pub fn with_resolver(self, resolver: impl ConflictResolver + Send + 'static) -> Self {
        self.set_resolver(resolver);
        self
    }

    /// Replaces the conflict resolver.
    pub fn set_resolver(&self, resolver: impl ConflictResolver + Send + 'static) {
        *self.resolver.lock() = Box::new(resolver);
    }

    /// Replaces the conflict resolver with an automatic policy.
    pub fn set_conflict_policy(&self, policy: ConflictPolicy) {
        self.set_resolver(policy);
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Returns the remote source.
    pub fn remote(&self) -> &R {
        &self.remote
    }

    /// Gets the current state.
    pub fn state(&self) -> SyncState {
        *self.state.read()
    }

    /// Gets the current stats.
    pub fn stats(&self) -> SyncStats {
        self.stats.read().clone()
    }

    /// Returns true while a sync is running.
    pub fn is_syncing(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Returns a handle that cancels the in-flight sync.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Cancels any ongoing sync operation.
    ///
    /// Issued while idle, the request applies to the next sync.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Runs `f` with exclusive access to the quote store.
    ///
    /// Waits for an in-flight sync to finish first.
    pub fn with_store<T>(&self, f: impl FnOnce(&mut QuoteStore<S>) -> T) -> T {
        f(&mut self.store.lock())
    }

    /// Returns a copy of the current quote list.
    pub fn quotes(&self) -> QuoteList {
        self.store.lock().quotes().to_vec()
    }

    /// Sets the state.
    fn set_state(&self, state: SyncState) {
        *self.state.write() = state;
    }

    /// Performs a full sync cycle: load, fetch, merge, save.
    ///
    /// A request arriving while another sync is in flight is dropped and
    /// reported as [`SyncError::InProgress`].
    pub fn sync(&self) -> SyncOutcome {
        self.run(None)
    }

    /// Like [`SyncEngine::sync`], but also abandons the cycle once `stop` is
    /// cancelled.
    ///
    /// The engine never resets `stop`, so a stop requested before the cycle
    /// begins cancels it too.
    pub fn sync_with_stop(&self, stop: &CancelToken) -> SyncOutcome {
        self.run(Some(stop))
    }

    fn run(&self, stop: Option<&CancelToken>) -> SyncOutcome {
        let Some(_in_flight) = InFlight::acquire(&self.in_flight, &self.cancel) else {
            tracing::debug!("sync requested while another is in flight, dropping");
            return SyncOutcome::Failure(SyncError::InProgress);
        };

        let start = Instant::now();

        match self.run_cycle(stop) {
            Ok(outcome) => {
                let conflicts = outcome.conflicts() as u64;
                self.set_state(SyncState::Synced);
                {
                    let mut stats = self.stats.write();
                    stats.cycles_completed += 1;
                    stats.conflicts_resolved += conflicts;
                    stats.last_sync_time = Some(Instant::now());
                    stats.last_error = None;
                }

                tracing::info!(
                    merged = outcome.quotes.len(),
                    conflicts,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "sync completed"
                );

                SyncOutcome::Success {
                    merged: outcome.quotes.len(),
                    decisions: outcome.decisions,
                }
            }
            Err(e) => {
                self.handle_error(&e);
                SyncOutcome::Failure(e)
            }
        }
    }

    fn run_cycle(&self, stop: Option<&CancelToken>) -> SyncResult<MergeOutcome> {
        // Held until the merged list is saved: nothing else may touch the
        // list while the fetch is outstanding.
        let mut store = self.store.lock();

        self.set_state(SyncState::Fetching);
        let local = store.load();
        let remote = self.fetch(stop)?;

        self.set_state(SyncState::Merging);
        let outcome = {
            let mut resolver = self.resolver.lock();
            merge(&local, &remote, &mut *resolver)
        };

        self.check_cancelled(stop)?;

        self.set_state(SyncState::Saving);
        store.save(outcome.quotes.clone())?;

        Ok(outcome)
    }

    /// Fetches the remote list, retrying transient failures per the config.
    ///
    /// Cancellation is checked before every attempt and again once the
    /// remote answers; a cancelled fetch discards whatever arrived.
    pub fn fetch_remote(&self) -> SyncResult<QuoteList> {
        self.fetch(None)
    }

    fn fetch(&self, stop: Option<&CancelToken>) -> SyncResult<QuoteList> {
        let retry = &self.config.retry;
        let attempts = retry.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            if attempt > 0 {
                self.set_state(SyncState::RetryWait);
                self.sleep_cancellable(retry.delay_for_attempt(attempt), stop);
                self.stats.write().retries += 1;
                self.set_state(SyncState::Fetching);
            }

            self.check_cancelled(stop)?;
            let result = self.remote.fetch(self.config.fetch_limit);
            self.check_cancelled(stop)?;

            match result {
                Ok(mut quotes) => {
                    quotes.truncate(self.config.fetch_limit);
                    self.stats.write().quotes_fetched += quotes.len() as u64;
                    tracing::debug!(count = quotes.len(), "fetched remote quotes");
                    return Ok(quotes);
                }
                Err(e) if e.is_retryable() && attempt + 1 < attempts => {
                    tracing::debug!(error = %e, attempt, "remote fetch failed, retrying");
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn check_cancelled(&self, stop: Option<&CancelToken>) -> SyncResult<()> {
        self.cancel.check()?;
        stop.map_or(Ok(()), CancelToken::check)
    }

    fn sleep_cancellable(&self, delay: Duration, stop: Option<&CancelToken>) {
        let deadline = Instant::now() + delay;
        while self.check_cancelled(stop).is_ok() {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            std::thread::sleep((deadline - now).min(Duration::from_millis(50)));
        }
    }

    /// Handles an error by updating state and stats.
    fn handle_error(&self, error: &SyncError) {
        self.set_state(SyncState::Error);
        {
            let mut stats = self.stats.write();
            stats.failures += 1;
            stats.last_error = Some(error.to_string());
        }
        tracing::warn!(error = %error, "sync failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetryConfig;
    use crate::transport::MockRemote;
    use quotebook_storage::InMemoryKvStore;
    use quotebook_sync_protocol::{ConflictResolution, MergeDecision, ScriptedResolver};
    use quotebook_testkit::{memory_store, persisted, quotes};
    use std::sync::Arc;

    type TestEngine = SyncEngine<MockRemote, Arc<InMemoryKvStore>>;

    fn engine_with(local: &[(&str, &str)], remote: MockRemote) -> (TestEngine, Arc<InMemoryKvStore>) {
        let (store, backend) = memory_store(&quotes(local));
        (SyncEngine::new(SyncConfig::default(), remote, store), backend)
    }

    #[test]
    fn sync_state_checks() {
        assert!(SyncState::Fetching.is_active());
        assert!(SyncState::RetryWait.is_active());
        assert!(!SyncState::Idle.is_active());
        assert!(!SyncState::Synced.is_active());
    }

    #[test]
    fn sync_engine_initial_state() {
        let (engine, _) = engine_with(&[], MockRemote::new());
        assert_eq!(engine.state(), SyncState::Idle);
        assert_eq!(engine.stats().cycles_completed, 0);
        assert!(!engine.is_syncing());
    }

    #[test]
    fn remote_wins_end_to_end() {
        let remote = MockRemote::returning(quotes(&[("C", "Server")]));
        let (engine, backend) = engine_with(&[("A", "X"), ("B", "Y")], remote);

        let outcome = engine.sync();

        assert_eq!(outcome.merged(), Some(2));
        assert_eq!(
            persisted(&backend),
            Some(quotes(&[("C", "Server"), ("B", "Y")]))
        );
        assert_eq!(engine.quotes(), quotes(&[("C", "Server"), ("B", "Y")]));
        assert_eq!(engine.state(), SyncState::Synced);

        let stats = engine.stats();
        assert_eq!(stats.cycles_completed, 1);
        assert_eq!(stats.conflicts_resolved, 1);
        assert_eq!(stats.quotes_fetched, 1);
    }

    #[test]
    fn network_failure_leaves_store_unchanged() {
        let remote = MockRemote::failing(SyncError::network_retryable("connection refused"));
        let (engine, backend) = engine_with(&[("A", "X"), ("B", "Y")], remote);
        let before = backend.snapshot();

        let outcome = engine.sync();

        assert!(matches!(outcome, SyncOutcome::Failure(SyncError::Network { .. })));
        assert!(outcome.notification().is_error());
        assert_eq!(backend.snapshot(), before);
        assert_eq!(engine.state(), SyncState::Error);
        assert_eq!(engine.stats().failures, 1);
        assert!(engine.stats().last_error.is_some());
    }

    #[test]
    fn resolver_decides_each_overlap() {
        let remote = MockRemote::returning(quotes(&[("C", "Server"), ("D", "Server")]));
        let (engine, _) = engine_with(&[("A", "X"), ("B", "Y")], remote);
        engine.set_resolver(ScriptedResolver::new([
            ConflictResolution::KeepLocal,
            ConflictResolution::AcceptRemote,
        ]));

        let outcome = engine.sync();

        match outcome {
            SyncOutcome::Success { decisions, .. } => assert_eq!(
                decisions,
                vec![
                    MergeDecision::KeptLocal { index: 0 },
                    MergeDecision::KeptRemote { index: 1 },
                ]
            ),
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(engine.quotes(), quotes(&[("A", "X"), ("D", "Server")]));
    }

    #[test]
    fn fetch_limit_is_passed_and_enforced() {
        let remote = MockRemote::returning(quotes(&[
            ("a", "Server"),
            ("b", "Server"),
            ("c", "Server"),
        ]));
        let (store, _) = memory_store(&[]);
        let engine = SyncEngine::new(SyncConfig::default().with_fetch_limit(2), remote, store);

        assert_eq!(engine.sync().merged(), Some(2));
        assert_eq!(engine.remote().last_limit(), 2);
    }

    #[test]
    fn retry_recovers_from_transient_failure() {
        let remote = MockRemote::returning(quotes(&[("C", "Server")]));
        remote.push_error(SyncError::Timeout);
        let (store, _) = memory_store(&[]);
        let config = SyncConfig::default().with_retry(
            RetryConfig::new(3)
                .with_initial_delay(Duration::from_millis(1))
                .without_jitter(),
        );
        let engine = SyncEngine::new(config, remote, store);

        assert!(engine.sync().is_success());
        assert_eq!(engine.remote().fetch_count(), 2);
        assert_eq!(engine.stats().retries, 1);
    }

    #[test]
    fn fatal_error_is_not_retried() {
        let remote = MockRemote::returning(quotes(&[("C", "Server")]));
        remote.push_error(SyncError::Decode("bad".into()));
        let (store, _) = memory_store(&[]);
        let engine = SyncEngine::new(
            SyncConfig::default().with_retry(RetryConfig::new(3).without_jitter()),
            remote,
            store,
        );

        assert!(matches!(
            engine.sync(),
            SyncOutcome::Failure(SyncError::Decode(_))
        ));
        assert_eq!(engine.remote().fetch_count(), 1);
    }

    #[test]
    fn with_store_mutations_are_visible_to_sync() {
        let remote = MockRemote::returning(Vec::new());
        let (engine, backend) = engine_with(&[("A", "X")], remote);

        engine.with_store(|store| store.add("B", "Y").map(|_| ())).unwrap();
        assert!(engine.sync().is_success());

        assert_eq!(persisted(&backend), Some(quotes(&[("A", "X"), ("B", "Y")])));
    }

    #[test]
    fn in_flight_guard_releases_after_failure() {
        let remote = MockRemote::failing(SyncError::Timeout);
        remote.set_response(Vec::new());
        let (engine, _) = engine_with(&[], remote);

        assert!(!engine.sync().is_success());
        assert!(!engine.is_syncing());
        assert!(engine.sync().is_success());
    }

    #[test]
    fn cancel_before_sync_applies_to_next_cycle() {
        let remote = MockRemote::returning(quotes(&[("C", "Server")]));
        let (engine, backend) = engine_with(&[("A", "X")], remote);
        let before = backend.snapshot();

        engine.cancel_token().cancel();
        assert!(matches!(
            engine.sync(),
            SyncOutcome::Failure(SyncError::Cancelled)
        ));
        assert_eq!(engine.remote().fetch_count(), 0);
        assert_eq!(backend.snapshot(), before);

        // The request is consumed by the cycle it cancelled.
        assert!(!engine.cancel_token().is_cancelled());
        assert!(engine.sync().is_success());
    }

    #[test]
    fn stopped_token_cancels_every_cycle() {
        let remote = MockRemote::returning(quotes(&[("C", "Server")]));
        let (engine, backend) = engine_with(&[("A", "X")], remote);
        let before = backend.snapshot();
        let stop = CancelToken::new();

        assert!(engine.sync_with_stop(&stop).is_success());

        let before_stop = backend.snapshot();
        stop.cancel();
        for _ in 0..2 {
            assert!(matches!(
                engine.sync_with_stop(&stop),
                SyncOutcome::Failure(SyncError::Cancelled)
            ));
        }
        assert_ne!(before, before_stop);
        assert_eq!(backend.snapshot(), before_stop);
        assert_eq!(engine.remote().fetch_count(), 1);

        // A plain sync ignores the stop token.
        assert!(engine.sync().is_success());
    }
}
