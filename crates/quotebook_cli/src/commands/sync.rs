//! Sync and watch commands.

use parking_lot::Mutex;
use quotebook_core::QuoteStore;
use quotebook_storage::KvStore;
use quotebook_sync_engine::{
    AutoSync, HttpRemoteSource, ReqwestClient, RemoteSource, SyncConfig, SyncEngine, SyncOutcome,
};
use quotebook_sync_protocol::{ConflictPolicy, InteractiveResolver, Prompt};
use std::io::{BufRead, BufReader, Write};
use std::sync::Arc;

/// Conflict handling for a CLI sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Keep the server record.
    ServerWins,
    /// Keep the local record.
    ClientWins,
    /// Ask on the terminal.
    Ask,
}

/// Settings for the sync commands.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Engine configuration.
    pub config: SyncConfig,
    /// Conflict handling.
    pub policy: Policy,
}

/// Answers conflict prompts by reading `y`/`yes` lines from `input`.
///
/// End of input counts as a refusal, so the local record is kept.
pub struct LinePrompt<I, O> {
    input: I,
    output: O,
}

impl<I: BufRead, O: Write> LinePrompt<I, O> {
    /// Creates a prompt reading answers from `input` and asking on `output`.
    pub fn new(input: I, output: O) -> Self {
        Self { input, output }
    }
}

impl<I: BufRead, O: Write> Prompt for LinePrompt<I, O> {
    fn confirm(&mut self, message: &str) -> bool {
        if write!(self.output, "{message} [y/N] ")
            .and_then(|_| self.output.flush())
            .is_err()
        {
            return false;
        }

        let mut answer = String::new();
        match self.input.read_line(&mut answer) {
            Ok(0) | Err(_) => false,
            Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
        }
    }
}

fn http_engine<S: KvStore>(
    store: QuoteStore<S>,
    options: &SyncOptions,
) -> Result<SyncEngine<HttpRemoteSource<ReqwestClient>, S>, Box<dyn std::error::Error>> {
    let client = ReqwestClient::new(options.config.timeout)?;
    let source = HttpRemoteSource::new(options.config.endpoint.clone(), client);
    let engine = SyncEngine::new(options.config.clone(), source, store);

    match options.policy {
        Policy::ServerWins => engine.set_conflict_policy(ConflictPolicy::ServerWins),
        Policy::ClientWins => engine.set_conflict_policy(ConflictPolicy::ClientWins),
        Policy::Ask => engine.set_resolver(InteractiveResolver::new(LinePrompt::new(
            BufReader::new(std::io::stdin()),
            std::io::stderr(),
        ))),
    }
    Ok(engine)
}

/// Runs one sync against the configured endpoint.
pub fn once<S: KvStore>(
    store: QuoteStore<S>,
    options: &SyncOptions,
    out: &mut impl Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let engine = http_engine(store, options)?;
    report(&engine.sync(), out)
}

/// Prints the outcome of a sync. Failures other than a dropped overlap are
/// returned as errors.
pub fn report(outcome: &SyncOutcome, out: &mut impl Write) -> Result<(), Box<dyn std::error::Error>> {
    let note = outcome.notification();
    writeln!(out, "{}", note.message)?;

    match outcome {
        SyncOutcome::Success { merged, .. } => {
            writeln!(out, "{merged} quotes, {} conflicts resolved", outcome.conflicts())?;
            Ok(())
        }
        SyncOutcome::Failure(e) if note.is_error() => Err(e.to_string().into()),
        SyncOutcome::Failure(_) => Ok(()),
    }
}

/// Syncs on the configured interval until `input` is exhausted.
///
/// A `sync` line on `input` triggers an immediate sync.
pub fn watch<S: KvStore + 'static>(
    store: QuoteStore<S>,
    options: &SyncOptions,
    input: impl BufRead,
) -> Result<(), Box<dyn std::error::Error>> {
    if options.policy == Policy::Ask {
        return Err("The ask policy reads answers from stdin; use it with `sync`".into());
    }
    let engine = Arc::new(http_engine(store, options)?);
    watch_engine(engine, options.config.sync_interval, input, std::io::stdout())
}

/// Drives `engine` with an [`AutoSync`] timer while echoing outcomes to `out`.
pub fn watch_engine<R, S, O>(
    engine: Arc<SyncEngine<R, S>>,
    interval: std::time::Duration,
    input: impl BufRead,
    out: O,
) -> Result<(), Box<dyn std::error::Error>>
where
    R: RemoteSource + 'static,
    S: KvStore + 'static,
    O: Write + Send + 'static,
{
    let out = Arc::new(Mutex::new(out));

    let mut auto = {
        let out = Arc::clone(&out);
        AutoSync::start(Arc::clone(&engine), interval, move |outcome| {
            let _ = report(outcome, &mut *out.lock());
        })
    };
    tracing::info!(interval_secs = interval.as_secs(), "watching; close stdin to stop");

    for line in input.lines() {
        if line?.trim() == "sync" {
            let outcome = engine.sync();
            let _ = report(&outcome, &mut *out.lock());
        }
    }

    auto.stop();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quotebook_sync_engine::{MockRemote, SyncError};
    use quotebook_testkit::{memory_store, persisted, quotes};
    use std::io::Cursor;
    use std::time::Duration;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().write(buf)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuf {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().clone()).unwrap()
        }
    }

    #[test]
    fn line_prompt_accepts_yes_only() {
        let mut out = Vec::new();
        let mut prompt = LinePrompt::new(Cursor::new("y\nno\nYES\n"), &mut out);

        assert!(prompt.confirm("first?"));
        assert!(!prompt.confirm("second?"));
        assert!(prompt.confirm("third?"));
        assert!(!prompt.confirm("after eof?"));

        let asked = String::from_utf8(out).unwrap();
        assert!(asked.starts_with("first? [y/N] "));
    }

    #[test]
    fn report_success_and_failure() {
        let mut out = Vec::new();
        let (store, _) = memory_store(&quotes(&[("A", "X")]));
        let engine = SyncEngine::new(
            SyncConfig::default(),
            MockRemote::returning(quotes(&[("C", "Server")])),
            store,
        );
        report(&engine.sync(), &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Quotes synced with server!\n1 quotes, 1 conflicts resolved\n"
        );

        let mut out = Vec::new();
        let err = report(&SyncOutcome::Failure(SyncError::Timeout), &mut out).unwrap_err();
        assert_eq!(err.to_string(), "remote request timed out");
        assert_eq!(String::from_utf8(out).unwrap(), "Error syncing with server!\n");

        let mut out = Vec::new();
        report(&SyncOutcome::Failure(SyncError::InProgress), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Sync already in progress\n");
    }

    #[test]
    fn watch_syncs_on_request_and_stops_at_eof() {
        let (store, backend) = memory_store(&quotes(&[("A", "X"), ("B", "Y")]));
        let engine = Arc::new(SyncEngine::new(
            SyncConfig::default(),
            MockRemote::returning(quotes(&[("C", "Server")])),
            store,
        ));
        let out = SharedBuf::default();

        watch_engine(
            Arc::clone(&engine),
            Duration::from_secs(3600),
            Cursor::new("hello\nsync\n"),
            out.clone(),
        )
        .unwrap();

        assert_eq!(engine.remote().fetch_count(), 1);
        assert!(out.text().starts_with("Quotes synced with server!\n"));
        assert_eq!(
            persisted(&backend),
            Some(quotes(&[("C", "Server"), ("B", "Y")]))
        );
    }

    #[test]
    fn watch_rejects_ask_policy() {
        let (store, _) = memory_store(&[]);
        let options = SyncOptions {
            config: SyncConfig::default(),
            policy: Policy::Ask,
        };
        assert!(watch(store, &options, Cursor::new("")).is_err());
    }
}
