//! Conflict resolution.

use quotebook_core::QuoteRecord;
use std::collections::VecDeque;

/// Which side of a conflicting pair wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictResolution {
    /// Keep the local record.
    KeepLocal,
    /// Accept the remote record.
    AcceptRemote,
}

impl ConflictResolution {
    /// Returns the winning record of the pair.
    pub fn pick<'a>(&self, local: &'a QuoteRecord, remote: &'a QuoteRecord) -> &'a QuoteRecord {
        match self {
            ConflictResolution::KeepLocal => local,
            ConflictResolution::AcceptRemote => remote,
        }
    }
}

/// Decides the winner when a local and a remote record share a slot.
///
/// Implementations may block (an interactive resolver waits for a human),
/// but the merge itself never does anything else that blocks.
pub trait ConflictResolver {
    /// Resolves one conflicting pair.
    fn resolve(&mut self, local: &QuoteRecord, remote: &QuoteRecord) -> ConflictResolution;
}

impl<R: ConflictResolver + ?Sized> ConflictResolver for Box<R> {
    fn resolve(&mut self, local: &QuoteRecord, remote: &QuoteRecord) -> ConflictResolution {
        (**self).resolve(local, remote)
    }
}

/// Policy for automatic conflict resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictPolicy {
    /// Server always wins.
    #[default]
    ServerWins,
    /// Client always wins.
    ClientWins,
    /// Last write wins (by timestamp).
    LastWriteWins,
}

impl ConflictPolicy {
    /// Returns the resolution this policy gives every conflict.
    pub fn resolution(&self) -> ConflictResolution {
        match self {
            ConflictPolicy::ServerWins => ConflictResolution::AcceptRemote,
            ConflictPolicy::ClientWins => ConflictResolution::KeepLocal,
            // Records carry no timestamps yet; the server copy is the newer one.
            ConflictPolicy::LastWriteWins => ConflictResolution::AcceptRemote,
        }
    }
}

impl ConflictResolver for ConflictPolicy {
    fn resolve(&mut self, _local: &QuoteRecord, _remote: &QuoteRecord) -> ConflictResolution {
        self.resolution()
    }
}

/// A yes/no question put to a human operator.
pub trait Prompt {
    /// Shows `message` and returns true on an affirmative answer.
    fn confirm(&mut self, message: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Prompt for F {
    fn confirm(&mut self, message: &str) -> bool {
        self(message)
    }
}

/// Builds the question shown for a conflicting pair.
pub fn conflict_prompt(local: &QuoteRecord, remote: &QuoteRecord) -> String {
    format!(
        "Conflict detected:\nLocal: \"{}\"\nServer: \"{}\"\nKeep server version?",
        local.text(),
        remote.text()
    )
}

/// Asks a human which record to keep.
///
/// An affirmative answer keeps the remote record, anything else keeps the
/// local one.
#[derive(Debug)]
pub struct InteractiveResolver<P: Prompt> {
    prompt: P,
}

impl<P: Prompt> InteractiveResolver<P> {
    /// Creates a resolver asking through `prompt`.
    pub fn new(prompt: P) -> Self {
        Self { prompt }
    }

    /// Returns the underlying prompt.
    pub fn into_inner(self) -> P {
        self.prompt
    }
}

impl<P: Prompt> ConflictResolver for InteractiveResolver<P> {
    fn resolve(&mut self, local: &QuoteRecord, remote: &QuoteRecord) -> ConflictResolution {
        if self.prompt.confirm(&conflict_prompt(local, remote)) {
            ConflictResolution::AcceptRemote
        } else {
            ConflictResolution::KeepLocal
        }
    }
}

/// Replays pre-recorded answers, then falls back to a policy.
///
/// Stands in for a human operator in tests.
#[derive(Debug, Clone, Default)]
pub struct ScriptedResolver {
    answers: VecDeque<ConflictResolution>,
    fallback: ConflictPolicy,
    asked: usize,
}

impl ScriptedResolver {
    /// Creates a resolver that answers with `answers` in order.
    pub fn new(answers: impl IntoIterator<Item = ConflictResolution>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            fallback: ConflictPolicy::default(),
            asked: 0,
        }
    }

    /// Sets the policy used once the script runs out.
    pub fn with_fallback(mut self, fallback: ConflictPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    /// Returns how many conflicts were put to this resolver.
    pub fn asked(&self) -> usize {
        self.asked
    }

    /// Returns the number of unused answers.
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl ConflictResolver for ScriptedResolver {
    fn resolve(&mut self, _local: &QuoteRecord, _remote: &QuoteRecord) -> ConflictResolution {
        self.asked += 1;
        self.answers
            .pop_front()
            .unwrap_or_else(|| self.fallback.resolution())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> (QuoteRecord, QuoteRecord) {
        (
            QuoteRecord::new("local text", "Life").unwrap(),
            QuoteRecord::new("server text", "Server").unwrap(),
        )
    }

    #[test]
    fn policy_resolution() {
        let (local, remote) = pair();

        assert_eq!(
            ConflictPolicy::ServerWins.resolve(&local, &remote),
            ConflictResolution::AcceptRemote
        );
        assert_eq!(
            ConflictPolicy::ClientWins.resolve(&local, &remote),
            ConflictResolution::KeepLocal
        );
        assert_eq!(
            ConflictPolicy::LastWriteWins.resolve(&local, &remote),
            ConflictResolution::AcceptRemote
        );
    }

    #[test]
    fn resolution_picks_side() {
        let (local, remote) = pair();
        assert_eq!(ConflictResolution::KeepLocal.pick(&local, &remote), &local);
        assert_eq!(ConflictResolution::AcceptRemote.pick(&local, &remote), &remote);
    }

    struct Recorder {
        asked: Vec<String>,
        answer: bool,
    }

    impl Prompt for Recorder {
        fn confirm(&mut self, message: &str) -> bool {
            self.asked.push(message.to_string());
            self.answer
        }
    }

    #[test]
    fn interactive_shows_both_texts() {
        let (local, remote) = pair();
        let mut resolver = InteractiveResolver::new(Recorder {
            asked: Vec::new(),
            answer: true,
        });

        assert_eq!(
            resolver.resolve(&local, &remote),
            ConflictResolution::AcceptRemote
        );

        assert_eq!(
            resolver.into_inner().asked,
            ["Conflict detected:\nLocal: \"local text\"\nServer: \"server text\"\nKeep server version?"]
        );
    }

    #[test]
    fn interactive_closure_prompt() {
        let (local, remote) = pair();
        let mut seen = 0;
        let mut resolver = InteractiveResolver::new(|_: &str| {
            seen += 1;
            true
        });
        assert_eq!(
            resolver.resolve(&local, &remote),
            ConflictResolution::AcceptRemote
        );
        drop(resolver);
        assert_eq!(seen, 1);
    }

    #[test]
    fn interactive_decline_keeps_local() {
        let (local, remote) = pair();
        let mut resolver = InteractiveResolver::new(|_: &str| false);
        assert_eq!(resolver.resolve(&local, &remote), ConflictResolution::KeepLocal);
    }

    #[test]
    fn scripted_then_fallback() {
        let (local, remote) = pair();
        let mut resolver = ScriptedResolver::new([ConflictResolution::KeepLocal])
            .with_fallback(ConflictPolicy::ServerWins);

        assert_eq!(resolver.resolve(&local, &remote), ConflictResolution::KeepLocal);
        assert_eq!(resolver.remaining(), 0);
        assert_eq!(
            resolver.resolve(&local, &remote),
            ConflictResolution::AcceptRemote
        );
        assert_eq!(resolver.asked(), 2);
    }

    #[test]
    fn boxed_resolver_delegates() {
        let (local, remote) = pair();
        let mut boxed: Box<dyn ConflictResolver> = Box::new(ConflictPolicy::ClientWins);
        assert_eq!(boxed.resolve(&local, &remote), ConflictResolution::KeepLocal);
    }
}
