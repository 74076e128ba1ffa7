//! Reconciliation of local and remote quote lists.

use crate::align::{Alignment, Positional, Slot};
use crate::conflict::{ConflictResolution, ConflictResolver};
use quotebook_core::{QuoteList, QuoteRecord};

/// What happened at one position of the merged list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeDecision {
    /// Both sides had a record; the local one was kept.
    KeptLocal {
        /// Position in the merged list.
        index: usize,
    },
    /// Both sides had a record; the remote one was kept.
    KeptRemote {
        /// Position in the merged list.
        index: usize,
    },
    /// Only the remote side had a record.
    AddedRemote {
        /// Position in the merged list.
        index: usize,
    },
    /// Local-only record carried through unchanged.
    CarriedLocal {
        /// Position in the merged list.
        index: usize,
    },
}

impl MergeDecision {
    /// Returns the position this decision applies to.
    pub fn index(&self) -> usize {
        match *self {
            MergeDecision::KeptLocal { index }
            | MergeDecision::KeptRemote { index }
            | MergeDecision::AddedRemote { index }
            | MergeDecision::CarriedLocal { index } => index,
        }
    }

    /// Returns true if the resolver was consulted for this position.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            MergeDecision::KeptLocal { .. } | MergeDecision::KeptRemote { .. }
        )
    }
}

/// The merged list and the decision taken at each position.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MergeOutcome {
    /// The merged list.
    pub quotes: QuoteList,
    /// One decision per merged position, in order.
    pub decisions: Vec<MergeDecision>,
}

impl MergeOutcome {
    /// Returns the number of positions where the resolver was consulted.
    pub fn conflicts(&self) -> usize {
        self.decisions.iter().filter(|d| d.is_conflict()).count()
    }
}

/// Merges `remote` into `local` by position.
///
/// See the [crate docs](crate) for the rules. Pure apart from `resolver`.
pub fn merge<R>(local: &[QuoteRecord], remote: &[QuoteRecord], resolver: &mut R) -> MergeOutcome
where
    R: ConflictResolver + ?Sized,
{
    merge_with(&Positional, local, remote, resolver)
}

/// Merges `remote` into `local`, pairing records with `alignment`.
pub fn merge_with<A, R>(
    alignment: &A,
    local: &[QuoteRecord],
    remote: &[QuoteRecord],
    resolver: &mut R,
) -> MergeOutcome
where
    A: Alignment + ?Sized,
    R: ConflictResolver + ?Sized,
{
    let slots = alignment.align(local, remote);
    let mut outcome = MergeOutcome {
        quotes: Vec::with_capacity(slots.len()),
        decisions: Vec::with_capacity(slots.len()),
    };

    for (index, slot) in slots.into_iter().enumerate() {
        let (quote, decision) = match slot {
            Slot::Both { local, remote } => {
                let resolution = resolver.resolve(local, remote);
                let decision = match resolution {
                    ConflictResolution::KeepLocal => MergeDecision::KeptLocal { index },
                    ConflictResolution::AcceptRemote => MergeDecision::KeptRemote { index },
                };
                (resolution.pick(local, remote), decision)
            }
            Slot::RemoteOnly(remote) => (remote, MergeDecision::AddedRemote { index }),
            Slot::LocalOnly(local) => (local, MergeDecision::CarriedLocal { index }),
        };

        outcome.quotes.push(quote.clone());
        outcome.decisions.push(decision);
    }

    tracing::debug!(
        local = local.len(),
        remote = remote.len(),
        merged = outcome.quotes.len(),
        conflicts = outcome.conflicts(),
        "merged quote lists"
    );

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conflict::{ConflictPolicy, ScriptedResolver};

    fn q(text: &str, category: &str) -> QuoteRecord {
        QuoteRecord::new(text, category).unwrap()
    }

    #[test]
    fn remote_wins_scenario() {
        let local = [q("A", "X"), q("B", "Y")];
        let remote = [q("C", "Server")];

        let outcome = merge(&local, &remote, &mut ConflictPolicy::ServerWins);

        assert_eq!(outcome.quotes, vec![q("C", "Server"), q("B", "Y")]);
        assert_eq!(
            outcome.decisions,
            vec![
                MergeDecision::KeptRemote { index: 0 },
                MergeDecision::CarriedLocal { index: 1 },
            ]
        );
        assert_eq!(outcome.conflicts(), 1);
    }

    #[test]
    fn client_wins_keeps_local_head() {
        let local = [q("A", "X")];
        let remote = [q("C", "Server"), q("D", "Server")];

        let outcome = merge(&local, &remote, &mut ConflictPolicy::ClientWins);

        assert_eq!(outcome.quotes, vec![q("A", "X"), q("D", "Server")]);
        assert_eq!(
            outcome.decisions,
            vec![
                MergeDecision::KeptLocal { index: 0 },
                MergeDecision::AddedRemote { index: 1 },
            ]
        );
    }

    #[test]
    fn no_remote_is_identity() {
        let local = [q("A", "X"), q("B", "Y")];
        let mut resolver = ScriptedResolver::default();

        let outcome = merge(&local, &[], &mut resolver);

        assert_eq!(outcome.quotes, local.to_vec());
        assert_eq!(resolver.asked(), 0);
    }

    #[test]
    fn empty_local_copies_remote() {
        let remote = [q("C", "Server"), q("D", "Server")];
        let mut resolver = ScriptedResolver::default();

        let outcome = merge(&[], &remote, &mut resolver);

        assert_eq!(outcome.quotes, remote.to_vec());
        assert_eq!(resolver.asked(), 0);
        assert!(outcome.decisions.iter().all(|d| !d.is_conflict()));
    }

    #[test]
    fn resolver_consulted_even_for_equal_records() {
        let local = [q("A", "Server")];
        let remote = [q("A", "Server")];
        let mut resolver = ScriptedResolver::new([ConflictResolution::KeepLocal]);

        let outcome = merge(&local, &remote, &mut resolver);

        assert_eq!(resolver.asked(), 1);
        assert_eq!(outcome.decisions, vec![MergeDecision::KeptLocal { index: 0 }]);
    }

    #[test]
    fn mixed_answers_per_position() {
        let local = [q("A", "X"), q("B", "Y"), q("E", "Z")];
        let remote = [q("C", "Server"), q("D", "Server")];
        let mut resolver = ScriptedResolver::new([
            ConflictResolution::KeepLocal,
            ConflictResolution::AcceptRemote,
        ]);

        let outcome = merge(&local, &remote, &mut resolver);

        assert_eq!(
            outcome.quotes,
            vec![q("A", "X"), q("D", "Server"), q("E", "Z")]
        );
        let indices: Vec<_> = outcome.decisions.iter().map(MergeDecision::index).collect();
        assert_eq!(indices, [0, 1, 2]);
    }
}
