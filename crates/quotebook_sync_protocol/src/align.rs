//! Pairing of local and remote records.

use quotebook_core::QuoteRecord;

/// One output slot of an alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot<'a> {
    /// Both sides have a record here; the pair may conflict.
    Both {
        /// Local record.
        local: &'a QuoteRecord,
        /// Remote record.
        remote: &'a QuoteRecord,
    },
    /// Only the remote side has a record here.
    RemoteOnly(&'a QuoteRecord),
    /// Only the local side has a record here.
    LocalOnly(&'a QuoteRecord),
}

/// Decides which local record is compared with which remote record.
///
/// The order of the returned slots is the order of the merged list.
pub trait Alignment {
    /// Aligns the two lists into merge slots.
    fn align<'a>(&self, local: &'a [QuoteRecord], remote: &'a [QuoteRecord]) -> Vec<Slot<'a>>;
}

/// Joins records by list position.
///
/// Remote positions come first (paired with the local record at the same
/// index, if any), followed by the local-only tail.
#[derive(Debug, Clone, Copy, Default)]
pub struct Positional;

impl Alignment for Positional {
    fn align<'a>(&self, local: &'a [QuoteRecord], remote: &'a [QuoteRecord]) -> Vec<Slot<'a>> {
        let mut slots = Vec::with_capacity(local.len().max(remote.len()));

        for (i, remote) in remote.iter().enumerate() {
            match local.get(i) {
                Some(local) => slots.push(Slot::Both { local, remote }),
                None => slots.push(Slot::RemoteOnly(remote)),
            }
        }

        if local.len() > remote.len() {
            slots.extend(local[remote.len()..].iter().map(Slot::LocalOnly));
        }

        slots
    }
}
