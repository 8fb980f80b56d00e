//! Snapshot comparison.

use std::collections::BTreeSet;

use crate::identity::ProcessIdentity;
use crate::snapshot::ProcessSnapshot;

/// Difference between two snapshots of the same app.
///
/// Used for two distinct checks:
///
/// - scale correctness: `size_matches(target)`
/// - restart correctness: `identities_changed()` even though the count
///   stays the same, because a restart replaces instances in place
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotDiff {
    before_len: usize,
    after_len: usize,
    added: BTreeSet<ProcessIdentity>,
    removed: BTreeSet<ProcessIdentity>,
}

impl SnapshotDiff {
    /// Compare `before` with `after`.
    pub fn between(before: &ProcessSnapshot, after: &ProcessSnapshot) -> Self {
        let added = after
            .members()
            .difference(before.members())
            .cloned()
            .collect();
        let removed = before
            .members()
            .difference(after.members())
            .cloned()
            .collect();

        Self {
            before_len: before.len(),
            after_len: after.len(),
            added,
            removed,
        }
    }

    /// Identities present only after.
    pub fn added(&self) -> &BTreeSet<ProcessIdentity> {
        &self.added
    }

    /// Identities present only before.
    pub fn removed(&self) -> &BTreeSet<ProcessIdentity> {
        &self.removed
    }

    /// True iff the two snapshots differ as sets.
    pub fn identities_changed(&self) -> bool {
        !self.added.is_empty() || !self.removed.is_empty()
    }

    /// True iff the later snapshot has exactly `target` members.
    pub fn size_matches(&self, target: usize) -> bool {
        self.after_len == target
    }

    /// True iff the count is unchanged.
    pub fn size_preserved(&self) -> bool {
        self.before_len == self.after_len
    }

    /// Same count, different members: the shape of a restart.
    pub fn is_replacement(&self) -> bool {
        self.size_preserved() && self.identities_changed()
    }

    /// True iff every earlier identity is gone and every later one is new.
    pub fn replaced_all(&self) -> bool {
        self.removed.len() == self.before_len && self.added.len() == self.after_len
    }

    pub fn before_len(&self) -> usize {
        self.before_len
    }

    pub fn after_len(&self) -> usize {
        self.after_len
    }
}
