//! Process snapshots.

use std::collections::btree_set;
use std::collections::BTreeSet;
use std::fmt;

use crate::error::IdentityError;
use crate::identity::ProcessIdentity;

/// The set of process identities observed for one app at one point in time.
///
/// Backed by a `BTreeSet`, so iteration order is the canonical
/// lexicographic order regardless of the order identities were observed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSnapshot {
    app: String,
    members: BTreeSet<ProcessIdentity>,
}

impl ProcessSnapshot {
    /// Create an empty snapshot for `app`.
    pub fn new(app: impl Into<String>) -> Self {
        Self {
            app: app.into(),
            members: BTreeSet::new(),
        }
    }

    /// Build a snapshot from identities, rejecting any that belong to another app.
    pub fn from_identities<I>(app: impl Into<String>, identities: I) -> Result<Self, IdentityError>
    where
        I: IntoIterator<Item = ProcessIdentity>,
    {
        let mut snapshot = Self::new(app);
        for identity in identities {
            snapshot.insert(identity)?;
        }
        Ok(snapshot)
    }

    /// Add an identity. Returns whether it was newly inserted.
    pub fn insert(&mut self, identity: ProcessIdentity) -> Result<bool, IdentityError> {
        if identity.app() != self.app {
            return Err(IdentityError::ForeignApp {
                app: self.app.clone(),
                token: identity.as_str().to_string(),
            });
        }
        Ok(self.members.insert(identity))
    }

    /// Application the snapshot was taken for.
    pub fn app(&self) -> &str {
        &self.app
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, identity: &ProcessIdentity) -> bool {
        self.members.contains(identity)
    }

    /// Iterate in canonical order.
    pub fn iter(&self) -> btree_set::Iter<'_, ProcessIdentity> {
        self.members.iter()
    }

    /// Identity at `index` in canonical order.
    pub fn nth(&self, index: usize) -> Option<&ProcessIdentity> {
        self.members.iter().nth(index)
    }

    /// Identities with the given role.
    pub fn with_role<'a>(&'a self, role: &'a str) -> impl Iterator<Item = &'a ProcessIdentity> + 'a {
        self.members.iter().filter(move |id| id.role() == role)
    }

    pub(crate) fn members(&self) -> &BTreeSet<ProcessIdentity> {
        &self.members
    }
}

impl<'a> IntoIterator for &'a ProcessSnapshot {
    type Item = &'a ProcessIdentity;
    type IntoIter = btree_set::Iter<'a, ProcessIdentity>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}

impl fmt::Display for ProcessSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.members.is_empty() {
            return write!(f, "{} (no processes)", self.app);
        }
        let names: Vec<&str> = self.members.iter().map(ProcessIdentity::as_str).collect();
        write!(f, "{}", names.join(", "))
    }
}
