//! Which branches contain a commit.

use std::collections::BTreeSet;

use tracing::debug;

use crate::access::{AccessError, RepositoryAccessor};
use crate::data::CommitId;
use crate::git::{short_hash, BranchName, BranchRef};
use crate::notify::DiagnosticSink;

/// Containment queries over an open repository.
///
/// Names are canonicalized (see [`BranchRef::canonical_name`]) and the HEAD
/// pseudo-reference is removed before anything is compared.
pub struct BranchContainmentQuery<'a> {
    accessor: &'a mut dyn RepositoryAccessor,
    default_remote: String,
}

impl<'a> BranchContainmentQuery<'a> {
    /// Creates a query over `accessor`, qualifying upstream-less local
    /// branches with `default_remote`.
    pub fn new(accessor: &'a mut dyn RepositoryAccessor, default_remote: impl Into<String>) -> Self {
        Self {
            accessor,
            default_remote: default_remote.into(),
        }
    }

    /// Remote used to qualify local branches.
    pub fn default_remote(&self) -> &str {
        &self.default_remote
    }

    /// Raw branch references containing `revision`.
    pub fn refs_containing(&mut self, revision: &str) -> Result<Vec<BranchRef>, AccessError> {
        self.accessor.branch_refs_containing(revision)
    }

    /// Canonical names of the branches containing `commit`.
    ///
    /// Never fails: a query error is logged and yields the empty set, which
    /// no caller treats as exclusive.
    pub fn containing(&mut self, commit: &CommitId, log: &mut dyn DiagnosticSink) -> BTreeSet<BranchName> {
        match self.refs_containing(commit.as_str()) {
            Ok(refs) => {
                let names: BTreeSet<BranchName> = refs
                    .iter()
                    .map(|branch| branch.canonical_name(&self.default_remote))
                    .filter(|name| !name.is_head())
                    .collect();
                debug!(commit = short_hash(commit.as_str()), branches = ?names, "Containment");
                names
            }
            Err(e) => {
                log.log(&format!(
                    "Cannot get the name of branches which contain commit {commit}: {e}"
                ));
                BTreeSet::new()
            }
        }
    }
}
