//! The single-branch rule.

use std::collections::BTreeSet;

use crate::data::CommitId;
use crate::git::BranchName;
use crate::notify::{BranchContainmentQuery, DiagnosticSink};

/// Whether a containment set means "only on `current`".
///
/// True exactly when the set has one member and it equals `current`. An empty
/// set, whether the commit is truly unreachable or its lookup failed, is
/// never exclusive.
pub fn is_exclusive_to(branches: &BTreeSet<BranchName>, current: &BranchName) -> bool {
    branches.len() == 1 && branches.contains(current)
}

/// Classifies commits as exclusive to the branch under test or shared.
pub struct ExclusivityFilter<'a> {
    query: BranchContainmentQuery<'a>,
}

impl<'a> ExclusivityFilter<'a> {
    /// Creates a filter answering from `query`.
    pub fn new(query: BranchContainmentQuery<'a>) -> Self {
        Self { query }
    }

    /// Whether `commit` is reachable from `current` and no other branch.
    pub fn is_exclusive(&mut self, commit: &CommitId, current: &BranchName, log: &mut dyn DiagnosticSink) -> bool {
        let branches = self.query.containing(commit, log);
        is_exclusive_to(&branches, current)
    }
}
