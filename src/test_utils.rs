//! Shared test utilities.

use std::collections::{HashMap, HashSet};

use crate::access::{AccessError, RepositoryAccessor};
use crate::data::Commit;
use crate::git::BranchRef;

/// In-memory repository with pre-programmed query answers.
///
/// Revisions without an answer contain no branches. Every containment query
/// is recorded so tests can check which revisions were looked up.
#[derive(Debug, Default)]
pub(crate) struct FakeRepository {
    branches: HashMap<String, Vec<BranchRef>>,
    ranges: HashMap<String, Vec<Commit>>,
    failing: HashSet<String>,
    pub(crate) queries: Vec<String>,
}

impl FakeRepository {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Answers `revision` with the given remote-tracking branches.
    pub(crate) fn with_branches(self, revision: &str, names: &[&str]) -> Self {
        let refs = names.iter().map(|name| BranchRef::remote(*name)).collect();
        self.with_refs(revision, refs)
    }

    /// Answers `revision` with arbitrary branch references.
    pub(crate) fn with_refs(mut self, revision: &str, refs: Vec<BranchRef>) -> Self {
        self.branches.insert(revision.to_string(), refs);
        self
    }

    /// Answers a range query.
    pub(crate) fn with_range(mut self, range: &str, commits: Vec<Commit>) -> Self {
        self.ranges.insert(range.to_string(), commits);
        self
    }

    /// Makes every query for `revision` fail.
    pub(crate) fn failing(mut self, revision: &str) -> Self {
        self.failing.insert(revision.to_string());
        self
    }
}

impl RepositoryAccessor for FakeRepository {
    fn branch_refs_containing(&mut self, revision: &str) -> Result<Vec<BranchRef>, AccessError> {
        self.queries.push(revision.to_string());
        if self.failing.contains(revision) {
            return Err(AccessError::Query {
                revision: revision.to_string(),
                message: "simulated failure".to_string(),
            });
        }
        Ok(self.branches.get(revision).cloned().unwrap_or_default())
    }

    fn commits_in_range(&mut self, range: &str) -> Result<Vec<Commit>, AccessError> {
        if self.failing.contains(range) {
            return Err(AccessError::Query {
                revision: range.to_string(),
                message: "simulated failure".to_string(),
            });
        }
        self.ranges.get(range).cloned().ok_or_else(|| AccessError::Query {
            revision: range.to_string(),
            message: "unknown range".to_string(),
        })
    }
}
