//! In-process repository access.

use std::path::Path;

use crate::access::{AccessError, RepositoryAccessor};
use crate::data::Commit;
use crate::git::{BranchRef, GitRepository};

/// Accessor for a repository reachable through the local filesystem.
pub struct LocalAccessor {
    repo: GitRepository,
}

impl LocalAccessor {
    /// Opens the repository at `path`.
    pub fn open(path: &Path) -> Result<Self, AccessError> {
        let repo = GitRepository::open_at(path).map_err(|e| AccessError::Open {
            path: path.to_path_buf(),
            message: format!("{e:#}"),
        })?;

        Ok(Self { repo })
    }
}

impl RepositoryAccessor for LocalAccessor {
    fn branch_refs_containing(&mut self, revision: &str) -> Result<Vec<BranchRef>, AccessError> {
        self.repo
            .branch_refs_containing(revision)
            .map_err(|e| AccessError::Query {
                revision: revision.to_string(),
                message: format!("{e:#}"),
            })
    }

    fn commits_in_range(&mut self, range: &str) -> Result<Vec<Commit>, AccessError> {
        self.repo
            .commits_in_range(range)
            .map_err(|e| AccessError::Query {
                revision: range.to_string(),
                message: format!("{e:#}"),
            })
    }
}
