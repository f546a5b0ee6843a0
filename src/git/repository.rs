//! Git repository operations

use std::path::Path;

use anyhow::{Context, Result};
use git2::{Branch, BranchType, Oid, Repository};
use tracing::{debug, warn};

use crate::data::Commit;
use crate::git::{BranchKind, BranchName, BranchRef};

/// Git repository wrapper
pub struct GitRepository {
    repo: Repository,
}

impl GitRepository {
    /// Open repository at specified path
    pub fn open_at<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let repo = Repository::open(path)
            .with_context(|| format!("Failed to open git repository at {}", path.display()))?;

        Ok(Self { repo })
    }

    /// Resolve a revision (commit id, `HEAD`, branch name) to a commit
    pub fn resolve_commit(&self, revision: &str) -> Result<Oid> {
        let object = self
            .repo
            .revparse_single(revision)
            .with_context(|| format!("Failed to parse revision: {revision}"))?;
        let commit = object
            .peel_to_commit()
            .with_context(|| format!("Revision {revision} does not point to a commit"))?;

        Ok(commit.id())
    }

    /// List every local and remote-tracking branch whose history contains `revision`
    ///
    /// Branches are returned in repository order. Pseudo-references such as
    /// `origin/HEAD` are reported as-is; callers decide what to drop.
    pub fn branch_refs_containing(&self, revision: &str) -> Result<Vec<BranchRef>> {
        let target = self.resolve_commit(revision)?;
        let branches = self
            .repo
            .branches(None)
            .context("Failed to list branches")?;

        let mut containing = Vec::new();
        for entry in branches {
            let (branch, branch_type) = entry.context("Failed to read branch")?;

            let Some(name) = branch.name().ok().flatten().map(str::to_string) else {
                warn!("Skipping branch with a non UTF-8 name");
                continue;
            };

            let tip = match branch.get().peel_to_commit() {
                Ok(commit) => commit.id(),
                Err(e) => {
                    warn!(branch = %name, error = %e, "Skipping branch that does not point to a commit");
                    continue;
                }
            };

            let contains = tip == target
                || self
                    .repo
                    .graph_descendant_of(tip, target)
                    .with_context(|| format!("Failed to check ancestry of branch {name}"))?;
            if !contains {
                continue;
            }

            let branch_ref = match branch_type {
                BranchType::Remote => BranchRef {
                    name: BranchName::new(name),
                    kind: BranchKind::Remote,
                    upstream: None,
                },
                BranchType::Local => BranchRef {
                    upstream: upstream_name(&branch),
                    name: BranchName::new(name),
                    kind: BranchKind::Local,
                },
            };
            containing.push(branch_ref);
        }

        debug!(revision, count = containing.len(), "Found containing branches");
        Ok(containing)
    }

    /// Parse commit range and get commits, oldest first
    ///
    /// Accepts `A..B`, or a single revision for one commit.
    pub fn commits_in_range(&self, range: &str) -> Result<Vec<Commit>> {
        let mut commits = Vec::new();

        if let Some((start_spec, end_spec)) = range.split_once("..") {
            if end_spec.contains("..") {
                anyhow::bail!("Invalid range format: {range}");
            }

            let start = self.resolve_commit(start_spec)?;
            let end = self.resolve_commit(end_spec)?;

            // Walk from end back to start (exclusive)
            let mut walker = self.repo.revwalk().context("Failed to create revwalk")?;
            walker.push(end).context("Failed to push end commit")?;
            walker.hide(start).context("Failed to hide start commit")?;

            for oid in walker {
                let oid = oid.context("Failed to get commit OID from walker")?;
                commits.push(self.commit_entry(oid)?);
            }

            // Reverse to get chronological order (oldest first)
            commits.reverse();
        } else {
            let oid = self.resolve_commit(range)?;
            commits.push(self.commit_entry(oid)?);
        }

        Ok(commits)
    }

    /// Build a change-set entry, identifying the author by email
    fn commit_entry(&self, oid: Oid) -> Result<Commit> {
        let commit = self
            .repo
            .find_commit(oid)
            .with_context(|| format!("Failed to find commit {oid}"))?;
        let author = commit.author();
        let identity = author
            .email()
            .filter(|email| !email.is_empty())
            .or_else(|| author.name())
            .unwrap_or("unknown");

        Ok(Commit::new(oid.to_string(), identity))
    }
}

/// Short name of a local branch's upstream, if one is configured
fn upstream_name(branch: &Branch<'_>) -> Option<BranchName> {
    let upstream = branch.upstream().ok()?;
    let name = upstream.name().ok().flatten()?;
    Some(BranchName::new(name))
}
