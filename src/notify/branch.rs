//! Determining the branch a build is for.

use std::collections::BTreeSet;

use tracing::debug;

use crate::git::{BranchKind, BranchName, HEAD};
use crate::notify::{BranchContainmentQuery, DiagnosticSink};

/// Resolves the branch under test.
///
/// A non-blank override (normally the CI's `GIT_BRANCH`) is authoritative.
/// Otherwise the local branches containing `HEAD` are qualified with their
/// remote; when several qualify, the lexically smallest name is chosen and
/// the ambiguity is logged.
#[derive(Debug, Clone, Default)]
pub struct BranchResolver {
    override_branch: Option<String>,
}

impl BranchResolver {
    /// Creates a resolver with an optional override.
    pub fn new(override_branch: Option<String>) -> Self {
        Self { override_branch }
    }

    /// Returns the normalized override, if it names a branch.
    ///
    /// Needs no repository access. A blank override or one naming the HEAD
    /// pseudo-reference yields `None`.
    pub fn resolve_override(&self, default_remote: &str) -> Option<BranchName> {
        self.override_branch
            .as_deref()
            .and_then(|raw| BranchName::normalize(raw, default_remote))
    }

    /// Returns the branch under test, or `None` when it cannot be determined.
    pub fn resolve(&self, query: &mut BranchContainmentQuery<'_>, log: &mut dyn DiagnosticSink) -> Option<BranchName> {
        if let Some(branch) = self.resolve_override(query.default_remote()) {
            debug!(%branch, "Using branch override");
            return Some(branch);
        }

        let refs = match query.refs_containing(HEAD) {
            Ok(refs) => refs,
            Err(e) => {
                log.log(&format!("Cannot determine the checked out Git branch: {e}"));
                return None;
            }
        };

        let candidates: BTreeSet<BranchName> = refs
            .iter()
            .filter(|branch| branch.kind == BranchKind::Local)
            .map(|branch| branch.canonical_name(query.default_remote()))
            .filter(|name| !name.is_head())
            .collect();

        let mut candidates = candidates.into_iter();
        let Some(first) = candidates.next() else {
            log.log("Cannot determine the checked out Git branch!");
            return None;
        };

        let others: Vec<String> = candidates.map(|name| name.to_string()).collect();
        if !others.is_empty() {
            log.log(&format!(
                "HEAD is on several branches; using {first} (also: {})",
                others.join(", ")
            ));
        }

        Some(first)
    }
}
