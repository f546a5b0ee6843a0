//! Authors of branch-exclusive commits.

use std::collections::BTreeSet;

use tracing::debug;

use crate::data::{Author, Commit};
use crate::git::{short_hash, BranchName};
use crate::notify::{DiagnosticSink, ExclusivityFilter};

/// Collects the authors whose commits exist only on the branch under test.
pub struct AuthorAggregator<'a> {
    filter: ExclusivityFilter<'a>,
}

impl<'a> AuthorAggregator<'a> {
    /// Creates an aggregator classifying commits with `filter`.
    pub fn new(filter: ExclusivityFilter<'a>) -> Self {
        Self { filter }
    }

    /// Deduplicated authors of the commits exclusive to `current`.
    ///
    /// Commits by an author who is already included are not queried.
    pub fn exclusive_authors(
        &mut self,
        commits: &[Commit],
        current: &BranchName,
        log: &mut dyn DiagnosticSink,
    ) -> BTreeSet<Author> {
        let mut authors = BTreeSet::new();

        for commit in commits {
            if authors.contains(&commit.author) {
                continue;
            }

            if self.filter.is_exclusive(&commit.id, current, log) {
                debug!(commit = short_hash(commit.id.as_str()), author = %commit.author, "Exclusive commit");
                authors.insert(commit.author.clone());
            }
        }

        authors
    }
}
