//! Data model shared by the notification pipeline and its outputs.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::git::BranchName;

pub mod change_log;
pub mod yaml;

pub use change_log::ChangeLog;
pub use yaml::{read_yaml_file, to_yaml};

/// Version-control revision identifier of a commit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommitId(String);

impl CommitId {
    /// Creates a commit identifier from its textual form.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of a user who authored commits or triggered a build.
///
/// Opaque to the pipeline: two authors are the same person exactly when
/// their identifiers are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Author(String);

impl Author {
    /// Creates an author identity.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identity as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A commit attributed to the build's change set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// Revision identifier.
    pub id: CommitId,
    /// Who wrote the change.
    pub author: Author,
}

impl Commit {
    /// Creates a commit entry.
    pub fn new(id: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id: CommitId::new(id),
            author: Author::new(author),
        }
    }
}

/// Deduplicated set of users to notify about a build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationSet {
    authors: BTreeSet<Author>,
}

impl NotificationSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an author, returning `false` when they were already present.
    pub fn insert(&mut self, author: Author) -> bool {
        self.authors.insert(author)
    }

    /// Whether the author will be notified.
    pub fn contains(&self, author: &Author) -> bool {
        self.authors.contains(author)
    }

    /// Number of distinct authors.
    pub fn len(&self) -> usize {
        self.authors.len()
    }

    /// Whether nobody will be notified.
    pub fn is_empty(&self) -> bool {
        self.authors.is_empty()
    }

    /// Iterates authors in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = &Author> {
        self.authors.iter()
    }
}

impl Extend<Author> for NotificationSet {
    fn extend<T: IntoIterator<Item = Author>>(&mut self, iter: T) {
        self.authors.extend(iter);
    }
}

impl FromIterator<Author> for NotificationSet {
    fn from_iter<T: IntoIterator<Item = Author>>(iter: T) -> Self {
        Self {
            authors: iter.into_iter().collect(),
        }
    }
}

/// Outcome of a notification run, as printed by the `recipients` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationReport {
    /// Branch the build was attributed to, when it could be resolved.
    pub branch: Option<BranchName>,
    /// User who started the build, when known.
    pub triggerer: Option<Author>,
    /// Everyone who should receive the notification.
    pub recipients: NotificationSet,
}
