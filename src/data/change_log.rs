//! Change-log files describing the commits attributed to a build.
//!
//! A change log is a YAML document listing commits in the order the build
//! system recorded them:
//!
//! ```yaml
//! commits:
//!   - id: 3f2a9c1e...
//!     author: alice
//!   - id: 91bd0e47...
//!     author: bob
//! ```

use std::path::Path;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::data::{read_yaml_file, Commit};

/// One change-log source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChangeLog {
    /// Commits in recorded order.
    #[serde(default)]
    pub commits: Vec<Commit>,
}

impl ChangeLog {
    /// Loads and validates a change-log file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let change_log: Self = read_yaml_file(&path)?;
        change_log.validate()?;
        Ok(change_log)
    }

    /// Rejects entries with blank commit ids or authors.
    pub fn validate(&self) -> Result<()> {
        for (index, commit) in self.commits.iter().enumerate() {
            if commit.id.as_str().trim().is_empty() {
                bail!("Change-log entry {index} has an empty commit id");
            }
            if commit.author.as_str().trim().is_empty() {
                bail!(
                    "Change-log entry {index} (commit {}) has an empty author",
                    commit.id
                );
            }
        }
        Ok(())
    }

    /// Flattens several change logs into one ordered change set.
    pub fn flatten(logs: impl IntoIterator<Item = Self>) -> Vec<Commit> {
        logs.into_iter().flat_map(|log| log.commits).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn load_from_file_keeps_order() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("changelog.yaml");
        fs::write(
            &path,
            "commits:\n  - id: c2\n    author: bob\n  - id: c1\n    author: alice\n",
        )
        .unwrap();

        let change_log = ChangeLog::load_from_file(&path).unwrap();
        let ids: Vec<&str> = change_log.commits.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c2", "c1"]);
    }

    #[test]
    fn missing_commits_key_is_an_empty_change_log() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("changelog.yaml");
        fs::write(&path, "{}\n").unwrap();

        let change_log = ChangeLog::load_from_file(&path).unwrap();
        assert!(change_log.commits.is_empty());
    }

    #[test]
    fn blank_author_is_rejected() {
        let change_log = ChangeLog {
            commits: vec![Commit::new("c1", "  ")],
        };
        assert!(change_log.validate().is_err());
    }

    #[test]
    fn flatten_concatenates_sources_in_order() {
        let first = ChangeLog {
            commits: vec![Commit::new("a", "alice")],
        };
        let second = ChangeLog {
            commits: vec![Commit::new("b", "bob"), Commit::new("c", "carol")],
        };
        let flat = ChangeLog::flatten([first, second]);
        let ids: Vec<&str> = flat.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }
}
