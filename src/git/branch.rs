//! Branch names and their canonical, remote-qualified form.
//!
//! Commits are attributed to branches by comparing names exactly, so every
//! name that takes part in a comparison goes through the same rule:
//!
//! - remote-tracking `refs/remotes/<remote>/<branch>` becomes `<remote>/<branch>`
//! - local `refs/heads/<branch>` becomes its upstream's name when one is
//!   configured, otherwise `<default remote>/<branch>`
//!
//! A local branch and the remote branch it tracks therefore collapse into a
//! single name.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Name of the current-checkout pseudo-reference.
pub const HEAD: &str = "HEAD";

/// Remote assumed for local branches without a configured upstream.
pub const DEFAULT_REMOTE: &str = "origin";

const REMOTES_PREFIX: &str = "refs/remotes/";
const HEADS_PREFIX: &str = "refs/heads/";
const SHORT_REMOTES_PREFIX: &str = "remotes/";

/// Normalized branch identifier such as `origin/feature-x`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BranchName(String);

impl BranchName {
    /// Wraps an already-normalized name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Normalizes a user- or CI-supplied branch name.
    ///
    /// Trims whitespace and strips `refs/remotes/` and `remotes/`. A local
    /// `refs/heads/<branch>` becomes `<default_remote>/<branch>`, the same name
    /// an untracked local branch canonicalizes to. Returns `None` for blank
    /// input and for the HEAD pseudo-reference.
    pub fn normalize(raw: &str, default_remote: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let name = if let Some(local) = trimmed.strip_prefix(HEADS_PREFIX) {
            if local.is_empty() {
                return None;
            }
            Self::remote_qualified(default_remote, local)
        } else {
            let stripped = trimmed
                .strip_prefix(REMOTES_PREFIX)
                .or_else(|| trimmed.strip_prefix(SHORT_REMOTES_PREFIX))
                .unwrap_or(trimmed);
            Self(stripped.to_string())
        };

        if name.0.is_empty() || name.is_head() {
            None
        } else {
            Some(name)
        }
    }

    /// Qualifies a local branch name with a remote.
    pub fn remote_qualified(remote: &str, local: &str) -> Self {
        Self(format!("{remote}/{local}"))
    }

    /// Returns the branch part of a name qualified with `remote`.
    pub fn strip_remote(&self, remote: &str) -> Option<&str> {
        self.0
            .strip_prefix(remote)
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|rest| !rest.is_empty())
    }

    /// Whether this is the HEAD pseudo-reference (`HEAD` or `<remote>/HEAD`).
    pub fn is_head(&self) -> bool {
        self.0 == HEAD || self.0.ends_with("/HEAD")
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BranchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether a branch lives in `refs/heads` or `refs/remotes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BranchKind {
    /// A branch under `refs/heads`.
    Local,
    /// A remote-tracking branch under `refs/remotes`.
    Remote,
}

/// A branch as reported by the repository, before canonicalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchRef {
    /// Short name (`feature-x` for local, `origin/feature-x` for remote).
    pub name: BranchName,
    /// Local or remote-tracking.
    pub kind: BranchKind,
    /// Short name of the configured upstream of a local branch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstream: Option<BranchName>,
}

impl BranchRef {
    /// Creates a remote-tracking branch reference.
    pub fn remote(name: impl Into<String>) -> Self {
        Self {
            name: BranchName::new(name),
            kind: BranchKind::Remote,
            upstream: None,
        }
    }

    /// Creates a local branch reference.
    pub fn local(name: impl Into<String>, upstream: Option<&str>) -> Self {
        Self {
            name: BranchName::new(name),
            kind: BranchKind::Local,
            upstream: upstream.map(BranchName::new),
        }
    }

    /// Returns the name used for all branch comparisons.
    pub fn canonical_name(&self, default_remote: &str) -> BranchName {
        match self.kind {
            BranchKind::Remote => self.name.clone(),
            BranchKind::Local => match &self.upstream {
                Some(upstream) => upstream.clone(),
                None => BranchName::remote_qualified(default_remote, self.name.as_str()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_ref_prefixes() {
        assert_eq!(
            BranchName::normalize("refs/remotes/origin/feature-x", DEFAULT_REMOTE).unwrap(),
            BranchName::new("origin/feature-x")
        );
        assert_eq!(
            BranchName::normalize("remotes/origin/main", DEFAULT_REMOTE).unwrap(),
            BranchName::new("origin/main")
        );
        assert_eq!(
            BranchName::normalize(" origin/main\n", DEFAULT_REMOTE).unwrap(),
            BranchName::new("origin/main")
        );
    }

    #[test]
    fn normalize_qualifies_local_refs_with_default_remote() {
        assert_eq!(
            BranchName::normalize("refs/heads/feature-x", DEFAULT_REMOTE).unwrap(),
            BranchName::new("origin/feature-x")
        );
        assert_eq!(
            BranchName::normalize("refs/heads/main", "upstream").unwrap(),
            BranchName::new("upstream/main")
        );
        assert_eq!(
            BranchName::normalize("refs/heads/feature-x", DEFAULT_REMOTE),
            Some(BranchRef::local("feature-x", None).canonical_name(DEFAULT_REMOTE))
        );
    }

    #[test]
    fn normalize_rejects_blank() {
        assert!(BranchName::normalize("", DEFAULT_REMOTE).is_none());
        assert!(BranchName::normalize("   ", DEFAULT_REMOTE).is_none());
        assert!(BranchName::normalize("refs/heads/", DEFAULT_REMOTE).is_none());
        assert!(BranchName::normalize("refs/remotes/", DEFAULT_REMOTE).is_none());
    }

    #[test]
    fn normalize_rejects_head_pseudo_refs() {
        for raw in ["HEAD", " HEAD ", "origin/HEAD", "refs/remotes/origin/HEAD", "refs/heads/HEAD"] {
            assert_eq!(BranchName::normalize(raw, DEFAULT_REMOTE), None, "{raw}");
        }
    }

    #[test]
    fn head_pseudo_refs_are_recognized() {
        assert!(BranchName::new("HEAD").is_head());
        assert!(BranchName::new("origin/HEAD").is_head());
        assert!(!BranchName::new("origin/HEADLESS").is_head());
        assert!(!BranchName::new("origin/main").is_head());
    }

    #[test]
    fn local_branch_without_upstream_uses_default_remote() {
        let branch = BranchRef::local("feature-x", None);
        assert_eq!(
            branch.canonical_name(DEFAULT_REMOTE),
            BranchName::new("origin/feature-x")
        );
    }

    #[test]
    fn local_branch_with_upstream_uses_upstream() {
        let branch = BranchRef::local("topic", Some("upstream/feature-x"));
        assert_eq!(
            branch.canonical_name(DEFAULT_REMOTE),
            BranchName::new("upstream/feature-x")
        );
    }

    #[test]
    fn remote_branch_is_already_canonical() {
        let branch = BranchRef::remote("origin/main");
        assert_eq!(branch.canonical_name("other"), BranchName::new("origin/main"));
    }

    #[test]
    fn branch_ref_wire_format() {
        let json = serde_json::to_string(&BranchRef::local("main", None)).unwrap();
        assert_eq!(json, r#"{"name":"main","kind":"local"}"#);
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn qualified_name_round_trips(
                remote in "[a-z][a-z0-9_-]{0,8}",
                local in "[a-z][a-z0-9_/-]{0,20}",
            ) {
                let qualified = BranchName::remote_qualified(&remote, &local);
                prop_assert_eq!(qualified.strip_remote(&remote), Some(local.as_str()));

                // A local branch and the remote-tracking ref for the same
                // branch canonicalize to the same name.
                let tracking = format!("refs/remotes/{remote}/{local}");
                let from_remote = BranchRef {
                    name: BranchName::normalize(&tracking, &remote).unwrap(),
                    kind: BranchKind::Remote,
                    upstream: None,
                };
                let from_local = BranchRef::local(local.clone(), None);
                prop_assert_eq!(
                    from_local.canonical_name(&remote),
                    from_remote.canonical_name(&remote)
                );

                // So does an override given in local ref form.
                let heads = format!("refs/heads/{local}");
                prop_assert_eq!(
                    BranchName::normalize(&heads, &remote),
                    Some(from_local.canonical_name(&remote))
                );
            }
        }
    }
}
