//! Git repository access and branch naming.

pub mod branch;
pub mod repository;

pub use branch::{BranchKind, BranchName, BranchRef, DEFAULT_REMOTE, HEAD};
pub use repository::GitRepository;

/// Number of hex characters to show in abbreviated commit hashes.
pub const SHORT_HASH_LEN: usize = 8;

/// Abbreviates a commit id for log output.
pub fn short_hash(id: &str) -> &str {
    id.get(..SHORT_HASH_LEN).unwrap_or(id)
}
