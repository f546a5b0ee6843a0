//! # branch-devs
//!
//! Finds the developers who should hear about a CI build: the user who
//! triggered it, plus the authors of commits that exist only on the branch
//! being built.
//!
//! ## Quick Start
//!
//! ```no_run
//! use branch_devs::access::LocationSettings;
//! use branch_devs::data::{Author, Commit};
//! use branch_devs::notify::{BranchDevelopers, BuildContext, ChangeSource};
//!
//! let pipeline = BranchDevelopers::new(BuildContext {
//!     triggerer: Some(Author::new("carol")),
//!     change_sources: vec![ChangeSource::Commits(vec![Commit::new("3f2a9c1e", "alice")])],
//!     branch_override: Some("origin/feature-x".to_string()),
//!     ..BuildContext::default()
//! });
//! let location = LocationSettings {
//!     build_workspace: Some("/var/lib/ci/workspace/job".into()),
//!     ..LocationSettings::default()
//! };
//! let mut log: Vec<String> = Vec::new();
//! let recipients = pipeline.recipients(&location, &mut log);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod access;
pub mod cli;
pub mod data;
pub mod git;
pub mod notify;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_utils;

pub use crate::cli::Cli;

/// The current version of branch-devs.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
