//! Repository access errors.

use std::path::PathBuf;

use thiserror::Error;

/// Failures while opening or querying a repository.
#[derive(Error, Debug)]
pub enum AccessError {
    /// The repository could not be opened.
    #[error("Cannot access the Git repository at {path}: {message}")]
    Open {
        /// Location that was opened.
        path: PathBuf,
        /// Underlying failure.
        message: String,
    },

    /// A query against an open repository failed.
    #[error("Git query for {revision} failed: {message}")]
    Query {
        /// Revision or range being queried.
        revision: String,
        /// Underlying failure.
        message: String,
    },

    /// The remote agent could not be started or talked to.
    #[error("Repository agent transport failed: {0}")]
    Transport(#[from] std::io::Error),

    /// The remote agent sent something unexpected.
    #[error("Repository agent protocol error: {0}")]
    Protocol(String),

    /// The remote agent reported a failure.
    #[error("Repository agent reported: {0}")]
    Remote(String),
}

impl From<serde_json::Error> for AccessError {
    fn from(err: serde_json::Error) -> Self {
        Self::Protocol(err.to_string())
    }
}
