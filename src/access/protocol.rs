//! Line-delimited JSON messages between a [`RemoteAccessor`] and its agent.
//!
//! Each message is one JSON object on its own line. The agent speaks first,
//! with `ready` once its repository is open or `error` if it could not be
//! opened, and then answers each request with exactly one response.
//!
//! [`RemoteAccessor`]: crate::access::RemoteAccessor

use std::io::{BufRead, Write};

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::access::AccessError;
use crate::data::Commit;
use crate::git::BranchRef;

/// Query sent to the agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    /// Branches containing a revision.
    BranchesContaining {
        /// Commit id or other revision expression.
        revision: String,
    },
    /// Commits of a revision range.
    CommitsInRange {
        /// `A..B` or a single revision.
        range: String,
    },
}

/// Agent reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    /// The repository is open and requests may follow.
    Ready,
    /// Answer to [`Request::BranchesContaining`].
    Branches {
        /// Containing branches, in repository order.
        branches: Vec<BranchRef>,
    },
    /// Answer to [`Request::CommitsInRange`].
    Commits {
        /// Commits, oldest first.
        commits: Vec<Commit>,
    },
    /// The request (or opening the repository) failed.
    Error {
        /// Human-readable reason.
        message: String,
    },
}

/// Writes one message and flushes it.
pub fn write_message<W: Write, T: Serialize>(writer: &mut W, message: &T) -> Result<(), AccessError> {
    let mut line = serde_json::to_string(message)?;
    line.push('\n');
    writer.write_all(line.as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Reads the next message, or `None` at end of stream.
///
/// Blank lines are skipped.
pub fn read_message<R: BufRead, T: DeserializeOwned>(reader: &mut R) -> Result<Option<T>, AccessError> {
    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        if !line.trim().is_empty() {
            return Ok(Some(serde_json::from_str(line.trim())?));
        }
    }
}
