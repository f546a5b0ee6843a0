//! Where the repository lives and how queries reach it.
//!
//! The notification core only talks to a [`RepositoryAccessor`]. Whether the
//! repository is opened in-process or on a build agent behind a launcher
//! command is decided once, when the accessor is opened.

pub mod error;
pub mod local;
pub mod location;
pub mod protocol;
pub mod remote;

pub use error::AccessError;
pub use local::LocalAccessor;
pub use location::{LocationError, LocationSettings, RepositoryLocation};
pub use remote::RemoteAccessor;

use crate::data::Commit;
use crate::git::BranchRef;

/// Queries that must run where the repository's working copy is.
pub trait RepositoryAccessor {
    /// Returns every branch whose history contains `revision`.
    fn branch_refs_containing(&mut self, revision: &str) -> Result<Vec<BranchRef>, AccessError>;

    /// Returns the commits of a revision range (`A..B` or a single revision).
    fn commits_in_range(&mut self, range: &str) -> Result<Vec<Commit>, AccessError>;
}

/// Opens an accessor for a resolved location.
///
/// The returned accessor owns the repository handle (or agent process) and
/// releases it when dropped.
pub fn open(location: &RepositoryLocation) -> Result<Box<dyn RepositoryAccessor>, AccessError> {
    match location {
        RepositoryLocation::Local(path) => Ok(Box::new(LocalAccessor::open(path)?)),
        RepositoryLocation::Remote { launcher, path } => {
            Ok(Box::new(RemoteAccessor::spawn(launcher, path)?))
        }
    }
}
