//! Resolving where the repository of a build lives.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Why no repository location could be determined.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum LocationError {
    /// Neither the build nor the caller supplied a workspace.
    #[error("Cannot get the path of the workspace")]
    MissingWorkspace,

    /// The repository override was present but unusable.
    #[error("Invalid repository path override: {0:?}")]
    InvalidOverride(String),

    /// The path is not reachable from this host and no agent is configured.
    #[error("Cannot handle remote workspaces: {} is not accessible locally", .0.display())]
    NotLocal(PathBuf),
}

/// A repository path and how to reach it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryLocation {
    /// Reachable through this host's filesystem.
    Local(PathBuf),
    /// Reachable by launching an agent on another host.
    Remote {
        /// Command prefix that starts this binary on the repository's host.
        launcher: Vec<String>,
        /// Repository path as seen on that host.
        path: PathBuf,
    },
}

impl RepositoryLocation {
    /// Repository path, wherever it lives.
    pub fn path(&self) -> &Path {
        match self {
            Self::Local(path) | Self::Remote { path, .. } => path,
        }
    }
}

/// Inputs to location resolution, highest precedence first within each group.
#[derive(Debug, Clone, Default)]
pub struct LocationSettings {
    /// Workspace provided by the build context.
    pub build_workspace: Option<PathBuf>,
    /// Filesystem workspace of the build itself, used when the context has none.
    pub direct_workspace: Option<PathBuf>,
    /// User override of the repository path; relative paths join the workspace.
    pub repository: Option<String>,
    /// Launcher for a repository agent; makes the location remote.
    pub agent: Option<Vec<String>>,
}

impl LocationSettings {
    /// Resolves the repository location.
    ///
    /// Local locations must exist on this host. Remote locations are only
    /// checked by the agent that opens them.
    pub fn resolve(&self) -> Result<RepositoryLocation, LocationError> {
        let path = self.repository_path()?;

        match self.agent.as_ref().filter(|launcher| !launcher.is_empty()) {
            Some(launcher) => Ok(RepositoryLocation::Remote {
                launcher: launcher.clone(),
                path,
            }),
            None if path.exists() => Ok(RepositoryLocation::Local(path)),
            None => Err(LocationError::NotLocal(path)),
        }
    }

    fn workspace(&self) -> Option<&Path> {
        let usable = |path: &&Path| !path.as_os_str().is_empty();
        self.build_workspace
            .as_deref()
            .filter(usable)
            .or_else(|| self.direct_workspace.as_deref().filter(usable))
    }

    fn repository_path(&self) -> Result<PathBuf, LocationError> {
        match &self.repository {
            Some(raw) if raw.trim().is_empty() => Err(LocationError::InvalidOverride(raw.clone())),
            Some(raw) => {
                let override_path = Path::new(raw.trim());
                if override_path.is_absolute() {
                    Ok(override_path.to_path_buf())
                } else {
                    self.workspace()
                        .map(|workspace| workspace.join(override_path))
                        .ok_or(LocationError::MissingWorkspace)
                }
            }
            None => self
                .workspace()
                .map(Path::to_path_buf)
                .ok_or(LocationError::MissingWorkspace),
        }
    }
}
