//! Repository location options shared by commands.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::warn;

use crate::access::{self, LocationSettings, RepositoryAccessor};
use crate::git::DEFAULT_REMOTE;
use crate::utils::settings::{Settings, AGENT_VAR, REMOTE_VAR, REPOSITORY_VAR, WORKSPACE_VAR};

/// Where to find the repository.
#[derive(Args, Debug, Clone, Default)]
pub struct RepositoryArgs {
    /// Build workspace [default: $WORKSPACE, then the current directory].
    #[arg(long, value_name = "DIR")]
    pub workspace: Option<PathBuf>,

    /// Repository path, absolute or relative to the workspace [default: $BRANCH_DEVS_REPOSITORY].
    #[arg(long, value_name = "PATH")]
    pub repository: Option<String>,

    /// Command that starts branch-devs on the repository's host, e.g. "ssh agent-3 branch-devs"
    /// [default: $BRANCH_DEVS_AGENT].
    #[arg(long, value_name = "COMMAND")]
    pub agent: Option<String>,

    /// Remote that qualifies local branch names [default: $BRANCH_DEVS_REMOTE, then origin].
    #[arg(long, value_name = "NAME")]
    pub remote: Option<String>,
}

impl RepositoryArgs {
    /// Combines flags, environment and settings into location settings.
    pub fn location(&self, settings: &Settings) -> LocationSettings {
        LocationSettings {
            build_workspace: self
                .workspace
                .clone()
                .or_else(|| settings.get_env_var(WORKSPACE_VAR).map(PathBuf::from)),
            direct_workspace: env::current_dir().ok(),
            repository: self
                .repository
                .clone()
                .or_else(|| settings.get_env_var(REPOSITORY_VAR)),
            agent: self
                .agent
                .clone()
                .or_else(|| settings.get_env_var(AGENT_VAR))
                .map(|command| command.split_whitespace().map(str::to_string).collect()),
        }
    }

    /// Remote used to qualify local branch names.
    pub fn default_remote(&self, settings: &Settings) -> String {
        self.remote
            .clone()
            .or_else(|| settings.get_env_var(REMOTE_VAR))
            .unwrap_or_else(|| DEFAULT_REMOTE.to_string())
    }

    /// Resolves and opens the repository.
    pub fn open(&self, settings: &Settings) -> Result<Box<dyn RepositoryAccessor>> {
        let location = self
            .location(settings)
            .resolve()
            .context("Failed to locate the repository")?;
        access::open(&location)
            .with_context(|| format!("Failed to open repository at {}", location.path().display()))
    }
}

/// Loads settings, falling back to none when the file is unreadable.
pub fn load_settings() -> Settings {
    Settings::load().unwrap_or_else(|e| {
        warn!(error = %format!("{e:#}"), "Ignoring settings file");
        Settings::default()
    })
}
