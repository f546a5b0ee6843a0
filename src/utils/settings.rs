//! Settings and configuration utilities.
//!
//! Build inputs are read from the process environment first, then from the
//! `env` table of `$HOME/.branch-devs/settings.json`, so a build agent can pin
//! values that its CI system does not export.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Branch currently being built, as exported by the CI system.
pub const BRANCH_VAR: &str = "GIT_BRANCH";
/// User who triggered the build.
pub const TRIGGERER_VAR: &str = "BUILD_USER_ID";
/// Workspace of the build.
pub const WORKSPACE_VAR: &str = "WORKSPACE";
/// Repository path override, absolute or relative to the workspace.
pub const REPOSITORY_VAR: &str = "BRANCH_DEVS_REPOSITORY";
/// Launcher for a repository agent on another host.
pub const AGENT_VAR: &str = "BRANCH_DEVS_AGENT";
/// Remote used to qualify local branch names.
pub const REMOTE_VAR: &str = "BRANCH_DEVS_REMOTE";

/// Settings loaded from $HOME/.branch-devs/settings.json.
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    /// Environment variable fallbacks.
    #[serde(default)]
    pub env: HashMap<String, String>,
}

impl Settings {
    /// Loads settings from the default location.
    pub fn load() -> Result<Self> {
        let settings_path = Self::get_settings_path()?;
        Self::load_from_path(&settings_path)
    }

    /// Loads settings from a specific path.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

        serde_json::from_str::<Self>(&content)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))
    }

    /// Returns the default settings path.
    pub fn get_settings_path() -> Result<PathBuf> {
        let home_dir = dirs::home_dir().context("Failed to determine home directory")?;

        Ok(home_dir.join(".branch-devs").join("settings.json"))
    }

    /// Returns a non-blank environment variable with fallback to settings.
    pub fn get_env_var(&self, key: &str) -> Option<String> {
        let non_blank = |value: &String| !value.trim().is_empty();
        env::var(key)
            .ok()
            .filter(non_blank)
            .or_else(|| self.env.get(key).filter(|value| non_blank(*value)).cloned())
    }
}
