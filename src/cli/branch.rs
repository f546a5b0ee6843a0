//! Branch command — prints the branch a build is attributed to.

use std::io;

use anyhow::{bail, Result};
use clap::Parser;

use crate::cli::repository::{load_settings, RepositoryArgs};
use crate::git::BranchName;
use crate::notify::{BranchContainmentQuery, BranchResolver, BuildLog};
use crate::utils::settings::{Settings, BRANCH_VAR};

/// Branch command options.
#[derive(Parser)]
pub struct BranchCommand {
    /// Repository location.
    #[command(flatten)]
    pub repository: RepositoryArgs,

    /// Branch override [default: $GIT_BRANCH].
    #[arg(long, value_name = "BRANCH")]
    pub branch: Option<String>,
}

impl BranchCommand {
    /// Executes the branch command.
    pub fn execute(self) -> Result<()> {
        let branch = self.resolve(&load_settings())?;
        println!("{branch}");
        Ok(())
    }

    /// Resolves the branch, opening the repository only when no override applies.
    pub fn resolve(&self, settings: &Settings) -> Result<BranchName> {
        let resolver = BranchResolver::new(
            self.branch
                .clone()
                .or_else(|| settings.get_env_var(BRANCH_VAR)),
        );
        let default_remote = self.repository.default_remote(settings);
        if let Some(branch) = resolver.resolve_override(&default_remote) {
            return Ok(branch);
        }

        let mut accessor = self.repository.open(settings)?;
        let mut query = BranchContainmentQuery::new(&mut *accessor, default_remote);
        let mut log = BuildLog::new(io::stderr());

        match resolver.resolve(&mut query, &mut log) {
            Some(branch) => Ok(branch),
            None => bail!("Cannot determine the branch being built"),
        }
    }
}
