//! Agent command — the repository-side end of remote access.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use crate::access::remote::serve;
use crate::access::LocalAccessor;

/// Agent command options.
#[derive(Parser)]
pub struct AgentCommand {
    /// Repository to serve.
    #[arg(value_name = "PATH")]
    pub path: PathBuf,
}

impl AgentCommand {
    /// Executes the agent command.
    ///
    /// Requests are read from stdin and answered on stdout until stdin closes.
    pub fn execute(self) -> Result<()> {
        debug!(path = %self.path.display(), "Serving repository");
        let opened = LocalAccessor::open(&self.path);
        serve(opened, io::stdin().lock(), io::stdout().lock()).context("Repository agent failed")
    }
}
