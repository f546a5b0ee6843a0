//! Contains command — lists the branches containing a revision.

use std::io;

use anyhow::Result;
use clap::Parser;

use crate::cli::repository::{load_settings, RepositoryArgs};
use crate::data::CommitId;
use crate::notify::{BranchContainmentQuery, BuildLog};

/// Contains command options.
#[derive(Parser)]
pub struct ContainsCommand {
    /// Commit id or other revision to look up.
    #[arg(value_name = "REVISION")]
    pub revision: String,

    /// Repository location.
    #[command(flatten)]
    pub repository: RepositoryArgs,
}

impl ContainsCommand {
    /// Executes the contains command.
    pub fn execute(self) -> Result<()> {
        let settings = load_settings();
        let mut accessor = self.repository.open(&settings)?;
        let mut query = BranchContainmentQuery::new(&mut *accessor, self.repository.default_remote(&settings));
        let mut log = BuildLog::new(io::stderr());

        for branch in query.containing(&CommitId::new(self.revision.clone()), &mut log) {
            println!("{branch}");
        }

        Ok(())
    }
}
