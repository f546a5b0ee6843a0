//! CLI interface for branch-devs.

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod agent;
pub mod branch;
pub mod contains;
pub mod recipients;
pub mod repository;

pub use agent::AgentCommand;
pub use branch::BranchCommand;
pub use contains::ContainsCommand;
pub use recipients::RecipientsCommand;
pub use repository::RepositoryArgs;

/// branch-devs: notify the developers whose commits exist only on the branch being built.
#[derive(Parser)]
#[command(name = "branch-devs")]
#[command(about = "Find the developers who worked on the branch being built", long_about = None)]
#[command(version)]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Computes who to notify about a build and prints a YAML report.
    Recipients(RecipientsCommand),
    /// Prints the branch the build is attributed to.
    Branch(BranchCommand),
    /// Lists the branches that contain a revision.
    Contains(ContainsCommand),
    /// Serves repository queries over stdin/stdout for a remote caller.
    Agent(AgentCommand),
}

impl Cli {
    /// Executes the CLI command.
    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Recipients(cmd) => cmd.execute(),
            Commands::Branch(cmd) => cmd.execute(),
            Commands::Contains(cmd) => cmd.execute(),
            Commands::Agent(cmd) => cmd.execute(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn recipients_accepts_repeated_sources() {
        let cli = Cli::try_parse_from([
            "branch-devs",
            "recipients",
            "--change-log",
            "a.yaml",
            "--change-log",
            "b.yaml",
            "--range",
            "origin/main..HEAD",
            "--triggered-by",
            "carol",
        ])
        .unwrap();

        match cli.command {
            Commands::Recipients(cmd) => {
                assert_eq!(cmd.change_logs.len(), 2);
                assert_eq!(cmd.ranges, vec!["origin/main..HEAD".to_string()]);
                assert_eq!(cmd.triggered_by.as_deref(), Some("carol"));
            }
            _ => panic!("expected recipients command"),
        }
    }
}
