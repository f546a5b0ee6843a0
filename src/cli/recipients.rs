//! Recipients command — runs the full notification pipeline for a build.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::cli::repository::{load_settings, RepositoryArgs};
use crate::data::{to_yaml, Author, ChangeLog, NotificationReport};
use crate::notify::{BranchDevelopers, BuildContext, BuildLog, ChangeSource};
use crate::utils::settings::{Settings, BRANCH_VAR, TRIGGERER_VAR};

/// Recipients command options.
#[derive(Parser)]
pub struct RecipientsCommand {
    /// Repository location.
    #[command(flatten)]
    pub repository: RepositoryArgs,

    /// Branch being built [default: $GIT_BRANCH, then the branch HEAD is on].
    #[arg(long, value_name = "BRANCH")]
    pub branch: Option<String>,

    /// User who triggered the build [default: $BUILD_USER_ID].
    #[arg(long, value_name = "USER")]
    pub triggered_by: Option<String>,

    /// YAML change-log file; repeat for several sources.
    #[arg(long = "change-log", value_name = "FILE")]
    pub change_logs: Vec<PathBuf>,

    /// Revision range such as origin/main..HEAD, read after the change logs; repeatable.
    #[arg(long = "range", value_name = "RANGE")]
    pub ranges: Vec<String>,

    /// Append diagnostics to this file instead of stderr.
    #[arg(long, value_name = "FILE")]
    pub log: Option<PathBuf>,
}

impl RecipientsCommand {
    /// Executes the recipients command.
    pub fn execute(self) -> Result<()> {
        let settings = load_settings();
        let context = self.build_context(&settings)?;
        let location = self.repository.location(&settings);
        let pipeline = BranchDevelopers::new(context);

        let report = match &self.log {
            Some(path) => {
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .with_context(|| format!("Failed to open log file: {}", path.display()))?;
                pipeline.report(&location, &mut BuildLog::new(file))
            }
            None => pipeline.report(&location, &mut BuildLog::new(io::stderr())),
        };

        print_report(&report)
    }

    /// Gathers the build inputs from flags, environment, settings and change logs.
    pub fn build_context(&self, settings: &Settings) -> Result<BuildContext> {
        let change_logs = self
            .change_logs
            .iter()
            .map(|path| {
                ChangeLog::load_from_file(path)
                    .with_context(|| format!("Failed to load change log: {}", path.display()))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut change_sources = Vec::new();
        if !change_logs.is_empty() {
            change_sources.push(ChangeSource::Commits(ChangeLog::flatten(change_logs)));
        }
        change_sources.extend(self.ranges.iter().cloned().map(ChangeSource::Range));

        Ok(BuildContext {
            triggerer: self
                .triggered_by
                .clone()
                .or_else(|| settings.get_env_var(TRIGGERER_VAR))
                .filter(|user| !user.trim().is_empty())
                .map(Author::new),
            change_sources,
            branch_override: self
                .branch
                .clone()
                .or_else(|| settings.get_env_var(BRANCH_VAR)),
            default_remote: self.repository.default_remote(settings),
        })
    }
}

fn print_report(report: &NotificationReport) -> Result<()> {
    let yaml = to_yaml(report)?;
    let mut stdout = io::stdout().lock();
    stdout
        .write_all(yaml.as_bytes())
        .context("Failed to write report")?;
    Ok(())
}
