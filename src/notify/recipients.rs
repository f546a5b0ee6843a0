//! The full notification pipeline for one build.

use tracing::debug;

use crate::access::{self, LocationSettings, RepositoryAccessor};
use crate::data::{Author, Commit, NotificationReport, NotificationSet};
use crate::git::DEFAULT_REMOTE;
use crate::notify::{AuthorAggregator, BranchContainmentQuery, BranchResolver, DiagnosticSink, ExclusivityFilter};

/// One source of commits for the build's change set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeSource {
    /// Commits recorded by the build system.
    Commits(Vec<Commit>),
    /// A revision range evaluated in the repository.
    Range(String),
}

/// What the surrounding build system knows about a build.
#[derive(Debug, Clone)]
pub struct BuildContext {
    /// User who started the build.
    pub triggerer: Option<Author>,
    /// Change-set sources, flattened in order.
    pub change_sources: Vec<ChangeSource>,
    /// CI-supplied name of the branch being built.
    pub branch_override: Option<String>,
    /// Remote used to qualify local branch names.
    pub default_remote: String,
}

impl Default for BuildContext {
    fn default() -> Self {
        Self {
            triggerer: None,
            change_sources: Vec::new(),
            branch_override: None,
            default_remote: DEFAULT_REMOTE.to_string(),
        }
    }
}

/// Computes who to notify: the triggerer plus authors of branch-exclusive commits.
pub struct BranchDevelopers {
    context: BuildContext,
}

impl BranchDevelopers {
    /// Creates the pipeline for one build.
    pub fn new(context: BuildContext) -> Self {
        Self { context }
    }

    /// Resolves and opens the repository, then runs the pipeline.
    ///
    /// The repository handle is released before this returns.
    pub fn report(&self, location: &LocationSettings, log: &mut dyn DiagnosticSink) -> NotificationReport {
        let location = match location.resolve() {
            Ok(location) => location,
            Err(e) => {
                log.log(&e.to_string());
                return self.triggerer_only(log);
            }
        };

        let mut accessor = match access::open(&location) {
            Ok(accessor) => accessor,
            Err(e) => {
                log.log(&e.to_string());
                return self.triggerer_only(log);
            }
        };

        self.report_with(&mut *accessor, log)
    }

    /// Runs the pipeline against an already open repository.
    pub fn report_with(&self, accessor: &mut dyn RepositoryAccessor, log: &mut dyn DiagnosticSink) -> NotificationReport {
        let mut report = self.triggerer_only(log);

        let resolver = BranchResolver::new(self.context.branch_override.clone());
        let mut query = BranchContainmentQuery::new(&mut *accessor, self.context.default_remote.clone());
        let Some(branch) = resolver.resolve(&mut query, log) else {
            log.log("Branch is unknown; notifying only the user who triggered the build");
            return report;
        };

        let commits = self.change_set(&mut *accessor, log);
        debug!(%branch, commits = commits.len(), "Attributing change set");

        let query = BranchContainmentQuery::new(accessor, self.context.default_remote.clone());
        let mut aggregator = AuthorAggregator::new(ExclusivityFilter::new(query));
        let authors = aggregator.exclusive_authors(&commits, &branch, log);
        log.log(&format!(
            "{} of {} commits' authors are exclusive to {branch}",
            authors.len(),
            commits.len()
        ));

        report.recipients.extend(authors);
        report.branch = Some(branch);
        report
    }

    /// Just the recipients of [`report`](Self::report).
    pub fn recipients(&self, location: &LocationSettings, log: &mut dyn DiagnosticSink) -> NotificationSet {
        self.report(location, log).recipients
    }

    fn triggerer_only(&self, log: &mut dyn DiagnosticSink) -> NotificationReport {
        let mut recipients = NotificationSet::new();
        match &self.context.triggerer {
            Some(triggerer) => {
                recipients.insert(triggerer.clone());
            }
            None => log.log("Cannot determine the user who triggered the build!"),
        }

        NotificationReport {
            branch: None,
            triggerer: self.context.triggerer.clone(),
            recipients,
        }
    }

    fn change_set(&self, accessor: &mut dyn RepositoryAccessor, log: &mut dyn DiagnosticSink) -> Vec<Commit> {
        let mut commits = Vec::new();
        for source in &self.context.change_sources {
            match source {
                ChangeSource::Commits(recorded) => commits.extend(recorded.iter().cloned()),
                ChangeSource::Range(range) => match accessor.commits_in_range(range) {
                    Ok(found) => commits.extend(found),
                    Err(e) => log.log(&format!("Cannot read commits of range {range}: {e}")),
                },
            }
        }
        commits
    }
}
