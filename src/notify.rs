//! Branch-exclusive commit attribution.
//!
//! Given the commits of a build and access to its repository, decides which
//! authors changed something that exists only on the branch being built.
//! Nothing in here fails: every problem is written to a [`DiagnosticSink`]
//! and turns into fewer notifications, never more.

pub mod authors;
pub mod branch;
pub mod containment;
pub mod diagnostics;
pub mod exclusivity;
pub mod recipients;

pub use authors::AuthorAggregator;
pub use branch::BranchResolver;
pub use containment::BranchContainmentQuery;
pub use diagnostics::{BuildLog, DiagnosticSink};
pub use exclusivity::{is_exclusive_to, ExclusivityFilter};
pub use recipients::{BranchDevelopers, BuildContext, ChangeSource};
