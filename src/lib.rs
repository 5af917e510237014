//! Autoapprove: approve and merge the pull requests waiting on your review.
//!
//! Lists open pull requests where the authenticated `gh` user is a requested
//! reviewer, keeps those whose title contains a keyword, then approves each
//! one and asks the platform to squash-merge it. Every failure is logged and
//! the run moves on to the next pull request.

pub mod cli;
pub mod dry_run;
pub mod error;
pub mod github;
pub mod pipeline;
pub mod types;

pub use cli::{Mode, parse_args};
pub use dry_run::DryRun;
pub use error::{ForgeError, RunError};
pub use github::GhCli;
pub use pipeline::{fetch_pull_requests, parse_search_results, process_pull_request, run};
pub use types::{
    DEFAULT_APPROVAL_MESSAGE, DEFAULT_KEYWORD, DEFAULT_SEARCH_LIMIT, EmptyKeyword, Forge, Keyword,
    MergeOptions, Outcome, PullRequestRecord, RunReport, Settings,
};
