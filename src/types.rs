use async_trait::async_trait;
use serde::Deserialize;

use crate::error::ForgeError;

/// Default title keyword selecting pull requests for auto-approval.
pub const DEFAULT_KEYWORD: &str = "YOURFAVOURITEKEYWORD";

/// Default body of the approving review.
pub const DEFAULT_APPROVAL_MESSAGE: &str = "lit";

/// Default cap on the number of search results.
pub const DEFAULT_SEARCH_LIMIT: usize = 100;

/// A pull request returned by the review-requested search.
///
/// Only the two fields the pipeline needs are kept; anything else in the
/// client's JSON output is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PullRequestRecord {
    pub url: String,
    pub title: String,
}

impl PullRequestRecord {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
        }
    }

    /// Renders `owner/repo#N` for GitHub pull URLs, the raw URL otherwise.
    pub fn short_name(&self) -> String {
        let Ok(url) = url::Url::parse(&self.url) else {
            return self.url.clone();
        };

        let segments: Vec<&str> = match url.path_segments() {
            Some(segments) => segments.filter(|s| !s.is_empty()).collect(),
            None => return self.url.clone(),
        };

        // ["owner", "repo", "pull", "123"]
        match segments.as_slice() {
            [owner, repo, "pull", number] if number.parse::<u64>().is_ok() => {
                format!("{owner}/{repo}#{number}")
            }
            _ => self.url.clone(),
        }
    }
}

/// Case-insensitive title keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyword {
    raw: String,
    folded: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("keyword must not be empty")]
pub struct EmptyKeyword;

impl Keyword {
    pub fn new(raw: impl Into<String>) -> Result<Self, EmptyKeyword> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(EmptyKeyword);
        }
        let folded = raw.to_lowercase();
        Ok(Self { raw, folded })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn matches(&self, title: &str) -> bool {
        title.to_lowercase().contains(&self.folded)
    }
}

impl Default for Keyword {
    fn default() -> Self {
        Self {
            raw: DEFAULT_KEYWORD.to_string(),
            folded: DEFAULT_KEYWORD.to_lowercase(),
        }
    }
}

impl std::fmt::Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Flags passed along with a merge request.
///
/// Squash, auto-merge and branch deletion are all requested together; the
/// platform decides how they combine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOptions {
    pub squash: bool,
    pub auto: bool,
    pub delete_branch: bool,
    pub author_email: Option<String>,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            squash: true,
            auto: true,
            delete_branch: true,
            author_email: None,
        }
    }
}

/// Everything a run needs, fixed at start-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub keyword: Keyword,
    pub approval_message: String,
    pub limit: usize,
    pub merge: MergeOptions,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            keyword: Keyword::default(),
            approval_message: DEFAULT_APPROVAL_MESSAGE.to_string(),
            limit: DEFAULT_SEARCH_LIMIT,
            merge: MergeOptions::default(),
        }
    }
}

/// Terminal state of a single record within one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Skipped,
    Merged,
    ApproveFailed(String),
    MergeFailed(String),
}

impl Outcome {
    pub fn approved(&self) -> bool {
        matches!(self, Outcome::Merged | Outcome::MergeFailed(_))
    }
}

/// Per-record outcomes of a run, in processing order.
#[derive(Debug, Default)]
pub struct RunReport {
    pub fetch_failed: bool,
    pub results: Vec<(PullRequestRecord, Outcome)>,
}

impl RunReport {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn processed(&self) -> usize {
        self.results.len()
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Skipped))
    }

    pub fn merged(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Merged))
    }

    pub fn approve_failed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::ApproveFailed(_)))
    }

    pub fn merge_failed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::MergeFailed(_)))
    }

    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.results.iter().filter(|(_, o)| pred(o)).count()
    }
}

impl std::fmt::Display for RunReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Processed {} pull requests: {} merged, {} skipped, {} approval failures, {} merge failures",
            self.processed(),
            self.merged(),
            self.skipped(),
            self.approve_failed(),
            self.merge_failed()
        )
    }
}

/// A code-hosting platform the pipeline talks to.
///
/// `search_review_requests` returns the client's raw JSON so that parsing
/// stays in one place regardless of the implementation.
#[async_trait]
pub trait Forge {
    async fn search_review_requests(&self, limit: usize) -> Result<String, ForgeError>;

    async fn approve(&self, pr: &PullRequestRecord, body: &str) -> Result<(), ForgeError>;

    async fn merge(&self, pr: &PullRequestRecord, options: &MergeOptions) -> Result<(), ForgeError>;
}
