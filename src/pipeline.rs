use tracing::{error, info};

use crate::{
    error::RunError,
    types::{Forge, Outcome, PullRequestRecord, RunReport, Settings},
};

/// Parses the JSON array printed by `gh search prs --json url,title`.
pub fn parse_search_results(raw: &str) -> Result<Vec<PullRequestRecord>, RunError> {
    Ok(serde_json::from_str(raw)?)
}

/// Lists open pull requests awaiting the caller's review.
///
/// Invocation and parse failures are returned to the caller; [`run`] logs
/// them and carries on with an empty list.
pub async fn fetch_pull_requests<F>(
    forge: &F,
    limit: usize,
) -> Result<Vec<PullRequestRecord>, RunError>
where
    F: Forge + Sync,
{
    let raw = forge
        .search_review_requests(limit)
        .await
        .map_err(RunError::Search)?;
    parse_search_results(&raw)
}

/// Approves and merges a single record if its title carries the keyword.
///
/// The merge is only attempted after a successful approval. Failures end
/// processing of this record and are reported through the returned
/// [`Outcome`], never as an error.
pub async fn process_pull_request<F>(
    forge: &F,
    pr: &PullRequestRecord,
    settings: &Settings,
) -> Outcome
where
    F: Forge + Sync,
{
    if !settings.keyword.matches(&pr.title) {
        info!("Skipping PR \"{}\" - no keyword match", pr.title);
        return Outcome::Skipped;
    }

    if let Err(source) = forge.approve(pr, &settings.approval_message).await {
        let err = RunError::Approve {
            url: pr.url.clone(),
            source,
        };
        error!("{err}");
        return Outcome::ApproveFailed(err.to_string());
    }
    info!("Successfully approved PR: {}{}", pr.url, label(pr));

    match forge.merge(pr, &settings.merge).await {
        Ok(()) => {
            info!("Successfully merged PR: {}{}", pr.url, label(pr));
            Outcome::Merged
        }
        Err(source) => {
            let err = RunError::Merge {
                url: pr.url.clone(),
                source,
            };
            error!("{err}");
            Outcome::MergeFailed(err.to_string())
        }
    }
}

fn label(pr: &PullRequestRecord) -> String {
    let short = pr.short_name();
    if short == pr.url {
        String::new()
    } else {
        format!(" ({short})")
    }
}

/// Fetches review requests and processes each one in order.
pub async fn run<F>(forge: &F, settings: &Settings) -> RunReport
where
    F: Forge + Sync,
{
    let mut report = RunReport::default();

    let prs = match fetch_pull_requests(forge, settings.limit).await {
        Ok(prs) => prs,
        Err(err) => {
            error!("{err}");
            report.fetch_failed = true;
            Vec::new()
        }
    };

    for pr in prs {
        let outcome = process_pull_request(forge, &pr, settings).await;
        report.results.push((pr, outcome));
    }

    report
}
