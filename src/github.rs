use std::{
    ffi::{OsStr, OsString},
    process::Stdio,
};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::{
    error::ForgeError,
    types::{Forge, MergeOptions, PullRequestRecord},
};

/// [`Forge`] backed by the `gh` command-line client.
///
/// Relies on whatever session `gh auth login` established; no token handling
/// happens here.
#[derive(Debug, Clone)]
pub struct GhCli {
    program: OsString,
}

impl Default for GhCli {
    fn default() -> Self {
        Self::new("gh")
    }
}

impl GhCli {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &OsStr {
        &self.program
    }

    /// Runs the client to completion and returns its stdout.
    async fn run(&self, args: &[String]) -> Result<Vec<u8>, ForgeError> {
        let command_line = render_command(&self.program, args);
        debug!("running {command_line}");

        let output = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| ForgeError::Spawn {
                program: self.program.to_string_lossy().into_owned(),
                source,
            })?;

        if !output.status.success() {
            return Err(ForgeError::CommandFailed {
                command: command_line,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(output.stdout)
    }
}

#[async_trait]
impl Forge for GhCli {
    async fn search_review_requests(&self, limit: usize) -> Result<String, ForgeError> {
        let stdout = self.run(&search_args(limit)).await?;
        Ok(String::from_utf8_lossy(&stdout).into_owned())
    }

    async fn approve(&self, pr: &PullRequestRecord, body: &str) -> Result<(), ForgeError> {
        self.run(&approve_args(pr, body)).await.map(drop)
    }

    async fn merge(&self, pr: &PullRequestRecord, options: &MergeOptions) -> Result<(), ForgeError> {
        self.run(&merge_args(pr, options)).await.map(drop)
    }
}

pub fn search_args(limit: usize) -> Vec<String> {
    [
        "search",
        "prs",
        "--state=open",
        "--review-requested=@me",
        "--json",
        "url,title",
        "--limit",
    ]
    .into_iter()
    .map(String::from)
    .chain(std::iter::once(limit.to_string()))
    .collect()
}

pub fn approve_args(pr: &PullRequestRecord, body: &str) -> Vec<String> {
    vec![
        "pr".to_string(),
        "review".to_string(),
        pr.url.clone(),
        "--approve".to_string(),
        "--body".to_string(),
        body.to_string(),
    ]
}

pub fn merge_args(pr: &PullRequestRecord, options: &MergeOptions) -> Vec<String> {
    let mut args = vec!["pr".to_string(), "merge".to_string(), pr.url.clone()];

    if options.squash {
        args.push("--squash".to_string());
    }
    if options.auto {
        args.push("--auto".to_string());
    }
    if options.delete_branch {
        args.push("--delete-branch".to_string());
    }
    if let Some(email) = &options.author_email {
        args.push("--author-email".to_string());
        args.push(email.clone());
    }

    args
}

/// Renders a command line that a POSIX shell would split back into `args`.
pub fn render_command(program: &OsStr, args: &[String]) -> String {
    std::iter::once(shell_quote(&program.to_string_lossy()))
        .chain(args.iter().map(|arg| shell_quote(arg)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn shell_quote(arg: &str) -> String {
    let is_plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=@,+%".contains(c));

    if is_plain {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pr() -> PullRequestRecord {
        PullRequestRecord::new("https://github.com/owner/repo/pull/7", "Add KEYWORD support")
    }

    #[test]
    fn test_search_args() {
        assert_eq!(
            search_args(100),
            [
                "search",
                "prs",
                "--state=open",
                "--review-requested=@me",
                "--json",
                "url,title",
                "--limit",
                "100"
            ]
        );
    }

    #[test]
    fn test_approve_args_keep_body_as_single_argument() {
        let body = "looks \"good\"; rm -rf /";
        let args = approve_args(&pr(), body);
        assert_eq!(
            args,
            [
                "pr",
                "review",
                "https://github.com/owner/repo/pull/7",
                "--approve",
                "--body",
                body
            ]
        );
    }

    #[test]
    fn test_merge_args_default_options() {
        assert_eq!(
            merge_args(&pr(), &MergeOptions::default()),
            [
                "pr",
                "merge",
                "https://github.com/owner/repo/pull/7",
                "--squash",
                "--auto",
                "--delete-branch"
            ]
        );
    }

    #[test]
    fn test_merge_args_with_author_email() {
        let options = MergeOptions {
            author_email: Some("bot@example.com".to_string()),
            ..MergeOptions::default()
        };
        let args = merge_args(&pr(), &options);
        assert_eq!(&args[args.len() - 2..], ["--author-email", "bot@example.com"]);
    }

    #[test]
    fn test_merge_args_without_flags() {
        let options = MergeOptions {
            squash: false,
            auto: false,
            delete_branch: false,
            author_email: None,
        };
        assert_eq!(
            merge_args(&pr(), &options),
            ["pr", "merge", "https://github.com/owner/repo/pull/7"]
        );
    }

    #[test]
    fn test_render_command_quotes_only_when_needed() {
        let rendered = render_command(
            OsStr::new("gh"),
            &approve_args(&pr(), "it's lit"),
        );
        assert_eq!(
            rendered,
            r"gh pr review https://github.com/owner/repo/pull/7 --approve --body 'it'\''s lit'"
        );
    }

    #[test]
    fn test_shell_quote_empty() {
        assert_eq!(shell_quote(""), "''");
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let gh = GhCli::new("/nonexistent/autoapprove-test/gh");
        let err = gh.search_review_requests(1).await.unwrap_err();
        assert!(matches!(err, ForgeError::Spawn { .. }), "{err:?}");
    }
}
