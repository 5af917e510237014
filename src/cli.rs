use std::{ffi::OsString, path::PathBuf};

use anyhow::Result;
use clap::{Args, Parser};

use crate::{
    github::GhCli,
    types::{
        DEFAULT_APPROVAL_MESSAGE, DEFAULT_KEYWORD, DEFAULT_SEARCH_LIMIT, EmptyKeyword, Keyword,
        MergeOptions, Settings,
    },
};

const BUILD_INFO_HUMAN: &str = env!("BUILD_INFO_HUMAN");

/// Whether approve and merge are executed or only printed.
#[derive(Debug, Clone)]
pub enum Mode {
    Execute(GhCli),
    DryRun(GhCli),
}

impl Mode {
    pub fn is_dry_run(&self) -> bool {
        matches!(self, Mode::DryRun(_))
    }

    pub fn gh(&self) -> &GhCli {
        match self {
            Mode::Execute(gh) | Mode::DryRun(gh) => gh,
        }
    }
}

#[derive(Args, Debug, Clone)]
struct MergeArgs {
    /// Commit author email for the squash commit
    #[arg(short = 'A', long = "author-email", help_heading = "Merge", value_name = "EMAIL")]
    pub author_email: Option<String>,
}

#[derive(Parser, Debug)]
#[command(
    name = "autoapprove",
    about = "Approve and squash-merge the pull requests awaiting your review whose title carries a keyword"
)]
#[command(long_version = BUILD_INFO_HUMAN)]
struct CliArgs {
    /// Title keyword to look for (case-insensitive substring match)
    #[arg(
        short = 'k',
        long,
        value_name = "TEXT",
        default_value = DEFAULT_KEYWORD,
        value_parser = parse_keyword
    )]
    pub keyword: Keyword,

    /// Body of the approving review
    #[arg(short = 'm', long, value_name = "TEXT", default_value = DEFAULT_APPROVAL_MESSAGE)]
    pub message: String,

    /// Maximum number of review requests to fetch
    #[arg(
        short = 'L',
        long,
        value_name = "NUM",
        default_value_t = DEFAULT_SEARCH_LIMIT as u64,
        value_parser = clap::value_parser!(u64).range(1..=1000)
    )]
    pub limit: u64,

    /// GitHub CLI executable
    #[arg(long = "gh", value_name = "PATH", default_value = "gh")]
    pub gh: PathBuf,

    /// Print the approve and merge commands instead of running them
    #[arg(short = 'n', long = "dry-run")]
    pub dry_run: bool,

    #[command(flatten)]
    pub merge: MergeArgs,
}

fn parse_keyword(raw: &str) -> Result<Keyword, EmptyKeyword> {
    Keyword::new(raw)
}

impl CliArgs {
    fn validate(&self) -> Result<()> {
        if let Some(email) = &self.merge.author_email
            && !email.contains('@')
        {
            anyhow::bail!("--author-email must be an email address, got: '{email}'");
        }
        Ok(())
    }
}

fn build_settings(cli: CliArgs) -> Result<(Settings, Mode)> {
    cli.validate()?;

    let gh = GhCli::new(cli.gh);
    let mode = if cli.dry_run {
        Mode::DryRun(gh)
    } else {
        Mode::Execute(gh)
    };

    let settings = Settings {
        keyword: cli.keyword,
        approval_message: cli.message,
        limit: usize::try_from(cli.limit)?,
        merge: MergeOptions {
            author_email: cli.merge.author_email,
            ..MergeOptions::default()
        },
    };

    Ok((settings, mode))
}

/// Parses command-line arguments into run settings and an execution mode.
///
/// Without arguments the settings are the built-in defaults.
pub fn parse_args<I, T>(args: I) -> Result<(Settings, Mode)>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = CliArgs::try_parse_from(args)?;
    build_settings(cli)
}
