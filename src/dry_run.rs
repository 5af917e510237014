use std::{
    io::Write,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;

use crate::{
    error::ForgeError,
    github::{GhCli, approve_args, merge_args, render_command},
    types::{Forge, MergeOptions, PullRequestRecord},
};

/// Runs the real search but prints approve and merge commands instead of
/// executing them.
pub struct DryRun<W> {
    gh: GhCli,
    writer: Arc<Mutex<W>>,
}

impl DryRun<std::io::Stdout> {
    pub fn stdout(gh: GhCli) -> Self {
        Self::new(gh, std::io::stdout())
    }
}

impl<W: Write + Send> DryRun<W> {
    pub fn new(gh: GhCli, writer: W) -> Self {
        Self {
            gh,
            writer: Arc::new(Mutex::new(writer)),
        }
    }

    /// Shared handle to the output, for inspecting what was printed.
    pub fn writer(&self) -> Arc<Mutex<W>> {
        Arc::clone(&self.writer)
    }

    fn print(&self, args: &[String]) -> Result<(), ForgeError> {
        let line = render_command(self.gh.program(), args);
        let mut writer = self.writer.lock().unwrap_or_else(|e| e.into_inner());
        writeln!(writer, "{line}")?;
        Ok(())
    }
}

#[async_trait]
impl<W: Write + Send> Forge for DryRun<W> {
    async fn search_review_requests(&self, limit: usize) -> Result<String, ForgeError> {
        self.gh.search_review_requests(limit).await
    }

    async fn approve(&self, pr: &PullRequestRecord, body: &str) -> Result<(), ForgeError> {
        self.print(&approve_args(pr, body))
    }

    async fn merge(&self, pr: &PullRequestRecord, options: &MergeOptions) -> Result<(), ForgeError> {
        self.print(&merge_args(pr, options))
    }
}
