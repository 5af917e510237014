use thiserror::Error;

/// Failure of a single client invocation.
#[derive(Debug, Error)]
pub enum ForgeError {
    #[error("failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("failed to write command: {0}")]
    Output(#[from] std::io::Error),
}

/// Failures the pipeline recovers from by logging.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Failed to search PRs: {0}")]
    Search(#[source] ForgeError),

    #[error("Failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to approve PR {url}: {source}")]
    Approve {
        url: String,
        #[source]
        source: ForgeError,
    },

    #[error("Failed to merge PR {url}: {source}")]
    Merge {
        url: String,
        #[source]
        source: ForgeError,
    },
}
