//! Error types for mergeexp

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while discovering refs or building the experimental branch
#[derive(Error, Debug)]
pub enum Error {
    /// A git subprocess exited unsuccessfully
    #[error("git {command} failed: {message}")]
    Git {
        /// The git subcommand with its arguments
        command: String,
        /// Captured stderr, or a description of the failure
        message: String,
    },

    /// Spawning or talking to a subprocess failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP transport failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Bitbucket answered with a non-2xx status
    #[error("Bitbucket returned unexpected code {status}: {body}")]
    BitbucketApi {
        /// HTTP status code
        status: u16,
        /// Response body, surfaced as context
        body: String,
    },

    /// A response body could not be decoded
    #[error("parsing {context} failed: {source}")]
    Parse {
        /// What was being decoded
        context: String,
        /// Underlying decode error
        #[source]
        source: serde_json::Error,
    },

    /// Invalid or incomplete configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Missing credentials
    #[error("authentication error: {0}")]
    Auth(String),

    /// The working tree has local changes and is not on the experimental branch
    #[error(
        "working tree of {} is not in a clean state and on a branch {current} different from {branch}, resolve it first",
        dir.display()
    )]
    DirtyWorkingTree {
        /// Repository working directory
        dir: PathBuf,
        /// Branch currently checked out (empty when detached)
        current: String,
        /// Experimental branch that was requested
        branch: String,
    },

    /// Conflicts persisted after the configured number of resolution rounds
    #[error("even after {attempts} attempts the working dir is still not clean while merging {reference}, aborting")]
    ConflictRetriesExhausted {
        /// Ref being merged
        reference: String,
        /// Number of resolution rounds attempted
        attempts: u32,
    },

    /// A `FULLNAME:BRANCH` argument could not be parsed
    #[error("invalid branch spec '{0}', expected FULLNAME:BRANCH")]
    InvalidBranchSpec(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;
