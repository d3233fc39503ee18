//! Error types for starfeed-core.

use miette::Diagnostic;
use starfeed_config::error::ConfigError;
use starfeed_db::error::DbError;
use starfeed_github::UpstreamError;
use thiserror::Error;

/// Error type for the release feed pipeline and its cache.
#[derive(Error, Diagnostic, Debug)]
pub enum FeedError {
    #[error(transparent)]
    #[diagnostic(
        code(starfeed::transport),
        help("Check your internet connection and try again")
    )]
    Transport(UpstreamError),

    #[error("GitHub rejected the request (HTTP {status}): {message}")]
    #[diagnostic(
        code(starfeed::upstream),
        help("Check that your token is valid and has not hit the rate limit")
    )]
    Upstream { status: u16, message: String },

    #[error("Failed to decode {what}")]
    #[diagnostic(code(starfeed::decode))]
    Decode {
        what: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("No cached snapshot under '{key}'")]
    #[diagnostic(
        code(starfeed::cache::not_found),
        help("Run 'starfeed refresh' to build the feed")
    )]
    NotFound { key: String },

    #[error("Failed to read cached snapshot '{key}'")]
    #[diagnostic(code(starfeed::cache::read))]
    Read {
        key: String,
        #[source]
        source: DbError,
    },

    #[error("Failed to encode snapshot")]
    #[diagnostic(code(starfeed::cache::encode))]
    Encode(#[source] serde_json::Error),

    #[error("Failed to write cached snapshot '{key}'")]
    #[diagnostic(
        code(starfeed::cache::write),
        help("Check that the database file is writable")
    )]
    Write {
        key: String,
        #[source]
        source: DbError,
    },

    #[error("Operation cancelled")]
    #[diagnostic(code(starfeed::cancelled))]
    Cancelled,

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Database(#[from] DbError),

    #[error("Thread lock poison error")]
    #[diagnostic(
        code(starfeed::poison),
        help("This is an internal error, please report it")
    )]
    PoisonError,

    #[error("Task failed to complete: {0}")]
    #[diagnostic(
        code(starfeed::join),
        help("This is an internal error, please report it")
    )]
    Join(String),

    #[error("{0}")]
    #[diagnostic(code(starfeed::error))]
    Custom(String),
}

impl FeedError {
    /// Whether this is the expected "nothing cached yet" condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl<T> From<std::sync::PoisonError<T>> for FeedError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        Self::PoisonError
    }
}

impl From<UpstreamError> for FeedError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Api { status, message } => Self::Upstream { status, message },
            UpstreamError::Decode { url, source } => {
                Self::Decode {
                    what: format!("response from {url}"),
                    source,
                }
            }
            other => Self::Transport(other),
        }
    }
}
