use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum UpstreamError {
    #[error("Invalid URL: {url}")]
    #[diagnostic(code(starfeed_github::invalid_url))]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error(transparent)]
    #[diagnostic(
        code(starfeed_github::transport),
        help("Check your internet connection or try again later")
    )]
    Transport(#[from] Box<ureq::Error>),

    #[error("GitHub API error (HTTP {status}): {message}")]
    #[diagnostic(code(starfeed_github::api))]
    Api { status: u16, message: String },

    #[error("Malformed response from {url}")]
    #[diagnostic(code(starfeed_github::decode))]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl UpstreamError {
    /// Whether the failure happened before any response was received.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Whether the request ran into a timeout.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Transport(err) => {
                match err.as_ref() {
                    ureq::Error::Timeout(_) => true,
                    ureq::Error::Io(io) => io.kind() == std::io::ErrorKind::TimedOut,
                    _ => false,
                }
            }
            _ => false,
        }
    }
}

impl From<ureq::Error> for UpstreamError {
    fn from(e: ureq::Error) -> Self {
        Self::Transport(Box::new(e))
    }
}

pub type Result<T> = std::result::Result<T, UpstreamError>;
