use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Anything the fetch engine reports for a request. Terminal for the polling loop.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("request to {url} failed with HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("domain of {url} is not in the allow-list")]
    DisallowedDomain { url: String },

    #[error("invalid URL `{input}`: {reason}")]
    InvalidUrl { input: String, reason: String },

    #[error("invalid selector `{selector}`: {reason}")]
    Selector { selector: String, reason: String },

    #[error("fetch task failed: {0}")]
    Task(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected {expected} cells, found {found}")]
pub struct MalformedRowError {
    pub expected: usize,
    pub found: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("need at least {needed} batsmen, found {found}")]
pub struct InsufficientDataError {
    pub needed: usize,
    pub found: usize,
}

#[derive(Debug, Error)]
pub enum NotificationDeliveryError {
    #[error("failed to launch `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{program}` exited with {status}: {stderr}")]
    Exit {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
}
