//! Error handling for the application

use thiserror::Error;

/// Price feed errors
#[derive(Error, Debug)]
pub enum FeedError {
    /// The transport gave up after spending its whole retry budget.
    #[error("network error, try again ({attempts} attempts, last error: {last_error})")]
    Network { attempts: u32, last_error: String },

    /// A single failed request. Retried by `RetryingQuoteSource`, terminal otherwise.
    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed ticker response: {0}")]
    Parse(String),
}

impl FeedError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, FeedError::Transport(_))
    }
}

impl From<reqwest::Error> for FeedError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FeedError::Parse(err.to_string())
        } else {
            FeedError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FeedError {
    fn from(err: serde_json::Error) -> Self {
        FeedError::Parse(err.to_string())
    }
}

/// Monitor loop errors
#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("price feed terminated: {0}")]
    Feed(#[from] FeedError),

    #[error("failed to write to output sink: {0}")]
    Sink(#[from] std::io::Error),
}

/// General application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
}
