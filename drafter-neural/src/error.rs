use std::time::Duration;
use thiserror::Error;

/// Any way a request to the suggestion or document service can fail.
///
/// None of these are fatal: the caller surfaces the message and waits for
/// the next edit to start a fresh cycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkFailure {
    #[error("Failed to contact service: {0}")]
    Transport(String),

    #[error("Service returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Service returned a malformed body: {0}")]
    Malformed(String),

    #[error("Request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
}

impl From<reqwest::Error> for NetworkFailure {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            NetworkFailure::Malformed(err.to_string())
        } else {
            NetworkFailure::Transport(err.to_string())
        }
    }
}
