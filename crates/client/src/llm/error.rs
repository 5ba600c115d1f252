//! Chat completions client error types.

use std::sync::Arc;

use pagepulse_core::Error;

/// Errors from the chat completions endpoint.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// Missing API key.
    #[error("missing API key: AI_API_KEY not set")]
    MissingApiKey,

    /// Authentication failed (invalid API key).
    #[error("authentication failed: invalid API key")]
    AuthError,

    /// Rate limited by the endpoint.
    #[error("rate limited: too many requests")]
    RateLimited,

    /// HTTP error response.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),

    /// The response had no usable answer.
    #[error("empty response: {0}")]
    EmptyResponse(String),
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { ChatError::Timeout } else { ChatError::Network(Arc::new(err)) }
    }
}

impl From<ChatError> for Error {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::Timeout => Error::RatingTimeout(ChatError::Timeout.to_string()),
            other => Error::RatingFailed(other.to_string()),
        }
    }
}
