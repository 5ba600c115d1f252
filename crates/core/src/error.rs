//! Unified error types for pagepulse.
//!
//! Every variant carries a stable upper-case code prefix so log lines and
//! tool responses can be matched on without parsing free text.

use rmcp::model::{ErrorCode, ErrorData as McpError};
use serde::{Deserialize, Serialize};
use tokio_rusqlite::rusqlite;

/// Unified error types for the rating pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., empty locator).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// The document source could not resolve or deliver the document.
    #[error("CONTENT_FETCH_FAILED: {0}")]
    ContentFetch(String),

    /// The document body could not be turned into canonical text.
    #[error("CONTENT_EXTRACTION_FAILED: {0}")]
    ContentExtraction(String),

    /// Database operation failed.
    #[error("STORAGE_FAILED: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("STORAGE_FAILED: migration failed: {0}")]
    MigrationFailed(String),

    /// A cached payload could not be encoded or decoded.
    #[error("STORAGE_FAILED: payload serialization: {0}")]
    Serialization(String),

    /// The rating call did not finish within its time budget.
    #[error("RATING_TIMEOUT: {0}")]
    RatingTimeout(String),

    /// The rating call returned an error or an unusable response.
    #[error("RATING_FAILED: {0}")]
    RatingFailed(String),
}

/// Coarse classification of an [`Error`], exposed to callers of the
/// rating operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidInput,
    ContentFetchFailure,
    ContentExtractionFailure,
    StorageFailure,
    RatingCallTimeout,
    RatingCallFailure,
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidInput(_) => ErrorKind::InvalidInput,
            Error::ContentFetch(_) => ErrorKind::ContentFetchFailure,
            Error::ContentExtraction(_) => ErrorKind::ContentExtractionFailure,
            Error::Database(_) | Error::MigrationFailed(_) | Error::Serialization(_) => ErrorKind::StorageFailure,
            Error::RatingTimeout(_) => ErrorKind::RatingCallTimeout,
            Error::RatingFailed(_) => ErrorKind::RatingCallFailure,
        }
    }

    /// Human-readable details without the code prefix.
    pub fn details(&self) -> String {
        match self {
            Error::InvalidInput(msg)
            | Error::ContentFetch(msg)
            | Error::ContentExtraction(msg)
            | Error::MigrationFailed(msg)
            | Error::Serialization(msg)
            | Error::RatingTimeout(msg)
            | Error::RatingFailed(msg) => msg.clone(),
            Error::Database(e) => e.to_string(),
        }
    }
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let code = match err.kind() {
            ErrorKind::InvalidInput => -32602,
            ErrorKind::ContentFetchFailure => -32001,
            ErrorKind::ContentExtractionFailure => -32000,
            ErrorKind::StorageFailure => -32002,
            ErrorKind::RatingCallTimeout => -32003,
            ErrorKind::RatingCallFailure => -32004,
        };

        McpError { code: ErrorCode(code), message: err.details().into(), data: None }
    }
}
