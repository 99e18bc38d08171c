//! Error types for sink submissions.

use std::time::Duration;

use thiserror::Error;

/// Result type alias for sink operations.
pub type SinkResult<T> = Result<T, SinkError>;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("sink {address} unreachable: {reason}")]
    Unreachable { address: String, reason: String },

    #[error("sink rejected {target}: HTTP {status}: {body}")]
    Rejected {
        target: String,
        status: u16,
        body: String,
    },

    #[error("sink request to {address} timed out after {timeout:?}")]
    Timeout { address: String, timeout: Duration },

    #[error("failed to encode document: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("invalid sink request: {0}")]
    InvalidRequest(#[from] http::Error),
}
