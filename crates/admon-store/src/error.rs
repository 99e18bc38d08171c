//! Error types for snapshot fetches.

use std::time::Duration;

use admon_core::{Category, ServerId};
use thiserror::Error;

/// Result type alias for snapshot store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while fetching a snapshot.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("no {category} snapshot recorded for server '{server}'")]
    NotFound { category: Category, server: ServerId },

    #[error("unreadable {category} row for server '{server}': {reason}")]
    Decode {
        category: Category,
        server: ServerId,
        reason: String,
    },

    #[error("{category} fetch for server '{server}' timed out after {timeout:?}")]
    Timeout {
        category: Category,
        server: ServerId,
        timeout: Duration,
    },
}
