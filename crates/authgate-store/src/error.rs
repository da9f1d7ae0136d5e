//! Identity store errors

use thiserror::Error;

/// Identity store errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// Network failure, timeout, or connection refused
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Store answered with a non-success status
    #[error("identity store returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body could not be decoded
    #[error("invalid response: {0}")]
    Decode(String),

    /// Store is not accepting calls
    #[error("identity store unavailable")]
    Unavailable,

    /// Record not found
    #[error("record not found")]
    NotFound,
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
