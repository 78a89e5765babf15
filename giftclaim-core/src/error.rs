//! Core error types for giftclaim.

use thiserror::Error;

/// Core error type for giftclaim operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Player identifier is not an 8-10 digit number.
    #[error("Invalid player ID: {0:?}. Must be 8-10 digits.")]
    InvalidPlayerId(String),

    /// Gift code is not a 4-20 character alphanumeric token.
    #[error("Invalid gift code: {0:?}")]
    InvalidCode(String),

    /// Backing store failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}
