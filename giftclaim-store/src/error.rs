//! Store error types.

use giftclaim_core::CoreError;
use thiserror::Error;

/// Errors that can occur in the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Player already registered.
    #[error("Player already exists: {0}")]
    PlayerExists(String),

    /// Player not registered.
    #[error("Player not found: {0}")]
    PlayerNotFound(String),

    /// Update with no fields set.
    #[error("Update contains no fields")]
    EmptyUpdate,

    /// Backend error surfaced through a store trait.
    #[error("Backend error: {0}")]
    Backend(#[from] CoreError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Timeout error.
    #[error("Operation timed out")]
    Timeout,
}

impl StoreError {
    /// Returns true if this is a transient error that might succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Timeout | StoreError::Io(_))
    }

    /// Returns true for duplicate or missing player errors.
    pub fn is_registry_conflict(&self) -> bool {
        matches!(
            self,
            StoreError::PlayerExists(_) | StoreError::PlayerNotFound(_)
        )
    }
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Backend(inner) => inner,
            other => CoreError::Storage(other.to_string()),
        }
    }
}
