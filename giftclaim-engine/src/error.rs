//! Engine error types.

use giftclaim_core::CoreError;
use giftclaim_fetch::FetchError;
use giftclaim_store::StoreError;
use thiserror::Error;

/// Errors that stop an engine operation as a whole.
///
/// Per-pair vendor failures never show up here; they are recorded in the
/// run's [`ClaimReport`](giftclaim_core::ClaimReport).
#[derive(Debug, Error)]
pub enum EngineError {
    /// The listing could not be fetched.
    #[error("Code extraction failed: {0}")]
    Extraction(#[from] FetchError),

    /// A vendor call failed outside of a claim run.
    #[error("Vendor request failed: {0}")]
    Vendor(#[source] FetchError),

    /// Registry, ledger or audit backend failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Malformed player id or code.
    #[error(transparent)]
    Validation(#[from] CoreError),

    /// The vendor does not know the player.
    #[error("Player verification failed: {0}")]
    VerificationFailed(String),

    /// The player is not registered.
    #[error("Player not found: {0}")]
    PlayerNotFound(String),

    /// An explicit player list was empty.
    #[error("No players to claim for")]
    NoPlayers,

    /// An explicit code list was empty.
    #[error("No gift codes given")]
    NoCodes,

    /// Too many players in one direct redemption.
    #[error("Too many players: {count} (maximum {max})")]
    TooManyPlayers {
        /// Players requested.
        count: usize,
        /// Allowed maximum.
        max: usize,
    },
}

impl EngineError {
    /// Returns true for errors caused by the caller's input.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::NoPlayers
                | Self::NoCodes
                | Self::TooManyPlayers { .. }
                | Self::Store(StoreError::PlayerExists(_) | StoreError::EmptyUpdate)
        )
    }

    /// Returns true when a named player does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::PlayerNotFound(_)
                | Self::VerificationFailed(_)
                | Self::Store(StoreError::PlayerNotFound(_))
        )
    }
}
