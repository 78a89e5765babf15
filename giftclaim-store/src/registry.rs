//! Player registry.
//!
//! Enforces uniqueness and existence rules on top of a [`PlayerStore`].

use chrono::{DateTime, Utc};
use giftclaim_core::{Player, PlayerId, PlayerStats, PlayerStore, PlayerUpdate};
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::StoreError;
use crate::ledger::ClaimLedger;

/// Registered players and their claim counters.
#[derive(Clone)]
pub struct PlayerRegistry {
    store: Arc<dyn PlayerStore>,
}

impl PlayerRegistry {
    /// Creates a registry over a store.
    pub fn new(store: Arc<dyn PlayerStore>) -> Self {
        Self { store }
    }

    /// Registers a player.
    ///
    /// # Errors
    ///
    /// [`StoreError::PlayerExists`] if the id is already registered. The
    /// existing record is left untouched.
    pub async fn add(&self, player: Player) -> Result<(), StoreError> {
        let id = player.id.clone();
        if !self.store.insert(player).await? {
            return Err(StoreError::PlayerExists(id.to_string()));
        }
        info!(player = %id, "Player registered");
        Ok(())
    }

    /// Removes a player.
    ///
    /// # Errors
    ///
    /// [`StoreError::PlayerNotFound`] if the id is not registered.
    pub async fn remove(&self, id: &PlayerId) -> Result<(), StoreError> {
        if !self.store.remove(id).await? {
            return Err(StoreError::PlayerNotFound(id.to_string()));
        }
        info!(player = %id, "Player removed");
        Ok(())
    }

    /// Applies a partial update and returns the updated record.
    ///
    /// # Errors
    ///
    /// [`StoreError::EmptyUpdate`] if no field is set,
    /// [`StoreError::PlayerNotFound`] if the id is not registered.
    pub async fn update(&self, id: &PlayerId, update: &PlayerUpdate) -> Result<Player, StoreError> {
        if update.is_empty() {
            return Err(StoreError::EmptyUpdate);
        }
        self.store
            .update(id, update)
            .await?
            .ok_or_else(|| StoreError::PlayerNotFound(id.to_string()))
    }

    /// Returns true if the player is registered.
    pub async fn exists(&self, id: &PlayerId) -> Result<bool, StoreError> {
        Ok(self.store.exists(id).await?)
    }

    /// Returns one player.
    pub async fn get(&self, id: &PlayerId) -> Result<Option<Player>, StoreError> {
        Ok(self.store.get(id).await?)
    }

    /// Returns all players, newest registration first.
    pub async fn list(&self) -> Result<Vec<Player>, StoreError> {
        Ok(self.store.list().await?)
    }

    /// Bumps `total_claims` and sets `last_claimed`.
    pub async fn record_claim(&self, id: &PlayerId, at: DateTime<Utc>) -> Result<Player, StoreError> {
        let player = self
            .store
            .record_claim(id, at)
            .await?
            .ok_or_else(|| StoreError::PlayerNotFound(id.to_string()))?;
        debug!(player = %id, total = player.total_claims, "Claim counted");
        Ok(player)
    }

    /// Returns claim statistics for a player.
    ///
    /// `total_claims` counts ledger entries, so players that were removed
    /// still report the claims made while they were registered.
    pub async fn stats(&self, id: &PlayerId, ledger: &ClaimLedger) -> Result<PlayerStats, StoreError> {
        let player = self.get(id).await?;
        let claimed = ledger.claimed_codes(id).await?;

        Ok(PlayerStats {
            player_id: id.clone(),
            total_claims: claimed.len(),
            last_claimed: player.as_ref().and_then(|p| p.last_claimed),
            added_at: player.map(|p| p.added_at),
        })
    }
}
