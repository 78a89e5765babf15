//! Collaborator traits for giftclaim.
//!
//! The claim engine only talks to persistence through these traits. Backends
//! (JSON files, memory, a database) are free to choose their own layout.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use crate::error::CoreError;
use crate::models::{AuditEvent, Player, PlayerId, PlayerUpdate};

/// Storage for registered players, keyed by [`PlayerId`].
#[async_trait]
pub trait PlayerStore: Send + Sync {
    /// Returns all players, newest registration first.
    async fn list(&self) -> Result<Vec<Player>, CoreError>;

    /// Returns one player.
    async fn get(&self, id: &PlayerId) -> Result<Option<Player>, CoreError>;

    /// Returns true if the player is stored.
    async fn exists(&self, id: &PlayerId) -> Result<bool, CoreError> {
        Ok(self.get(id).await?.is_some())
    }

    /// Inserts a player. Returns false, leaving the store untouched, if the
    /// id is already present.
    async fn insert(&self, player: Player) -> Result<bool, CoreError>;

    /// Applies a partial update. Returns the updated player, or `None` if the
    /// id is not stored.
    async fn update(&self, id: &PlayerId, update: &PlayerUpdate)
    -> Result<Option<Player>, CoreError>;

    /// Removes a player. Returns false if the id was not stored.
    async fn remove(&self, id: &PlayerId) -> Result<bool, CoreError>;

    /// Increments `total_claims` and sets `last_claimed` in one step.
    ///
    /// Implementations must perform the read-modify-write under their own
    /// lock (or an atomic backend operation) so increments are not lost.
    async fn record_claim(
        &self,
        id: &PlayerId,
        at: DateTime<Utc>,
    ) -> Result<Option<Player>, CoreError>;
}

/// Append-only storage of claimed (player, code) pairs.
#[async_trait]
pub trait ClaimStore: Send + Sync {
    /// Returns the codes recorded for a player, in insertion order.
    async fn claimed_codes(&self, player: &PlayerId) -> Result<Vec<String>, CoreError>;

    /// Records a pair. Returns false if it was already recorded.
    async fn insert(&self, player: &PlayerId, code: &str) -> Result<bool, CoreError>;

    /// Returns the full mapping of player id to claimed codes.
    async fn all(&self) -> Result<BTreeMap<String, Vec<String>>, CoreError>;
}

/// Destination for audit events.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Appends one event.
    async fn append(&self, event: AuditEvent) -> Result<(), CoreError>;

    /// Returns up to `limit` events, newest first. `None` returns all.
    async fn recent(&self, limit: Option<usize>) -> Result<Vec<AuditEvent>, CoreError>;
}
