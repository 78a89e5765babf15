//! In-memory backends for the store traits.
//!
//! Used by tests and by callers that want a throwaway registry.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use giftclaim_core::{
    AuditEvent, AuditSink, ClaimStore, CoreError, Player, PlayerId, PlayerStore, PlayerUpdate,
};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// Player store held in memory.
#[derive(Debug, Default)]
pub struct MemoryPlayerStore {
    players: RwLock<Vec<Player>>,
}

impl MemoryPlayerStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with players.
    pub fn with_players(players: Vec<Player>) -> Self {
        Self {
            players: RwLock::new(players),
        }
    }
}

#[async_trait]
impl PlayerStore for MemoryPlayerStore {
    async fn list(&self) -> Result<Vec<Player>, CoreError> {
        let mut players = self.players.read().await.clone();
        players.sort_by(|a, b| b.added_at.cmp(&a.added_at));
        Ok(players)
    }

    async fn get(&self, id: &PlayerId) -> Result<Option<Player>, CoreError> {
        Ok(self.players.read().await.iter().find(|p| &p.id == id).cloned())
    }

    async fn insert(&self, player: Player) -> Result<bool, CoreError> {
        let mut players = self.players.write().await;
        if players.iter().any(|p| p.id == player.id) {
            return Ok(false);
        }
        players.push(player);
        Ok(true)
    }

    async fn update(
        &self,
        id: &PlayerId,
        update: &PlayerUpdate,
    ) -> Result<Option<Player>, CoreError> {
        let mut players = self.players.write().await;
        Ok(players.iter_mut().find(|p| &p.id == id).map(|p| {
            p.apply(update);
            p.clone()
        }))
    }

    async fn remove(&self, id: &PlayerId) -> Result<bool, CoreError> {
        let mut players = self.players.write().await;
        let before = players.len();
        players.retain(|p| &p.id != id);
        Ok(players.len() != before)
    }

    async fn record_claim(
        &self,
        id: &PlayerId,
        at: DateTime<Utc>,
    ) -> Result<Option<Player>, CoreError> {
        let mut players = self.players.write().await;
        Ok(players.iter_mut().find(|p| &p.id == id).map(|p| {
            p.record_claim(at);
            p.clone()
        }))
    }
}

/// Claim store held in memory.
#[derive(Debug, Default)]
pub struct MemoryClaimStore {
    claims: RwLock<BTreeMap<String, Vec<String>>>,
}

impl MemoryClaimStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClaimStore for MemoryClaimStore {
    async fn claimed_codes(&self, player: &PlayerId) -> Result<Vec<String>, CoreError> {
        Ok(self
            .claims
            .read()
            .await
            .get(player.as_str())
            .cloned()
            .unwrap_or_default())
    }

    async fn insert(&self, player: &PlayerId, code: &str) -> Result<bool, CoreError> {
        let mut claims = self.claims.write().await;
        let codes = claims.entry(player.to_string()).or_default();
        if codes.iter().any(|c| c == code) {
            return Ok(false);
        }
        codes.push(code.to_string());
        Ok(true)
    }

    async fn all(&self) -> Result<BTreeMap<String, Vec<String>>, CoreError> {
        Ok(self.claims.read().await.clone())
    }
}

/// Audit sink held in memory, newest event first.
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    events: RwLock<Vec<AuditEvent>>,
}

impl MemoryAuditSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuditSink for MemoryAuditSink {
    async fn append(&self, event: AuditEvent) -> Result<(), CoreError> {
        self.events.write().await.insert(0, event);
        Ok(())
    }

    async fn recent(&self, limit: Option<usize>) -> Result<Vec<AuditEvent>, CoreError> {
        let events = self.events.read().await;
        let n = limit.unwrap_or(events.len()).min(events.len());
        Ok(events[..n].to_vec())
    }
}
