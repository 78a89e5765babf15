//! JSON file backends for the store traits.
//!
//! Each store owns one file. Every operation reloads the file, applies its
//! change, and writes the file back atomically, all under an async mutex so
//! that read-modify-write sequences within one process never interleave.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use giftclaim_core::{
    AuditEvent, AuditSink, ClaimStore, CoreError, Player, PlayerId, PlayerStore, PlayerUpdate,
};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::debug;

use crate::persistence::{load_json_if_exists, save_json};

/// Players file name inside the data directory.
pub const PLAYERS_FILE: &str = "players.json";

/// Claims file name inside the data directory.
pub const CLAIMS_FILE: &str = "claims.json";

/// Audit trail file name inside the data directory.
pub const AUDIT_FILE: &str = "audit.json";

/// Default number of audit events retained.
pub const DEFAULT_AUDIT_RETENTION: usize = 1000;

fn sort_newest_first(players: &mut [Player]) {
    players.sort_by(|a, b| b.added_at.cmp(&a.added_at));
}

// ============================================================================
// Players
// ============================================================================

/// Player store backed by a JSON array.
#[derive(Debug)]
pub struct JsonPlayerStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonPlayerStore {
    /// Creates a store for `<dir>/players.json`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(PLAYERS_FILE))
    }

    /// Creates a store for an explicit file.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Vec<Player>, CoreError> {
        Ok(load_json_if_exists(&self.path).await?)
    }

    async fn save(&self, players: &[Player]) -> Result<(), CoreError> {
        Ok(save_json(&self.path, players).await?)
    }
}

#[async_trait]
impl PlayerStore for JsonPlayerStore {
    async fn list(&self) -> Result<Vec<Player>, CoreError> {
        let _guard = self.lock.lock().await;
        let mut players = self.load().await?;
        sort_newest_first(&mut players);
        Ok(players)
    }

    async fn get(&self, id: &PlayerId) -> Result<Option<Player>, CoreError> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.into_iter().find(|p| &p.id == id))
    }

    async fn insert(&self, player: Player) -> Result<bool, CoreError> {
        let _guard = self.lock.lock().await;
        let mut players = self.load().await?;
        if players.iter().any(|p| p.id == player.id) {
            return Ok(false);
        }
        debug!(player = %player.id, "Inserting player");
        players.push(player);
        self.save(&players).await?;
        Ok(true)
    }

    async fn update(
        &self,
        id: &PlayerId,
        update: &PlayerUpdate,
    ) -> Result<Option<Player>, CoreError> {
        let _guard = self.lock.lock().await;
        let mut players = self.load().await?;
        let Some(player) = players.iter_mut().find(|p| &p.id == id) else {
            return Ok(None);
        };
        player.apply(update);
        let updated = player.clone();
        self.save(&players).await?;
        Ok(Some(updated))
    }

    async fn remove(&self, id: &PlayerId) -> Result<bool, CoreError> {
        let _guard = self.lock.lock().await;
        let mut players = self.load().await?;
        let before = players.len();
        players.retain(|p| &p.id != id);
        if players.len() == before {
            return Ok(false);
        }
        self.save(&players).await?;
        Ok(true)
    }

    async fn record_claim(
        &self,
        id: &PlayerId,
        at: DateTime<Utc>,
    ) -> Result<Option<Player>, CoreError> {
        let _guard = self.lock.lock().await;
        let mut players = self.load().await?;
        let Some(player) = players.iter_mut().find(|p| &p.id == id) else {
            return Ok(None);
        };
        player.record_claim(at);
        let updated = player.clone();
        self.save(&players).await?;
        Ok(Some(updated))
    }
}

// ============================================================================
// Claims
// ============================================================================

/// Claim store backed by a JSON object of player id to code list.
#[derive(Debug)]
pub struct JsonClaimStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonClaimStore {
    /// Creates a store for `<dir>/claims.json`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(CLAIMS_FILE))
    }

    /// Creates a store for an explicit file.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<BTreeMap<String, Vec<String>>, CoreError> {
        Ok(load_json_if_exists(&self.path).await?)
    }
}

#[async_trait]
impl ClaimStore for JsonClaimStore {
    async fn claimed_codes(&self, player: &PlayerId) -> Result<Vec<String>, CoreError> {
        let _guard = self.lock.lock().await;
        Ok(self
            .load()
            .await?
            .remove(player.as_str())
            .unwrap_or_default())
    }

    async fn insert(&self, player: &PlayerId, code: &str) -> Result<bool, CoreError> {
        let _guard = self.lock.lock().await;
        let mut claims = self.load().await?;
        let codes = claims.entry(player.to_string()).or_default();
        if codes.iter().any(|c| c == code) {
            return Ok(false);
        }
        codes.push(code.to_string());
        save_json(&self.path, &claims).await?;
        Ok(true)
    }

    async fn all(&self) -> Result<BTreeMap<String, Vec<String>>, CoreError> {
        let _guard = self.lock.lock().await;
        self.load().await
    }
}

// ============================================================================
// Audit
// ============================================================================

/// Audit sink backed by a JSON array, newest event first.
#[derive(Debug)]
pub struct JsonAuditSink {
    path: PathBuf,
    retention: usize,
    lock: Mutex<()>,
}

impl JsonAuditSink {
    /// Creates a sink for `<dir>/audit.json`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(AUDIT_FILE))
    }

    /// Creates a sink for an explicit file.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            retention: DEFAULT_AUDIT_RETENTION,
            lock: Mutex::new(()),
        }
    }

    /// Sets how many events are kept. Older events are dropped on append.
    pub fn with_retention(mut self, retention: usize) -> Self {
        self.retention = retention.max(1);
        self
    }

    async fn load(&self) -> Result<Vec<AuditEvent>, CoreError> {
        Ok(load_json_if_exists(&self.path).await?)
    }
}

#[async_trait]
impl AuditSink for JsonAuditSink {
    async fn append(&self, event: AuditEvent) -> Result<(), CoreError> {
        let _guard = self.lock.lock().await;
        let mut events = self.load().await?;
        events.insert(0, event);
        events.truncate(self.retention);
        Ok(save_json(&self.path, &events).await?)
    }

    async fn recent(&self, limit: Option<usize>) -> Result<Vec<AuditEvent>, CoreError> {
        let _guard = self.lock.lock().await;
        let mut events = self.load().await?;
        if let Some(limit) = limit {
            events.truncate(limit);
        }
        Ok(events)
    }
}
