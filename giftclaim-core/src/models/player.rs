//! Player types.
//!
//! A [`PlayerId`] is normalized once at the ingestion edge; everything past
//! the registry boundary works with the typed [`Player`] record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

// ============================================================================
// Player Id
// ============================================================================

/// Normalized player identifier: 8-10 ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlayerId(String);

impl PlayerId {
    /// Parses and normalizes a raw identifier.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let trimmed = raw.trim();
        let valid = (8..=10).contains(&trimmed.len()) && trimmed.bytes().all(|b| b.is_ascii_digit());
        if valid {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(CoreError::InvalidPlayerId(raw.to_string()))
        }
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PlayerId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PlayerId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PlayerId> for String {
    fn from(id: PlayerId) -> Self {
        id.0
    }
}

impl AsRef<str> for PlayerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// Player
// ============================================================================

/// A registered player account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    /// Unique identifier.
    pub id: PlayerId,
    /// When the player was registered.
    pub added_at: DateTime<Utc>,
    /// Whether the vendor confirmed the account exists.
    #[serde(default)]
    pub verified: bool,
    /// Opaque vendor payload captured at verification.
    #[serde(default)]
    pub verification_data: Option<serde_json::Value>,
    /// Time of the most recent successful claim.
    #[serde(default)]
    pub last_claimed: Option<DateTime<Utc>>,
    /// Number of successful claims. Never decreases.
    #[serde(default)]
    pub total_claims: u64,
}

impl Player {
    /// Creates an unverified player added now.
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            added_at: Utc::now(),
            verified: false,
            verification_data: None,
            last_claimed: None,
            total_claims: 0,
        }
    }

    /// Marks the player as verified with the vendor payload.
    pub fn verified_with(mut self, data: Option<serde_json::Value>) -> Self {
        self.verified = true;
        self.verification_data = data;
        self
    }

    /// Records one successful claim at `at`.
    pub fn record_claim(&mut self, at: DateTime<Utc>) {
        self.total_claims = self.total_claims.saturating_add(1);
        self.last_claimed = Some(at);
    }

    /// Applies a partial update.
    ///
    /// `total_claims` only moves forward; a lower value is ignored.
    pub fn apply(&mut self, update: &PlayerUpdate) {
        if let Some(at) = update.last_claimed {
            self.last_claimed = Some(at);
        }
        if let Some(total) = update.total_claims {
            self.total_claims = self.total_claims.max(total);
        }
        if let Some(verified) = update.verified {
            self.verified = verified;
        }
        if let Some(data) = &update.verification_data {
            self.verification_data = Some(data.clone());
        }
    }
}

// ============================================================================
// Player Update
// ============================================================================

/// Partial update for a [`Player`]. Unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerUpdate {
    /// New last-claimed time.
    pub last_claimed: Option<DateTime<Utc>>,
    /// New total claims.
    pub total_claims: Option<u64>,
    /// New verification status.
    pub verified: Option<bool>,
    /// New verification payload.
    pub verification_data: Option<serde_json::Value>,
}

impl PlayerUpdate {
    /// Returns true if no field is set.
    pub fn is_empty(&self) -> bool {
        self.last_claimed.is_none()
            && self.total_claims.is_none()
            && self.verified.is_none()
            && self.verification_data.is_none()
    }
}

// ============================================================================
// Player Stats
// ============================================================================

/// Claim statistics for one player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    /// Player the stats describe.
    pub player_id: PlayerId,
    /// Codes recorded in the ledger for this player.
    pub total_claims: usize,
    /// Last successful claim, if the player is registered.
    pub last_claimed: Option<DateTime<Utc>>,
    /// Registration time, if the player is registered.
    pub added_at: Option<DateTime<Utc>>,
}
