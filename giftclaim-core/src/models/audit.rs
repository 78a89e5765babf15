//! Audit trail types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder used when the caller's address or agent is not known.
pub const UNKNOWN: &str = "unknown";

/// Kind of action an audit event describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    /// A player registration attempt.
    PlayerAdded,
    /// A player removal attempt.
    PlayerRemoved,
    /// A direct redemption of one code for a list of players.
    CodeRedeemed,
    /// A single (player, code) outcome.
    SingleCodeClaimed,
    /// An orchestration run summary.
    AutoClaim,
}

impl AuditAction {
    /// Returns the wire name of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PlayerAdded => "PLAYER_ADDED",
            Self::PlayerRemoved => "PLAYER_REMOVED",
            Self::CodeRedeemed => "CODE_REDEEMED",
            Self::SingleCodeClaimed => "SINGLE_CODE_CLAIMED",
            Self::AutoClaim => "AUTO_CLAIM",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who triggered an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestMeta {
    /// Client address.
    pub ip: String,
    /// Client user agent.
    pub user_agent: String,
}

impl RequestMeta {
    /// Creates request metadata.
    pub fn new(ip: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            ip: ip.into(),
            user_agent: user_agent.into(),
        }
    }
}

impl Default for RequestMeta {
    fn default() -> Self {
        Self::new(UNKNOWN, UNKNOWN)
    }
}

/// One append-only audit record.
///
/// Action-specific fields are flattened into the top-level object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEvent {
    /// When the event was recorded.
    pub timestamp: DateTime<Utc>,
    /// What happened.
    pub action: AuditAction,
    /// Client address.
    pub ip: String,
    /// Client user agent.
    pub user_agent: String,
    /// Action-specific fields.
    #[serde(flatten)]
    pub details: serde_json::Map<String, serde_json::Value>,
}

impl AuditEvent {
    /// Creates an event stamped now.
    pub fn new(
        action: AuditAction,
        meta: &RequestMeta,
        details: serde_json::Map<String, serde_json::Value>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            action,
            ip: meta.ip.clone(),
            user_agent: meta.user_agent.clone(),
            details,
        }
    }

    /// Returns a detail field by name.
    pub fn detail(&self, key: &str) -> Option<&serde_json::Value> {
        self.details.get(key)
    }
}
