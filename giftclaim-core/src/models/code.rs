//! Gift code types.
//!
//! Codes are produced fresh by every extraction and never persisted as a
//! canonical list. Identity is the normalized (uppercase) code string.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::error::CoreError;

/// Minimum length of a gift code.
pub const MIN_CODE_LEN: usize = 4;

/// Maximum length of a gift code.
pub const MAX_CODE_LEN: usize = 20;

/// Normalizes a raw token into a canonical gift code.
///
/// Returns `None` unless the trimmed token is 4-20 ASCII alphanumerics.
pub fn normalize_code(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let len = trimmed.len();
    if !(MIN_CODE_LEN..=MAX_CODE_LEN).contains(&len) {
        return None;
    }
    if !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(trimmed.to_ascii_uppercase())
}

/// Like [`normalize_code`] but reports the rejected input.
pub fn parse_code(raw: &str) -> Result<String, CoreError> {
    normalize_code(raw).ok_or_else(|| CoreError::InvalidCode(raw.to_string()))
}

// ============================================================================
// Code Status
// ============================================================================

/// Whether a code can still be redeemed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeStatus {
    /// Listed as active and not past its expiration.
    Active,
    /// Marked inactive by the site or past its expiration.
    Expired,
}

impl CodeStatus {
    /// Returns a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Expired => "Expired",
        }
    }
}

impl fmt::Display for CodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Gift Code
// ============================================================================

/// A single gift code recovered from the listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GiftCode {
    /// Canonical uppercase code.
    pub code: String,
    /// Active or expired.
    pub status: CodeStatus,
    /// Expiration instant, if the site published one.
    pub expires_at: Option<DateTime<Utc>>,
}

impl GiftCode {
    /// Creates an active code with no expiration.
    pub fn active(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            status: CodeStatus::Active,
            expires_at: None,
        }
    }

    /// Creates an expired code with no expiration.
    pub fn expired(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            status: CodeStatus::Expired,
            expires_at: None,
        }
    }

    /// Classifies a listed code.
    ///
    /// A code is expired when the site marks it inactive, or when its
    /// expiration is at or before `now`. Both sides are UTC instants.
    pub fn classify(
        code: impl Into<String>,
        listed_active: bool,
        expires_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Self {
        let past_expiry = expires_at.is_some_and(|at| at <= now);
        let status = if listed_active && !past_expiry {
            CodeStatus::Active
        } else {
            CodeStatus::Expired
        };
        Self {
            code: code.into(),
            status,
            expires_at,
        }
    }

    /// Returns true if the code is active.
    pub fn is_active(&self) -> bool {
        self.status == CodeStatus::Active
    }
}

// ============================================================================
// Code Set
// ============================================================================

/// De-duplicated result of one extraction, split into active and expired.
///
/// The first occurrence of a code wins; later duplicates are ignored
/// regardless of which side they would land on.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CodeSet {
    /// Active codes in discovery order.
    pub active: Vec<GiftCode>,
    /// Expired codes in discovery order.
    pub expired: Vec<GiftCode>,
    #[serde(skip)]
    seen: HashSet<String>,
}

impl CodeSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a code. Returns false if the code was already present.
    pub fn insert(&mut self, code: GiftCode) -> bool {
        if !self.seen.insert(code.code.clone()) {
            return false;
        }
        match code.status {
            CodeStatus::Active => self.active.push(code),
            CodeStatus::Expired => self.expired.push(code),
        }
        true
    }

    /// Returns true if the code is present on either side.
    pub fn contains(&self, code: &str) -> bool {
        self.seen.contains(code)
    }

    /// Total number of codes.
    pub fn len(&self) -> usize {
        self.active.len() + self.expired.len()
    }

    /// Returns true if no codes were found.
    pub fn is_empty(&self) -> bool {
        self.active.is_empty() && self.expired.is_empty()
    }

    /// Active code strings in discovery order.
    pub fn active_codes(&self) -> Vec<String> {
        self.active.iter().map(|c| c.code.clone()).collect()
    }

    /// Iterates all codes, active first.
    pub fn iter(&self) -> impl Iterator<Item = &GiftCode> {
        self.active.iter().chain(self.expired.iter())
    }
}

impl FromIterator<GiftCode> for CodeSet {
    fn from_iter<I: IntoIterator<Item = GiftCode>>(iter: I) -> Self {
        let mut set = Self::new();
        for code in iter {
            set.insert(code);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_normalize_code() {
        assert_eq!(normalize_code(" winter2025 "), Some("WINTER2025".to_string()));
        assert_eq!(normalize_code("ABC"), None);
        assert_eq!(normalize_code("ABCDEFGHIJKLMNOPQRSTU"), None);
        assert_eq!(normalize_code("ABC-123"), None);
    }

    #[test]
    fn test_classify_boundary_is_expired() {
        let now = Utc::now();
        assert!(!GiftCode::classify("ABCD", true, Some(now), now).is_active());
        assert!(GiftCode::classify("ABCD", true, Some(now + Duration::seconds(1)), now).is_active());
        assert!(!GiftCode::classify("ABCD", false, None, now).is_active());
    }

    #[test]
    fn test_code_set_first_occurrence_wins() {
        let mut set = CodeSet::new();
        assert!(set.insert(GiftCode::active("ABC123")));
        assert!(!set.insert(GiftCode::expired("ABC123")));
        assert_eq!(set.active.len(), 1);
        assert!(set.expired.is_empty());
    }
}
