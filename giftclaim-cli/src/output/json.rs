//! JSON output formatting.

use anyhow::Result;
use chrono::{DateTime, Utc};
use giftclaim_core::{CodeClaims, CodeSet, GiftCode};
use giftclaim_fetch::ExtractOutcome;
use serde::{Serialize, Serializer};

// ============================================================================
// Output Types
// ============================================================================

/// JSON output of the `codes` command.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodesOutput<'a> {
    pub active: &'a [GiftCode],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expired: Option<&'a [GiftCode]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<&'a str>,
    #[serde(serialize_with = "serialize_datetime")]
    pub fetched_at: DateTime<Utc>,
}

/// JSON output of `codes --claims`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeClaimsOutput<'a> {
    pub codes: &'a [CodeClaims],
    #[serde(serialize_with = "serialize_datetime")]
    pub fetched_at: DateTime<Utc>,
}

// ============================================================================
// Serialization helpers
// ============================================================================

fn serialize_datetime<S>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.serialize_str(&dt.to_rfc3339())
}

// ============================================================================
// JSON Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize + ?Sized>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }

    /// Formats an extraction outcome.
    pub fn format_codes(
        &self,
        outcome: &ExtractOutcome,
        show_expired: bool,
        fetched_at: DateTime<Utc>,
    ) -> Result<String> {
        let codes: &CodeSet = &outcome.codes;
        self.format(&CodesOutput {
            active: &codes.active,
            expired: show_expired.then_some(codes.expired.as_slice()),
            strategy: outcome.successful_strategy(),
            fetched_at,
        })
    }

    /// Formats codes with their claimants.
    pub fn format_code_claims(
        &self,
        entries: &[CodeClaims],
        fetched_at: DateTime<Utc>,
    ) -> Result<String> {
        self.format(&CodeClaimsOutput {
            codes: entries,
            fetched_at,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
