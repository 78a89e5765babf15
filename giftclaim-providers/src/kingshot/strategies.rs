//! Kingshot listing extraction strategies.
//!
//! Three strategies of decreasing precision, tried in this order:
//!
//! 1. [`StructuredStrategy`] - embedded `code` / `isActive` / `expiresAt` records
//! 2. [`SectionStrategy`] - standalone code lines under the page headings
//! 3. [`BroadScanStrategy`] - code-shaped tokens ahead of the expired marker

use chrono::{DateTime, Utc};
use giftclaim_core::{CodeSet, GiftCode};
use giftclaim_fetch::{ExtractKind, ExtractStrategy};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, trace};

use super::parser::{floor_char_boundary, is_structural_word, parse_expiry, standalone_code, strip_tags};

/// How far past a code marker the record fields are looked for.
const RECORD_WINDOW: usize = 4096;

// Both `"code":"X"` and the escaped `\"code\":\"X\"` form.
static CODE_MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bcode\\?"\s*:\s*\\?"([A-Z0-9]{4,20})\\?""#).expect("Invalid regex")
});

static IS_ACTIVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bisActive\\?"\s*:\s*(true|false)"#).expect("Invalid regex")
});

static EXPIRES_AT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bexpiresAt\\?"\s*:\s*(?:null|\\?"([^"\\]*)\\?")"#).expect("Invalid regex")
});

static ACTIVE_HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bactive\s+gift\s+codes").expect("Invalid regex"));

static EXPIRED_HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bexpired\s+gift\s+codes").expect("Invalid regex"));

static BROAD_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Z0-9]{6,20}\b").expect("Invalid regex"));

// ============================================================================
// Structured Strategy
// ============================================================================

/// Extracts records from the page's embedded data island.
///
/// Each `code` marker owns the text up to the next marker (bounded by
/// [`RECORD_WINDOW`]). A record without an `isActive` flag is skipped.
#[derive(Debug, Default)]
pub struct StructuredStrategy;

impl StructuredStrategy {
    /// Creates a new strategy.
    pub fn new() -> Self {
        Self
    }
}

impl ExtractStrategy for StructuredStrategy {
    fn id(&self) -> &str {
        "kingshot.structured"
    }

    fn kind(&self) -> ExtractKind {
        ExtractKind::Structured
    }

    fn extract(&self, payload: &str, now: DateTime<Utc>) -> Option<CodeSet> {
        let markers: Vec<(usize, usize, &str)> = CODE_MARKER_RE
            .captures_iter(payload)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let code = caps.get(1)?;
                Some((whole.start(), whole.end(), code.as_str()))
            })
            .collect();

        let mut codes = CodeSet::new();

        for (i, &(_, end, code)) in markers.iter().enumerate() {
            let limit = markers
                .get(i + 1)
                .map_or(payload.len(), |&(next_start, _, _)| next_start)
                .min(end.saturating_add(RECORD_WINDOW));
            let window = &payload[end..floor_char_boundary(payload, limit)];

            let Some(active) = IS_ACTIVE_RE
                .captures(window)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str() == "true")
            else {
                trace!(code, "Record without activity flag, skipping");
                continue;
            };

            let expires_at = EXPIRES_AT_RE
                .captures(window)
                .and_then(|c| c.get(1))
                .and_then(|m| parse_expiry(m.as_str()));

            codes.insert(GiftCode::classify(code, active, expires_at, now));
        }

        debug!(markers = markers.len(), found = codes.len(), "Structured extraction");
        (!codes.is_empty()).then_some(codes)
    }
}

// ============================================================================
// Section Strategy
// ============================================================================

/// Reads standalone code lines under the "Active" and "Expired" headings.
#[derive(Debug, Default)]
pub struct SectionStrategy;

impl SectionStrategy {
    /// Creates a new strategy.
    pub fn new() -> Self {
        Self
    }
}

impl ExtractStrategy for SectionStrategy {
    fn id(&self) -> &str {
        "kingshot.sections"
    }

    fn kind(&self) -> ExtractKind {
        ExtractKind::Sections
    }

    fn extract(&self, payload: &str, _now: DateTime<Utc>) -> Option<CodeSet> {
        let text = strip_tags(payload);
        let active = ACTIVE_HEADING_RE.find(&text);
        let expired = EXPIRED_HEADING_RE.find(&text);

        if active.is_none() && expired.is_none() {
            return None;
        }

        let mut codes = CodeSet::new();

        if let Some(heading) = active {
            let end = expired
                .filter(|e| e.start() >= heading.end())
                .map_or(text.len(), |e| e.start());
            for code in text[heading.end()..end].lines().filter_map(standalone_code) {
                codes.insert(GiftCode::active(code));
            }
        }

        if let Some(heading) = expired {
            let end = active
                .filter(|a| a.start() >= heading.end())
                .map_or(text.len(), |a| a.start());
            for code in text[heading.end()..end].lines().filter_map(standalone_code) {
                codes.insert(GiftCode::expired(code));
            }
        }

        debug!(found = codes.len(), "Section extraction");
        (!codes.is_empty()).then_some(codes)
    }
}

// ============================================================================
// Broad Scan Strategy
// ============================================================================

/// Last resort: every uppercase code-shaped token before the expired marker.
///
/// The marker is the "Expired Gift Codes" heading, else the first literal
/// "Expired". Without either, the whole payload is scanned.
#[derive(Debug, Default)]
pub struct BroadScanStrategy;

impl BroadScanStrategy {
    /// Creates a new strategy.
    pub fn new() -> Self {
        Self
    }
}

impl ExtractStrategy for BroadScanStrategy {
    fn id(&self) -> &str {
        "kingshot.broad"
    }

    fn kind(&self) -> ExtractKind {
        ExtractKind::BroadScan
    }

    fn extract(&self, payload: &str, _now: DateTime<Utc>) -> Option<CodeSet> {
        let cutoff = EXPIRED_HEADING_RE
            .find(payload)
            .map(|m| m.start())
            .or_else(|| payload.find("Expired"))
            .unwrap_or(payload.len());

        let codes: CodeSet = BROAD_TOKEN_RE
            .find_iter(&payload[..cutoff])
            .map(|m| m.as_str())
            .filter(|token| !is_structural_word(token))
            .map(GiftCode::active)
            .collect();

        debug!(cutoff, found = codes.len(), "Broad extraction");
        (!codes.is_empty()).then_some(codes)
    }
}
