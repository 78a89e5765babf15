//! Extraction strategy trait and types.
//!
//! A strategy is one way of recovering gift codes from a listing payload.
//! The markup is not a stable format, so several strategies of decreasing
//! precision are tried in order by the [`ExtractPipeline`](crate::pipeline::ExtractPipeline).

use chrono::{DateTime, Utc};
use giftclaim_core::CodeSet;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Extract Kind
// ============================================================================

/// The kind of extraction a strategy performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractKind {
    /// Embedded data records with an activity flag and expiration.
    Structured,
    /// Standalone code lines under "active" / "expired" headings.
    Sections,
    /// Any code-shaped token ahead of the expired marker.
    BroadScan,
}

impl ExtractKind {
    /// Returns the display name for this kind.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Structured => "Structured",
            Self::Sections => "Sections",
            Self::BroadScan => "Broad Scan",
        }
    }
}

impl fmt::Display for ExtractKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// ============================================================================
// Extract Strategy Trait
// ============================================================================

/// A strategy for recovering codes from a raw listing payload.
///
/// ## Implementing a Strategy
///
/// ```ignore
/// struct HeadingStrategy;
///
/// impl ExtractStrategy for HeadingStrategy {
///     fn id(&self) -> &str {
///         "listing.headings"
///     }
///
///     fn kind(&self) -> ExtractKind {
///         ExtractKind::Sections
///     }
///
///     fn extract(&self, payload: &str, now: DateTime<Utc>) -> Option<CodeSet> {
///         // Return None when nothing was found so the next strategy runs
///     }
/// }
/// ```
pub trait ExtractStrategy: Send + Sync {
    /// Unique identifier for this strategy (e.g., "kingshot.structured").
    fn id(&self) -> &str;

    /// The kind of extraction this strategy performs.
    fn kind(&self) -> ExtractKind;

    /// Extracts codes from `payload`, classifying expirations against `now`.
    ///
    /// Returns `None` (or an empty set) when the strategy found nothing.
    /// Malformed individual records are skipped, never fatal.
    fn extract(&self, payload: &str, now: DateTime<Utc>) -> Option<CodeSet>;
}

// ============================================================================
// Strategy Info
// ============================================================================

/// Information about a strategy (for reporting).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyInfo {
    /// Strategy ID.
    pub id: String,
    /// Strategy kind.
    pub kind: ExtractKind,
    /// Position in the pipeline (0 = tried first).
    pub position: usize,
}
