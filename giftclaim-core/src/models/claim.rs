//! Claim run results.

use serde::{Deserialize, Serialize};

use super::code::GiftCode;
use super::player::PlayerId;

/// Diagnostic recorded when the vendor rejects the login step.
pub const LOGIN_FAILED: &str = "Login failed";

/// Outcome of one (player, code) attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairResult {
    /// Player the attempt was made for.
    pub player_id: PlayerId,
    /// Code that was submitted.
    #[serde(rename = "giftCode")]
    pub code: String,
    /// Whether the vendor accepted the redemption.
    pub success: bool,
    /// Human-readable diagnostic on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PairResult {
    /// Creates a success result.
    pub fn success(player_id: PlayerId, code: impl Into<String>) -> Self {
        Self {
            player_id,
            code: code.into(),
            success: true,
            error: None,
        }
    }

    /// Creates a failure result with a diagnostic.
    pub fn failure(player_id: PlayerId, code: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            player_id,
            code: code.into(),
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Result of one orchestration run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimReport {
    /// Codes with at least one successful claim in this run, in processing order.
    pub codes_claimed: Vec<String>,
    /// Number of codes considered.
    pub total_codes: usize,
    /// Pairs skipped because the ledger already had them.
    pub skipped: usize,
    /// Per-pair outcomes in processing order.
    pub results: Vec<PairResult>,
}

impl ClaimReport {
    /// Number of successful pairs.
    pub fn success_count(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }

    /// Number of failed pairs.
    pub fn failure_count(&self) -> usize {
        self.results.iter().filter(|r| !r.success).count()
    }

    /// Appends a pair result, tracking which codes succeeded.
    pub fn push(&mut self, result: PairResult) {
        if result.success && !self.codes_claimed.contains(&result.code) {
            self.codes_claimed.push(result.code.clone());
        }
        self.results.push(result);
    }
}

/// A listed code together with the players that already claimed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeClaims {
    /// The listed code.
    #[serde(flatten)]
    pub code: GiftCode,
    /// Players with a ledger entry for this code, sorted.
    pub claimed_by: Vec<String>,
    /// Number of claimants.
    pub claim_count: usize,
}

impl CodeClaims {
    /// Creates an entry; the count follows `claimed_by`.
    pub fn new(code: GiftCode, claimed_by: Vec<String>) -> Self {
        let claim_count = claimed_by.len();
        Self {
            code,
            claimed_by,
            claim_count,
        }
    }
}
