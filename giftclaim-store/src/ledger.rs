//! Claim ledger.
//!
//! The idempotency record of which (player, code) pairs were claimed. Pairs
//! are only ever added.

use giftclaim_core::{ClaimStore, CodeClaims, CodeSet, GiftCode, PlayerId, normalize_code};
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::debug;

use crate::error::StoreError;

/// Append-only record of claimed pairs.
#[derive(Clone)]
pub struct ClaimLedger {
    store: Arc<dyn ClaimStore>,
}

impl ClaimLedger {
    /// Creates a ledger over a store.
    pub fn new(store: Arc<dyn ClaimStore>) -> Self {
        Self { store }
    }

    /// Returns true if the pair is recorded.
    pub async fn has_claimed(&self, player: &PlayerId, code: &str) -> Result<bool, StoreError> {
        let key = code_key(code);
        Ok(self
            .store
            .claimed_codes(player)
            .await?
            .iter()
            .any(|c| c.eq_ignore_ascii_case(&key)))
    }

    /// Records a pair. Recording an existing pair is a no-op.
    ///
    /// Returns true if the pair was newly recorded.
    pub async fn mark_claimed(&self, player: &PlayerId, code: &str) -> Result<bool, StoreError> {
        if self.has_claimed(player, code).await? {
            return Ok(false);
        }
        let key = code_key(code);
        let inserted = self.store.insert(player, &key).await?;
        if inserted {
            debug!(player = %player, code = %key, "Claim recorded");
        }
        Ok(inserted)
    }

    /// Returns the codes recorded for a player.
    pub async fn claimed_codes(&self, player: &PlayerId) -> Result<Vec<String>, StoreError> {
        Ok(self.store.claimed_codes(player).await?)
    }

    /// Returns the players that claimed `code`, sorted.
    pub async fn claimants(&self, code: &str) -> Result<Vec<String>, StoreError> {
        let key = code_key(code);
        Ok(self
            .store
            .all()
            .await?
            .into_iter()
            .filter(|(_, codes)| codes.iter().any(|c| c.eq_ignore_ascii_case(&key)))
            .map(|(player, _)| player)
            .collect())
    }

    /// Annotates extracted codes with their claimants.
    ///
    /// Active codes come first, soonest expiration first, codes without an
    /// expiration last. Expired codes follow in discovery order.
    pub async fn codes_with_claims(&self, codes: &CodeSet) -> Result<Vec<CodeClaims>, StoreError> {
        let all = self.store.all().await?;
        let claimants = |code: &GiftCode| -> Vec<String> {
            all.iter()
                .filter(|(_, claimed)| claimed.iter().any(|c| c.eq_ignore_ascii_case(&code.code)))
                .map(|(player, _)| player.clone())
                .collect()
        };

        let mut active: Vec<&GiftCode> = codes.active.iter().collect();
        active.sort_by(|a, b| by_expiry(a, b));

        Ok(active
            .into_iter()
            .chain(codes.expired.iter())
            .map(|code| CodeClaims::new(code.clone(), claimants(code)))
            .collect())
    }
}

/// Canonical ledger form of a code. Tokens that are not valid codes keep
/// their trimmed text, upper-cased.
fn code_key(code: &str) -> String {
    normalize_code(code).unwrap_or_else(|| code.trim().to_ascii_uppercase())
}

fn by_expiry(a: &GiftCode, b: &GiftCode) -> Ordering {
    match (a.expires_at, b.expires_at) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
