//! Claim orchestrator.
//!
//! Walks (code, player) pairs one at a time: skip pairs the ledger already
//! holds, log in, pause, redeem, record the outcome, pause again. A vendor
//! failure only fails its own pair. Extraction failures and store failures
//! stop the run, because without a working ledger claims could be repeated.

use chrono::Utc;
use giftclaim_core::{
    ClaimReport, LOGIN_FAILED, PairResult, PlayerId, RequestMeta, parse_code,
};
use giftclaim_fetch::{CodeSource, ExtractOutcome, VendorApi};
use giftclaim_store::{ClaimLedger, PlayerRegistry, StoreError};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::audit::AuditRecorder;
use crate::error::EngineError;
use crate::pacing::Pacing;

/// Maximum players in one direct redemption.
pub const MAX_REDEEM_PLAYERS: usize = 100;

// ============================================================================
// Claim Request
// ============================================================================

/// Input of a batch claim run, as received from a caller.
#[derive(Debug, Clone, Default)]
pub struct ClaimRequest {
    /// Raw player ids. Empty means every registered player.
    pub players: Vec<String>,
    /// Raw codes. `None` means the currently listed active codes.
    pub codes: Option<Vec<String>>,
    /// Attempt pairs the ledger already holds.
    pub force: bool,
}

impl ClaimRequest {
    /// Claims listed codes for every registered player.
    pub fn all_players() -> Self {
        Self::default()
    }
}

// ============================================================================
// Orchestrator
// ============================================================================

/// Runs claim batches against the vendor.
pub struct ClaimOrchestrator {
    source: Arc<dyn CodeSource>,
    vendor: Arc<dyn VendorApi>,
    registry: PlayerRegistry,
    ledger: ClaimLedger,
    audit: AuditRecorder,
    pacing: Pacing,
    run_lock: Mutex<()>,
}

impl ClaimOrchestrator {
    /// Creates an orchestrator with default pacing.
    pub fn new(
        source: Arc<dyn CodeSource>,
        vendor: Arc<dyn VendorApi>,
        registry: PlayerRegistry,
        ledger: ClaimLedger,
        audit: AuditRecorder,
    ) -> Self {
        Self {
            source,
            vendor,
            registry,
            ledger,
            audit,
            pacing: Pacing::default(),
            run_lock: Mutex::new(()),
        }
    }

    /// Sets the pacing.
    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    /// Returns the player registry.
    pub fn registry(&self) -> &PlayerRegistry {
        &self.registry
    }

    /// Returns the claim ledger.
    pub fn ledger(&self) -> &ClaimLedger {
        &self.ledger
    }

    /// Returns the audit recorder.
    pub fn audit(&self) -> &AuditRecorder {
        &self.audit
    }

    /// Fetches and extracts the current codes.
    ///
    /// # Errors
    ///
    /// [`EngineError::Extraction`] on transport failure. The caller decides
    /// whether that means "no codes".
    pub async fn discover(&self) -> Result<ExtractOutcome, EngineError> {
        let outcome = self.source.fetch_codes().await?;
        info!(
            source = self.source.id(),
            active = outcome.codes.active.len(),
            expired = outcome.codes.expired.len(),
            "Codes discovered"
        );
        Ok(outcome)
    }

    /// Runs a batch: codes outer, players inner.
    ///
    /// # Errors
    ///
    /// Validation errors before any vendor call; extraction and store
    /// failures abort the run. An empty roster yields an empty report.
    #[instrument(skip(self, request, meta), fields(players = request.players.len(), force = request.force))]
    pub async fn run_claim_batch(
        &self,
        request: ClaimRequest,
        meta: &RequestMeta,
    ) -> Result<ClaimReport, EngineError> {
        let explicit_players = parse_players(&request.players)?;
        let explicit_codes = request.codes.as_deref().map(parse_codes).transpose()?;

        let _run = self.run_lock.lock().await;

        let players: Vec<PlayerId> = if explicit_players.is_empty() {
            self.registry
                .list()
                .await?
                .into_iter()
                .map(|p| p.id)
                .collect()
        } else {
            explicit_players
        };
        if players.is_empty() {
            info!("No players to claim for");
            let report = ClaimReport::default();
            self.finish_run(meta, &report).await;
            return Ok(report);
        }

        let codes = match explicit_codes {
            Some(codes) => codes,
            None => self.discover().await?.codes.active_codes(),
        };

        let mut report = ClaimReport {
            total_codes: codes.len(),
            ..ClaimReport::default()
        };
        for code in &codes {
            for player in &players {
                self.attempt(player, code, request.force, meta, &mut report)
                    .await?;
            }
        }

        self.finish_run(meta, &report).await;
        Ok(report)
    }

    /// Claims every listed active code for one registered player.
    ///
    /// # Errors
    ///
    /// [`EngineError::PlayerNotFound`] if the player is not registered.
    #[instrument(skip(self, meta))]
    pub async fn claim_for_player(
        &self,
        player: &str,
        meta: &RequestMeta,
    ) -> Result<ClaimReport, EngineError> {
        let player = PlayerId::parse(player)?;

        let _run = self.run_lock.lock().await;

        if !self.registry.exists(&player).await? {
            return Err(EngineError::PlayerNotFound(player.to_string()));
        }

        let codes = self.discover().await?.codes.active_codes();
        let mut report = ClaimReport {
            total_codes: codes.len(),
            ..ClaimReport::default()
        };
        for code in &codes {
            self.attempt(&player, code, false, meta, &mut report).await?;
        }

        self.finish_run(meta, &report).await;
        Ok(report)
    }

    /// Redeems one named code for the given players.
    ///
    /// The ledger is not consulted, since the caller asked for this exact
    /// code, but successes are still recorded in it.
    ///
    /// # Errors
    ///
    /// Validation errors for a bad code, an empty player list, or more than
    /// [`MAX_REDEEM_PLAYERS`] players.
    #[instrument(skip(self, players, meta), fields(players = players.len()))]
    pub async fn redeem_code(
        &self,
        code: &str,
        players: &[String],
        meta: &RequestMeta,
    ) -> Result<ClaimReport, EngineError> {
        let code = parse_code(code)?;
        let players = parse_players(players)?;
        if players.is_empty() {
            return Err(EngineError::NoPlayers);
        }
        if players.len() > MAX_REDEEM_PLAYERS {
            return Err(EngineError::TooManyPlayers {
                count: players.len(),
                max: MAX_REDEEM_PLAYERS,
            });
        }

        let _run = self.run_lock.lock().await;

        let mut report = ClaimReport {
            total_codes: 1,
            ..ClaimReport::default()
        };
        for player in &players {
            let result = self.claim_pair(player, &code, meta).await?;
            report.push(result);
            self.pacing.pause_after_attempt().await;
        }

        info!(
            code = %code,
            succeeded = report.success_count(),
            failed = report.failure_count(),
            "Direct redemption finished"
        );
        self.audit.code_redeemed(meta, &code, &players, &report).await;
        Ok(report)
    }

    // ------------------------------------------------------------------------
    // Pair processing
    // ------------------------------------------------------------------------

    async fn attempt(
        &self,
        player: &PlayerId,
        code: &str,
        force: bool,
        meta: &RequestMeta,
        report: &mut ClaimReport,
    ) -> Result<(), EngineError> {
        if !force && self.ledger.has_claimed(player, code).await? {
            debug!(player = %player, code, "Already claimed, skipping");
            report.skipped += 1;
            return Ok(());
        }

        let result = self.claim_pair(player, code, meta).await?;
        self.audit.pair_outcome(meta, &result).await;
        report.push(result);

        self.pacing.pause_after_attempt().await;
        Ok(())
    }

    /// Logs in and redeems one pair.
    ///
    /// Vendor rejections and transport errors become a failed [`PairResult`].
    /// Only store failures are returned as errors. A pair the vendor accepted
    /// is audited even when recording it fails.
    async fn claim_pair(
        &self,
        player: &PlayerId,
        code: &str,
        meta: &RequestMeta,
    ) -> Result<PairResult, EngineError> {
        match self.vendor.login(player).await {
            Ok(login) if login.success => {}
            Ok(login) => {
                warn!(player = %player, status = login.status, "Login rejected");
                return Ok(PairResult::failure(player.clone(), code, LOGIN_FAILED));
            }
            Err(e) => {
                warn!(player = %player, error = %e, "Login request failed");
                return Ok(PairResult::failure(player.clone(), code, e.to_string()));
            }
        }

        self.pacing.pause_before_redeem().await;

        let outcome = match self.vendor.redeem(player, code).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(player = %player, code, error = %e, "Redeem request failed");
                return Ok(PairResult::failure(player.clone(), code, e.to_string()));
            }
        };

        if !outcome.success {
            info!(player = %player, code, reason = %outcome.diagnostic, "Redemption rejected");
            return Ok(PairResult::failure(player.clone(), code, outcome.diagnostic));
        }

        if let Err(e) = self.record_success(player, code).await {
            warn!(player = %player, code, error = %e, "Claimed but not recorded, aborting run");
            self.audit
                .pair_outcome(meta, &PairResult::success(player.clone(), code))
                .await;
            return Err(e);
        }
        info!(player = %player, code, rule = outcome.rule.unwrap_or("none"), "Code claimed");
        Ok(PairResult::success(player.clone(), code))
    }

    async fn record_success(&self, player: &PlayerId, code: &str) -> Result<(), EngineError> {
        self.ledger.mark_claimed(player, code).await?;
        match self.registry.record_claim(player, Utc::now()).await {
            Ok(_) => Ok(()),
            Err(StoreError::PlayerNotFound(_)) => {
                debug!(player = %player, "Claim for unregistered player, counters not updated");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn finish_run(&self, meta: &RequestMeta, report: &ClaimReport) {
        info!(
            codes_claimed = report.codes_claimed.len(),
            total_codes = report.total_codes,
            succeeded = report.success_count(),
            failed = report.failure_count(),
            skipped = report.skipped,
            "Claim run finished"
        );
        self.audit.run_summary(meta, report).await;
    }
}

// ============================================================================
// Input normalization
// ============================================================================

/// Parses and de-duplicates player ids, keeping first-seen order.
fn parse_players(raw: &[String]) -> Result<Vec<PlayerId>, EngineError> {
    let mut players: Vec<PlayerId> = Vec::with_capacity(raw.len());
    for id in raw {
        let id = PlayerId::parse(id)?;
        if !players.contains(&id) {
            players.push(id);
        }
    }
    Ok(players)
}

/// Parses and de-duplicates codes, keeping first-seen order.
fn parse_codes(raw: &[String]) -> Result<Vec<String>, EngineError> {
    if raw.is_empty() {
        return Err(EngineError::NoCodes);
    }
    let mut codes: Vec<String> = Vec::with_capacity(raw.len());
    for code in raw {
        let code = parse_code(code)?;
        if !codes.contains(&code) {
            codes.push(code);
        }
    }
    Ok(codes)
}
