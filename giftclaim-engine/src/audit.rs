//! Audit recorder.
//!
//! Writes are fire-and-forget: a failed append is logged and swallowed, and
//! never fails the operation it describes.

use giftclaim_core::{
    AuditAction, AuditEvent, AuditSink, ClaimReport, PairResult, PlayerId, RequestMeta,
};
use serde_json::{Map, Value, json};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::EngineError;

/// Records audit events to a sink.
#[derive(Clone)]
pub struct AuditRecorder {
    sink: Arc<dyn AuditSink>,
}

impl AuditRecorder {
    /// Creates a recorder over a sink.
    pub fn new(sink: Arc<dyn AuditSink>) -> Self {
        Self { sink }
    }

    /// Appends one event. Failures are logged, never returned.
    pub async fn record(&self, action: AuditAction, meta: &RequestMeta, details: Value) {
        let details = match details {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        let event = AuditEvent::new(action, meta, details);
        match self.sink.append(event).await {
            Ok(()) => debug!(%action, "Audit event recorded"),
            Err(e) => warn!(%action, error = %e, "Failed to record audit event"),
        }
    }

    /// Returns up to `limit` events, newest first.
    ///
    /// # Errors
    ///
    /// Returns the sink's error. Reads are not fire-and-forget.
    pub async fn recent(&self, limit: Option<usize>) -> Result<Vec<AuditEvent>, EngineError> {
        Ok(self.sink.recent(limit).await.map_err(giftclaim_store::StoreError::from)?)
    }

    /// Records a registration attempt.
    pub async fn player_added(&self, meta: &RequestMeta, player: &PlayerId, success: bool) {
        let verb = if success { "successfully added" } else { "failed to add" };
        self.record(
            AuditAction::PlayerAdded,
            meta,
            json!({
                "playerId": player,
                "success": success,
                "details": format!("Player ID {player} was {verb}"),
            }),
        )
        .await;
    }

    /// Records a removal attempt.
    pub async fn player_removed(&self, meta: &RequestMeta, player: &PlayerId, success: bool) {
        let verb = if success { "successfully removed" } else { "failed to remove" };
        self.record(
            AuditAction::PlayerRemoved,
            meta,
            json!({
                "playerId": player,
                "success": success,
                "details": format!("Player ID {player} was {verb}"),
            }),
        )
        .await;
    }

    /// Records one terminal pair outcome.
    pub async fn pair_outcome(&self, meta: &RequestMeta, result: &PairResult) {
        let verb = if result.success { "successfully claimed" } else { "failed to claim" };
        self.record(
            AuditAction::SingleCodeClaimed,
            meta,
            json!({
                "playerId": result.player_id,
                "giftCode": result.code,
                "success": result.success,
                "error": result.error,
                "details": format!("Player {} {verb} code {}", result.player_id, result.code),
            }),
        )
        .await;
    }

    /// Records a claim run summary.
    pub async fn run_summary(&self, meta: &RequestMeta, report: &ClaimReport) {
        self.record(
            AuditAction::AutoClaim,
            meta,
            json!({
                "codesClaimed": report.codes_claimed,
                "totalCodes": report.total_codes,
                "totalClaimed": report.codes_claimed.len(),
                "skipped": report.skipped,
                "results": report.results,
                "details": format!(
                    "Claimed {} of {} codes ({} pairs succeeded, {} failed, {} skipped)",
                    report.codes_claimed.len(),
                    report.total_codes,
                    report.success_count(),
                    report.failure_count(),
                    report.skipped,
                ),
            }),
        )
        .await;
    }

    /// Records a direct redemption of one code.
    pub async fn code_redeemed(
        &self,
        meta: &RequestMeta,
        code: &str,
        players: &[PlayerId],
        report: &ClaimReport,
    ) {
        self.record(
            AuditAction::CodeRedeemed,
            meta,
            json!({
                "giftCode": code,
                "totalPlayers": players.len(),
                "successCount": report.success_count(),
                "failCount": report.failure_count(),
                "playerIds": players,
                "results": report.results,
                "details": format!(
                    "Code {code} redeemed for {} of {} players",
                    report.success_count(),
                    players.len(),
                ),
            }),
        )
        .await;
    }
}
