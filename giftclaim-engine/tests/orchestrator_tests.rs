//! Claim engine tests against scripted vendor and listing doubles.

use async_trait::async_trait;
use giftclaim_core::{
    AuditAction, AuditSink, ClaimStore, CodeSet, CoreError, GiftCode, LOGIN_FAILED, Player,
    PlayerId, RequestMeta,
};
use giftclaim_engine::{
    AuditRecorder, ClaimOrchestrator, ClaimRequest, EngineError, Enrollment, MAX_REDEEM_PLAYERS,
    Pacing,
};
use giftclaim_fetch::{
    CodeSource, ExtractOutcome, FetchError, LoginOutcome, RedeemOutcome, VendorApi,
};
use giftclaim_store::{
    ClaimLedger, JsonAuditSink, JsonClaimStore, JsonPlayerStore, MemoryAuditSink,
    MemoryClaimStore, MemoryPlayerStore, PlayerRegistry, StoreError,
};
use serde_json::json;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

// ============================================================================
// Doubles
// ============================================================================

#[derive(Debug, Clone, Copy)]
enum Reply {
    Accept,
    Reject,
    Transport,
}

#[derive(Default)]
struct ScriptedVendor {
    logins: Mutex<HashMap<String, Reply>>,
    redeems: Mutex<HashMap<(String, String), Reply>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedVendor {
    fn login_reply(self, player: &str, reply: Reply) -> Self {
        self.logins.lock().unwrap().insert(player.to_string(), reply);
        self
    }

    fn redeem_reply(self, player: &str, code: &str, reply: Reply) -> Self {
        self.redeems
            .lock()
            .unwrap()
            .insert((player.to_string(), code.to_string()), reply);
        self
    }

    fn redeem_calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

fn transport_error() -> FetchError {
    FetchError::Timeout(10)
}

#[async_trait]
impl VendorApi for ScriptedVendor {
    async fn login(&self, player: &PlayerId) -> Result<LoginOutcome, FetchError> {
        let reply = self
            .logins
            .lock()
            .unwrap()
            .get(player.as_str())
            .copied()
            .unwrap_or(Reply::Accept);
        match reply {
            Reply::Accept => Ok(LoginOutcome::from_response(
                200,
                r#"{"code":0,"data":{"nickname":"tester"}}"#,
            )),
            Reply::Reject => Ok(LoginOutcome::from_response(404, "not found")),
            Reply::Transport => Err(transport_error()),
        }
    }

    async fn redeem(&self, player: &PlayerId, code: &str) -> Result<RedeemOutcome, FetchError> {
        self.calls
            .lock()
            .unwrap()
            .push((player.to_string(), code.to_string()));
        let reply = self
            .redeems
            .lock()
            .unwrap()
            .get(&(player.to_string(), code.to_string()))
            .copied()
            .unwrap_or(Reply::Accept);
        match reply {
            Reply::Accept => Ok(RedeemOutcome {
                success: true,
                status: 200,
                raw: json!({"code": 0, "msg": "Success"}),
                diagnostic: String::new(),
                rule: Some("success_code"),
            }),
            Reply::Reject => Ok(RedeemOutcome {
                success: false,
                status: 200,
                raw: json!({"code": 1, "msg": "Code expired"}),
                diagnostic: "Code expired".to_string(),
                rule: None,
            }),
            Reply::Transport => Err(transport_error()),
        }
    }
}

struct StaticSource(Vec<GiftCode>);

#[async_trait]
impl CodeSource for StaticSource {
    fn id(&self) -> &str {
        "static"
    }

    async fn fetch_codes(&self) -> Result<ExtractOutcome, FetchError> {
        Ok(ExtractOutcome::from_codes(
            self.0.iter().cloned().collect::<CodeSet>(),
        ))
    }
}

struct FailingSource;

#[async_trait]
impl CodeSource for FailingSource {
    fn id(&self) -> &str {
        "failing"
    }

    async fn fetch_codes(&self) -> Result<ExtractOutcome, FetchError> {
        Err(FetchError::Status(503))
    }
}

struct BrokenClaimStore;

#[async_trait]
impl ClaimStore for BrokenClaimStore {
    async fn claimed_codes(&self, _player: &PlayerId) -> Result<Vec<String>, CoreError> {
        Ok(Vec::new())
    }

    async fn insert(&self, _player: &PlayerId, _code: &str) -> Result<bool, CoreError> {
        Err(CoreError::Storage("disk full".to_string()))
    }

    async fn all(&self) -> Result<BTreeMap<String, Vec<String>>, CoreError> {
        Ok(BTreeMap::new())
    }
}

// ============================================================================
// Fixtures
// ============================================================================

struct Harness {
    orchestrator: ClaimOrchestrator,
    vendor: Arc<ScriptedVendor>,
    audit: Arc<MemoryAuditSink>,
}

fn player(id: &str) -> Player {
    Player::new(PlayerId::parse(id).unwrap())
}

fn build(
    vendor: ScriptedVendor,
    source: Arc<dyn CodeSource>,
    claims: Arc<dyn ClaimStore>,
    players: Vec<Player>,
) -> Harness {
    let vendor = Arc::new(vendor);
    let audit = Arc::new(MemoryAuditSink::new());
    let orchestrator = ClaimOrchestrator::new(
        source,
        vendor.clone(),
        PlayerRegistry::new(Arc::new(MemoryPlayerStore::with_players(players))),
        ClaimLedger::new(claims),
        AuditRecorder::new(audit.clone()),
    )
    .with_pacing(Pacing::none());
    Harness {
        orchestrator,
        vendor,
        audit,
    }
}

fn harness(vendor: ScriptedVendor, codes: Vec<GiftCode>, players: &[&str]) -> Harness {
    build(
        vendor,
        Arc::new(StaticSource(codes)),
        Arc::new(MemoryClaimStore::new()),
        players.iter().map(|id| player(id)).collect(),
    )
}

fn ids(raw: &[&str]) -> Vec<String> {
    raw.iter().map(ToString::to_string).collect()
}

/// Explicit players keep their given order; registry listings are newest first.
fn both_players() -> ClaimRequest {
    ClaimRequest {
        players: ids(&["12345678", "87654321"]),
        ..ClaimRequest::all_players()
    }
}

fn meta() -> RequestMeta {
    RequestMeta::new("127.0.0.1", "giftclaim-tests")
}

// ============================================================================
// Batch runs
// ============================================================================

#[tokio::test]
async fn test_second_run_skips_claimed_pairs() {
    let h = harness(
        ScriptedVendor::default(),
        vec![GiftCode::active("WINTER2025"), GiftCode::active("ABC123")],
        &["12345678", "87654321"],
    );

    let first = h
        .orchestrator
        .run_claim_batch(ClaimRequest::all_players(), &meta())
        .await
        .unwrap();
    assert_eq!(first.success_count(), 4);
    assert_eq!(first.skipped, 0);
    assert_eq!(first.total_codes, 2);

    let second = h
        .orchestrator
        .run_claim_batch(ClaimRequest::all_players(), &meta())
        .await
        .unwrap();
    assert_eq!(second.skipped, 4);
    assert!(second.results.is_empty());
    assert!(second.codes_claimed.is_empty());

    // No pair reached the vendor twice.
    let calls = h.vendor.redeem_calls();
    let unique: HashSet<_> = calls.iter().collect();
    assert_eq!(calls.len(), 4);
    assert_eq!(unique.len(), 4);
}

#[tokio::test]
async fn test_codes_outer_players_inner() {
    let h = harness(
        ScriptedVendor::default(),
        vec![GiftCode::active("FIRST1"), GiftCode::active("SECOND2")],
        &["12345678", "87654321"],
    );

    h.orchestrator
        .run_claim_batch(both_players(), &meta())
        .await
        .unwrap();

    let order: Vec<String> = h
        .vendor
        .redeem_calls()
        .into_iter()
        .map(|(p, c)| format!("{c}/{p}"))
        .collect();
    assert_eq!(
        order,
        vec![
            "FIRST1/12345678",
            "FIRST1/87654321",
            "SECOND2/12345678",
            "SECOND2/87654321"
        ]
    );
}

#[tokio::test]
async fn test_failure_of_one_pair_does_not_stop_others() {
    let vendor = ScriptedVendor::default().redeem_reply("12345678", "ABC123", Reply::Transport);
    let h = harness(vendor, vec![GiftCode::active("ABC123")], &["12345678", "87654321"]);

    let report = h
        .orchestrator
        .run_claim_batch(both_players(), &meta())
        .await
        .unwrap();

    assert_eq!(report.results.len(), 2);
    assert!(!report.results[0].success);
    assert!(report.results[0].error.as_deref().unwrap().contains("timed out"));
    assert!(report.results[1].success);
    assert_eq!(report.codes_claimed, vec!["ABC123"]);

    // The failed pair is retried on the next run, the claimed one is not.
    let ledger = h.orchestrator.ledger();
    assert!(!ledger.has_claimed(&PlayerId::parse("12345678").unwrap(), "ABC123").await.unwrap());
    assert!(ledger.has_claimed(&PlayerId::parse("87654321").unwrap(), "ABC123").await.unwrap());
}

#[tokio::test]
async fn test_login_failure_is_per_pair() {
    let vendor = ScriptedVendor::default().login_reply("10000001", Reply::Reject);
    let h = harness(vendor, vec![GiftCode::active("ABC123")], &[]);

    let request = ClaimRequest {
        players: ids(&["10000001", "10000002"]),
        codes: Some(ids(&["abc123"])),
        force: false,
    };
    let report = h.orchestrator.run_claim_batch(request, &meta()).await.unwrap();

    assert_eq!(report.codes_claimed, vec!["ABC123"]);
    assert_eq!(report.results.len(), 2);
    assert_eq!(report.results[0].error.as_deref(), Some(LOGIN_FAILED));
    assert!(report.results[1].success);

    // No redeem call for the player whose login failed.
    assert_eq!(
        h.vendor.redeem_calls(),
        vec![("10000002".to_string(), "ABC123".to_string())]
    );
}

#[tokio::test]
async fn test_rejection_diagnostic_is_reported() {
    let vendor = ScriptedVendor::default().redeem_reply("12345678", "OLD123", Reply::Reject);
    let h = harness(vendor, vec![GiftCode::active("OLD123")], &["12345678"]);

    let report = h
        .orchestrator
        .run_claim_batch(ClaimRequest::all_players(), &meta())
        .await
        .unwrap();

    assert_eq!(report.failure_count(), 1);
    assert_eq!(report.results[0].error.as_deref(), Some("Code expired"));
    assert!(report.codes_claimed.is_empty());
}

#[tokio::test]
async fn test_force_reattempts_claimed_pairs() {
    let h = harness(
        ScriptedVendor::default(),
        vec![GiftCode::active("ABC123")],
        &["12345678"],
    );

    h.orchestrator
        .run_claim_batch(ClaimRequest::all_players(), &meta())
        .await
        .unwrap();
    let forced = h
        .orchestrator
        .run_claim_batch(
            ClaimRequest {
                force: true,
                ..ClaimRequest::all_players()
            },
            &meta(),
        )
        .await
        .unwrap();

    assert_eq!(forced.skipped, 0);
    assert_eq!(forced.success_count(), 1);
    assert_eq!(h.vendor.redeem_calls().len(), 2);
}

#[tokio::test]
async fn test_only_active_codes_are_attempted() {
    let h = harness(
        ScriptedVendor::default(),
        vec![GiftCode::active("LIVE2025"), GiftCode::expired("GONE2024")],
        &["12345678"],
    );

    let report = h
        .orchestrator
        .run_claim_batch(ClaimRequest::all_players(), &meta())
        .await
        .unwrap();

    assert_eq!(report.total_codes, 1);
    assert_eq!(report.codes_claimed, vec!["LIVE2025"]);
}

#[tokio::test]
async fn test_no_active_codes_is_an_empty_run() {
    let h = harness(ScriptedVendor::default(), Vec::new(), &["12345678"]);

    let report = h
        .orchestrator
        .run_claim_batch(ClaimRequest::all_players(), &meta())
        .await
        .unwrap();

    assert_eq!(report.total_codes, 0);
    assert!(report.results.is_empty());
}

#[tokio::test]
async fn test_extraction_failure_aborts_run() {
    let h = build(
        ScriptedVendor::default(),
        Arc::new(FailingSource),
        Arc::new(MemoryClaimStore::new()),
        vec![player("12345678")],
    );

    let err = h
        .orchestrator
        .run_claim_batch(ClaimRequest::all_players(), &meta())
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::Extraction(FetchError::Status(503))));
    assert!(h.vendor.redeem_calls().is_empty());
}

#[tokio::test]
async fn test_ledger_failure_aborts_run() {
    let h = build(
        ScriptedVendor::default(),
        Arc::new(StaticSource(vec![
            GiftCode::active("ABC123"),
            GiftCode::active("DEF456"),
        ])),
        Arc::new(BrokenClaimStore),
        vec![player("12345678")],
    );

    let err = h
        .orchestrator
        .run_claim_batch(ClaimRequest::all_players(), &meta())
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::Store(_)));
    // Stopped after the first pair whose success could not be recorded.
    assert_eq!(h.vendor.redeem_calls().len(), 1);

    // The vendor-side claim is still on the audit trail; no run summary.
    let events = h.audit.recent(None).await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].action, AuditAction::SingleCodeClaimed);
    assert_eq!(events[0].detail("giftCode").unwrap(), "ABC123");
    assert_eq!(events[0].detail("success").unwrap(), true);
}

#[tokio::test]
async fn test_empty_roster_is_an_empty_run() {
    let h = harness(ScriptedVendor::default(), vec![GiftCode::active("ABC123")], &[]);

    let report = h
        .orchestrator
        .run_claim_batch(ClaimRequest::all_players(), &meta())
        .await
        .unwrap();

    assert!(report.results.is_empty());
    assert!(report.codes_claimed.is_empty());
    assert!(h.vendor.redeem_calls().is_empty());

    let events = h.audit.recent(None).await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].action, AuditAction::AutoClaim);
}

#[tokio::test]
async fn test_batch_validation() {
    let h = harness(ScriptedVendor::default(), vec![GiftCode::active("ABC123")], &[]);

    let err = h
        .orchestrator
        .run_claim_batch(
            ClaimRequest {
                players: ids(&["12345678"]),
                codes: Some(Vec::new()),
                force: false,
            },
            &meta(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NoCodes));

    let err = h
        .orchestrator
        .run_claim_batch(
            ClaimRequest {
                players: ids(&["1234"]),
                codes: None,
                force: false,
            },
            &meta(),
        )
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert!(h.vendor.redeem_calls().is_empty());
}

#[tokio::test]
async fn test_success_updates_player_counters() {
    let h = harness(
        ScriptedVendor::default(),
        vec![GiftCode::active("ABC123"), GiftCode::active("DEF456")],
        &["12345678"],
    );

    h.orchestrator
        .run_claim_batch(ClaimRequest::all_players(), &meta())
        .await
        .unwrap();

    let id = PlayerId::parse("12345678").unwrap();
    let stored = h.orchestrator.registry().get(&id).await.unwrap().unwrap();
    assert_eq!(stored.total_claims, 2);
    assert!(stored.last_claimed.is_some());
}

#[tokio::test]
async fn test_batch_audit_trail() {
    let vendor = ScriptedVendor::default().redeem_reply("87654321", "ABC123", Reply::Reject);
    let h = harness(vendor, vec![GiftCode::active("ABC123")], &["12345678", "87654321"]);

    h.orchestrator
        .run_claim_batch(both_players(), &meta())
        .await
        .unwrap();

    let events = h.orchestrator.audit().recent(None).await.unwrap();
    assert_eq!(events.len(), 3);
    // Newest first: the run summary, then both pair outcomes.
    assert_eq!(events[0].action, AuditAction::AutoClaim);
    assert_eq!(events[0].detail("totalCodes").unwrap(), 1);
    assert_eq!(events[1].action, AuditAction::SingleCodeClaimed);
    assert_eq!(events[1].detail("success").unwrap(), false);
    assert_eq!(events[2].detail("playerId").unwrap(), "12345678");
    assert_eq!(events[2].ip, "127.0.0.1");
    assert_eq!(h.audit.recent(Some(1)).await.unwrap().len(), 1);
}

// ============================================================================
// Single player and direct redemption
// ============================================================================

#[tokio::test]
async fn test_claim_for_player_requires_registration() {
    let h = harness(
        ScriptedVendor::default(),
        vec![GiftCode::active("ABC123")],
        &["12345678"],
    );

    let err = h
        .orchestrator
        .claim_for_player("87654321", &meta())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::PlayerNotFound(_)));
    assert!(err.is_not_found());

    let report = h
        .orchestrator
        .claim_for_player(" 12345678 ", &meta())
        .await
        .unwrap();
    assert_eq!(report.codes_claimed, vec!["ABC123"]);
}

#[tokio::test]
async fn test_redeem_code_ignores_ledger() {
    let h = harness(
        ScriptedVendor::default(),
        vec![GiftCode::active("ABC123")],
        &["12345678"],
    );
    let players = ids(&["12345678", "99999999"]);

    let first = h.orchestrator.redeem_code("abc123", &players, &meta()).await.unwrap();
    let second = h.orchestrator.redeem_code("ABC123", &players, &meta()).await.unwrap();

    assert_eq!(first.success_count(), 2);
    assert_eq!(second.success_count(), 2);
    assert_eq!(h.vendor.redeem_calls().len(), 4);

    // Unregistered players are still recorded in the ledger.
    let ledger = h.orchestrator.ledger();
    assert!(ledger.has_claimed(&PlayerId::parse("99999999").unwrap(), "ABC123").await.unwrap());

    let events = h.audit.recent(Some(1)).await.unwrap();
    assert_eq!(events[0].action, AuditAction::CodeRedeemed);
    assert_eq!(events[0].detail("totalPlayers").unwrap(), 2);
}

#[tokio::test]
async fn test_redeem_code_player_cap() {
    let h = harness(ScriptedVendor::default(), Vec::new(), &[]);
    let players: Vec<String> = (0..=MAX_REDEEM_PLAYERS)
        .map(|i| format!("{}", 10_000_000 + i))
        .collect();

    let err = h
        .orchestrator
        .redeem_code("ABC123", &players, &meta())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::TooManyPlayers { count: 101, max: 100 }));

    let err = h.orchestrator.redeem_code("ABC123", &[], &meta()).await.unwrap_err();
    assert!(matches!(err, EngineError::NoPlayers));

    let err = h
        .orchestrator
        .redeem_code("AB", &ids(&["12345678"]), &meta())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
    assert!(h.vendor.redeem_calls().is_empty());
}

// ============================================================================
// Enrollment
// ============================================================================

fn enrollment(vendor: ScriptedVendor) -> (Enrollment, PlayerRegistry, Arc<MemoryAuditSink>) {
    let store = Arc::new(MemoryPlayerStore::new());
    let audit = Arc::new(MemoryAuditSink::new());
    let enrollment = Enrollment::new(
        Arc::new(vendor),
        PlayerRegistry::new(store.clone()),
        AuditRecorder::new(audit.clone()),
    );
    (enrollment, PlayerRegistry::new(store), audit)
}

#[tokio::test]
async fn test_add_player_verifies_with_vendor() {
    let (enrollment, registry, audit) = enrollment(ScriptedVendor::default());

    let added = enrollment.add_player("12345678", &meta()).await.unwrap();
    assert!(added.verified);
    assert_eq!(
        added.verification_data.as_ref().unwrap()["data"]["nickname"],
        "tester"
    );
    assert!(registry.exists(&added.id).await.unwrap());

    let err = enrollment.add_player("12345678", &meta()).await.unwrap_err();
    assert!(matches!(err, EngineError::Store(StoreError::PlayerExists(_))));
    assert!(err.is_validation());

    let events = audit.recent(None).await.unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].action, AuditAction::PlayerAdded);
    assert_eq!(events[0].detail("success").unwrap(), false);
    assert_eq!(events[1].detail("success").unwrap(), true);
}

#[tokio::test]
async fn test_add_player_rejected_by_vendor() {
    let vendor = ScriptedVendor::default()
        .login_reply("11111111", Reply::Reject)
        .login_reply("22222222", Reply::Transport);
    let (enrollment, registry, _audit) = enrollment(vendor);

    let err = enrollment.add_player("11111111", &meta()).await.unwrap_err();
    assert!(matches!(err, EngineError::VerificationFailed(_)));

    let err = enrollment.add_player("22222222", &meta()).await.unwrap_err();
    assert!(matches!(err, EngineError::Vendor(_)));

    assert!(registry.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_remove_player() {
    let (enrollment, registry, audit) = enrollment(ScriptedVendor::default());
    enrollment.add_player("12345678", &meta()).await.unwrap();

    enrollment.remove_player("12345678", &meta()).await.unwrap();
    assert!(registry.list().await.unwrap().is_empty());

    let err = enrollment.remove_player("12345678", &meta()).await.unwrap_err();
    assert!(err.is_not_found());

    let events = audit.recent(Some(2)).await.unwrap();
    assert_eq!(events[0].action, AuditAction::PlayerRemoved);
    assert_eq!(events[0].detail("success").unwrap(), false);
    assert_eq!(events[1].detail("success").unwrap(), true);
}

// ============================================================================
// File-backed stores
// ============================================================================

#[tokio::test]
async fn test_ledger_survives_restart() {
    let dir = TempDir::new().unwrap();
    let codes = vec![GiftCode::active("WINTER2025")];

    let orchestrator = |vendor: Arc<ScriptedVendor>| {
        ClaimOrchestrator::new(
            Arc::new(StaticSource(codes.clone())),
            vendor,
            PlayerRegistry::new(Arc::new(JsonPlayerStore::in_dir(dir.path()))),
            ClaimLedger::new(Arc::new(JsonClaimStore::in_dir(dir.path()))),
            AuditRecorder::new(Arc::new(JsonAuditSink::in_dir(dir.path()))),
        )
        .with_pacing(Pacing::none())
    };

    let registry = PlayerRegistry::new(Arc::new(JsonPlayerStore::in_dir(dir.path())));
    registry.add(player("12345678")).await.unwrap();

    let first_vendor = Arc::new(ScriptedVendor::default());
    let first = orchestrator(first_vendor.clone())
        .run_claim_batch(ClaimRequest::all_players(), &meta())
        .await
        .unwrap();
    assert_eq!(first.success_count(), 1);

    let second_vendor = Arc::new(ScriptedVendor::default());
    let second = orchestrator(second_vendor.clone())
        .run_claim_batch(ClaimRequest::all_players(), &meta())
        .await
        .unwrap();
    assert_eq!(second.skipped, 1);
    assert!(second_vendor.redeem_calls().is_empty());
}
