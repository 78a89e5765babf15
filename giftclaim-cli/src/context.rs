//! Wiring of settings, stores and services for one CLI invocation.

use anyhow::{Context, Result};
use giftclaim_core::RequestMeta;
use giftclaim_engine::{AuditRecorder, ClaimOrchestrator, Enrollment, Pacing};
use giftclaim_fetch::HttpClient;
use giftclaim_providers::{CenturyGameClient, KingshotListing};
use giftclaim_store::{
    ClaimLedger, JsonAuditSink, JsonClaimStore, JsonPlayerStore, PlayerRegistry, Settings,
    ensure_dir,
};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Services built from the loaded settings.
pub struct AppContext {
    /// Effective settings.
    pub settings: Settings,
    /// Claim runs, discovery, ledger and audit access.
    pub orchestrator: ClaimOrchestrator,
    /// Player registration.
    pub enrollment: Enrollment,
}

impl AppContext {
    /// Loads settings and opens the stores in the data directory.
    pub async fn load(config: Option<&Path>) -> Result<Self> {
        let path = Settings::resolve_path(config);
        let settings = Settings::load(&path).await;
        settings
            .validate()
            .with_context(|| format!("Invalid settings in {}", path.display()))?;

        let data_dir = settings.data_dir();
        ensure_dir(&data_dir).await?;
        debug!(data_dir = %data_dir.display(), "Using data directory");

        let http = HttpClient::with_timeout(settings.request_timeout())?
            .with_allowed_domains(settings.allowed_hosts());
        let source = Arc::new(KingshotListing::with_url(http.clone(), &settings.listing_url));
        let vendor = Arc::new(CenturyGameClient::with_base_url(http, &settings.vendor_base_url));

        let registry = PlayerRegistry::new(Arc::new(JsonPlayerStore::in_dir(&data_dir)));
        let ledger = ClaimLedger::new(Arc::new(JsonClaimStore::in_dir(&data_dir)));
        let audit = AuditRecorder::new(Arc::new(
            JsonAuditSink::in_dir(&data_dir).with_retention(settings.audit_retention),
        ));

        let enrollment = Enrollment::new(vendor.clone(), registry.clone(), audit.clone());
        let orchestrator = ClaimOrchestrator::new(source, vendor, registry, ledger, audit)
            .with_pacing(Pacing::new(
                settings.pre_redeem_delay(),
                settings.post_attempt_delay(),
            ));

        Ok(Self {
            settings,
            orchestrator,
            enrollment,
        })
    }

    /// Request metadata for audit events written by this process.
    pub fn meta() -> RequestMeta {
        RequestMeta::new("local", concat!("giftclaim-cli/", env!("CARGO_PKG_VERSION")))
    }
}
