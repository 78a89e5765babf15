//! Player enrollment.
//!
//! A player is only registered after the vendor confirms the id with a
//! successful login. The login payload is kept as verification data.

use giftclaim_core::{Player, PlayerId, RequestMeta};
use giftclaim_fetch::VendorApi;
use giftclaim_store::{PlayerRegistry, StoreError};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::audit::AuditRecorder;
use crate::error::EngineError;

/// Adds and removes registered players.
pub struct Enrollment {
    vendor: Arc<dyn VendorApi>,
    registry: PlayerRegistry,
    audit: AuditRecorder,
}

impl Enrollment {
    /// Creates the enrollment service.
    pub fn new(vendor: Arc<dyn VendorApi>, registry: PlayerRegistry, audit: AuditRecorder) -> Self {
        Self {
            vendor,
            registry,
            audit,
        }
    }

    /// Verifies a player with the vendor and registers them.
    ///
    /// # Errors
    ///
    /// - [`EngineError::Validation`] for a malformed id.
    /// - [`EngineError::Store`] with [`StoreError::PlayerExists`] for a
    ///   duplicate, checked before any vendor call.
    /// - [`EngineError::VerificationFailed`] if the vendor rejects the id.
    /// - [`EngineError::Vendor`] if the login request itself fails.
    #[instrument(skip(self, meta))]
    pub async fn add_player(&self, player: &str, meta: &RequestMeta) -> Result<Player, EngineError> {
        let id = PlayerId::parse(player)?;

        if self.registry.exists(&id).await? {
            self.audit.player_added(meta, &id, false).await;
            return Err(StoreError::PlayerExists(id.to_string()).into());
        }

        let login = match self.vendor.login(&id).await {
            Ok(login) => login,
            Err(e) => {
                warn!(player = %id, error = %e, "Verification request failed");
                self.audit.player_added(meta, &id, false).await;
                return Err(EngineError::Vendor(e));
            }
        };
        if !login.success {
            warn!(player = %id, status = login.status, "Vendor rejected player");
            self.audit.player_added(meta, &id, false).await;
            return Err(EngineError::VerificationFailed(id.to_string()));
        }

        let record = Player::new(id.clone()).verified_with(Some(login.raw));
        if let Err(e) = self.registry.add(record.clone()).await {
            self.audit.player_added(meta, &id, false).await;
            return Err(e.into());
        }

        info!(player = %id, "Player registered");
        self.audit.player_added(meta, &id, true).await;
        Ok(record)
    }

    /// Unregisters a player. Claim history stays in the ledger.
    ///
    /// # Errors
    ///
    /// [`StoreError::PlayerNotFound`] if the player is not registered.
    #[instrument(skip(self, meta))]
    pub async fn remove_player(&self, player: &str, meta: &RequestMeta) -> Result<(), EngineError> {
        let id = PlayerId::parse(player)?;
        match self.registry.remove(&id).await {
            Ok(()) => {
                info!(player = %id, "Player removed");
                self.audit.player_removed(meta, &id, true).await;
                Ok(())
            }
            Err(e) => {
                self.audit.player_removed(meta, &id, false).await;
                Err(e.into())
            }
        }
    }
}
