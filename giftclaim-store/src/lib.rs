// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Giftclaim Store
//!
//! Long-lived state for giftclaim.
//!
//! This crate provides:
//!
//! - **PlayerRegistry**: Registered players with uniqueness rules
//! - **ClaimLedger**: Append-only record of claimed (player, code) pairs
//! - **JSON / memory backends**: Implementations of the core store traits
//! - **Settings**: User preferences with persistence
//! - **Persistence**: File I/O helpers for JSON data
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use giftclaim_store::{ClaimLedger, JsonClaimStore, JsonPlayerStore, PlayerRegistry, Settings};
//!
//! let settings = Settings::load(&Settings::resolve_path(None)).await;
//! let dir = settings.data_dir();
//!
//! let registry = PlayerRegistry::new(Arc::new(JsonPlayerStore::in_dir(&dir)));
//! let ledger = ClaimLedger::new(Arc::new(JsonClaimStore::in_dir(&dir)));
//!
//! if !ledger.has_claimed(&player, "WINTER2025").await? {
//!     // redeem...
//! }
//! ```

pub mod error;
pub mod json_store;
pub mod ledger;
pub mod memory;
pub mod persistence;
pub mod registry;
pub mod settings;

pub use error::StoreError;
pub use json_store::{
    AUDIT_FILE, CLAIMS_FILE, DEFAULT_AUDIT_RETENTION, JsonAuditSink, JsonClaimStore,
    JsonPlayerStore, PLAYERS_FILE,
};
pub use ledger::ClaimLedger;
pub use memory::{MemoryAuditSink, MemoryClaimStore, MemoryPlayerStore};
pub use persistence::{
    default_config_dir, default_data_dir, default_settings_path, ensure_dir, load_json,
    load_json_if_exists, load_json_or_default, save_json,
};
pub use registry::PlayerRegistry;
pub use settings::{
    CONFIG_ENV, DATA_DIR_ENV, DEFAULT_LISTING_URL, DEFAULT_VENDOR_BASE_URL, LogLevel, Settings,
};
