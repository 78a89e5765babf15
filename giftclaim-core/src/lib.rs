// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # giftclaim Core
//!
//! Core types, models, and traits shared by every giftclaim crate.
//!
//! - Domain models (gift codes, players, claim results, audit events)
//! - Error types
//! - Collaborator traits for persistence backends
//!
//! ## Key Types
//!
//! ### Codes
//! - [`GiftCode`] - One extracted code with its status and expiration
//! - [`CodeSet`] - De-duplicated active/expired split of one extraction
//!
//! ### Players
//! - [`PlayerId`] - Normalized 8-10 digit identifier
//! - [`Player`] - Registry record with claim counters
//! - [`PlayerUpdate`] - Partial update
//!
//! ### Claims & Audit
//! - [`PairResult`] / [`ClaimReport`] - Orchestration output
//! - [`AuditEvent`] / [`AuditAction`] - Audit trail records
//!
//! ### Traits
//! - [`PlayerStore`], [`ClaimStore`], [`AuditSink`]

pub mod error;
pub mod models;
pub mod traits;

// Re-export error types
pub use error::CoreError;

// Re-export all model types
pub use models::{
    // Codes
    CodeSet,
    CodeStatus,
    GiftCode,
    MAX_CODE_LEN,
    MIN_CODE_LEN,
    normalize_code,
    parse_code,
    // Players
    Player,
    PlayerId,
    PlayerStats,
    PlayerUpdate,
    // Claims
    ClaimReport,
    CodeClaims,
    LOGIN_FAILED,
    PairResult,
    // Audit
    AuditAction,
    AuditEvent,
    RequestMeta,
    UNKNOWN,
};

// Re-export traits
pub use traits::{AuditSink, ClaimStore, PlayerStore};
