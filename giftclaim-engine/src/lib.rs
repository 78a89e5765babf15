// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Giftclaim Engine
//!
//! Claim orchestration for giftclaim.
//!
//! This crate provides:
//!
//! - **ClaimOrchestrator**: Batch, per-player and direct redemption runs
//! - **Enrollment**: Vendor-verified player registration
//! - **AuditRecorder**: Fire-and-forget audit trail
//! - **Pacing**: Delays between vendor calls
//!
//! ## Usage
//!
//! ```ignore
//! use giftclaim_engine::{ClaimOrchestrator, ClaimRequest};
//!
//! let orchestrator = ClaimOrchestrator::new(source, vendor, registry, ledger, audit);
//! let report = orchestrator
//!     .run_claim_batch(ClaimRequest::all_players(), &RequestMeta::default())
//!     .await?;
//!
//! println!("{} claimed, {} skipped", report.success_count(), report.skipped);
//! ```

pub mod audit;
pub mod enrollment;
pub mod error;
pub mod orchestrator;
pub mod pacing;

pub use audit::AuditRecorder;
pub use enrollment::Enrollment;
pub use error::EngineError;
pub use orchestrator::{ClaimOrchestrator, ClaimRequest, MAX_REDEEM_PLAYERS};
pub use pacing::Pacing;
