//! Domain models for giftclaim.
//!
//! ## Submodules
//!
//! - [`code`] - Gift codes and extraction results
//! - [`player`] - Player identity and registry records
//! - [`claim`] - Per-pair results and run reports
//! - [`audit`] - Audit trail events

mod audit;
mod claim;
mod code;
mod player;

pub use audit::{AuditAction, AuditEvent, RequestMeta, UNKNOWN};
pub use claim::{ClaimReport, CodeClaims, LOGIN_FAILED, PairResult};
pub use code::{
    CodeSet, CodeStatus, GiftCode, MAX_CODE_LEN, MIN_CODE_LEN, normalize_code, parse_code,
};
pub use player::{Player, PlayerId, PlayerStats, PlayerUpdate};
