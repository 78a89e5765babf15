// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Giftclaim Fetch
//!
//! Network seams for giftclaim.
//!
//! ## Host APIs
//!
//! - [`host::http`] - HTTP client with timeouts, tracing and domain allowlist
//!
//! ## Extraction Pipeline
//!
//! The pipeline runs extraction strategies in order until one finds codes:
//!
//! - [`strategy::ExtractStrategy`] - Trait for extraction implementations
//! - [`pipeline::ExtractPipeline`] - Executes strategies in order
//! - [`source::CodeSource`] - Fetches a listing and extracts it
//!
//! ## Vendor API
//!
//! - [`vendor::VendorApi`] - Login and redeem calls
//! - [`vendor::RuleChain`] - Tagged redemption success rules
//!
//! ## Example
//!
//! ```ignore
//! use giftclaim_fetch::ExtractPipeline;
//!
//! let pipeline = ExtractPipeline::with_strategies(vec![
//!     Box::new(StructuredStrategy::new()),
//!     Box::new(SectionStrategy::new()),
//! ]);
//!
//! let outcome = pipeline.execute(&payload, chrono::Utc::now());
//! ```

pub mod error;
pub mod host;
pub mod pipeline;
pub mod source;
pub mod strategy;
pub mod vendor;

// Errors
pub use error::{FetchError, HttpError};

// Host APIs
pub use host::http::{DEFAULT_TIMEOUT_SECS, HttpClient, HttpResponse};

// Strategy & Pipeline
pub use pipeline::{ExtractAttempt, ExtractOutcome, ExtractPipeline};
pub use source::CodeSource;
pub use strategy::{ExtractKind, ExtractStrategy, StrategyInfo};

// Vendor
pub use vendor::{
    DEFAULT_FAILURE_MESSAGE, INVALID_JSON_MESSAGE, LoginOutcome, RedeemOutcome, RedeemRule,
    RuleChain, VendorApi, VendorReply,
};
