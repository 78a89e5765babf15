// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Giftclaim Providers
//!
//! Concrete integrations for giftclaim.
//!
//! Each integration module includes:
//!
//! - **Listing**: Page fetch plus the extraction strategies for its markup
//! - **Vendor**: The redemption API client
//! - **Rules**: Redemption success rules for that API's responses
//!
//! ## Supported Integrations
//!
//! | Game | Listing | Vendor API |
//! |------|---------|------------|
//! | Kingshot | kingshot.net | Century Game gift code API |
//!
//! ## Usage
//!
//! ```ignore
//! use giftclaim_fetch::{CodeSource, HttpClient};
//! use giftclaim_providers::kingshot::{CenturyGameClient, KingshotListing};
//!
//! let http = HttpClient::new()?;
//! let listing = KingshotListing::new(http.clone());
//! let vendor = CenturyGameClient::new(http);
//!
//! let outcome = listing.fetch_codes().await?;
//! ```

pub mod kingshot;

// Re-export key types
pub use kingshot::{
    BroadScanStrategy, CENTURYGAME_API_BASE, CenturyGameClient, KINGSHOT_LISTING_URL,
    KingshotListing, SectionStrategy, StructuredStrategy, default_rules, kingshot_pipeline,
};

#[cfg(test)]
mod parser_edge_tests;
