//! Kingshot integration.
//!
//! Codes are listed on `kingshot.net` and redeemed through the Century Game
//! gift code API.

mod listing;
pub(crate) mod parser;
mod rules;
mod strategies;
mod vendor;

pub use listing::{KINGSHOT_LISTING_URL, KingshotListing, kingshot_pipeline};
pub use rules::{
    MessageKeywordRule, RawBodyRule, StatusFieldRule, SuccessCodeRule, SuccessFlagRule,
    default_rules,
};
pub use strategies::{BroadScanStrategy, SectionStrategy, StructuredStrategy};
pub use vendor::{CENTURYGAME_API_BASE, CenturyGameClient};
