//! Code source trait.
//!
//! A code source fetches a listing payload and runs it through an
//! extraction pipeline. Transport failures surface as [`FetchError`] so the
//! caller decides whether a failed fetch means "zero codes" or a hard stop.

use async_trait::async_trait;

use crate::error::FetchError;
use crate::pipeline::ExtractOutcome;

/// Something that can produce the current set of gift codes.
#[async_trait]
pub trait CodeSource: Send + Sync {
    /// Identifier used in logs (e.g., "kingshot.listing").
    fn id(&self) -> &str;

    /// Fetches and extracts the current codes.
    async fn fetch_codes(&self) -> Result<ExtractOutcome, FetchError>;
}
