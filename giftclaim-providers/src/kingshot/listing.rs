//! Kingshot gift code listing page.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use giftclaim_fetch::{CodeSource, ExtractOutcome, ExtractPipeline, FetchError, HttpClient};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use tracing::{debug, instrument, warn};

use super::strategies::{BroadScanStrategy, SectionStrategy, StructuredStrategy};

// ============================================================================
// Constants
// ============================================================================

/// Listing page URL.
pub const KINGSHOT_LISTING_URL: &str = "https://kingshot.net/gift-codes";

/// The site serves a reduced page to non-browser agents.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Builds the extraction chain in its canonical order.
pub fn kingshot_pipeline() -> ExtractPipeline {
    ExtractPipeline::with_strategies(vec![
        Box::new(StructuredStrategy::new()),
        Box::new(SectionStrategy::new()),
        Box::new(BroadScanStrategy::new()),
    ])
}

// ============================================================================
// Listing Client
// ============================================================================

/// Fetches the listing page and extracts its codes.
pub struct KingshotListing {
    http: HttpClient,
    url: String,
    pipeline: ExtractPipeline,
}

impl KingshotListing {
    /// Creates a listing client for the public page.
    pub fn new(http: HttpClient) -> Self {
        Self::with_url(http, KINGSHOT_LISTING_URL)
    }

    /// Creates a listing client for a custom URL.
    pub fn with_url(http: HttpClient, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
            pipeline: kingshot_pipeline(),
        }
    }

    /// Replaces the extraction chain.
    pub fn with_pipeline(mut self, pipeline: ExtractPipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    /// Returns the listing URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Runs extraction over an already fetched payload.
    pub fn extract(&self, payload: &str, now: DateTime<Utc>) -> ExtractOutcome {
        self.pipeline.execute(payload, now)
    }

    fn headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
        headers
    }
}

#[async_trait]
impl CodeSource for KingshotListing {
    fn id(&self) -> &str {
        "kingshot.listing"
    }

    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch_codes(&self) -> Result<ExtractOutcome, FetchError> {
        let response = self
            .http
            .get_text(&self.url, Self::headers())
            .await
            .map_err(|e| FetchError::from_http(e, self.http.timeout().as_secs()))?;

        if !response.is_ok() {
            warn!(status = response.status, "Listing page returned an error");
            return Err(FetchError::Status(response.status));
        }

        debug!(len = response.body.len(), "Listing page fetched");
        Ok(self.extract(&response.body, Utc::now()))
    }
}
