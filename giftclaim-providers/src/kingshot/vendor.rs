//! Century Game gift code API client.
//!
//! Two endpoints, both POST with a JSON body:
//!
//! - `/player` `{player_id}` - player lookup, required before redeeming
//! - `/gift_code` `{player_id, gift_code}` - redemption
//!
//! The API checks the Origin and Referer of the official redemption page.

use async_trait::async_trait;
use giftclaim_core::PlayerId;
use giftclaim_fetch::{
    FetchError, HttpClient, LoginOutcome, RedeemOutcome, RuleChain, VendorApi,
};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, ORIGIN, REFERER, USER_AGENT};
use serde::Serialize;
use tracing::{debug, instrument};

use super::rules::default_rules;

// ============================================================================
// Constants
// ============================================================================

/// API base URL.
pub const CENTURYGAME_API_BASE: &str = "https://kingshot-giftcode.centurygame.com/api";

const PLAYER_ENDPOINT: &str = "/player";

const GIFT_CODE_ENDPOINT: &str = "/gift_code";

const REDEEM_PAGE_ORIGIN: &str = "https://ks-giftcode.centurygame.com";

const REDEEM_PAGE_REFERER: &str = "https://ks-giftcode.centurygame.com/";

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

// ============================================================================
// Request Bodies
// ============================================================================

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    player_id: &'a str,
}

#[derive(Debug, Serialize)]
struct RedeemRequest<'a> {
    player_id: &'a str,
    gift_code: &'a str,
}

// ============================================================================
// Client
// ============================================================================

/// Vendor API client.
pub struct CenturyGameClient {
    http: HttpClient,
    base_url: String,
    rules: RuleChain,
}

impl CenturyGameClient {
    /// Creates a client for the public API.
    pub fn new(http: HttpClient) -> Self {
        Self::with_base_url(http, CENTURYGAME_API_BASE)
    }

    /// Creates a client for a custom base URL.
    pub fn with_base_url(http: HttpClient, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            rules: default_rules(),
        }
    }

    /// Replaces the redemption success rules.
    pub fn with_rules(mut self, rules: RuleChain) -> Self {
        self.rules = rules;
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(ORIGIN, HeaderValue::from_static(REDEEM_PAGE_ORIGIN));
        headers.insert(REFERER, HeaderValue::from_static(REDEEM_PAGE_REFERER));
        headers
    }

    fn transport_error(&self, err: giftclaim_fetch::HttpError) -> FetchError {
        FetchError::from_http(err, self.http.timeout().as_secs())
    }
}

#[async_trait]
impl VendorApi for CenturyGameClient {
    #[instrument(skip(self), fields(player = %player))]
    async fn login(&self, player: &PlayerId) -> Result<LoginOutcome, FetchError> {
        let body = LoginRequest {
            player_id: player.as_str(),
        };
        let response = self
            .http
            .post_json(&self.endpoint(PLAYER_ENDPOINT), Self::headers(), &body)
            .await
            .map_err(|e| self.transport_error(e))?;

        let outcome = LoginOutcome::from_response(response.status, &response.body);
        debug!(status = outcome.status, success = outcome.success, "Player lookup");
        Ok(outcome)
    }

    #[instrument(skip(self), fields(player = %player, code = %code))]
    async fn redeem(&self, player: &PlayerId, code: &str) -> Result<RedeemOutcome, FetchError> {
        let body = RedeemRequest {
            player_id: player.as_str(),
            gift_code: code,
        };
        let response = self
            .http
            .post_json(&self.endpoint(GIFT_CODE_ENDPOINT), Self::headers(), &body)
            .await
            .map_err(|e| self.transport_error(e))?;

        let outcome = self.rules.classify(response.status, &response.body);
        debug!(
            status = outcome.status,
            success = outcome.success,
            rule = outcome.rule.unwrap_or("none"),
            "Redemption answered"
        );
        Ok(outcome)
    }
}
