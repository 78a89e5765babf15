//! HTTP client with tracing, timeouts, and domain allowlist.
//!
//! This module provides a wrapped HTTP client that adds:
//! - Request/response tracing
//! - A fixed per-request timeout
//! - Domain allowlist for security
//! - Body capture so callers can classify non-JSON answers

use reqwest::{Client, header::HeaderMap};
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use crate::error::HttpError;

/// Default request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// User agent string for giftclaim.
const USER_AGENT: &str = concat!("giftclaim/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// HTTP Response
// ============================================================================

/// Status and raw body of a completed request.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

impl HttpResponse {
    /// Returns true for 200 OK.
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// Parses the body as JSON.
    pub fn json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

// ============================================================================
// HTTP Client
// ============================================================================

/// HTTP client wrapper with tracing, timeouts, and domain allowlist.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
    timeout: Duration,
    allowed_domains: Option<Vec<String>>,
}

impl HttpClient {
    /// Creates a new HTTP client with default settings.
    pub fn new() -> Result<Self, HttpError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a new HTTP client with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, HttpError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            inner: client,
            timeout,
            allowed_domains: None,
        })
    }

    /// Restricts requests to the given domains and their subdomains.
    pub fn with_allowed_domains(mut self, domains: Vec<String>) -> Self {
        self.allowed_domains = Some(domains);
        self
    }

    /// Returns the per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Checks if a URL's domain is allowed.
    fn is_domain_allowed(&self, url: &str) -> Result<(), HttpError> {
        let parsed = Url::parse(url).map_err(|e| HttpError::InvalidUrl(e.to_string()))?;

        let Some(ref allowed) = self.allowed_domains else {
            return Ok(()); // No restrictions
        };

        let host = parsed
            .host_str()
            .ok_or_else(|| HttpError::InvalidUrl("No host in URL".to_string()))?;

        let allowed = allowed
            .iter()
            .any(|domain| host == domain || host.ends_with(&format!(".{domain}")));

        if allowed {
            Ok(())
        } else {
            Err(HttpError::DomainNotAllowed(host.to_string()))
        }
    }

    /// Performs a GET request with custom headers and reads the body.
    #[instrument(skip(self, headers), fields(url = %url))]
    pub async fn get_text(&self, url: &str, headers: HeaderMap) -> Result<HttpResponse, HttpError> {
        self.is_domain_allowed(url)?;
        debug!("GET request");

        let response = self.inner.get(url).headers(headers).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!(status, len = body.len(), "Response received");
        Ok(HttpResponse { status, body })
    }

    /// Performs a POST request with a JSON body and reads the response body.
    #[instrument(skip(self, headers, body), fields(url = %url))]
    pub async fn post_json<T: serde::Serialize + ?Sized>(
        &self,
        url: &str,
        headers: HeaderMap,
        body: &T,
    ) -> Result<HttpResponse, HttpError> {
        self.is_domain_allowed(url)?;
        debug!("POST request with JSON");

        let response = self.inner.post(url).headers(headers).json(body).send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        debug!(status, len = text.len(), "Response received");
        Ok(HttpResponse { status, body: text })
    }
}

// ============================================================================
// Tests
// ============================================================================
