//! Vendor API seam and redemption success rules.
//!
//! The vendor's redemption endpoint is undocumented and its response schema
//! is inconsistent. Success is decided by an ordered [`RuleChain`] of tagged
//! [`RedeemRule`]s; the first rule that matches names the outcome.

use async_trait::async_trait;
use giftclaim_core::PlayerId;
use serde::Serialize;
use serde_json::Value;

use crate::error::FetchError;

/// Diagnostic used when the vendor gives no message.
pub const DEFAULT_FAILURE_MESSAGE: &str = "Redemption failed";

/// Diagnostic used when the vendor body is not JSON.
pub const INVALID_JSON_MESSAGE: &str = "Invalid JSON response";

// ============================================================================
// Vendor API Trait
// ============================================================================

/// The two vendor calls the claim flow needs.
#[async_trait]
pub trait VendorApi: Send + Sync {
    /// Looks the player up, establishing the session the vendor requires.
    async fn login(&self, player: &PlayerId) -> Result<LoginOutcome, FetchError>;

    /// Submits one redemption.
    async fn redeem(&self, player: &PlayerId, code: &str) -> Result<RedeemOutcome, FetchError>;
}

// ============================================================================
// Outcomes
// ============================================================================

/// Result of a login call.
#[derive(Debug, Clone, Serialize)]
pub struct LoginOutcome {
    /// True for a 200 response with a JSON body.
    pub success: bool,
    /// HTTP status.
    pub status: u16,
    /// Parsed body, or `{"raw": <text>}` when the body was not JSON.
    pub raw: Value,
}

/// Wraps a non-JSON body so it can travel as a JSON payload.
fn raw_body(body: &str) -> Value {
    serde_json::json!({ "raw": body })
}

impl LoginOutcome {
    /// Classifies a login response.
    pub fn from_response(status: u16, body: &str) -> Self {
        match serde_json::from_str::<Value>(body) {
            Ok(raw) => Self {
                success: status == 200,
                status,
                raw,
            },
            Err(_) => Self {
                success: false,
                status,
                raw: raw_body(body),
            },
        }
    }
}

/// Result of a redeem call.
#[derive(Debug, Clone, Serialize)]
pub struct RedeemOutcome {
    /// Whether any success rule matched.
    pub success: bool,
    /// HTTP status.
    pub status: u16,
    /// Parsed body, or `{"raw": <text>}` when the body was not JSON.
    pub raw: Value,
    /// Vendor message, or a fallback description of the failure.
    pub diagnostic: String,
    /// Tag of the rule that decided success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<&'static str>,
}

// ============================================================================
// Rules
// ============================================================================

/// A vendor reply as seen by the success rules.
#[derive(Debug, Clone, Copy)]
pub struct VendorReply<'a> {
    /// HTTP status.
    pub status: u16,
    /// Raw body.
    pub body: &'a str,
    /// Parsed body, if it was JSON.
    pub json: Option<&'a Value>,
}

impl VendorReply<'_> {
    /// Returns a string field from the JSON body.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.json?.get(key)?.as_str()
    }

    /// Returns the vendor message (`msg` preferred over `message`).
    pub fn message(&self) -> Option<&str> {
        self.str_field("msg").or_else(|| self.str_field("message"))
    }
}

/// One tagged predicate in the redemption success chain.
pub trait RedeemRule: Send + Sync {
    /// Stable tag, reported on the outcome.
    fn tag(&self) -> &'static str;

    /// Returns true if this reply indicates a successful redemption.
    fn matches(&self, reply: &VendorReply<'_>) -> bool;
}

/// Ordered chain of success rules.
///
/// Replies with a status other than 200 never succeed, whatever the body says.
#[derive(Default)]
pub struct RuleChain {
    rules: Vec<Box<dyn RedeemRule>>,
}

impl RuleChain {
    /// Creates a chain from rules, tried in order.
    pub fn new(rules: Vec<Box<dyn RedeemRule>>) -> Self {
        Self { rules }
    }

    /// Returns the rule tags in evaluation order.
    pub fn tags(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.tag()).collect()
    }

    /// Returns the tag of the first matching rule.
    pub fn evaluate(&self, reply: &VendorReply<'_>) -> Option<&'static str> {
        if reply.status != 200 {
            return None;
        }
        self.rules.iter().find(|r| r.matches(reply)).map(|r| r.tag())
    }

    /// Classifies a raw redemption response.
    pub fn classify(&self, status: u16, body: &str) -> RedeemOutcome {
        let parsed = serde_json::from_str::<Value>(body).ok();
        let reply = VendorReply {
            status,
            body,
            json: parsed.as_ref(),
        };

        let rule = self.evaluate(&reply);
        let diagnostic = match (&parsed, reply.message()) {
            (None, _) => INVALID_JSON_MESSAGE.to_string(),
            (Some(_), Some(msg)) => msg.to_string(),
            (Some(_), None) => DEFAULT_FAILURE_MESSAGE.to_string(),
        };

        RedeemOutcome {
            success: rule.is_some(),
            status,
            raw: parsed.unwrap_or_else(|| raw_body(body)),
            diagnostic,
            rule,
        }
    }
}
