//! Redemption success rules for the Century Game gift code API.
//!
//! The endpoint is undocumented and has answered with several shapes over
//! time. Each rule recognizes one of them; [`default_rules`] orders them from
//! the most explicit signal to the fuzziest.

use giftclaim_fetch::{RedeemRule, RuleChain, VendorReply};
use serde_json::Value;

/// Message words that indicate a redemption went through.
const SUCCESS_WORDS: &[&str] = &["success", "claimed", "redeem"];

/// Message words that veto a success reading.
const FAILURE_WORDS: &[&str] = &["error", "fail", "invalid", "not found"];

/// Builds the default rule chain.
pub fn default_rules() -> RuleChain {
    RuleChain::new(vec![
        Box::new(SuccessCodeRule),
        Box::new(SuccessFlagRule),
        Box::new(StatusFieldRule),
        Box::new(MessageKeywordRule),
        Box::new(RawBodyRule),
    ])
}

/// `{"code": 0}`: the documented success value.
#[derive(Debug, Clone, Copy)]
pub struct SuccessCodeRule;

impl RedeemRule for SuccessCodeRule {
    fn tag(&self) -> &'static str {
        "success_code"
    }

    fn matches(&self, reply: &VendorReply<'_>) -> bool {
        reply.json.and_then(|j| j.get("code")).and_then(Value::as_i64) == Some(0)
    }
}

/// `{"success": true}`.
#[derive(Debug, Clone, Copy)]
pub struct SuccessFlagRule;

impl RedeemRule for SuccessFlagRule {
    fn tag(&self) -> &'static str {
        "success_flag"
    }

    fn matches(&self, reply: &VendorReply<'_>) -> bool {
        reply.json.and_then(|j| j.get("success")).and_then(Value::as_bool) == Some(true)
    }
}

/// `{"status": "success"}`.
#[derive(Debug, Clone, Copy)]
pub struct StatusFieldRule;

impl RedeemRule for StatusFieldRule {
    fn tag(&self) -> &'static str {
        "status_field"
    }

    fn matches(&self, reply: &VendorReply<'_>) -> bool {
        reply
            .str_field("status")
            .is_some_and(|s| s.eq_ignore_ascii_case("success"))
    }
}

/// Message text with success wording and no failure wording.
#[derive(Debug, Clone, Copy)]
pub struct MessageKeywordRule;

impl RedeemRule for MessageKeywordRule {
    fn tag(&self) -> &'static str {
        "message_keywords"
    }

    fn matches(&self, reply: &VendorReply<'_>) -> bool {
        let Some(message) = reply.message() else {
            return false;
        };
        let message = message.to_lowercase();
        SUCCESS_WORDS.iter().any(|w| message.contains(w))
            && !FAILURE_WORDS.iter().any(|w| message.contains(w))
    }
}

/// Non-JSON body that still mentions success.
#[derive(Debug, Clone, Copy)]
pub struct RawBodyRule;

impl RedeemRule for RawBodyRule {
    fn tag(&self) -> &'static str {
        "raw_body"
    }

    fn matches(&self, reply: &VendorReply<'_>) -> bool {
        reply.json.is_none() && reply.body.contains("success")
    }
}
