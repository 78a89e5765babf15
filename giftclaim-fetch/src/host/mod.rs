//! Host APIs for network access.
//!
//! - [`http`] - HTTP client with tracing, timeouts, and domain allowlist

pub mod http;
