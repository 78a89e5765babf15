//! User settings.
//!
//! Settings live in a JSON file under the config directory. Every field has a
//! default, so a missing or partial file is fine.

use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::StoreError;
use crate::json_store::DEFAULT_AUDIT_RETENTION;
use crate::persistence::{default_data_dir, default_settings_path, load_json, save_json};

/// Environment variable naming the settings file.
pub const CONFIG_ENV: &str = "GIFTCLAIM_CONFIG";

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "GIFTCLAIM_DATA_DIR";

/// Default gift code listing page.
pub const DEFAULT_LISTING_URL: &str = "https://kingshot.net/gift-codes";

/// Default vendor API base URL.
pub const DEFAULT_VENDOR_BASE_URL: &str = "https://kingshot-giftcode.centurygame.com/api";

// ============================================================================
// Settings Types
// ============================================================================

/// User preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding players, claims and the audit trail.
    /// `None` means the platform data directory.
    pub data_dir: Option<PathBuf>,

    /// Gift code listing page.
    pub listing_url: String,

    /// Vendor API base URL.
    pub vendor_base_url: String,

    /// Per-request HTTP timeout.
    pub request_timeout_secs: u64,

    /// Pause between login and redeem.
    pub pre_redeem_delay_ms: u64,

    /// Pause after every attempt.
    pub post_attempt_delay_ms: u64,

    /// Number of audit events kept.
    pub audit_retention: usize,

    /// Log level used when no `RUST_LOG` is set.
    pub log_level: LogLevel,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: None,
            listing_url: DEFAULT_LISTING_URL.to_string(),
            vendor_base_url: DEFAULT_VENDOR_BASE_URL.to_string(),
            request_timeout_secs: 10,
            pre_redeem_delay_ms: 200,
            post_attempt_delay_ms: 500,
            audit_retention: DEFAULT_AUDIT_RETENTION,
            log_level: LogLevel::default(),
        }
    }
}

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    /// Error level logging.
    Error,
    /// Warning level logging.
    #[default]
    Warn,
    /// Info level logging.
    Info,
    /// Debug level logging.
    Debug,
    /// Trace level logging.
    Trace,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Error => write!(f, "error"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Trace => write!(f, "trace"),
        }
    }
}

// ============================================================================
// Loading & Saving
// ============================================================================

impl Settings {
    /// Resolves the settings file: explicit path, then `GIFTCLAIM_CONFIG`,
    /// then the platform default.
    pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
            .unwrap_or_else(default_settings_path)
    }

    /// Loads settings from a path, applying environment overrides.
    ///
    /// A missing file yields defaults. An unreadable file is logged and
    /// also yields defaults.
    pub async fn load(path: &Path) -> Self {
        let mut settings = if tokio::fs::try_exists(path).await.unwrap_or(false) {
            info!(path = %path.display(), "Loading settings");
            load_json(path).await.unwrap_or_else(|e| {
                warn!(error = %e, "Failed to load settings, using defaults");
                Settings::default()
            })
        } else {
            debug!(path = %path.display(), "Settings file not found, using defaults");
            Settings::default()
        };
        settings.apply_env();
        settings
    }

    /// Saves settings to a path.
    ///
    /// # Errors
    ///
    /// Returns error if settings cannot be written to disk.
    pub async fn save(&self, path: &Path) -> Result<(), StoreError> {
        save_json(path, self).await?;
        info!(path = %path.display(), "Settings saved");
        Ok(())
    }

    /// Applies `GIFTCLAIM_DATA_DIR`.
    pub fn apply_env(&mut self) {
        self.apply_data_dir_override(std::env::var_os(DATA_DIR_ENV));
    }

    fn apply_data_dir_override(&mut self, value: Option<OsString>) {
        if let Some(dir) = value.filter(|v| !v.is_empty()) {
            debug!(dir = ?dir, "Data directory overridden by environment");
            self.data_dir = Some(PathBuf::from(dir));
        }
    }

    /// Checks values that would make every request fail.
    ///
    /// # Errors
    ///
    /// [`StoreError::Config`] naming the first bad field.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.request_timeout_secs == 0 {
            return Err(StoreError::Config(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.audit_retention == 0 {
            return Err(StoreError::Config(
                "audit_retention must be greater than zero".to_string(),
            ));
        }
        check_url("listing_url", &self.listing_url)?;
        check_url("vendor_base_url", &self.vendor_base_url)?;
        Ok(())
    }

    /// Returns the effective data directory.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(default_data_dir)
    }

    /// Returns the HTTP timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Returns the pause between login and redeem.
    pub fn pre_redeem_delay(&self) -> Duration {
        Duration::from_millis(self.pre_redeem_delay_ms)
    }

    /// Returns the pause after every attempt.
    pub fn post_attempt_delay(&self) -> Duration {
        Duration::from_millis(self.post_attempt_delay_ms)
    }

    /// Hosts of the configured endpoints, for the HTTP domain allowlist.
    pub fn allowed_hosts(&self) -> Vec<String> {
        let mut hosts: Vec<String> = [&self.listing_url, &self.vendor_base_url]
            .iter()
            .filter_map(|raw| Url::parse(raw).ok())
            .filter_map(|url| url.host_str().map(str::to_string))
            .collect();
        hosts.dedup();
        hosts
    }
}

fn check_url(field: &str, value: &str) -> Result<(), StoreError> {
    let url = Url::parse(value).map_err(|e| StoreError::Config(format!("{field}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(StoreError::Config(format!(
            "{field}: unsupported scheme '{}'",
            url.scheme()
        )));
    }
    Ok(())
}
