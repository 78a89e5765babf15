//! Text output formatting with colors.

use chrono::{DateTime, Duration, Utc};
use giftclaim_core::{
    AuditEvent, ClaimReport, CodeClaims, CodeSet, CodeStatus, GiftCode, Player, PlayerStats,
};

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";

/// Codes expiring sooner than this are highlighted.
const EXPIRY_WARNING_HOURS: i64 = 24;

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    // ========================================================================
    // Codes
    // ========================================================================

    /// Formats the extracted code set.
    pub fn format_codes(&self, codes: &CodeSet, show_expired: bool, now: DateTime<Utc>) -> String {
        let mut lines = Vec::new();

        lines.push(self.bold(&format!("Active codes ({})", codes.active.len())));
        if codes.active.is_empty() {
            lines.push(format!("  {}", self.dim("none listed")));
        }
        for code in &codes.active {
            lines.push(self.format_code_line(code, now));
        }

        if show_expired {
            lines.push(String::new());
            lines.push(self.bold(&format!("Expired codes ({})", codes.expired.len())));
            for code in &codes.expired {
                lines.push(self.format_code_line(code, now));
            }
        }

        lines.join("\n")
    }

    /// Formats codes together with their claimants.
    pub fn format_code_claims(&self, entries: &[CodeClaims], now: DateTime<Utc>) -> String {
        let mut lines = Vec::new();

        for entry in entries {
            lines.push(format!(
                "{}  {}",
                self.format_code_line(&entry.code, now),
                self.dim(&format!(
                    "{} claim{}",
                    entry.claim_count,
                    if entry.claim_count == 1 { "" } else { "s" }
                ))
            ));
            for player in &entry.claimed_by {
                lines.push(format!("      {}", self.cyan(player)));
            }
        }

        if lines.is_empty() {
            lines.push(self.dim("No codes listed"));
        }
        lines.join("\n")
    }

    fn format_code_line(&self, code: &GiftCode, now: DateTime<Utc>) -> String {
        let marker = match code.status {
            CodeStatus::Active => self.green("●"),
            CodeStatus::Expired => self.dim("○"),
        };
        format!(
            "  {} {:<20} {}",
            marker,
            code.code,
            self.format_expiry(code.expires_at, now)
        )
    }

    /// Formats an expiration as a countdown or an absolute UTC time.
    pub fn format_expiry(&self, expires_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
        let Some(expires_at) = expires_at else {
            return self.dim("no expiry");
        };

        if expires_at <= now {
            return self.dim(&format!("expired {}", expires_at.format("%Y-%m-%d %H:%M UTC")));
        }

        let diff = expires_at - now;
        let text = if diff < Duration::hours(1) {
            let mins = diff.num_minutes();
            format!("expires in {} minute{}", mins, if mins == 1 { "" } else { "s" })
        } else if diff < Duration::hours(EXPIRY_WARNING_HOURS) {
            let hours = diff.num_hours();
            let mins = diff.num_minutes() % 60;
            if mins > 0 {
                format!("expires in {hours}h {mins}m")
            } else {
                format!("expires in {} hour{}", hours, if hours == 1 { "" } else { "s" })
            }
        } else {
            return format!("expires {}", expires_at.format("%Y-%m-%d %H:%M UTC"));
        };

        self.yellow(&text)
    }

    // ========================================================================
    // Players
    // ========================================================================

    /// Formats the registered player list.
    pub fn format_players(&self, players: &[Player]) -> String {
        if players.is_empty() {
            return self.dim("No players registered");
        }

        let mut lines = vec![format!(
            "{:<12} {:<8} {:<7} {:<18} {}",
            self.bold("Player"),
            self.bold("Verified"),
            self.bold("Claims"),
            self.bold("Last claimed"),
            self.bold("Added"),
        )];

        for player in players {
            let verified = if player.verified {
                self.green("✓")
            } else {
                self.dim("−")
            };
            let last = player
                .last_claimed
                .map_or_else(|| "−".to_string(), |t| t.format("%Y-%m-%d %H:%M").to_string());
            lines.push(format!(
                "{:<12} {:<8} {:<7} {:<18} {}",
                player.id.as_str(),
                verified,
                player.total_claims,
                last,
                player.added_at.format("%Y-%m-%d"),
            ));
        }

        lines.join("\n")
    }

    /// Formats a freshly registered player.
    pub fn format_player_added(&self, player: &Player) -> String {
        let nickname = player
            .verification_data
            .as_ref()
            .and_then(|data| data.pointer("/data/nickname"))
            .and_then(serde_json::Value::as_str);

        match nickname {
            Some(name) => format!(
                "{} Added player {} ({})",
                self.green("✓"),
                self.bold(player.id.as_str()),
                self.cyan(name)
            ),
            None => format!("{} Added player {}", self.green("✓"), self.bold(player.id.as_str())),
        }
    }

    /// Formats claim statistics for one player.
    pub fn format_stats(&self, stats: &PlayerStats) -> String {
        let fmt_time = |t: Option<DateTime<Utc>>| {
            t.map_or_else(
                || self.dim("−"),
                |t| t.format("%Y-%m-%d %H:%M UTC").to_string(),
            )
        };

        [
            self.bold(&format!("Player {}", stats.player_id)),
            format!("Claims:       {}", stats.total_claims),
            format!("Last claimed: {}", fmt_time(stats.last_claimed)),
            format!("Added:        {}", fmt_time(stats.added_at)),
        ]
        .join("\n")
    }

    // ========================================================================
    // Claim runs
    // ========================================================================

    /// Formats a claim run report.
    pub fn format_report(&self, report: &ClaimReport) -> String {
        let mut lines = Vec::new();

        for result in &report.results {
            if result.success {
                lines.push(format!(
                    "{} {} {}",
                    self.green("✓"),
                    result.player_id,
                    result.code
                ));
            } else {
                lines.push(format!(
                    "{} {} {} {}",
                    self.red("✗"),
                    result.player_id,
                    result.code,
                    self.dim(result.error.as_deref().unwrap_or("failed"))
                ));
            }
        }

        if !lines.is_empty() {
            lines.push(String::new());
        }

        let failed = report.failure_count();
        let failed_text = format!("{failed} failed");
        lines.push(format!(
            "{} of {} codes claimed: {} succeeded, {}, {} skipped",
            report.codes_claimed.len(),
            report.total_codes,
            self.green(&report.success_count().to_string()),
            if failed > 0 { self.red(&failed_text) } else { failed_text },
            report.skipped
        ));

        lines.join("\n")
    }

    // ========================================================================
    // Audit
    // ========================================================================

    /// Formats audit events, newest first.
    pub fn format_audit(&self, events: &[AuditEvent]) -> String {
        if events.is_empty() {
            return self.dim("No audit events");
        }

        events
            .iter()
            .map(|event| {
                let summary = event
                    .detail("details")
                    .and_then(serde_json::Value::as_str)
                    .unwrap_or("");
                let action = match event.detail("success").and_then(serde_json::Value::as_bool) {
                    Some(false) => self.red(event.action.as_str()),
                    _ => self.bold(event.action.as_str()),
                };
                format!(
                    "{}  {:<20} {}",
                    self.dim(&event.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()),
                    action,
                    summary
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    // ========================================================================
    // Color/style helpers
    // ========================================================================

    fn paint(&self, color: &str, text: &str) -> String {
        if self.use_colors {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint(YELLOW, text)
    }

    fn red(&self, text: &str) -> String {
        self.paint(RED, text)
    }

    fn cyan(&self, text: &str) -> String {
        self.paint(CYAN, text)
    }
}

// ============================================================================
// Tests
// ============================================================================
