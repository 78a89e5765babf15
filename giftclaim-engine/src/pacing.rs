//! Inter-request pacing.
//!
//! Fixed pauses around vendor calls keep a run under the vendor's rate
//! limits. They are the only admission control; attempts are never
//! parallelized.

use std::time::Duration;
use tracing::trace;

/// Default pause between login and redeem.
pub const DEFAULT_BEFORE_REDEEM: Duration = Duration::from_millis(200);

/// Default pause after every attempt.
pub const DEFAULT_AFTER_ATTEMPT: Duration = Duration::from_millis(500);

/// Pauses applied around each (player, code) attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// Pause between login and redeem.
    pub before_redeem: Duration,
    /// Pause after each attempt, whatever its outcome.
    pub after_attempt: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self::new(DEFAULT_BEFORE_REDEEM, DEFAULT_AFTER_ATTEMPT)
    }
}

impl Pacing {
    /// Creates pacing with explicit pauses.
    pub const fn new(before_redeem: Duration, after_attempt: Duration) -> Self {
        Self {
            before_redeem,
            after_attempt,
        }
    }

    /// No pauses (tests).
    pub const fn none() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    /// Sleeps the pre-redeem pause.
    pub async fn pause_before_redeem(&self) {
        sleep(self.before_redeem).await;
    }

    /// Sleeps the post-attempt pause.
    pub async fn pause_after_attempt(&self) {
        sleep(self.after_attempt).await;
    }
}

async fn sleep(duration: Duration) {
    if duration.is_zero() {
        return;
    }
    trace!(ms = duration.as_millis(), "Pacing");
    tokio::time::sleep(duration).await;
}
