//! Extraction pipeline for running strategies in order.
//!
//! The pipeline takes an ordered list of extraction strategies and runs them
//! against one payload until one yields a non-empty [`CodeSet`].

use chrono::{DateTime, Utc};
use giftclaim_core::CodeSet;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

use crate::strategy::{ExtractKind, ExtractStrategy, StrategyInfo};

// ============================================================================
// Extract Attempt
// ============================================================================

/// Record of a single strategy attempt.
#[derive(Debug, Clone)]
pub struct ExtractAttempt {
    /// The strategy ID that was attempted.
    pub strategy_id: String,
    /// The kind of extraction used.
    pub kind: ExtractKind,
    /// Number of codes the strategy found.
    pub found: usize,
    /// How long the attempt took.
    pub duration: Duration,
}

// ============================================================================
// Extract Outcome
// ============================================================================

/// The outcome of a pipeline execution.
#[derive(Debug, Clone, Default)]
pub struct ExtractOutcome {
    /// Codes from the first strategy that found any (empty if none did).
    pub codes: CodeSet,
    /// All attempts made.
    pub attempts: Vec<ExtractAttempt>,
}

impl ExtractOutcome {
    /// Wraps a code set that did not come from a pipeline run.
    pub fn from_codes(codes: CodeSet) -> Self {
        Self {
            codes,
            attempts: Vec::new(),
        }
    }

    /// Returns the strategy that produced the codes, if any.
    pub fn successful_strategy(&self) -> Option<&str> {
        self.attempts
            .iter()
            .find(|a| a.found > 0)
            .map(|a| a.strategy_id.as_str())
    }

    /// Returns the number of strategies that were tried.
    pub fn attempts_count(&self) -> usize {
        self.attempts.len()
    }
}

// ============================================================================
// Extract Pipeline
// ============================================================================

/// A pipeline of extraction strategies tried in order.
#[derive(Default)]
pub struct ExtractPipeline {
    strategies: Vec<Box<dyn ExtractStrategy>>,
}

impl ExtractPipeline {
    /// Creates an empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a pipeline with the given strategies, tried in the given order.
    pub fn with_strategies(strategies: Vec<Box<dyn ExtractStrategy>>) -> Self {
        Self { strategies }
    }

    /// Appends a strategy to the end of the chain.
    pub fn add_strategy(&mut self, strategy: Box<dyn ExtractStrategy>) {
        self.strategies.push(strategy);
    }

    /// Returns the number of strategies in the pipeline.
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// Returns true if the pipeline is empty.
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Returns information about all strategies.
    pub fn strategy_info(&self) -> Vec<StrategyInfo> {
        self.strategies
            .iter()
            .enumerate()
            .map(|(position, s)| StrategyInfo {
                id: s.id().to_string(),
                kind: s.kind(),
                position,
            })
            .collect()
    }

    /// Runs strategies in order until one finds codes.
    #[instrument(skip(self, payload), fields(strategies = self.strategies.len(), len = payload.len()))]
    pub fn execute(&self, payload: &str, now: DateTime<Utc>) -> ExtractOutcome {
        let mut attempts = Vec::new();

        for strategy in &self.strategies {
            let start = Instant::now();
            let codes = strategy.extract(payload, now).unwrap_or_default();
            let found = codes.len();

            attempts.push(ExtractAttempt {
                strategy_id: strategy.id().to_string(),
                kind: strategy.kind(),
                found,
                duration: start.elapsed(),
            });

            if found > 0 {
                info!(
                    strategy = %strategy.id(),
                    active = codes.active.len(),
                    expired = codes.expired.len(),
                    "Extraction succeeded"
                );
                return ExtractOutcome { codes, attempts };
            }

            debug!(strategy = %strategy.id(), "Strategy found nothing, falling back");
        }

        warn!("No strategy found any codes");
        ExtractOutcome {
            codes: CodeSet::new(),
            attempts,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
