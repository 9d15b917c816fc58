//! Records produced by the quality search.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Contract violations by the caller of the search.
///
/// Expected runtime conditions (failed probes, lossless formats, exhausted
/// budgets, cancellation) are reported in [`SearchResult`] instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    /// The target size must be positive.
    #[error("Target size must be greater than zero")]
    ZeroTarget,

    /// The initial quality must be a number in `(0, 1]`.
    #[error("Initial quality must be in (0, 1], got {0}")]
    InvalidInitialQuality(f64),

    /// The search configuration is inconsistent.
    #[error("Invalid search configuration: {0}")]
    InvalidConfig(String),
}

/// One encoder invocation and the size it produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncodeProbe {
    pub quality: f64,
    pub size_bytes: u64,
}

impl EncodeProbe {
    /// Absolute distance between this probe's size and `target_bytes`.
    pub fn distance_to(&self, target_bytes: u64) -> u64 {
        self.size_bytes.abs_diff(target_bytes)
    }
}

/// Why a search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchOutcome {
    /// The initial probe was already close enough; no bisection ran.
    EarlyExit,
    /// A bisection probe landed within the tight tolerance.
    Converged,
    /// The iteration budget ran out before reaching the tolerance.
    BudgetExhausted,
    /// A probe failed after the first one; the best earlier probe is kept.
    EncoderFailed,
    /// The very first probe failed; nothing was learned.
    InitialProbeFailed,
    /// The output format has no quality axis; the initial probe is returned.
    UnsupportedFormat,
    /// The caller cancelled between probes; the best probe so far is kept.
    Cancelled,
}

impl SearchOutcome {
    /// Snake-case name, matching the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            SearchOutcome::EarlyExit => "early_exit",
            SearchOutcome::Converged => "converged",
            SearchOutcome::BudgetExhausted => "budget_exhausted",
            SearchOutcome::EncoderFailed => "encoder_failed",
            SearchOutcome::InitialProbeFailed => "initial_probe_failed",
            SearchOutcome::UnsupportedFormat => "unsupported_format",
            SearchOutcome::Cancelled => "cancelled",
        }
    }
}

/// Final answer of a search, owned by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Chosen quality, always inside the configured bracket.
    pub quality: f64,
    /// Encoded size at `quality`, or 0 if no probe succeeded.
    pub achieved_size_bytes: u64,
    /// Whether `achieved_size_bytes` is within the tight tolerance of the target.
    pub within_tolerance: bool,
    pub outcome: SearchOutcome,
    /// Number of encoder invocations made.
    pub probes: u32,
}

impl SearchResult {
    /// True when the first probe failed and the result carries no information.
    pub fn is_failed(&self) -> bool {
        self.outcome == SearchOutcome::InitialProbeFailed
    }

    /// True when the search was cancelled before finishing.
    pub fn is_cancelled(&self) -> bool {
        self.outcome == SearchOutcome::Cancelled
    }

    /// True when the caller should apply `quality` to its output.
    pub fn is_applicable(&self) -> bool {
        !matches!(
            self.outcome,
            SearchOutcome::InitialProbeFailed
                | SearchOutcome::Cancelled
                | SearchOutcome::UnsupportedFormat
        )
    }
}
