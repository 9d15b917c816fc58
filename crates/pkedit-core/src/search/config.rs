//! Tunables for the target-size quality search.

use serde::{Deserialize, Serialize};

use super::SearchError;

/// Lower bound of the quality bracket.
pub const DEFAULT_MIN_QUALITY: f64 = 0.1;
/// Upper bound of the quality bracket.
pub const DEFAULT_MAX_QUALITY: f64 = 1.0;
/// Bisection steps after the initial probe.
pub const DEFAULT_MAX_ITERATIONS: u32 = 12;
/// Distance from the target under which the initial probe is accepted as is.
pub const DEFAULT_EARLY_EXIT_TOLERANCE_BYTES: u64 = 10 * 1024;
/// Distance from the target at which a bisection probe is accepted.
pub const DEFAULT_TIGHT_TOLERANCE_BYTES: u64 = 12 * 1024;

/// Configuration for [`find_quality_for_target_size_with`](super::find_quality_for_target_size_with).
///
/// Every field has a default, so hosts may pass a partial object:
///
/// ```json
/// { "max_iterations": 8, "tight_tolerance_bytes": 4096 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Lowest quality the search will probe or return.
    pub min_quality: f64,
    /// Highest quality the search will probe or return.
    pub max_quality: f64,
    /// Maximum number of bisection probes (the initial probe is extra).
    pub max_iterations: u32,
    /// Strict bound: `|initial - target| < this` skips the bisection.
    pub early_exit_tolerance_bytes: u64,
    /// Inclusive bound: `|size - target| <= this` stops the bisection.
    pub tight_tolerance_bytes: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_quality: DEFAULT_MIN_QUALITY,
            max_quality: DEFAULT_MAX_QUALITY,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            early_exit_tolerance_bytes: DEFAULT_EARLY_EXIT_TOLERANCE_BYTES,
            tight_tolerance_bytes: DEFAULT_TIGHT_TOLERANCE_BYTES,
        }
    }
}

impl SearchConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check the quality bracket is a non-empty range inside `(0, 1]`.
    pub fn validate(&self) -> Result<(), SearchError> {
        let in_range = |q: f64| q.is_finite() && q > 0.0 && q <= 1.0;
        if !in_range(self.min_quality) || !in_range(self.max_quality) {
            return Err(SearchError::InvalidConfig(format!(
                "quality bounds must lie in (0, 1], got [{}, {}]",
                self.min_quality, self.max_quality
            )));
        }
        if self.min_quality > self.max_quality {
            return Err(SearchError::InvalidConfig(format!(
                "min_quality {} exceeds max_quality {}",
                self.min_quality, self.max_quality
            )));
        }
        Ok(())
    }

    /// Clamp a quality into `[min_quality, max_quality]`.
    pub fn clamp_quality(&self, quality: f64) -> f64 {
        quality.clamp(self.min_quality, self.max_quality)
    }
}
