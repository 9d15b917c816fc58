//! Bounded bisection over encoder quality.
//!
//! [`QualitySearch`] holds the whole algorithm as a stepper: the caller asks
//! for the next quality to probe, runs the encoder, and records the result.
//! The sync and async drivers below are thin loops around it, so both follow
//! exactly the same probe sequence.

use super::{
    AsyncEncoder, CancelToken, EncodeFailure, EncodeProbe, Encoder, SearchConfig, SearchError,
    SearchOutcome, SearchResult,
};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    /// Waiting for the probe at the initial quality.
    Initial,
    /// Initial probe of a format without a quality axis.
    Lossless,
    Bisecting,
    Done(SearchOutcome),
}

/// State of one target-size search.
#[derive(Debug, Clone)]
pub struct QualitySearch {
    config: SearchConfig,
    target_bytes: u64,
    initial_quality: f64,
    low: f64,
    high: f64,
    iterations: u32,
    probes: u32,
    pending: Option<f64>,
    best: Option<EncodeProbe>,
    phase: Phase,
}

impl QualitySearch {
    /// Start a search for `target_bytes`, probing `initial_quality` first.
    ///
    /// The initial quality is clamped into the config's bracket before it is
    /// probed, so every reported size belongs to the reported quality.
    ///
    /// # Errors
    ///
    /// Returns a [`SearchError`] for a zero target, an initial quality outside
    /// `(0, 1]`, or an invalid config. These are caller bugs, not runtime
    /// conditions.
    pub fn new(
        config: SearchConfig,
        target_bytes: u64,
        initial_quality: f64,
    ) -> Result<Self, SearchError> {
        config.validate()?;
        if target_bytes == 0 {
            return Err(SearchError::ZeroTarget);
        }
        if !initial_quality.is_finite() || initial_quality <= 0.0 || initial_quality > 1.0 {
            return Err(SearchError::InvalidInitialQuality(initial_quality));
        }
        let initial_quality = config.clamp_quality(initial_quality);

        Ok(Self {
            low: config.min_quality,
            high: config.max_quality,
            config,
            target_bytes,
            initial_quality,
            iterations: 0,
            probes: 0,
            pending: None,
            best: None,
            phase: Phase::Initial,
        })
    }

    /// Treat the output format as lossless: one probe, then stop.
    pub fn without_quality_axis(mut self) -> Self {
        if self.phase == Phase::Initial {
            self.phase = Phase::Lossless;
        }
        self
    }

    /// Quality to probe next, or `None` once the search has finished.
    pub fn next_quality(&mut self) -> Option<f64> {
        let quality = match self.phase {
            Phase::Done(_) => return None,
            Phase::Initial | Phase::Lossless => self.initial_quality,
            Phase::Bisecting => {
                if self.iterations >= self.config.max_iterations {
                    self.phase = Phase::Done(SearchOutcome::BudgetExhausted);
                    return None;
                }
                (self.low + self.high) / 2.0
            }
        };
        self.pending = Some(quality);
        Some(quality)
    }

    /// Record the encoder's answer for the quality last returned by
    /// [`next_quality`](Self::next_quality).
    ///
    /// Calls without a pending quality are ignored.
    pub fn record(&mut self, outcome: Result<u64, EncodeFailure>) {
        let Some(quality) = self.pending.take() else {
            return;
        };
        self.probes += 1;

        match self.phase {
            Phase::Done(_) => {}
            Phase::Lossless => {
                self.phase = match outcome {
                    Ok(size_bytes) => {
                        self.best = Some(EncodeProbe {
                            quality,
                            size_bytes,
                        });
                        Phase::Done(SearchOutcome::UnsupportedFormat)
                    }
                    Err(err) => {
                        log::warn!("initial probe failed: {}", err);
                        Phase::Done(SearchOutcome::InitialProbeFailed)
                    }
                };
            }
            Phase::Initial => match outcome {
                Ok(size_bytes) => {
                    let probe = EncodeProbe {
                        quality,
                        size_bytes,
                    };
                    self.best = Some(probe);
                    log::debug!(
                        "initial probe q={:.3} -> {} bytes (target {})",
                        quality,
                        size_bytes,
                        self.target_bytes
                    );
                    self.phase = if probe.distance_to(self.target_bytes)
                        < self.config.early_exit_tolerance_bytes
                    {
                        Phase::Done(SearchOutcome::EarlyExit)
                    } else {
                        Phase::Bisecting
                    };
                }
                Err(err) => {
                    log::warn!("initial probe failed: {}", err);
                    self.phase = Phase::Done(SearchOutcome::InitialProbeFailed);
                }
            },
            Phase::Bisecting => {
                self.iterations += 1;
                let size_bytes = match outcome {
                    Ok(size_bytes) => size_bytes,
                    Err(err) => {
                        log::warn!(
                            "probe {} at q={:.3} failed, keeping best so far: {}",
                            self.probes,
                            quality,
                            err
                        );
                        self.phase = Phase::Done(SearchOutcome::EncoderFailed);
                        return;
                    }
                };

                let probe = EncodeProbe {
                    quality,
                    size_bytes,
                };
                let distance = probe.distance_to(self.target_bytes);
                if self
                    .best
                    .map_or(true, |best| distance < best.distance_to(self.target_bytes))
                {
                    self.best = Some(probe);
                }

                log::debug!(
                    "probe {} q={:.4} in [{:.4}, {:.4}] -> {} bytes",
                    self.probes,
                    quality,
                    self.low,
                    self.high,
                    size_bytes
                );

                if distance <= self.config.tight_tolerance_bytes {
                    self.phase = Phase::Done(SearchOutcome::Converged);
                } else if size_bytes > self.target_bytes {
                    self.high = quality;
                } else {
                    self.low = quality;
                }
            }
        }
    }

    /// Stop the search, keeping the best probe so far.
    pub fn cancel(&mut self) {
        if !self.is_done() {
            self.pending = None;
            self.phase = Phase::Done(SearchOutcome::Cancelled);
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self.phase, Phase::Done(_))
    }

    /// Number of probes recorded so far.
    pub fn probes(&self) -> u32 {
        self.probes
    }

    /// Best probe recorded so far.
    pub fn best(&self) -> Option<EncodeProbe> {
        self.best
    }

    /// Build the final result.
    ///
    /// A search that has not reached a terminal state is reported as
    /// `BudgetExhausted`.
    pub fn finish(self) -> SearchResult {
        let outcome = match self.phase {
            Phase::Done(outcome) => outcome,
            _ => SearchOutcome::BudgetExhausted,
        };

        let result = match self.best {
            Some(best) => SearchResult {
                quality: self.config.clamp_quality(best.quality),
                achieved_size_bytes: best.size_bytes,
                within_tolerance: outcome != SearchOutcome::UnsupportedFormat
                    && best.distance_to(self.target_bytes) <= self.config.tight_tolerance_bytes,
                outcome,
                probes: self.probes,
            },
            None => SearchResult {
                quality: self.config.clamp_quality(self.initial_quality),
                achieved_size_bytes: 0,
                within_tolerance: false,
                outcome,
                probes: self.probes,
            },
        };

        log::info!(
            "quality search finished: {:?} after {} probes, q={:.3}, {} bytes (target {})",
            result.outcome,
            result.probes,
            result.quality,
            result.achieved_size_bytes,
            self.target_bytes
        );
        result
    }
}

/// Find a quality whose encoded size is close to `target_bytes`, using the
/// default [`SearchConfig`].
pub fn find_quality_for_target_size<E: Encoder + ?Sized>(
    target_bytes: u64,
    initial_quality: f64,
    encoder: &mut E,
) -> Result<SearchResult, SearchError> {
    find_quality_for_target_size_with(
        &SearchConfig::default(),
        target_bytes,
        initial_quality,
        encoder,
        &CancelToken::new(),
    )
}

/// Find a quality whose encoded size is close to `target_bytes`.
///
/// The encoder is called at most `1 + config.max_iterations` times, strictly
/// one after another. `cancel` is checked before each probe.
pub fn find_quality_for_target_size_with<E: Encoder + ?Sized>(
    config: &SearchConfig,
    target_bytes: u64,
    initial_quality: f64,
    encoder: &mut E,
    cancel: &CancelToken,
) -> Result<SearchResult, SearchError> {
    let mut search = QualitySearch::new(config.clone(), target_bytes, initial_quality)?;
    if !encoder.supports_quality() {
        search = search.without_quality_axis();
    }

    while let Some(quality) = search.next_quality() {
        if cancel.is_cancelled() {
            search.cancel();
            break;
        }
        search.record(encoder.probe(quality));
    }

    Ok(search.finish())
}

/// Async form of [`find_quality_for_target_size_with`].
///
/// Each probe is awaited before the next one is issued.
pub async fn find_quality_for_target_size_async<E: AsyncEncoder + ?Sized>(
    config: &SearchConfig,
    target_bytes: u64,
    initial_quality: f64,
    encoder: &mut E,
    cancel: &CancelToken,
) -> Result<SearchResult, SearchError> {
    let mut search = QualitySearch::new(config.clone(), target_bytes, initial_quality)?;
    if !encoder.supports_quality() {
        search = search.without_quality_axis();
    }

    while let Some(quality) = search.next_quality() {
        if cancel.is_cancelled() {
            search.cancel();
            break;
        }
        let outcome = encoder.probe(quality).await;
        search.record(outcome);
    }

    Ok(search.finish())
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Encoder replaying arbitrary sizes, with optional failures.
    struct ScriptedEncoder {
        sizes: Vec<Option<u64>>,
        calls: usize,
    }

    impl Encoder for ScriptedEncoder {
        fn probe(&mut self, _quality: f64) -> Result<u64, EncodeFailure> {
            let answer = self.sizes[self.calls % self.sizes.len()];
            self.calls += 1;
            answer.ok_or_else(|| EncodeFailure("scripted".to_string()))
        }
    }

    /// Monotone encoder: `size(q) = base + slope * q`.
    struct Monotone {
        base: u64,
        slope: f64,
        calls: u32,
    }

    impl Encoder for Monotone {
        fn probe(&mut self, quality: f64) -> Result<u64, EncodeFailure> {
            self.calls += 1;
            Ok(self.base + (self.slope * quality) as u64)
        }
    }

    proptest! {
        /// Call count and quality bracket hold for any encoder behaviour.
        #[test]
        fn prop_bounded_calls_and_clamped_quality(
            sizes in prop::collection::vec(prop::option::weighted(0.9, 0u64..2_000_000), 1..20),
            target in 1u64..2_000_000,
            initial in 0.01f64..=1.0,
            max_iterations in 0u32..20,
        ) {
            let config = SearchConfig { max_iterations, ..SearchConfig::default() };
            let mut encoder = ScriptedEncoder { sizes, calls: 0 };
            let result = find_quality_for_target_size_with(
                &config, target, initial, &mut encoder, &CancelToken::new(),
            ).unwrap();

            prop_assert!(encoder.calls as u32 <= 1 + max_iterations);
            prop_assert_eq!(encoder.calls as u32, result.probes);
            prop_assert!(result.quality >= config.min_quality);
            prop_assert!(result.quality <= config.max_quality);
        }

        /// An initial probe inside the early-exit band ends the search at once.
        #[test]
        fn prop_early_exit_single_call(
            target in 20_000u64..2_000_000,
            offset in -10_239i64..=10_239,
            initial in 0.1f64..=1.0,
        ) {
            let size = (target as i64 + offset) as u64;
            let mut encoder = ScriptedEncoder { sizes: vec![Some(size)], calls: 0 };
            let result = find_quality_for_target_size(target, initial, &mut encoder).unwrap();

            prop_assert_eq!(encoder.calls, 1);
            prop_assert_eq!(result.outcome, SearchOutcome::EarlyExit);
            prop_assert_eq!(result.quality, initial);
        }

        /// A monotone encoder spanning the target converges or reports budget exhaustion.
        #[test]
        fn prop_monotone_convergence(
            base in 0u64..50_000,
            slope in 200_000f64..5_000_000.0,
            fraction in 0.15f64..0.95,
            initial in 0.1f64..=1.0,
        ) {
            let target = base + (slope * fraction) as u64;
            let mut encoder = Monotone { base, slope, calls: 0 };
            let result = find_quality_for_target_size(target, initial, &mut encoder).unwrap();

            prop_assert!(encoder.calls <= 13);
            match result.outcome {
                SearchOutcome::EarlyExit | SearchOutcome::Converged => {
                    prop_assert!(result.within_tolerance);
                }
                SearchOutcome::BudgetExhausted => {}
                other => prop_assert!(false, "unexpected outcome {:?}", other),
            }
        }
    }
}
