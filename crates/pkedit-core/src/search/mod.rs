//! Target-size quality search.
//!
//! Finds an encoder quality whose output size lands close to a requested
//! byte count, using a bounded bisection over the quality axis.
//!
//! # Algorithm
//!
//! 1. Probe at the caller's initial quality. If the output format has no
//!    quality axis, stop here.
//! 2. If that size is within the early-exit tolerance, accept it.
//! 3. Otherwise bisect `[min_quality, max_quality]` for at most
//!    `max_iterations` probes, stopping once a probe is within the tight
//!    tolerance. Larger than target moves the upper bound down, smaller moves
//!    the lower bound up.
//! 4. Return the closest probe seen, clamped into the bracket.
//!
//! Encoder failures never abort the search: the first probe failing yields a
//! failure-flagged result, later failures keep the best probe so far.
//!
//! # Examples
//!
//! ```ignore
//! use pkedit_core::encode::{OutputFormat, SurfaceEncoder};
//! use pkedit_core::search::find_quality_for_target_size;
//!
//! let mut encoder = SurfaceEncoder::new(&image, OutputFormat::Jpeg);
//! let result = find_quality_for_target_size(200 * 1024, 0.92, &mut encoder)?;
//! if result.within_tolerance {
//!     println!("q={:.2} gives {} bytes", result.quality, result.achieved_size_bytes);
//! }
//! ```

mod bisect;
mod cancel;
mod config;
mod encoder;
mod types;

pub use bisect::{
    find_quality_for_target_size, find_quality_for_target_size_async,
    find_quality_for_target_size_with, QualitySearch,
};
pub use cancel::CancelToken;
pub use config::{
    SearchConfig, DEFAULT_EARLY_EXIT_TOLERANCE_BYTES, DEFAULT_MAX_ITERATIONS,
    DEFAULT_MAX_QUALITY, DEFAULT_MIN_QUALITY, DEFAULT_TIGHT_TOLERANCE_BYTES,
};
pub use encoder::{AsyncEncoder, EncodeFailure, Encoder};
pub use types::{EncodeProbe, SearchError, SearchOutcome, SearchResult};
