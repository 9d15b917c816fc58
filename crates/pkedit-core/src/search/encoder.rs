//! The encoder capability the search probes.

use std::future::Future;

use thiserror::Error;

use crate::encode::EncodeError;

/// The encoder could not produce a byte size for a quality.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Encoder failed: {0}")]
pub struct EncodeFailure(pub String);

impl From<EncodeError> for EncodeFailure {
    fn from(err: EncodeError) -> Self {
        EncodeFailure(err.to_string())
    }
}

/// Reports the encoded size of a fixed surface at a given quality.
///
/// Implementations must be pure in `(surface, quality)` and size must be
/// non-decreasing in quality; the bisection relies on both and does not try
/// to detect violations.
pub trait Encoder {
    /// Whether the output format has a quality axis at all.
    fn supports_quality(&self) -> bool {
        true
    }

    /// Encode at `quality` (in `(0, 1]`) and return the byte size.
    fn probe(&mut self, quality: f64) -> Result<u64, EncodeFailure>;
}

impl<E: Encoder + ?Sized> Encoder for &mut E {
    fn supports_quality(&self) -> bool {
        (**self).supports_quality()
    }

    fn probe(&mut self, quality: f64) -> Result<u64, EncodeFailure> {
        (**self).probe(quality)
    }
}

/// [`Encoder`] whose probes complete asynchronously, e.g. off-thread or
/// through a browser callback.
pub trait AsyncEncoder {
    fn supports_quality(&self) -> bool {
        true
    }

    fn probe(&mut self, quality: f64) -> impl Future<Output = Result<u64, EncodeFailure>>;
}
