//! Image encoding and format conversion for PKEdit.
//!
//! This module provides functionality for:
//! - Encoding a surface to JPEG, PNG or WebP
//! - Probing encoded sizes for the target-size quality search
//!
//! # Examples
//!
//! ```ignore
//! use pkedit_core::encode::{encode_image, OutputFormat};
//!
//! let bytes = encode_image(&image, OutputFormat::Jpeg, 0.8).unwrap();
//! println!("Encoded {} bytes", bytes.len());
//! ```

mod format;
mod jpeg;
mod surface;

use thiserror::Error;

pub use format::{encode_image, quality_to_percent, OutputFormat};
pub use jpeg::{encode_jpeg, encode_jpeg_rgba};
pub use surface::SurfaceEncoder;

/// Errors that can occur during encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes, got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// Quality outside `(0, 1]` or not a number
    #[error("Invalid quality: {0}")]
    InvalidQuality(f64),

    /// The underlying encoder failed
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}
