//! [`Encoder`] over an in-memory surface.

use super::{encode_image, OutputFormat};
use crate::decode::DecodedImage;
use crate::search::{EncodeFailure, Encoder};

/// Probes the encoded size of a borrowed surface in a fixed output format.
///
/// The surface is borrowed immutably for the lifetime of the encoder, so it
/// cannot change while a search is probing it.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceEncoder<'a> {
    image: &'a DecodedImage,
    format: OutputFormat,
}

impl<'a> SurfaceEncoder<'a> {
    pub fn new(image: &'a DecodedImage, format: OutputFormat) -> Self {
        Self { image, format }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }
}

impl Encoder for SurfaceEncoder<'_> {
    fn supports_quality(&self) -> bool {
        self.format.supports_quality()
    }

    fn probe(&mut self, quality: f64) -> Result<u64, EncodeFailure> {
        let bytes = encode_image(self.image, self.format, quality)?;
        Ok(bytes.len() as u64)
    }
}
