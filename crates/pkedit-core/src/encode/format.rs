//! Output formats and format conversion.

use std::fmt;
use std::io::Cursor;

use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{ExtendedColorType, ImageEncoder};
use serde::{Deserialize, Serialize};

use super::jpeg::encode_jpeg_rgba;
use super::EncodeError;
use crate::decode::{DecodedImage, CHANNELS};

/// Formats the editor can export to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    #[default]
    #[serde(rename = "image/jpeg")]
    Jpeg,
    #[serde(rename = "image/png")]
    Png,
    #[serde(rename = "image/webp")]
    WebP,
}

impl OutputFormat {
    /// MIME type as used by `canvas.toBlob`.
    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
            OutputFormat::WebP => "image/webp",
        }
    }

    /// File extension for downloads.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
            OutputFormat::WebP => "webp",
        }
    }

    /// Parse a MIME type. Unknown types fall back to PNG, as the canvas does.
    pub fn from_mime_type(mime: &str) -> Self {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => OutputFormat::Jpeg,
            "image/webp" => OutputFormat::WebP,
            _ => OutputFormat::Png,
        }
    }

    /// Whether the quality parameter changes the output.
    ///
    /// Only JPEG is lossy here; the WebP encoder is lossless.
    pub fn supports_quality(self) -> bool {
        matches!(self, OutputFormat::Jpeg)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime_type())
    }
}

/// Map a normalized quality in `(0, 1]` to the 1-100 JPEG scale.
pub fn quality_to_percent(quality: f64) -> u8 {
    (quality * 100.0).round().clamp(1.0, 100.0) as u8
}

/// Encode a surface into `format`.
///
/// `quality` is normalized to `(0, 1]` and only used for JPEG.
///
/// # Errors
///
/// Returns `EncodeError::InvalidQuality` for a non-finite or non-positive
/// quality, and the usual dimension and buffer errors.
pub fn encode_image(
    image: &DecodedImage,
    format: OutputFormat,
    quality: f64,
) -> Result<Vec<u8>, EncodeError> {
    if !quality.is_finite() || quality <= 0.0 {
        return Err(EncodeError::InvalidQuality(quality));
    }
    if image.width == 0 || image.height == 0 {
        return Err(EncodeError::InvalidDimensions {
            width: image.width,
            height: image.height,
        });
    }
    let expected = image.width as usize * image.height as usize * CHANNELS;
    if image.pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: image.pixels.len(),
        });
    }

    match format {
        OutputFormat::Jpeg => encode_jpeg_rgba(image, quality_to_percent(quality)),
        OutputFormat::Png => {
            let mut buffer = Cursor::new(Vec::new());
            PngEncoder::new(&mut buffer)
                .write_image(&image.pixels, image.width, image.height, ExtendedColorType::Rgba8)
                .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;
            Ok(buffer.into_inner())
        }
        OutputFormat::WebP => {
            let mut buffer = Cursor::new(Vec::new());
            WebPEncoder::new_lossless(&mut buffer)
                .write_image(&image.pixels, image.width, image.height, ExtendedColorType::Rgba8)
                .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;
            Ok(buffer.into_inner())
        }
    }
}
