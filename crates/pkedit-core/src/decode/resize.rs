//! Image resizing: exact pixel sizes, percentage scaling and aspect locking.
//!
//! All functions return new `DecodedImage` instances without modifying the input.

use serde::{Deserialize, Serialize};

use super::{DecodeError, DecodedImage, FilterType};

/// How the user asked for the output to be sized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeMode {
    /// Exact output dimensions in pixels.
    Pixels { width: u32, height: u32 },
    /// Uniform scale of the source, in percent (100 = unchanged).
    Percent(u32),
}

impl ResizeMode {
    /// Resolve the output dimensions for a source of `src_width x src_height`.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError::InvalidDimensions` for a zero width, height or
    /// percentage.
    pub fn target_dimensions(
        self,
        src_width: u32,
        src_height: u32,
    ) -> Result<(u32, u32), DecodeError> {
        match self {
            ResizeMode::Pixels { width, height } => {
                if width == 0 || height == 0 {
                    return Err(DecodeError::InvalidDimensions { width, height });
                }
                Ok((width, height))
            }
            ResizeMode::Percent(percent) => {
                if percent == 0 {
                    return Err(DecodeError::InvalidDimensions {
                        width: 0,
                        height: 0,
                    });
                }
                Ok((
                    scale_percent(src_width, percent),
                    scale_percent(src_height, percent),
                ))
            }
        }
    }
}

fn scale_percent(value: u32, percent: u32) -> u32 {
    ((value as f64 * percent as f64) / 100.0).round().max(1.0) as u32
}

/// Height matching `width` when the source aspect ratio is locked.
///
/// Returns `None` when any input is zero.
pub fn locked_height(width: u32, src_width: u32, src_height: u32) -> Option<u32> {
    if width == 0 || src_width == 0 || src_height == 0 {
        return None;
    }
    let ratio = src_height as f64 / src_width as f64;
    Some((width as f64 * ratio).round() as u32)
}

/// Width matching `height` when the source aspect ratio is locked.
///
/// Returns `None` when any input is zero.
pub fn locked_width(height: u32, src_width: u32, src_height: u32) -> Option<u32> {
    if height == 0 || src_width == 0 || src_height == 0 {
        return None;
    }
    let ratio = src_width as f64 / src_height as f64;
    Some((height as f64 * ratio).round() as u32)
}

/// Resize an image to exact dimensions.
///
/// # Errors
///
/// Returns `DecodeError::InvalidDimensions` if either target dimension is zero
/// and `DecodeError::CorruptedFile` if the source buffer is inconsistent.
pub fn resize(
    image: &DecodedImage,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<DecodedImage, DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::InvalidDimensions { width, height });
    }

    if image.width == width && image.height == height {
        return Ok(image.clone());
    }

    let rgba_image = image
        .to_rgba_image()
        .ok_or_else(|| DecodeError::CorruptedFile("Failed to create RgbaImage".to_string()))?;

    let resized = image::imageops::resize(&rgba_image, width, height, filter.to_image_filter());

    Ok(DecodedImage::from_rgba_image(resized))
}
