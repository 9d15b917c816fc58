//! Core types for image decoding.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why an upload could not be turned into a surface.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Please upload an image file (JPG, PNG, WebP…).")]
    NotAnImage,

    /// No decoder recognises the bytes.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),

    /// A zero width or height was requested.
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}

/// Resampling used when the canvas is redrawn at a new size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterType {
    Nearest,
    /// What a browser canvas uses for `drawImage` scaling.
    #[default]
    Bilinear,
    Lanczos3,
}

impl FilterType {
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        use image::imageops::FilterType as Image;
        match self {
            FilterType::Nearest => Image::Nearest,
            FilterType::Bilinear => Image::Triangle,
            FilterType::Lanczos3 => Image::Lanczos3,
        }
    }
}

/// Value of the EXIF `Orientation` tag (1 to 8).
///
/// Names describe the transform that makes the stored pixels upright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Orientation {
    #[default]
    Normal = 1,
    FlipHorizontal = 2,
    Rotate180 = 3,
    FlipVertical = 4,
    /// Mirror across the top-left to bottom-right diagonal.
    Transpose = 5,
    Rotate90CW = 6,
    /// Mirror across the top-right to bottom-left diagonal.
    Transverse = 7,
    Rotate270CW = 8,
}

impl From<u32> for Orientation {
    /// Out-of-range tag values are treated as upright.
    fn from(value: u32) -> Self {
        match value {
            2 => Orientation::FlipHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::FlipVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90CW,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270CW,
            _ => Orientation::Normal,
        }
    }
}

/// Bytes per RGBA pixel.
pub const CHANNELS: usize = 4;

/// The editing surface: RGBA pixels, row-major, `width * height * 4` bytes.
///
/// Every editing operation reads and writes this. Alpha is carried so
/// background removal and PNG/WebP export keep transparency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            width as usize * height as usize * CHANNELS,
            "RGBA buffer does not match {}x{}",
            width,
            height
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Opaque image of a single colour.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let pixels = [rgb[0], rgb[1], rgb[2], 255].repeat(width as usize * height as usize);
        Self::new(width, height, pixels)
    }

    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self::new(width, height, img.into_raw())
    }

    /// Copy into an `image::RgbaImage`; `None` if the buffer length is off.
    pub fn to_rgba_image(&self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    /// RGBA value at `(x, y)`, if in bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * CHANNELS;
        let px = self.pixels.get(idx..idx + CHANNELS)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub fn byte_size(&self) -> usize {
        self.pixels.len()
    }

    /// True for a zero-area surface or a missing buffer.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_type_conversion() {
        assert!(matches!(
            FilterType::Nearest.to_image_filter(),
            image::imageops::FilterType::Nearest
        ));
        assert!(matches!(
            FilterType::Bilinear.to_image_filter(),
            image::imageops::FilterType::Triangle
        ));
        assert!(matches!(
            FilterType::Lanczos3.to_image_filter(),
            image::imageops::FilterType::Lanczos3
        ));
    }

    #[test]
    fn test_orientation_tag_values() {
        for value in 1..=8u32 {
            assert_eq!(Orientation::from(value) as u8 as u32, value);
        }
        assert_eq!(Orientation::from(0), Orientation::Normal);
        assert_eq!(Orientation::from(99), Orientation::Normal);
    }

    #[test]
    fn test_surface_sizes() {
        let img = DecodedImage::new(100, 50, vec![0u8; 100 * 50 * 4]);
        assert_eq!(img.pixel_count(), 5000);
        assert_eq!(img.byte_size(), 20000);
        assert!(!img.is_empty());
        assert!(DecodedImage::new(0, 0, vec![]).is_empty());
    }

    #[test]
    fn test_filled_is_opaque() {
        let img = DecodedImage::filled(3, 2, [10, 20, 30]);
        assert_eq!(img.byte_size(), 3 * 2 * 4);
        assert_eq!(img.pixel(2, 1), Some([10, 20, 30, 255]));
        assert_eq!(img.pixel(3, 0), None);
    }

    #[test]
    fn test_rgba_image_round_trip_keeps_dimensions() {
        let img = DecodedImage::filled(7, 5, [1, 2, 3]);
        let rgba = img.to_rgba_image().unwrap();
        assert_eq!(rgba.dimensions(), (7, 5));
        assert_eq!(DecodedImage::from_rgba_image(rgba), img);
    }

    #[test]
    fn test_decode_error_display() {
        let err = DecodeError::InvalidFormat;
        assert_eq!(err.to_string(), "Invalid or unsupported image format");

        let err = DecodeError::InvalidDimensions {
            width: 0,
            height: 5,
        };
        assert_eq!(err.to_string(), "Invalid dimensions: 0x5");
    }
}
