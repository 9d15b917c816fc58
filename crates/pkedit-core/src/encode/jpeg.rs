//! JPEG encoding.
//!
//! JPEG carries no alpha channel, so RGBA surfaces are first composited over
//! black, which is what the browser canvas does when exporting `image/jpeg`.

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use std::io::Cursor;

use super::EncodeError;
use crate::decode::DecodedImage;

/// Encode packed RGB bytes (3 per pixel, row-major) as baseline JPEG.
///
/// `quality` is the encoder's 1-100 scale; out-of-range values are clamped
/// rather than rejected.
pub fn encode_jpeg(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected = width as usize * height as usize * 3;
    if pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: pixels.len(),
        });
    }

    let mut out = Cursor::new(Vec::with_capacity(expected / 8));
    JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100))
        .write_image(pixels, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(out.into_inner())
}

/// Encode an RGBA surface to JPEG, compositing transparency over black.
pub fn encode_jpeg_rgba(image: &DecodedImage, quality: u8) -> Result<Vec<u8>, EncodeError> {
    let rgb = flatten_on_black(&image.pixels);
    encode_jpeg(&rgb, image.width, image.height, quality)
}

/// Drop the alpha channel, premultiplying each colour onto a black backdrop.
fn flatten_on_black(rgba: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(rgba.len() / 4 * 3);
    for px in rgba.chunks_exact(4) {
        let alpha = px[3] as u32;
        for &c in &px[..3] {
            rgb.push(((c as u32 * alpha + 127) / 255) as u8);
        }
    }
    rgb
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_jpeg(bytes: &[u8]) -> bool {
        bytes.len() >= 4 && bytes[..2] == [0xFF, 0xD8] && bytes[bytes.len() - 2..] == [0xFF, 0xD9]
    }

    fn noisy_rgb(width: u32, height: u32) -> Vec<u8> {
        (0..(width * height * 3) as usize)
            .map(|i| ((i * 37 + i / 7) % 256) as u8)
            .collect()
    }

    #[test]
    fn test_encode_jpeg_basic() {
        let jpeg = encode_jpeg(&vec![128u8; 100 * 100 * 3], 100, 100, 90).unwrap();
        assert!(is_jpeg(&jpeg));
    }

    #[test]
    fn test_encode_jpeg_quality_grows_size_on_detailed_image() {
        let pixels = noisy_rgb(64, 64);
        let low = encode_jpeg(&pixels, 64, 64, 10).unwrap();
        let high = encode_jpeg(&pixels, 64, 64, 95).unwrap();
        assert!(high.len() > low.len());
    }

    #[test]
    fn test_encode_jpeg_quality_clamping() {
        let pixels = vec![128u8; 10 * 10 * 3];
        assert!(encode_jpeg(&pixels, 10, 10, 0).is_ok());
        assert!(encode_jpeg(&pixels, 10, 10, 255).is_ok());
    }

    #[test]
    fn test_encode_jpeg_invalid_pixel_data() {
        let pixels = vec![128u8; 99 * 100 * 3]; // One row short
        let result = encode_jpeg(&pixels, 100, 100, 90);
        assert!(matches!(
            result,
            Err(EncodeError::InvalidPixelData {
                expected: 30000,
                actual: 29700
            })
        ));
    }

    #[test]
    fn test_encode_jpeg_zero_dimensions() {
        assert!(matches!(
            encode_jpeg(&[], 0, 100, 90),
            Err(EncodeError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            encode_jpeg(&[], 100, 0, 90),
            Err(EncodeError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_flatten_on_black() {
        let rgba = [200, 100, 50, 255, 200, 100, 50, 0, 255, 255, 255, 128];
        let rgb = flatten_on_black(&rgba);
        assert_eq!(rgb, vec![200, 100, 50, 0, 0, 0, 128, 128, 128]);
    }

    #[test]
    fn test_encode_jpeg_rgba_surface() {
        let image = DecodedImage::filled(16, 8, [255, 0, 0]);
        let jpeg = encode_jpeg_rgba(&image, 80).unwrap();
        assert!(is_jpeg(&jpeg));

        let decoded = image::load_from_memory(&jpeg).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (16, 8));
    }
}
